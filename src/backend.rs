use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::constants;
use crate::scene::RawRow;

/// The ad-hoc query pair submitted through the query dialog.
/// Sent to the backend as-is, no client-side validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryPayload {
  pub query: String,
  pub filter: String,
}

/// Response envelope shared by all backend endpoints.
/// A null or absent `result` on the entity endpoint means "not found".
#[derive(Debug, Deserialize)]
struct Envelope {
  #[serde(default)]
  result: Option<Vec<RawRow>>,
}

/// HTTP client for the scene-recognition backend.
///
/// Constructed from a fully-resolved base URL — config is loaded before
/// this exists, so there is no window where requests target a fallback
/// host. Calls are fire-once: no retries, timeouts, or backoff.
#[derive(Debug, Clone)]
pub struct HunterClient {
  http: Client,
  base_url: String,
}

impl HunterClient {
  pub fn new(base_url: String) -> Self {
    Self { http: Client::new(), base_url }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Fetch all scenes the backend has indexed for a named entity.
  /// `Ok(None)` means the entity is unknown to the backend.
  pub async fn scenes_of_entity(&self, name: &str) -> Result<Option<Vec<RawRow>>> {
    let url = format!("{}{}/{}", self.base_url, constants().entity_path, urlencoding::encode(name));
    let response = self
      .http
      .get(&url)
      .send()
      .await
      .with_context(|| format!("entity lookup request to {} failed", url))?
      .error_for_status()
      .context("entity lookup rejected by backend")?;
    let envelope: Envelope = response.json().await.context("entity lookup returned malformed JSON")?;
    Ok(envelope.result)
  }

  /// Submit an ad-hoc structured query. A null `result` decodes as no rows.
  pub async fn execute_query(&self, payload: &QueryPayload) -> Result<Vec<RawRow>> {
    let url = format!("{}{}", self.base_url, constants().query_path);
    let response = self
      .http
      .post(&url)
      .json(payload)
      .send()
      .await
      .with_context(|| format!("query request to {} failed", url))?
      .error_for_status()
      .context("query rejected by backend")?;
    let envelope: Envelope = response.json().await.context("query returned malformed JSON")?;
    Ok(envelope.result.unwrap_or_default())
  }

  /// Ask the backend to ingest and analyze a YouTube video.
  /// The response body is an opaque ack; only transport success matters.
  pub async fn request_insertion(&self, youtube_id: &str) -> Result<()> {
    let url = format!("{}{}/{}", self.base_url, constants().youtube_path, urlencoding::encode(youtube_id));
    self
      .http
      .get(&url)
      .send()
      .await
      .with_context(|| format!("insertion request to {} failed", url))?
      .error_for_status()
      .context("insertion rejected by backend")?;
    Ok(())
  }
}
