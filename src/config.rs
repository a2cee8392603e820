use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::constants;

/// User configuration read from `config.toml` under the platform config dir.
///
/// Both keys are optional; missing keys fall back to the defaults in
/// `constants.ron`. A malformed file is skipped with a warning rather than
/// partially applied.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Config {
  pub endpoint: Option<String>,
  pub port: Option<u16>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "hunt") {
      let config_file = proj_dirs.config_dir().join("config.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        match toml::from_str(&content) {
          Ok(config) => return config,
          Err(e) => {
            warn!(file = %config_file.display(), err = %e, "config: malformed config.toml, using defaults");
          }
        }
      }
    }
    Self::default()
  }

  /// Resolve the backend base URL as `endpoint:port`.
  pub fn base_url(&self) -> String {
    let endpoint = self.endpoint.as_deref().unwrap_or(&constants().default_endpoint);
    let port = self.port.unwrap_or(constants().default_port);
    format!("{}:{}", endpoint.trim_end_matches('/'), port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn base_url_combines_endpoint_and_port() {
    let config = Config { endpoint: Some("http://x".to_string()), port: Some(8080) };
    assert_eq!(config.base_url(), "http://x:8080");
  }

  #[test]
  fn base_url_strips_trailing_slash() {
    let config = Config { endpoint: Some("http://x/".to_string()), port: Some(8080) };
    assert_eq!(config.base_url(), "http://x:8080");
  }

  #[test]
  fn base_url_defaults_when_unset() {
    let config = Config::default();
    assert_eq!(config.base_url(), "http://localhost:5000");
  }

  #[test]
  fn base_url_mixes_defaults_and_overrides() {
    let config = Config { endpoint: None, port: Some(9000) };
    assert_eq!(config.base_url(), "http://localhost:9000");
  }

  #[test]
  fn config_parses_partial_toml() {
    let config: Config = toml::from_str("endpoint = \"http://backend.local\"").unwrap();
    assert_eq!(config.endpoint.as_deref(), Some("http://backend.local"));
    assert_eq!(config.port, None);
  }
}
