use serde::Deserialize;
use tracing::warn;

/// A normalized video-clip descriptor: where an entity appears in a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRecord {
  /// Label of the source video the scene was cut from.
  pub video: String,
  /// YouTube video ID.
  pub id: String,
  /// The recognized entity the scene is tagged with.
  pub entity: String,
  /// Scene start, in seconds.
  pub start: i64,
  /// Scene end, in seconds.
  pub end: i64,
  /// `end - start`. Computed at normalization, never sent by the backend.
  pub duration: i64,
}

/// Wire shape of one scene row from the backend.
///
/// The canonical shape is the tagged object with start/end already in
/// seconds. Older backend revisions send a positional 5-tuple
/// `[video, url_or_id, entity, start, end]` with mixed-radix timestamp
/// strings; that layout is kept as a compatibility shim.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRow {
  Tagged { video: String, id: String, entity: String, start: i64, end: i64 },
  Positional(String, String, String, String, String),
}

/// Parse a backend timestamp string into seconds.
///
/// Timestamps are three-field mixed-radix durations `A:B:C` evaluated as
/// `A*1440 + B*60 + C` — this is the unit the backend indexes scenes in,
/// not true HH:MM:SS.
pub fn parse_timestamp(s: &str) -> Option<i64> {
  let fields: Vec<&str> = s.trim().split(':').collect();
  if fields.len() != 3 {
    return None;
  }
  let a: i64 = fields[0].parse().ok()?;
  let b: i64 = fields[1].parse().ok()?;
  let c: i64 = fields[2].parse().ok()?;
  Some(a * 1440 + b * 60 + c)
}

/// Extract a YouTube video ID from a URL-or-ID string.
/// Splits on `=` and takes the last segment, so a bare ID passes through.
pub fn extract_video_id(s: &str) -> &str {
  s.rsplit('=').next().unwrap_or(s)
}

impl RawRow {
  /// Normalize one wire row into a scene record.
  /// Returns `None` for rows with malformed timestamps.
  fn into_record(self) -> Option<SceneRecord> {
    match self {
      RawRow::Tagged { video, id, entity, start, end } => {
        Some(SceneRecord { video, id, entity, start, end, duration: end - start })
      }
      RawRow::Positional(video, url_or_id, entity, start, end) => {
        let start = parse_timestamp(&start)?;
        let end = parse_timestamp(&end)?;
        let id = extract_video_id(&url_or_id).to_string();
        Some(SceneRecord { video, id, entity, start, end, duration: end - start })
      }
    }
  }
}

/// Normalize a full response into scene records, skipping malformed rows.
pub fn normalize_rows(rows: Vec<RawRow>) -> Vec<SceneRecord> {
  let total = rows.len();
  let records: Vec<SceneRecord> = rows.into_iter().filter_map(RawRow::into_record).collect();
  if records.len() < total {
    warn!(skipped = total - records.len(), total, "scene: skipped rows with malformed timestamps");
  }
  records
}
