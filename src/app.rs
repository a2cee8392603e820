use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::backend::{HunterClient, QueryPayload};
use crate::constants::constants;
use crate::dialog::{InsertDialog, QueryDialog};
use crate::input::LineEdit;
use crate::pager::Pager;
use crate::scene::{RawRow, SceneRecord, normalize_rows};

// --- Types ---

pub type SearchResult = Result<Option<Vec<RawRow>>>;
pub type QueryResult = Result<Vec<RawRow>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Input,
  Results,
  QueryDialog,
  InsertDialog,
  NotFound,
}

/// In-flight async task receivers.
///
/// Search and query responses carry the sequence number of the request that
/// produced them; `check_pending` drops any response that is not from the
/// latest request, so ordering is last-request-wins rather than
/// last-response-wins.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) search_rx: Option<oneshot::Receiver<(u64, SearchResult)>>,
  pub(crate) query_rx: Option<oneshot::Receiver<(u64, QueryResult)>>,
  pub(crate) insert_rx: Option<oneshot::Receiver<Result<()>>>,
}

pub struct App {
  pub input: LineEdit,
  pub mode: AppMode,
  /// Full normalized result list for the current search or query.
  pub records: Vec<SceneRecord>,
  pub pager: Pager,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  /// Transient success notice (e.g. insertion requested), auto-expiring.
  pub notice: Option<String>,
  pub should_quit: bool,
  pub query_dialog: Option<QueryDialog>,
  pub insert_dialog: Option<InsertDialog>,
  client: HunterClient,
  pub(crate) tasks: AsyncTasks,
  /// Sequence number of the most recent search or query request.
  latest_seq: u64,
  /// Mode to return to when the current modal closes.
  return_mode: AppMode,
  /// When the last error was set — used for auto-dismiss.
  error_time: Option<Instant>,
  /// When the last notice was set — used for auto-dismiss.
  notice_time: Option<Instant>,
}

impl App {
  pub fn new(client: HunterClient) -> Self {
    Self {
      input: LineEdit::default(),
      mode: AppMode::Input,
      records: Vec::new(),
      pager: Pager::new(constants().page_size),
      last_error: None,
      status_message: None,
      notice: None,
      should_quit: false,
      query_dialog: None,
      insert_dialog: None,
      client,
      tasks: AsyncTasks::default(),
      latest_seq: 0,
      return_mode: AppMode::Input,
      error_time: None,
      notice_time: None,
    }
  }

  // --- Status line ---

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Set a transient success notice with auto-dismiss tracking.
  pub fn set_notice(&mut self, msg: String) {
    self.notice = Some(msg);
    self.notice_time = Some(Instant::now());
  }

  /// Clear stale error and notice messages after `notice_secs`.
  pub fn expire_notices(&mut self) {
    let ttl = Duration::from_secs(constants().notice_secs);
    if let Some(t) = self.error_time
      && t.elapsed() >= ttl
    {
      self.last_error = None;
      self.error_time = None;
    }
    if let Some(t) = self.notice_time
      && t.elapsed() >= ttl
    {
      self.notice = None;
      self.notice_time = None;
    }
  }

  // --- Results ---

  /// The currently visible page of records.
  pub fn visible(&self) -> &[SceneRecord] {
    self.pager.visible(&self.records)
  }

  pub fn page_forward(&mut self) {
    self.pager.forward(self.records.len());
  }

  pub fn page_backward(&mut self) {
    self.pager.backward();
  }

  /// Clear both the full result list and the visible window.
  pub fn reset_results(&mut self) {
    self.records.clear();
    self.pager.reset();
    self.mode = AppMode::Input;
  }

  /// Replace the result list with normalized rows and show the first page.
  fn apply_rows(&mut self, rows: Vec<RawRow>) {
    self.records = normalize_rows(rows);
    self.pager.reset();
    self.mode = AppMode::Results;
  }

  fn next_seq(&mut self) -> u64 {
    self.latest_seq += 1;
    self.latest_seq
  }

  // --- Search ---

  pub fn trigger_search(&mut self) {
    let name = self.input.text.trim().to_string();
    if name.is_empty() {
      self.set_error("Enter an entity name.".to_string());
      return;
    }
    info!(entity = %name, "search triggered");
    self.clear_error();
    self.status_message = Some(format!("Searching scenes of '{}'…", name));
    self.tasks.search_rx = None;
    self.tasks.query_rx = None;

    let seq = self.next_seq();
    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send((seq, client.scenes_of_entity(&name).await));
    });
    self.tasks.search_rx = Some(rx);
  }

  /// Apply a finished entity lookup, unless a newer request superseded it.
  fn on_search_result(&mut self, seq: u64, result: SearchResult) {
    if seq != self.latest_seq {
      info!(seq, latest = self.latest_seq, "search: dropping stale response");
      return;
    }
    self.status_message = None;
    match result {
      // Not-found leaves the existing result list untouched.
      Ok(None) => {
        self.return_mode = self.mode;
        self.mode = AppMode::NotFound;
      }
      Ok(Some(rows)) => {
        self.apply_rows(rows);
      }
      Err(e) => {
        warn!(err = %e, "search failed");
        self.set_error(format!("Search failed: {:#}", e));
      }
    }
  }

  // --- Query dialog ---

  pub fn open_query_dialog(&mut self) {
    self.return_mode = self.mode;
    self.query_dialog = Some(QueryDialog::new());
    self.mode = AppMode::QueryDialog;
  }

  pub fn confirm_query_dialog(&mut self) {
    let Some(dialog) = self.query_dialog.take() else { return };
    self.mode = self.return_mode;
    self.trigger_query(dialog.confirm());
  }

  pub fn cancel_query_dialog(&mut self) {
    self.query_dialog = None;
    self.mode = self.return_mode;
  }

  fn trigger_query(&mut self, payload: QueryPayload) {
    info!(query = %payload.query, filter = %payload.filter, "query triggered");
    self.clear_error();
    self.status_message = Some("Running query…".to_string());
    self.tasks.search_rx = None;
    self.tasks.query_rx = None;

    let seq = self.next_seq();
    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send((seq, client.execute_query(&payload).await));
    });
    self.tasks.query_rx = Some(rx);
  }

  /// Apply a finished query, unless a newer request superseded it.
  fn on_query_result(&mut self, seq: u64, result: QueryResult) {
    if seq != self.latest_seq {
      info!(seq, latest = self.latest_seq, "query: dropping stale response");
      return;
    }
    self.status_message = None;
    match result {
      Ok(rows) => {
        self.apply_rows(rows);
      }
      Err(e) => {
        warn!(err = %e, "query failed");
        self.set_error(format!("Query failed: {:#}", e));
      }
    }
  }

  // --- Insertion ---

  pub fn open_insert_dialog(&mut self) {
    self.return_mode = self.mode;
    self.insert_dialog = Some(InsertDialog::new());
    self.mode = AppMode::InsertDialog;
  }

  pub fn confirm_insert_dialog(&mut self) {
    let Some(dialog) = self.insert_dialog.take() else { return };
    self.mode = self.return_mode;
    let youtube_id = dialog.confirm();
    if youtube_id.is_empty() {
      self.set_error("Enter a YouTube video ID.".to_string());
      return;
    }
    info!(id = %youtube_id, "insertion requested");
    self.status_message = Some(format!("Requesting insertion of '{}'…", youtube_id));

    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(client.request_insertion(&youtube_id).await);
    });
    self.tasks.insert_rx = Some(rx);
  }

  pub fn cancel_insert_dialog(&mut self) {
    self.insert_dialog = None;
    self.mode = self.return_mode;
  }

  fn on_insert_result(&mut self, result: Result<()>) {
    self.status_message = None;
    match result {
      Ok(()) => {
        self.set_notice("Video insertion requested.".to_string());
      }
      Err(e) => {
        warn!(err = %e, "insertion failed");
        self.set_error(format!("Insertion failed: {:#}", e));
      }
    }
  }

  // --- Not-found dialog ---

  pub fn dismiss_not_found(&mut self) {
    self.mode = self.return_mode;
  }

  // --- Task polling ---

  /// Poll every in-flight task receiver once. Called each tick of the
  /// run loop; never blocks.
  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.search_rx.take() {
      match rx.try_recv() {
        Ok((seq, result)) => {
          self.on_search_result(seq, result);
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.search_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Search task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.query_rx.take() {
      match rx.try_recv() {
        Ok((seq, result)) => {
          self.on_query_result(seq, result);
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.query_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Query task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.insert_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.on_insert_result(result);
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.insert_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Insertion task failed.".to_string());
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;

  fn test_app() -> App {
    App::new(HunterClient::new("http://localhost:5000".to_string()))
  }

  fn positional_row(video: &str) -> RawRow {
    RawRow::Positional(
      video.to_string(),
      "watch?v=abc123".to_string(),
      "Adam Sandler".to_string(),
      "0:00:03".to_string(),
      "0:00:15".to_string(),
    )
  }

  #[test]
  fn search_success_replaces_records_and_resets_pager() {
    let mut app = test_app();
    app.latest_seq = 1;
    app.on_search_result(1, Ok(Some(vec![positional_row("a"), positional_row("b")])));
    assert_eq!(app.mode, AppMode::Results);
    assert_eq!(app.records.len(), 2);
    assert_eq!(app.pager.cursor(), 0);
    assert_eq!(app.visible().len(), 2);
  }

  #[test]
  fn not_found_opens_dialog_and_keeps_prior_records() {
    let mut app = test_app();
    app.latest_seq = 1;
    app.on_search_result(1, Ok(Some(vec![positional_row("kept")])));

    app.latest_seq = 2;
    app.on_search_result(2, Ok(None));
    assert_eq!(app.mode, AppMode::NotFound);
    assert_eq!(app.records.len(), 1);
    assert_eq!(app.records[0].video, "kept");

    app.dismiss_not_found();
    assert_eq!(app.mode, AppMode::Results);
  }

  #[test]
  fn stale_search_response_is_dropped() {
    let mut app = test_app();
    app.latest_seq = 2;
    app.on_search_result(1, Ok(Some(vec![positional_row("stale")])));
    assert!(app.records.is_empty());
    assert_eq!(app.mode, AppMode::Input);
  }

  #[test]
  fn stale_query_response_is_dropped() {
    let mut app = test_app();
    app.latest_seq = 5;
    app.on_query_result(4, Ok(vec![positional_row("stale")]));
    assert!(app.records.is_empty());
  }

  #[test]
  fn search_error_keeps_records_and_sets_error() {
    let mut app = test_app();
    app.latest_seq = 1;
    app.on_search_result(1, Ok(Some(vec![positional_row("kept")])));
    app.latest_seq = 2;
    app.on_search_result(2, Err(anyhow!("connection refused")));
    assert_eq!(app.records.len(), 1);
    assert!(app.last_error.as_deref().unwrap().contains("connection refused"));
  }

  #[test]
  fn query_success_pages_like_search() {
    let mut app = test_app();
    app.latest_seq = 1;
    let rows: Vec<RawRow> = (0..12).map(|i| positional_row(&format!("v{}", i))).collect();
    app.on_query_result(1, Ok(rows));
    assert_eq!(app.records.len(), 12);
    assert_eq!(app.visible().len(), 5);
    app.page_forward();
    app.page_forward();
    assert_eq!(app.visible().len(), 2);
    app.page_forward();
    assert_eq!(app.visible().len(), 2);
    app.page_backward();
    app.page_backward();
    app.page_backward();
    assert_eq!(app.pager.cursor(), 0);
  }

  #[test]
  fn cancelled_query_dialog_spawns_no_request() {
    let mut app = test_app();
    app.open_query_dialog();
    assert_eq!(app.mode, AppMode::QueryDialog);
    app.cancel_query_dialog();
    assert_eq!(app.mode, AppMode::Input);
    assert!(app.query_dialog.is_none());
    assert!(app.tasks.query_rx.is_none());
  }

  #[test]
  fn cancelled_insert_dialog_spawns_no_request() {
    let mut app = test_app();
    app.open_insert_dialog();
    app.cancel_insert_dialog();
    assert_eq!(app.mode, AppMode::Input);
    assert!(app.tasks.insert_rx.is_none());
  }

  #[test]
  fn empty_insert_id_is_rejected_before_any_request() {
    let mut app = test_app();
    app.open_insert_dialog();
    app.confirm_insert_dialog();
    assert!(app.last_error.is_some());
    assert!(app.tasks.insert_rx.is_none());
  }

  #[test]
  fn insert_success_sets_transient_notice() {
    let mut app = test_app();
    app.on_insert_result(Ok(()));
    assert_eq!(app.notice.as_deref(), Some("Video insertion requested."));
    assert!(app.last_error.is_none());
  }

  #[test]
  fn insert_failure_sets_error() {
    let mut app = test_app();
    app.on_insert_result(Err(anyhow!("503")));
    assert!(app.notice.is_none());
    assert!(app.last_error.as_deref().unwrap().contains("503"));
  }

  #[test]
  fn reset_clears_records_and_window() {
    let mut app = test_app();
    app.latest_seq = 1;
    app.on_search_result(1, Ok(Some(vec![positional_row("a")])));
    app.reset_results();
    assert!(app.records.is_empty());
    assert!(app.visible().is_empty());
    assert_eq!(app.mode, AppMode::Input);
  }

  #[test]
  fn dialogs_return_to_the_mode_they_opened_from() {
    let mut app = test_app();
    app.latest_seq = 1;
    app.on_search_result(1, Ok(Some(vec![positional_row("a")])));
    assert_eq!(app.mode, AppMode::Results);
    app.open_query_dialog();
    app.cancel_query_dialog();
    assert_eq!(app.mode, AppMode::Results);
  }
}
