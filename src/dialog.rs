use crate::backend::QueryPayload;
use crate::input::LineEdit;

/// Which field of the query dialog currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryField {
  #[default]
  Query,
  Filter,
}

/// Modal editor for an ad-hoc `{query, filter}` pair.
///
/// The payload is ephemeral: built on open, turned into a `QueryPayload`
/// on confirm, dropped whole on cancel. Cancelling never reaches the
/// backend — the caller only acts on a confirmed payload.
#[derive(Debug, Default)]
pub struct QueryDialog {
  pub query: LineEdit,
  pub filter: LineEdit,
  pub focus: QueryField,
}

impl QueryDialog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      QueryField::Query => QueryField::Filter,
      QueryField::Filter => QueryField::Query,
    };
  }

  pub fn focused_mut(&mut self) -> &mut LineEdit {
    match self.focus {
      QueryField::Query => &mut self.query,
      QueryField::Filter => &mut self.filter,
    }
  }

  /// Consume the dialog into the payload it was editing.
  pub fn confirm(self) -> QueryPayload {
    QueryPayload { query: self.query.text, filter: self.filter.text }
  }
}

/// Modal editor for a single YouTube video ID to hand to the backend
/// for ingestion.
#[derive(Debug, Default)]
pub struct InsertDialog {
  pub id: LineEdit,
}

impl InsertDialog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Consume the dialog into the entered video ID, trimmed.
  pub fn confirm(self) -> String {
    self.id.text.trim().to_string()
  }
}
