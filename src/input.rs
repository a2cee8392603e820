use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode};

// --- Line editing ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// A single-line text editor: the search box and every dialog field.
/// `cursor` is a char index; `scroll` is a display-column offset maintained
/// by the renderer.
#[derive(Debug, Default, Clone)]
pub struct LineEdit {
  pub text: String,
  pub cursor: usize,
  pub scroll: usize,
}

impl LineEdit {
  pub fn insert(&mut self, c: char) {
    let byte_idx = char_to_byte_index(&self.text, self.cursor);
    self.text.insert(byte_idx, c);
    self.cursor += 1;
  }

  pub fn backspace(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
      let byte_idx = char_to_byte_index(&self.text, self.cursor);
      self.text.remove(byte_idx);
    }
  }

  pub fn delete(&mut self) {
    if self.cursor < self.text.chars().count() {
      let byte_idx = char_to_byte_index(&self.text, self.cursor);
      self.text.remove(byte_idx);
    }
  }

  pub fn left(&mut self) {
    self.cursor = self.cursor.saturating_sub(1);
  }

  pub fn right(&mut self) {
    if self.cursor < self.text.chars().count() {
      self.cursor += 1;
    }
  }

  pub fn home(&mut self) {
    self.cursor = 0;
  }

  pub fn end(&mut self) {
    self.cursor = self.text.chars().count();
  }

  pub fn clear(&mut self) {
    self.text.clear();
    self.cursor = 0;
    self.scroll = 0;
  }

  /// Apply one editing key. Returns false if the key was not an editing key.
  pub fn handle_key(&mut self, code: KeyCode) -> bool {
    match code {
      KeyCode::Char(c) => self.insert(c),
      KeyCode::Backspace => self.backspace(),
      KeyCode::Delete => self.delete(),
      KeyCode::Left => self.left(),
      KeyCode::Right => self.right(),
      KeyCode::Home => self.home(),
      KeyCode::End => self.end(),
      _ => return false,
    }
    true
  }
}

// --- Event handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  // Ctrl+N — open the insertion dialog from anywhere but another dialog.
  if key.modifiers.contains(KeyModifiers::CONTROL)
    && key.code == KeyCode::Char('n')
    && matches!(app.mode, AppMode::Input | AppMode::Results)
  {
    app.open_insert_dialog();
    return;
  }

  // Ctrl+E — open the query dialog from the search view.
  if key.modifiers.contains(KeyModifiers::CONTROL)
    && key.code == KeyCode::Char('e')
    && matches!(app.mode, AppMode::Input | AppMode::Results)
  {
    app.open_query_dialog();
    return;
  }

  // Ctrl+R — clear all results.
  if key.modifiers.contains(KeyModifiers::CONTROL)
    && key.code == KeyCode::Char('r')
    && matches!(app.mode, AppMode::Input | AppMode::Results)
  {
    app.reset_results();
    return;
  }

  match app.mode {
    AppMode::Input => handle_input_key(app, key),
    AppMode::Results => handle_results_key(app, key),
    AppMode::QueryDialog => handle_query_dialog_key(app, key),
    AppMode::InsertDialog => handle_insert_dialog_key(app, key),
    AppMode::NotFound => handle_not_found_key(app, key),
  }
}

fn handle_input_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.trigger_search();
    }
    KeyCode::Esc => {
      if !app.input.text.is_empty() {
        app.input.clear();
      } else if !app.records.is_empty() {
        app.mode = AppMode::Results;
      } else {
        app.should_quit = true;
      }
    }
    KeyCode::Down => {
      if !app.records.is_empty() {
        app.mode = AppMode::Results;
      }
    }
    code => {
      app.input.handle_key(code);
    }
  }
}

fn handle_results_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Right | KeyCode::Char('l') => {
      app.page_forward();
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.page_backward();
    }
    KeyCode::Esc | KeyCode::Up => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}

fn handle_query_dialog_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.confirm_query_dialog();
    }
    KeyCode::Esc => {
      app.cancel_query_dialog();
    }
    KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
      if let Some(ref mut dialog) = app.query_dialog {
        dialog.toggle_focus();
      }
    }
    code => {
      if let Some(ref mut dialog) = app.query_dialog {
        dialog.focused_mut().handle_key(code);
      }
    }
  }
}

fn handle_insert_dialog_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.confirm_insert_dialog();
    }
    KeyCode::Esc => {
      app.cancel_insert_dialog();
    }
    code => {
      if let Some(ref mut dialog) = app.insert_dialog {
        dialog.id.handle_key(code);
      }
    }
  }
}

fn handle_not_found_key(app: &mut App, key: event::KeyEvent) {
  if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
    app.dismiss_not_found();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn char_to_byte_index_multibyte() {
    let s = "aé日b";
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6);
    assert_eq!(char_to_byte_index(s, 4), 7);
    assert_eq!(char_to_byte_index(s, 99), 7);
  }

  #[test]
  fn line_edit_insert_and_move() {
    let mut edit = LineEdit::default();
    for c in "abc".chars() {
      edit.insert(c);
    }
    assert_eq!(edit.text, "abc");
    edit.left();
    edit.insert('x');
    assert_eq!(edit.text, "abxc");
    assert_eq!(edit.cursor, 3);
  }

  #[test]
  fn line_edit_backspace_and_delete() {
    let mut edit = LineEdit { text: "abc".to_string(), cursor: 3, scroll: 0 };
    edit.backspace();
    assert_eq!(edit.text, "ab");
    edit.home();
    edit.delete();
    assert_eq!(edit.text, "b");
    edit.backspace(); // at position 0, no-op
    assert_eq!(edit.text, "b");
  }

  #[test]
  fn line_edit_clear_resets_everything() {
    let mut edit = LineEdit { text: "abc".to_string(), cursor: 2, scroll: 1 };
    edit.clear();
    assert_eq!(edit.text, "");
    assert_eq!(edit.cursor, 0);
    assert_eq!(edit.scroll, 0);
  }
}
