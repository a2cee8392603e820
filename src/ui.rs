use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph},
};

use crate::app::{App, AppMode};
use crate::dialog::QueryField;
use crate::input::LineEdit;
use crate::scene::SceneRecord;

// --- Palette ---

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;
const ERROR: Color = Color::Red;
const OK: Color = Color::Green;
const STATUS: Color = Color::Yellow;
const FG: Color = Color::Gray;
const STRIPE_BG: Color = Color::Rgb(28, 28, 36);

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// A centered popup rectangle, clamped to the surrounding area.
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, header_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  let show_cursor = app.mode == AppMode::Input;
  render_line_edit(frame, &mut app.input, input_area, " Search entity ", show_cursor);
  render_footer(frame, app, footer_area);

  match app.mode {
    AppMode::QueryDialog => render_query_dialog(frame, app),
    AppMode::InsertDialog => render_insert_dialog(frame, app),
    AppMode::NotFound => render_not_found_dialog(frame),
    _ => {}
  }
}

fn render_header(frame: &mut Frame, area: Rect) {
  let left = Line::from(Span::styled(" ⌕ hunt ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(MUTED)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect) {
  if app.records.is_empty() {
    render_welcome(frame, area);
  } else {
    render_results(frame, app, area);
  }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("⌕  Welcome to hunt", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Find the scenes a celebrity appears in.", Style::default().fg(FG))),
    Line::from(""),
    Line::from(Span::styled("Type an entity name below and press Enter.", Style::default().fg(MUTED))),
    Line::from(Span::styled("Ctrl+E runs a raw query, Ctrl+N requests a new video.", Style::default().fg(MUTED))),
  ];
  let paragraph = Paragraph::new(text)
    .alignment(Alignment::Center)
    .block(Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(MUTED)));
  frame.render_widget(paragraph, area);
}

/// Format a scene's clip window as `start→end (durations)`.
fn clip_label(record: &SceneRecord) -> String {
  format!("{}s→{}s ({}s)", record.start, record.end, record.duration)
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
  // Inner width: area minus 2 borders minus 2 chars for the bullet
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .visible()
    .iter()
    .enumerate()
    .map(|(i, record)| {
      let bg = if i % 2 == 1 { STRIPE_BG } else { Color::Reset };

      let left = format!("{} — {}", record.video, record.entity);
      let right = format!("{}  {}", record.id, clip_label(record));

      let right_w = right.chars().count();
      let left_max = inner_w.saturating_sub(right_w + 2);
      let left = truncate_str(&left, left_max);
      let gap = inner_w.saturating_sub(left.chars().count() + right_w);

      let line = Line::from(vec![
        Span::raw("▸ "),
        Span::styled(left, Style::default().fg(FG)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(MUTED)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let (page, pages) = app.pager.page_of(app.records.len());
  let title = format!(" Scenes — {} total, page {}/{} ", app.records.len(), page, pages);

  let list = List::new(items).block(
    Block::bordered()
      .title(title)
      .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(if app.mode == AppMode::Results { ACCENT } else { MUTED })),
  );

  frame.render_widget(list, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(STATUS))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(ERROR))
  } else if let Some(notice) = &app.notice {
    (format!(" ✓ {}", notice), Style::default().fg(OK))
  } else {
    (" Ready".to_string(), Style::default().fg(MUTED))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Render a single-line editor in a bordered box, scrolled so the cursor
/// stays visible. Shared by the search box and all dialog fields.
fn render_line_edit(frame: &mut Frame, edit: &mut LineEdit, area: Rect, title: &str, focused: bool) {
  let border_color = if focused { ACCENT } else { MUTED };
  let block = Block::bordered()
    .title(title.to_string())
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&edit.text, edit.cursor);

  if cursor_col < edit.scroll {
    edit.scroll = cursor_col;
  } else if cursor_col >= edit.scroll + inner_w {
    edit.scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = edit
    .text
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= edit.scroll)
    .take_while(|(start, _, _)| *start < edit.scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(FG)).block(block);
  frame.render_widget(paragraph, area);

  if focused {
    let cursor_x = area.x + 2 + (cursor_col - edit.scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

// --- Dialogs ---

fn dialog_block(title: &str) -> Block<'_> {
  Block::bordered()
    .title(format!(" {} ", title))
    .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(ACCENT))
}

fn render_query_dialog(frame: &mut Frame, app: &mut App) {
  let Some(ref mut dialog) = app.query_dialog else { return };
  let area = popup_area(frame.area(), 62, 10);
  frame.render_widget(Clear, area);
  let block = dialog_block("Run query");
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let [query_area, filter_area, hint_area] =
    Layout::vertical([Constraint::Length(3), Constraint::Length(3), Constraint::Length(1)])
      .areas(inner);

  let query_focused = dialog.focus == QueryField::Query;
  render_line_edit(frame, &mut dialog.query, query_area, " Query ", query_focused);
  render_line_edit(frame, &mut dialog.filter, filter_area, " Filter ", !query_focused);

  let hint = Line::from(Span::styled(" Tab switch field · Enter run · Esc cancel", Style::default().fg(MUTED)));
  frame.render_widget(hint, hint_area);
}

fn render_insert_dialog(frame: &mut Frame, app: &mut App) {
  let Some(ref mut dialog) = app.insert_dialog else { return };
  let area = popup_area(frame.area(), 52, 7);
  frame.render_widget(Clear, area);
  let block = dialog_block("Insert video");
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let [id_area, hint_area] = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(inner);
  render_line_edit(frame, &mut dialog.id, id_area, " YouTube video ID ", true);

  let hint = Line::from(Span::styled(" Enter request insertion · Esc cancel", Style::default().fg(MUTED)));
  frame.render_widget(hint, hint_area);
}

fn render_not_found_dialog(frame: &mut Frame) {
  let area = popup_area(frame.area(), 44, 6);
  frame.render_widget(Clear, area);
  let block = dialog_block("Not found");
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let text = vec![
    Line::from(""),
    Line::from(Span::styled("No scenes found for that entity.", Style::default().fg(FG))),
    Line::from(Span::styled("Enter/Esc to dismiss", Style::default().fg(MUTED))),
  ];
  frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let has_records = !app.records.is_empty();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Input => {
      let mut k = vec![("Enter", "Search"), ("^e", "Query"), ("^n", "Insert")];
      if has_records {
        k.push(("↓", "Results"));
        k.push(("^r", "Reset"));
        k.push(("Esc", "Results"));
      } else {
        k.push(("Esc", "Quit"));
      }
      k
    }
    AppMode::Results => {
      let mut k = Vec::new();
      if app.pager.has_prev() {
        k.push(("←", "Prev page"));
      }
      if app.pager.has_next(app.records.len()) {
        k.push(("→", "Next page"));
      }
      k.push(("^e", "Query"));
      k.push(("^n", "Insert"));
      k.push(("^r", "Reset"));
      k.push(("Esc", "Back"));
      k
    }
    AppMode::QueryDialog => vec![("Tab", "Field"), ("Enter", "Run"), ("Esc", "Cancel")],
    AppMode::InsertDialog => vec![("Enter", "Request"), ("Esc", "Cancel")],
    AppMode::NotFound => vec![("Enter", "Dismiss")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(Color::Black).bg(MUTED)),
        Span::styled(format!(" {} ", action), Style::default().fg(MUTED)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_leaves_short_strings_alone() {
    assert_eq!(truncate_str("abc", 5), "abc");
    assert_eq!(truncate_str("abcde", 5), "abcde");
  }

  #[test]
  fn truncate_appends_ellipsis() {
    assert_eq!(truncate_str("abcdef", 5), "abcd…");
  }

  #[test]
  fn popup_is_centered_and_clamped() {
    let outer = Rect { x: 0, y: 0, width: 100, height: 40 };
    let popup = popup_area(outer, 60, 10);
    assert_eq!(popup, Rect { x: 20, y: 15, width: 60, height: 10 });

    let tiny = Rect { x: 0, y: 0, width: 30, height: 5 };
    let clamped = popup_area(tiny, 60, 10);
    assert!(clamped.width <= tiny.width && clamped.height <= tiny.height);
  }

  #[test]
  fn clip_label_shows_window_and_duration() {
    let record = SceneRecord {
      video: "Interview".to_string(),
      id: "abc123".to_string(),
      entity: "Adam Sandler".to_string(),
      start: 3,
      end: 15,
      duration: 12,
    };
    assert_eq!(clip_label(&record), "3s→15s (12s)");
  }
}
