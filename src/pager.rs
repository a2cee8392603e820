/// Fixed-size pagination window over a result list.
///
/// Both paging directions are idempotent at the boundaries: forward never
/// advances past the last non-empty page, backward saturates at zero.
#[derive(Debug, Default)]
pub struct Pager {
  cursor: usize,
  page_size: usize,
}

impl Pager {
  pub fn new(page_size: usize) -> Self {
    Self { cursor: 0, page_size }
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// The currently visible window: `items[cursor..cursor + page_size]`,
  /// clamped to the item count.
  pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    let start = self.cursor.min(items.len());
    let end = (self.cursor + self.page_size).min(items.len());
    &items[start..end]
  }

  /// Advance one page, staying on the last non-empty page.
  pub fn forward(&mut self, len: usize) {
    if self.cursor + self.page_size < len {
      self.cursor += self.page_size;
    }
  }

  /// Retreat one page, saturating at offset zero.
  pub fn backward(&mut self) {
    self.cursor = self.cursor.saturating_sub(self.page_size);
  }

  pub fn reset(&mut self) {
    self.cursor = 0;
  }

  pub fn has_prev(&self) -> bool {
    self.cursor > 0
  }

  pub fn has_next(&self, len: usize) -> bool {
    self.cursor + self.page_size < len
  }

  /// 1-based page number and total page count, for the results title.
  pub fn page_of(&self, len: usize) -> (usize, usize) {
    let pages = len.div_ceil(self.page_size).max(1);
    (self.cursor / self.page_size + 1, pages)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn items(n: usize) -> Vec<usize> {
    (0..n).collect()
  }

  #[test]
  fn first_page_is_five_from_zero() {
    let pager = Pager::new(5);
    let records = items(12);
    assert_eq!(pager.visible(&records), &[0, 1, 2, 3, 4]);
  }

  #[test]
  fn forward_pages_through_twelve_records() {
    let mut pager = Pager::new(5);
    let records = items(12);
    pager.forward(records.len());
    assert_eq!(pager.visible(&records), &[5, 6, 7, 8, 9]);
    pager.forward(records.len());
    assert_eq!(pager.visible(&records), &[10, 11]);
  }

  #[test]
  fn forward_is_idempotent_on_last_page() {
    let mut pager = Pager::new(5);
    let records = items(12);
    for _ in 0..5 {
      pager.forward(records.len());
    }
    assert_eq!(pager.cursor(), 10);
    assert_eq!(pager.visible(&records), &[10, 11]);
  }

  #[test]
  fn backward_saturates_at_zero() {
    let mut pager = Pager::new(5);
    let records = items(12);
    pager.backward();
    assert_eq!(pager.cursor(), 0);
    assert_eq!(pager.visible(&records), &[0, 1, 2, 3, 4]);
  }

  #[test]
  fn backward_retraces_forward() {
    let mut pager = Pager::new(5);
    let records = items(12);
    pager.forward(records.len());
    pager.forward(records.len());
    pager.backward();
    assert_eq!(pager.visible(&records), &[5, 6, 7, 8, 9]);
    pager.backward();
    assert_eq!(pager.visible(&records), &[0, 1, 2, 3, 4]);
  }

  #[test]
  fn empty_list_yields_empty_window() {
    let mut pager = Pager::new(5);
    let records: Vec<usize> = Vec::new();
    assert!(pager.visible(&records).is_empty());
    pager.forward(records.len());
    pager.backward();
    assert!(pager.visible(&records).is_empty());
    assert_eq!(pager.cursor(), 0);
  }

  #[test]
  fn exact_multiple_has_no_phantom_page() {
    let mut pager = Pager::new(5);
    let records = items(10);
    pager.forward(records.len());
    assert_eq!(pager.visible(&records), &[5, 6, 7, 8, 9]);
    pager.forward(records.len());
    assert_eq!(pager.cursor(), 5);
  }

  #[test]
  fn page_of_reports_position() {
    let mut pager = Pager::new(5);
    let records = items(12);
    assert_eq!(pager.page_of(records.len()), (1, 3));
    pager.forward(records.len());
    assert_eq!(pager.page_of(records.len()), (2, 3));
    assert!(pager.has_prev());
    assert!(pager.has_next(records.len()));
    pager.forward(records.len());
    assert!(!pager.has_next(records.len()));
  }
}
