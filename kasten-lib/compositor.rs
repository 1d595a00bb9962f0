//! The window stack.
//!
//! Panes are kept bottom to top; the last one is active and receives keys.
//! Every pane on the stack is accounted for in a [`DensityMap`] with the exact
//! rectangle it was pushed with, so popping it restores the map bit for bit.
//! All operations are no-ops on an empty stack.

use crate::{
  command::Command,
  density::DensityMap,
  error::Result,
  geometry::{
    Axis,
    Grid,
    Position,
    Rect,
  },
  input::KeyEvent,
  pane::{
    Pane,
    PaneContext,
  },
  surface::{
    Style,
    Surface,
  },
};

/// Smallest pane [`Compositor::shrink`] will produce.
pub const MIN_ROWS: usize = 10;
pub const MIN_COLS: usize = 40;

/// Growth per edge for one expand/shrink step.
const ROW_STEP: usize = 1;
const COL_STEP: usize = 2;

struct Entry {
  pane: Box<dyn Pane>,
  rect: Rect,
}

pub struct Compositor {
  entries: Vec<Entry>,
  grid:    Grid,
  density: DensityMap,
}

impl Compositor {
  pub fn new(grid: Grid) -> Self {
    Self {
      entries: Vec::new(),
      grid,
      density: DensityMap::new(grid.placeable_rows(), grid.cols),
    }
  }

  pub fn grid(&self) -> Grid {
    self.grid
  }

  pub fn density(&self) -> &DensityMap {
    &self.density
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The active pane.
  pub fn top(&self) -> Option<&dyn Pane> {
    self.entries.last().map(|entry| entry.pane.as_ref())
  }

  pub fn top_mut(&mut self) -> Option<&mut (dyn Pane + 'static)> {
    self.entries.last_mut().map(|entry| entry.pane.as_mut())
  }

  /// Panes from bottom to top.
  pub fn iter(&self) -> impl Iterator<Item = &dyn Pane> {
    self.entries.iter().map(|entry| entry.pane.as_ref())
  }

  /// Put `pane` on top. Its rectangle is first fitted into the placeable
  /// area.
  pub fn push(&mut self, mut pane: Box<dyn Pane>) {
    let placeable = self.grid.placeable();
    let rect = pane.rect();
    let fitted = rect.clamp_within(placeable.rows, placeable.cols);
    if fitted != rect {
      tracing::debug!(?rect, ?fitted, "pane clamped into placeable area");
      pane.resize(fitted);
    }
    self.density.add(fitted);
    tracing::debug!(kind = ?pane.kind(), rect = ?fitted, depth = self.entries.len() + 1, "push pane");
    self.entries.push(Entry { pane, rect: fitted });
  }

  /// Take the active pane off the stack.
  pub fn pop(&mut self) -> Option<Box<dyn Pane>> {
    let entry = self.entries.pop()?;
    self.density.remove(entry.rect);
    tracing::debug!(kind = ?entry.pane.kind(), rect = ?entry.rect, "pop pane");
    Some(entry.pane)
  }

  /// Where to put a new `rows x cols` pane so it covers as little as
  /// possible of what is already on screen.
  pub fn recommend(&self, rows: usize, cols: usize) -> Position {
    self.density.recommend(rows, cols)
  }

  /// Grow the active pane by one step on both edges of `axis`.
  pub fn expand(&mut self, axis: Axis) {
    let placeable = self.grid.placeable();
    self.reshape(|rect| {
      match axis {
        Axis::Vertical => {
          let (top, rows) = grow_span(rect.top, rect.rows, ROW_STEP, placeable.rows);
          Rect { top, rows, ..rect }
        },
        Axis::Horizontal => {
          let (left, cols) = grow_span(rect.left, rect.cols, COL_STEP, placeable.cols);
          Rect { left, cols, ..rect }
        },
      }
    });
  }

  /// Shrink the active pane by one step on both edges of `axis`, never below
  /// [`MIN_ROWS`] x [`MIN_COLS`].
  pub fn shrink(&mut self, axis: Axis) {
    self.reshape(|rect| {
      match axis {
        Axis::Vertical => {
          let (top, rows) = shrink_span(rect.top, rect.rows, ROW_STEP, MIN_ROWS);
          Rect { top, rows, ..rect }
        },
        Axis::Horizontal => {
          let (left, cols) = shrink_span(rect.left, rect.cols, COL_STEP, MIN_COLS);
          Rect { left, cols, ..rect }
        },
      }
    });
  }

  fn reshape(&mut self, change: impl FnOnce(Rect) -> Rect) {
    let Some(mut pane) = self.pop() else {
      return;
    };
    let rect = change(pane.rect());
    if rect != pane.rect() {
      pane.resize(rect);
    }
    self.push(pane);
  }

  /// Adapt to a new terminal size. Panes that no longer fit are moved up and
  /// left first and shrunk only where that is not enough.
  pub fn resize(&mut self, rows: usize, cols: usize) {
    self.grid = Grid::new(rows, cols);
    self.density = DensityMap::new(self.grid.placeable_rows(), cols);
    let entries = std::mem::take(&mut self.entries);
    for entry in entries {
      self.push(entry.pane);
    }
    tracing::debug!(rows, cols, panes = self.entries.len(), "compositor resized");
  }

  /// Bottom pane becomes the active one.
  pub fn up(&mut self) {
    if !self.entries.is_empty() {
      self.entries.rotate_left(1);
    }
  }

  /// Active pane goes to the bottom.
  pub fn down(&mut self) {
    if !self.entries.is_empty() {
      self.entries.rotate_right(1);
    }
  }

  /// Paint the stack bottom to top and frame the active pane.
  pub fn refresh(&mut self, surface: &mut Surface) {
    for entry in &mut self.entries {
      surface.clear_rect(entry.rect);
      entry.pane.render(surface);
    }
    if let Some(entry) = self.entries.last() {
      draw_border(surface, entry.rect, self.grid.placeable());
    }
  }

  /// Route a key to the active pane.
  pub fn handle_key(&mut self, key: KeyEvent, cx: &mut PaneContext) -> Result<Command> {
    match self.top_mut() {
      Some(pane) => pane.handle_key(key, cx),
      None => Ok(Command::None),
    }
  }
}

fn grow_span(start: usize, len: usize, step: usize, limit: usize) -> (usize, usize) {
  let new_start = start.saturating_sub(step);
  let end = (start + len + step).min(limit);
  (new_start, end.saturating_sub(new_start))
}

fn shrink_span(start: usize, len: usize, step: usize, floor: usize) -> (usize, usize) {
  if len <= floor {
    return (start, len);
  }
  let new_len = len.saturating_sub(2 * step).max(floor);
  (start + (len - new_len) / 2, new_len)
}

/// One-cell frame around `rect`, drawn only where it stays inside `area`.
fn draw_border(surface: &mut Surface, rect: Rect, area: Rect) {
  let top = rect.top.checked_sub(1);
  let bottom = (rect.bottom() < area.bottom()).then_some(rect.bottom());
  let left = rect.left.checked_sub(1);
  let right = (rect.right() < area.right()).then_some(rect.right());

  for row in [top, bottom].into_iter().flatten() {
    for col in rect.left..rect.right() {
      surface.put_char(row, col, '─', Style::empty());
    }
  }
  for col in [left, right].into_iter().flatten() {
    for row in rect.top..rect.bottom() {
      surface.put_char(row, col, '│', Style::empty());
    }
  }
  let corners = [
    (top, left, '┌'),
    (top, right, '┐'),
    (bottom, left, '└'),
    (bottom, right, '┘'),
  ];
  for (row, col, ch) in corners {
    if let (Some(row), Some(col)) = (row, col) {
      surface.put_char(row, col, ch, Style::empty());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pane::PaneKind;

  struct Blank {
    rect: Rect,
    fill: char,
  }

  impl Pane for Blank {
    fn kind(&self) -> PaneKind {
      PaneKind::Viewer
    }

    fn rect(&self) -> Rect {
      self.rect
    }

    fn resize(&mut self, rect: Rect) {
      self.rect = rect;
    }

    fn render(&mut self, surface: &mut Surface) {
      surface.fill(self.rect, self.fill, Style::empty());
    }

    fn handle_key(&mut self, _key: KeyEvent, _cx: &mut PaneContext) -> Result<Command> {
      Ok(Command::Status(self.fill.to_string()))
    }
  }

  fn blank(rect: Rect, fill: char) -> Box<dyn Pane> {
    Box::new(Blank { rect, fill })
  }

  fn rects(stack: &Compositor) -> Vec<Rect> {
    stack.iter().map(|pane| pane.rect()).collect()
  }

  #[test]
  fn push_pop_restores_density() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(0, 0, 20, 70), 'a'));
    let before = stack.density().clone();
    stack.push(blank(Rect::new(3, 10, 20, 70), 'b'));
    stack.pop();
    assert_eq!(stack.density(), &before);
    stack.pop();
    assert!(stack.density().is_clear());
  }

  #[test]
  fn empty_stack_operations_are_no_ops() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    assert!(stack.pop().is_none());
    stack.up();
    stack.down();
    stack.expand(Axis::Vertical);
    stack.shrink(Axis::Horizontal);
    let mut surface = Surface::new(24, 80);
    stack.refresh(&mut surface);
    assert!(stack.is_empty());
    assert!(stack.density().is_clear());
  }

  #[test]
  fn push_clamps_into_placeable_area() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(20, 60, 10, 40), 'a'));
    assert_eq!(rects(&stack), [Rect::new(13, 40, 10, 40)]);
  }

  #[test]
  fn up_and_down_rotate() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    for (i, fill) in ['a', 'b', 'c'].into_iter().enumerate() {
      stack.push(blank(Rect::new(i, i, 10, 40), fill));
    }
    stack.up();
    assert_eq!(rects(&stack), [
      Rect::new(1, 1, 10, 40),
      Rect::new(2, 2, 10, 40),
      Rect::new(0, 0, 10, 40),
    ]);
    stack.down();
    stack.down();
    assert_eq!(rects(&stack), [
      Rect::new(2, 2, 10, 40),
      Rect::new(0, 0, 10, 40),
      Rect::new(1, 1, 10, 40),
    ]);
  }

  #[test]
  fn expand_grows_each_edge_and_stops_at_grid() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(5, 10, 10, 40), 'a'));
    stack.expand(Axis::Vertical);
    stack.expand(Axis::Horizontal);
    assert_eq!(rects(&stack), [Rect::new(4, 8, 12, 44)]);

    stack.pop();
    stack.push(blank(Rect::new(0, 0, 22, 79), 'a'));
    stack.expand(Axis::Vertical);
    stack.expand(Axis::Horizontal);
    assert_eq!(rects(&stack), [Rect::new(0, 0, 23, 80)]);
  }

  #[test]
  fn shrink_at_floor_is_unchanged() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(2, 3, 10, 40), 'a'));
    stack.shrink(Axis::Vertical);
    stack.shrink(Axis::Horizontal);
    assert_eq!(rects(&stack), [Rect::new(2, 3, 10, 40)]);
  }

  #[test]
  fn shrink_stops_at_floor() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(2, 3, 11, 42), 'a'));
    stack.shrink(Axis::Vertical);
    stack.shrink(Axis::Horizontal);
    assert_eq!(rects(&stack), [Rect::new(2, 4, 10, 40)]);

    stack.pop();
    stack.push(blank(Rect::new(2, 3, 14, 50), 'a'));
    stack.shrink(Axis::Vertical);
    stack.shrink(Axis::Horizontal);
    assert_eq!(rects(&stack), [Rect::new(3, 5, 12, 46)]);
  }

  #[test]
  fn resize_relocates_before_shrinking() {
    let mut stack = Compositor::new(Grid::new(40, 120));
    stack.push(blank(Rect::new(20, 60, 15, 50), 'a'));
    stack.resize(30, 100);
    assert_eq!(rects(&stack), [Rect::new(14, 50, 15, 50)]);
    stack.resize(11, 30);
    assert_eq!(rects(&stack), [Rect::new(0, 0, 10, 30)]);

    let mut fresh = DensityMap::new(10, 30);
    fresh.add(Rect::new(0, 0, 10, 30));
    assert_eq!(stack.density(), &fresh);
  }

  #[test]
  fn active_pane_gets_keys() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(0, 0, 10, 40), 'a'));
    stack.push(blank(Rect::new(0, 0, 10, 40), 'b'));
    let dir = tempfile::TempDir::new().unwrap();
    let store = crate::store::FsStore::open(dir.path()).unwrap();
    let mut cut_buffer = Vec::new();
    let mut cx = PaneContext {
      store:      &store,
      cut_buffer: &mut cut_buffer,
    };
    let key = KeyEvent::plain(crate::input::Key::Char('x'));
    assert_eq!(
      stack.handle_key(key, &mut cx).unwrap(),
      Command::Status("b".into())
    );
  }

  #[test]
  fn refresh_paints_bottom_to_top_with_border() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(0, 0, 10, 40), 'a'));
    stack.push(blank(Rect::new(5, 20, 10, 40), 'b'));
    let mut surface = Surface::new(24, 80);
    stack.refresh(&mut surface);
    assert_eq!(surface.cell(2, 2).unwrap().ch, 'a');
    assert_eq!(surface.cell(6, 21).unwrap().ch, 'b');
    assert_eq!(surface.cell(4, 19).unwrap().ch, '┌');
    assert_eq!(surface.cell(15, 60).unwrap().ch, '┘');
    assert_eq!(surface.cell(4, 30).unwrap().ch, '─');
  }

  #[test]
  fn border_never_enters_status_row() {
    let mut stack = Compositor::new(Grid::new(24, 80));
    stack.push(blank(Rect::new(13, 0, 10, 80), 'a'));
    let mut surface = Surface::new(24, 80);
    stack.refresh(&mut surface);
    assert_eq!(surface.row_text(23), " ".repeat(80));
    assert_eq!(surface.cell(12, 0).unwrap().ch, '─');
    assert_eq!(surface.cell(12, 79).unwrap().ch, '─');
  }
}
