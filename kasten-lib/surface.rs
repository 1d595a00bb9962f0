//! Character-cell canvas that panes paint into.
//!
//! Writes are bounds-checked before they happen: text is clipped at the edge
//! of the surface (or of a [`Region`]) and a cursor placed outside its region
//! falls back to the region origin.

use bitflags::bitflags;

use crate::geometry::{
  Position,
  Rect,
};

bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Style: u8 {
    const UNDERLINE = 0b0000_0001;
    const REVERSE   = 0b0000_0010;
    const BOLD      = 0b0000_0100;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
  pub ch:    char,
  pub style: Style,
}

impl Default for Cell {
  fn default() -> Self {
    Self {
      ch:    ' ',
      style: Style::empty(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
  rows:   usize,
  cols:   usize,
  cells:  Vec<Cell>,
  cursor: Option<Position>,
}

impl Surface {
  pub fn new(rows: usize, cols: usize) -> Self {
    Self {
      rows,
      cols,
      cells: vec![Cell::default(); rows * cols],
      cursor: None,
    }
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn resize(&mut self, rows: usize, cols: usize) {
    if rows == self.rows && cols == self.cols {
      return;
    }
    *self = Self::new(rows, cols);
  }

  /// Blank every cell and hide the cursor.
  pub fn clear(&mut self) {
    self.cells.fill(Cell::default());
    self.cursor = None;
  }

  pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
    if row >= self.rows || col >= self.cols {
      return None;
    }
    self.cells.get(row * self.cols + col)
  }

  pub fn put_char(&mut self, row: usize, col: usize, ch: char, style: Style) {
    if row >= self.rows || col >= self.cols {
      return;
    }
    self.cells[row * self.cols + col] = Cell { ch, style };
  }

  /// Write `text` starting at `(row, col)`, clipped at the right edge.
  /// Returns the number of cells written.
  pub fn put_str(&mut self, row: usize, col: usize, text: &str, style: Style) -> usize {
    if row >= self.rows || col >= self.cols {
      return 0;
    }
    let mut written = 0;
    for (offset, ch) in text.chars().take(self.cols - col).enumerate() {
      self.cells[row * self.cols + col + offset] = Cell { ch, style };
      written += 1;
    }
    written
  }

  pub fn fill(&mut self, rect: Rect, ch: char, style: Style) {
    for row in rect.top..rect.bottom().min(self.rows) {
      for col in rect.left..rect.right().min(self.cols) {
        self.cells[row * self.cols + col] = Cell { ch, style };
      }
    }
  }

  pub fn clear_rect(&mut self, rect: Rect) {
    self.fill(rect, ' ', Style::empty());
  }

  pub fn cursor(&self) -> Option<Position> {
    self.cursor
  }

  pub fn set_cursor(&mut self, cursor: Option<Position>) {
    self.cursor = cursor.filter(|pos| pos.row < self.rows && pos.col < self.cols);
  }

  /// Text of one row, trailing blanks included.
  pub fn row_text(&self, row: usize) -> String {
    if row >= self.rows {
      return String::new();
    }
    self.cells[row * self.cols..(row + 1) * self.cols]
      .iter()
      .map(|cell| cell.ch)
      .collect()
  }

  /// A view of `rect` with pane-local coordinates.
  pub fn region(&mut self, rect: Rect) -> Region<'_> {
    Region {
      surface: self,
      rect,
    }
  }
}

/// Pane-local window onto a [`Surface`].
#[derive(Debug)]
pub struct Region<'a> {
  surface: &'a mut Surface,
  rect:    Rect,
}

impl Region<'_> {
  pub fn rows(&self) -> usize {
    self.rect.rows
  }

  pub fn cols(&self) -> usize {
    self.rect.cols
  }

  pub fn clear(&mut self) {
    self.surface.clear_rect(self.rect);
  }

  /// Write `text` at a local position, clipped to the region.
  pub fn put_str(&mut self, row: usize, col: usize, text: &str, style: Style) -> usize {
    if row >= self.rect.rows || col >= self.rect.cols {
      return 0;
    }
    let visible: String = text.chars().take(self.rect.cols - col).collect();
    self
      .surface
      .put_str(self.rect.top + row, self.rect.left + col, &visible, style)
  }

  /// Write `text` and pad with blanks to the end of the row.
  pub fn put_line(&mut self, row: usize, text: &str, style: Style) {
    let written = self.put_str(row, 0, text, style);
    let pad = " ".repeat(self.rect.cols.saturating_sub(written));
    self.put_str(row, written, &pad, style);
  }

  /// Place the cursor at a local position. A position outside the region is
  /// moved to the region origin instead of being written off-pane.
  pub fn set_cursor(&mut self, pos: Position) {
    let pos = if pos.row < self.rect.rows && pos.col < self.rect.cols {
      pos
    } else {
      tracing::debug!(?pos, rect = ?self.rect, "cursor outside pane, clamping to origin");
      Position::zero()
    };
    self.surface.set_cursor(Some(Position::new(
      self.rect.top + pos.row,
      self.rect.left + pos.col,
    )));
  }

  pub fn hide_cursor(&mut self) {
    self.surface.set_cursor(None);
  }
}
