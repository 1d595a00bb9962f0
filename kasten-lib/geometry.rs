use serde::{
  Deserialize,
  Serialize,
};

/// A point on the grid or inside a pane. 0-indexed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub row: usize,
  pub col: usize,
}

impl Position {
  pub const fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }

  pub const fn zero() -> Self {
    Self { row: 0, col: 0 }
  }
}

impl From<(usize, usize)> for Position {
  fn from(value: (usize, usize)) -> Self {
    Position::new(value.0, value.1)
  }
}

/// Bounds of a pane on the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
  pub top:  usize,
  pub left: usize,
  pub rows: usize,
  pub cols: usize,
}

impl Rect {
  pub const fn new(top: usize, left: usize, rows: usize, cols: usize) -> Self {
    Self {
      top,
      left,
      rows,
      cols,
    }
  }

  pub const fn at(origin: Position, rows: usize, cols: usize) -> Self {
    Self::new(origin.row, origin.col, rows, cols)
  }

  /// First row below the rectangle.
  pub const fn bottom(&self) -> usize {
    self.top + self.rows
  }

  /// First column right of the rectangle.
  pub const fn right(&self) -> usize {
    self.left + self.cols
  }

  pub const fn origin(&self) -> Position {
    Position::new(self.top, self.left)
  }

  pub const fn is_empty(&self) -> bool {
    self.rows == 0 || self.cols == 0
  }

  pub const fn contains(&self, pos: Position) -> bool {
    pos.row >= self.top && pos.row < self.bottom() && pos.col >= self.left && pos.col < self.right()
  }

  pub const fn fits_within(&self, max_rows: usize, max_cols: usize) -> bool {
    self.bottom() <= max_rows && self.right() <= max_cols
  }

  /// Fit the rectangle inside `max_rows x max_cols`.
  ///
  /// The rectangle is moved up/left first; it only shrinks in a dimension
  /// that is larger than the whole area.
  pub fn clamp_within(&self, max_rows: usize, max_cols: usize) -> Self {
    let rows = self.rows.min(max_rows);
    let cols = self.cols.min(max_cols);
    Self {
      top: self.top.min(max_rows - rows),
      left: self.left.min(max_cols - cols),
      rows,
      cols,
    }
  }
}

/// The terminal character grid. The last row belongs to the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
  pub rows: usize,
  pub cols: usize,
}

impl Grid {
  pub const fn new(rows: usize, cols: usize) -> Self {
    Self { rows, cols }
  }

  /// Rows available to panes.
  pub const fn placeable_rows(&self) -> usize {
    self.rows.saturating_sub(1)
  }

  pub const fn placeable(&self) -> Rect {
    Rect::new(0, 0, self.placeable_rows(), self.cols)
  }

  pub const fn status_row(&self) -> usize {
    self.placeable_rows()
  }

  pub const fn status_rect(&self) -> Rect {
    Rect::new(self.status_row(), 0, if self.rows > 0 { 1 } else { 0 }, self.cols)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
  Vertical,
  Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  Up,
  Down,
}
