//! Weighted occupancy of the placeable area.
//!
//! Every pushed pane adds the top-left corner of the weight table into the
//! cells it covers, so cells near the top-left of a pane count the most. New
//! panes go where the weighted overlap with what is already there is lowest.

use crate::geometry::{
  Position,
  Rect,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityMap {
  rows:    usize,
  cols:    usize,
  weights: Vec<u64>,
  density: Vec<u64>,
}

impl DensityMap {
  /// Map for a placeable area of `rows x cols` with no panes on it.
  pub fn new(rows: usize, cols: usize) -> Self {
    let mut weights = Vec::with_capacity(rows * cols);
    for y in 0..rows {
      for x in 0..cols {
        weights.push(((rows - y) + (cols - x)) as u64);
      }
    }
    Self {
      rows,
      cols,
      weights,
      density: vec![0; rows * cols],
    }
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn weight(&self, row: usize, col: usize) -> u64 {
    self.weights[row * self.cols + col]
  }

  pub fn density(&self, row: usize, col: usize) -> u64 {
    self.density[row * self.cols + col]
  }

  pub fn is_clear(&self) -> bool {
    self.density.iter().all(|&d| d == 0)
  }

  /// Account for a pane covering `rect`.
  pub fn add(&mut self, rect: Rect) {
    self.apply(rect, |cell, weight| *cell += weight);
  }

  /// Exact inverse of [`DensityMap::add`] for the same `rect`.
  pub fn remove(&mut self, rect: Rect) {
    self.apply(rect, |cell, weight| {
      debug_assert!(*cell >= weight, "removing a pane that was never added");
      *cell = cell.saturating_sub(weight);
    });
  }

  fn apply(&mut self, rect: Rect, mut op: impl FnMut(&mut u64, u64)) {
    let rows = rect.rows.min(self.rows.saturating_sub(rect.top));
    let cols = rect.cols.min(self.cols.saturating_sub(rect.left));
    for i in 0..rows {
      for j in 0..cols {
        let weight = self.weights[i * self.cols + j];
        op(
          &mut self.density[(rect.top + i) * self.cols + rect.left + j],
          weight,
        );
      }
    }
  }

  /// Weighted overlap of a `rows x cols` pane placed at `(top, left)`.
  pub fn cost(&self, top: usize, left: usize, rows: usize, cols: usize) -> u64 {
    let mut cost = 0;
    for i in 0..rows {
      let weights = &self.weights[i * self.cols..i * self.cols + cols];
      let start = (top + i) * self.cols + left;
      let density = &self.density[start..start + cols];
      cost += weights
        .iter()
        .zip(density)
        .map(|(w, d)| w * d)
        .sum::<u64>();
    }
    cost
  }

  /// Top-left corner with the lowest [`DensityMap::cost`] for a pane of the
  /// given size. Candidates are scanned row-major and a tie goes to the one
  /// scanned last. Oversized requests are clamped to the map first.
  pub fn recommend(&self, rows: usize, cols: usize) -> Position {
    let rows = rows.min(self.rows);
    let cols = cols.min(self.cols);
    let mut best = Position::zero();
    let mut best_cost = u64::MAX;
    for top in 0..=self.rows - rows {
      for left in 0..=self.cols - cols {
        let cost = self.cost(top, left, rows, cols);
        if cost <= best_cost {
          best_cost = cost;
          best = Position::new(top, left);
        }
      }
    }
    best
  }
}
