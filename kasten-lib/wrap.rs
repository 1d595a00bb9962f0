//! Soft-wrap coordinate model.
//!
//! Maps between logical positions (line index, char offset in an unbounded
//! line) and physical positions (row, column in a fixed-width viewport). The
//! editor, the viewer and the editor/viewer row conversion all go through
//! these functions so that cursor placement, scrolling and link hit-testing
//! agree on where text lands.
//!
//! Lengths and columns are counted in `char`s. A `width` of zero is treated as
//! one.

use thiserror::Error;

use crate::geometry::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WrapError {
  #[error("physical row {row} is past the end of the text ({rows} rows)")]
  RowOutOfRange { row: usize, rows: usize },
}

/// Number of physical rows a logical line of `line_len` chars occupies.
///
/// A blank line still takes one row, which plain ceiling division would not
/// give.
pub fn wrap_row_count(line_len: usize, width: usize) -> usize {
  if line_len == 0 {
    return 1;
  }
  line_len.div_ceil(width.max(1))
}

/// Physical rows taken by `line`.
pub fn line_rows(line: &str, width: usize) -> usize {
  wrap_row_count(line.chars().count(), width)
}

/// Physical rows taken by every line in `lines`.
pub fn physical_row_total<S: AsRef<str>>(lines: &[S], width: usize) -> usize {
  lines
    .iter()
    .map(|line| line_rows(line.as_ref(), width))
    .sum()
}

/// Row offset inside the wrapped line and column inside that row for a char
/// offset.
///
/// An offset that is an exact multiple of `width` lands at column 0 of the
/// next row, never at column `width` of the previous one.
pub fn logical_to_physical(col: usize, width: usize) -> Position {
  let width = width.max(1);
  Position::new(col / width, col % width)
}

/// Split `line` into its physical rows. A blank line yields one empty row.
pub fn wrap_line(line: &str, width: usize) -> Vec<&str> {
  let width = width.max(1);
  let mut chunks = Vec::with_capacity(line.len() / width + 1);
  let mut start = 0;
  let mut count = 0;
  for (idx, _) in line.char_indices() {
    if count == width {
      chunks.push(&line[start..idx]);
      start = idx;
      count = 0;
    }
    count += 1;
  }
  chunks.push(&line[start..]);
  chunks
}

/// New top line for a viewport showing `lines`, keeping `cursor` visible.
///
/// Recomputed from scratch on every redraw: first the auto-fill pass pulls
/// `top` up while everything from `top - 1` to the end still fits, then the
/// reveal pass brings the cursor line into view.
pub fn viewport_scroll<S: AsRef<str>>(
  lines: &[S],
  cursor: Position,
  top: usize,
  height: usize,
  width: usize,
) -> usize {
  let top = auto_fill(lines, top, height, width);
  reveal(lines, cursor, top, height, width)
}

/// Decrement `top` while lines `[top - 1 ..]` fit in `height` rows.
pub fn auto_fill<S: AsRef<str>>(lines: &[S], top: usize, height: usize, width: usize) -> usize {
  if lines.is_empty() {
    return 0;
  }
  let mut top = top.min(lines.len() - 1);
  let mut below = physical_row_total(&lines[top..], width);
  while top > 0 {
    let cost = line_rows(lines[top - 1].as_ref(), width);
    if below + cost > height {
      break;
    }
    below += cost;
    top -= 1;
  }
  top
}

/// Move `top` so the cursor line is visible.
///
/// Costs per line are irregular, so lines are evicted greedily from the front
/// of the window until `[top ..= cursor.row]` fits.
pub fn reveal<S: AsRef<str>>(
  lines: &[S],
  cursor: Position,
  top: usize,
  height: usize,
  width: usize,
) -> usize {
  if lines.is_empty() {
    return 0;
  }
  let line = cursor.row.min(lines.len() - 1);
  if line < top {
    return line;
  }

  let mut top = top;
  let mut used = physical_row_total(&lines[top..=line], width);
  while used > height && top < line {
    used -= line_rows(lines[top].as_ref(), width);
    top += 1;
  }

  // Cursor parked right after a line that fills the last visible row.
  let before_cursor_line = used - line_rows(lines[line].as_ref(), width);
  let cursor_row = before_cursor_line + logical_to_physical(cursor.col, width).row;
  if cursor_row >= height && top < line {
    top += 1;
  }
  top
}

/// New top row so the whole link starting at `anchor` with `len` chars is
/// visible, including the part wrapped onto the next row.
pub fn link_scroll_to_reveal(
  anchor: Position,
  len: usize,
  top: usize,
  height: usize,
  width: usize,
) -> usize {
  let width = width.max(1);
  let bottom = anchor.row + (anchor.col + len).saturating_sub(1) / width;
  let mut top = top;
  if top + height <= bottom {
    top = bottom + 1 - height.min(bottom + 1);
  }
  if top > anchor.row {
    top = anchor.row;
  }
  top
}

/// First physical row of logical line `line` in the wrapped text.
pub fn editor_to_viewer<S: AsRef<str>>(lines: &[S], width: usize, line: usize) -> usize {
  physical_row_total(&lines[..line.min(lines.len())], width)
}

/// Logical line whose wrapped span contains physical row `row`.
///
/// Every physical row of a wrapped line maps to that same line, so this is
/// many-to-one; `viewer_to_editor(editor_to_viewer(l)) == l` holds for every
/// valid line but the reverse does not.
pub fn viewer_to_editor<S: AsRef<str>>(
  lines: &[S],
  width: usize,
  row: usize,
) -> Result<usize, WrapError> {
  let mut remaining = row;
  for (idx, line) in lines.iter().enumerate() {
    let cost = line_rows(line.as_ref(), width);
    if remaining < cost {
      return Ok(idx);
    }
    remaining -= cost;
  }
  Err(WrapError::RowOutOfRange {
    row,
    rows: row - remaining,
  })
}

#[cfg(test)]
mod tests {
  use quickcheck::TestResult;

  use super::*;

  quickcheck::quickcheck! {
      fn row_count_matches_formula(len: u16, width: u8) -> TestResult {
          if width == 0 {
              return TestResult::discard();
          }
          let (len, width) = (len as usize, width as usize);
          let expected = std::cmp::max(1, (len + width - 1) / width);
          TestResult::from_bool(wrap_row_count(len, width) == expected)
      }

      fn exact_multiple_starts_next_row(rows: u8, width: u8) -> TestResult {
          if width == 0 || rows == 0 {
              return TestResult::discard();
          }
          let (rows, width) = (rows as usize, width as usize);
          let pos = logical_to_physical(rows * width, width);
          TestResult::from_bool(pos == Position::new(rows, 0))
      }

      fn row_conversion_round_trips(lens: Vec<u8>, width: u8) -> TestResult {
          if width == 0 || lens.is_empty() {
              return TestResult::discard();
          }
          let lines: Vec<String> = lens.iter().map(|len| "x".repeat(*len as usize)).collect();
          let width = width as usize;
          let ok = (0..lines.len()).all(|line| {
              viewer_to_editor(&lines, width, editor_to_viewer(&lines, width, line)) == Ok(line)
          });
          TestResult::from_bool(ok)
      }

      fn wrap_line_agrees_with_row_count(line: String, width: u8) -> TestResult {
          if width == 0 {
              return TestResult::discard();
          }
          let width = width as usize;
          let chunks = wrap_line(&line, width);
          let ok = chunks.len() == line_rows(&line, width)
              && chunks.concat() == line
              && chunks.iter().all(|chunk| chunk.chars().count() <= width);
          TestResult::from_bool(ok)
      }
  }

  #[test]
  fn blank_line_takes_one_row() {
    assert_eq!(wrap_row_count(0, 10), 1);
    assert_eq!(wrap_row_count(0, 1), 1);
    assert_eq!(wrap_line("", 10), vec![""]);
  }

  #[test]
  fn row_count_rounds_up() {
    assert_eq!(wrap_row_count(10, 5), 2);
    assert_eq!(wrap_row_count(11, 5), 3);
    assert_eq!(wrap_row_count(4, 5), 1);
  }

  #[test]
  fn logical_to_physical_at_row_boundary() {
    assert_eq!(logical_to_physical(20, 10), Position::new(2, 0));
    assert_eq!(logical_to_physical(19, 10), Position::new(1, 9));
    assert_eq!(logical_to_physical(0, 10), Position::new(0, 0));
  }

  #[test]
  fn wrap_line_counts_chars_not_bytes() {
    assert_eq!(wrap_line("äöüß", 2), vec!["äö", "üß"]);
  }

  #[test]
  fn converts_rows_between_representations() {
    let lines = ["", "abcdefghij", "k"];
    assert_eq!(editor_to_viewer(&lines, 5, 0), 0);
    assert_eq!(editor_to_viewer(&lines, 5, 1), 1);
    assert_eq!(editor_to_viewer(&lines, 5, 2), 3);
    assert_eq!(viewer_to_editor(&lines, 5, 3), Ok(2));
    // both rows of the wrapped line map back to it
    assert_eq!(viewer_to_editor(&lines, 5, 1), Ok(1));
    assert_eq!(viewer_to_editor(&lines, 5, 2), Ok(1));
  }

  #[test]
  fn viewer_row_past_end_is_an_error() {
    let lines = ["", "abcdefghij", "k"];
    assert_eq!(
      viewer_to_editor(&lines, 5, 4),
      Err(WrapError::RowOutOfRange { row: 4, rows: 4 })
    );
  }

  #[test]
  fn cursor_on_wrapped_line_keeps_top() {
    let long = "a".repeat(25);
    let lines = ["short", long.as_str(), "x"];
    let cursor = Position::new(1, 20);
    assert_eq!(logical_to_physical(cursor.col, 10), Position::new(2, 0));
    assert_eq!(viewport_scroll(&lines, cursor, 0, 5, 10), 0);
  }

  #[test]
  fn reveal_evicts_lines_from_the_front() {
    let lines = ["aaaaaaaaaaaa", "b", "c", "dddddddddddd"];
    // costs at width 10: 2, 1, 1, 2
    assert_eq!(reveal(&lines, Position::new(3, 0), 0, 4, 10), 1);
    assert_eq!(reveal(&lines, Position::new(3, 0), 0, 3, 10), 2);
  }

  #[test]
  fn reveal_moves_up_to_cursor_above_top() {
    let lines = ["a", "b", "c", "d"];
    assert_eq!(reveal(&lines, Position::new(1, 0), 3, 2, 10), 1);
  }

  #[test]
  fn reveal_never_passes_the_cursor_line() {
    let long = "x".repeat(100);
    let lines = ["a", long.as_str()];
    assert_eq!(reveal(&lines, Position::new(1, 50), 0, 3, 10), 1);
  }

  #[test]
  fn reveal_advances_when_cursor_sits_after_full_last_row() {
    // "b" line fills rows 1..=2 of a 3-row viewport exactly; a cursor at its
    // end would render on row 3.
    let lines = ["a", "bbbbbbbbbbbbbbbbbbbb"];
    assert_eq!(reveal(&lines, Position::new(1, 19), 0, 3, 10), 0);
    assert_eq!(reveal(&lines, Position::new(1, 20), 0, 3, 10), 1);
  }

  #[test]
  fn auto_fill_pulls_content_back_into_view() {
    let lines = ["a", "b", "c", "d"];
    assert_eq!(auto_fill(&lines, 3, 10, 10), 0);
    assert_eq!(auto_fill(&lines, 3, 2, 10), 2);
    assert_eq!(auto_fill(&lines, 1, 1, 10), 1);
  }

  #[test]
  fn viewport_scroll_runs_fill_before_reveal() {
    let lines = ["a", "b", "c", "d", "e", "f"];
    // scrolled too far down with the cursor at the end: fill pulls top to 2,
    // reveal keeps it there.
    assert_eq!(viewport_scroll(&lines, Position::new(5, 0), 5, 4, 10), 2);
  }

  #[test]
  fn link_scroll_reveals_wrapped_tail() {
    // link starts on row 4 col 8 and wraps onto row 5
    assert_eq!(link_scroll_to_reveal(Position::new(4, 8), 5, 0, 5, 10), 1);
    // already visible
    assert_eq!(link_scroll_to_reveal(Position::new(2, 0), 3, 0, 5, 10), 0);
    // above the viewport
    assert_eq!(link_scroll_to_reveal(Position::new(1, 0), 3, 4, 5, 10), 1);
  }
}
