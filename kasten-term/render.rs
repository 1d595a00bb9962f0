//! Copies the app's surface into the ratatui frame.

use kasten_lib::surface::{
  Style,
  Surface,
};
use ratatui::{
  Frame,
  style::{
    Modifier,
    Style as RatatuiStyle,
  },
};

pub fn blit(surface: &Surface, frame: &mut Frame) {
  let area = frame.area();
  let rows = surface.rows().min(area.height as usize);
  let cols = surface.cols().min(area.width as usize);
  let buffer = frame.buffer_mut();
  for row in 0..rows {
    for col in 0..cols {
      let (Some(cell), Some(target)) = (
        surface.cell(row, col),
        buffer.cell_mut((col as u16, row as u16)),
      ) else {
        continue;
      };
      target.set_char(cell.ch).set_style(to_style(cell.style));
    }
  }
  if let Some(pos) = surface.cursor()
    && pos.row < rows
    && pos.col < cols
  {
    frame.set_cursor_position((pos.col as u16, pos.row as u16));
  }
}

fn to_style(style: Style) -> RatatuiStyle {
  let mut modifier = Modifier::empty();
  if style.contains(Style::UNDERLINE) {
    modifier.insert(Modifier::UNDERLINED);
  }
  if style.contains(Style::REVERSE) {
    modifier.insert(Modifier::REVERSED);
  }
  if style.contains(Style::BOLD) {
    modifier.insert(Modifier::BOLD);
  }
  RatatuiStyle::default().add_modifier(modifier)
}
