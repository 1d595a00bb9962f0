//! The interface every pane on the grid implements.

use serde::{
  Deserialize,
  Serialize,
};

use crate::{
  command::Command,
  error::Result,
  geometry::{
    Axis,
    Rect,
  },
  input::{
    Key,
    KeyEvent,
    Modifiers,
  },
  note::NoteId,
  store::NoteStore,
  surface::Surface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneKind {
  Editor,
  Viewer,
  Index,
  Status,
}

/// Shared state a pane may touch while handling a key.
pub struct PaneContext<'a> {
  pub store:      &'a dyn NoteStore,
  pub cut_buffer: &'a mut Vec<String>,
}

pub trait Pane {
  fn kind(&self) -> PaneKind;

  fn rect(&self) -> Rect;

  /// Move or resize the pane. Wrapped content is recomputed.
  fn resize(&mut self, rect: Rect);

  /// Paint the pane into its rectangle. Panes are opaque: everything inside
  /// the rectangle is overwritten.
  fn render(&mut self, surface: &mut Surface);

  fn handle_key(&mut self, key: KeyEvent, cx: &mut PaneContext) -> Result<Command>;

  fn note_id(&self) -> Option<&NoteId> {
    None
  }

  /// Scroll position saved with the session.
  fn top(&self) -> usize {
    0
  }

  /// Insert `link` at the cursor. Returns whether the pane accepted it.
  fn insert_link(&mut self, _link: &str) -> bool {
    false
  }

  /// Whether the pane holds changes that are not saved.
  fn is_dirty(&self) -> bool {
    false
  }
}

/// Window management chords shared by the note panes.
pub fn window_command(key: KeyEvent) -> Option<Command> {
  let ctrl_shift = Modifiers::CTRL | Modifiers::SHIFT;
  let command = if key.modifiers == ctrl_shift {
    match key.key {
      Key::Up => Command::ExpandPane(Axis::Vertical),
      Key::Down => Command::ShrinkPane(Axis::Vertical),
      Key::Right => Command::ExpandPane(Axis::Horizontal),
      Key::Left => Command::ShrinkPane(Axis::Horizontal),
      _ => return None,
    }
  } else if key.modifiers == Modifiers::CTRL {
    match key.key {
      Key::Up => Command::RaisePane,
      Key::Down => Command::LowerPane,
      Key::Char('g') => Command::ShowIndex,
      _ => return None,
    }
  } else {
    return None;
  };
  Some(command)
}
