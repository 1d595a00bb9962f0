//! Commands panes hand back to the app after handling a key.

use crate::{
  geometry::{
    Axis,
    Direction,
  },
  note::NoteId,
};

/// What an incremental search is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPurpose {
  /// Narrow the index list.
  Browse,
  /// Pick a note whose `#ID` goes into the active editor.
  InsertLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  None,
  NewNote,
  OpenNote(NoteId),
  EditNote(NoteId),
  /// Replace the editor for `id` with a viewer; `row` is the editor's top
  /// logical line.
  ConvertEditorToViewer { id: NoteId, row: usize },
  /// Replace the viewer for `id` with an editor; `row` is a physical row of
  /// the raw note.
  ConvertViewerToEditor { id: NoteId, row: usize },
  ShowIndex,
  HideIndex,
  StartSearch(SearchPurpose),
  SearchChanged(String),
  SearchMove(Direction),
  AcceptSearch,
  CancelSearch,
  StartPrompt,
  ExecPrompt(String),
  CancelPrompt,
  Status(String),
  OpenUrl(String),
  OpenFile(String),
  RaisePane,
  LowerPane,
  ExpandPane(Axis),
  ShrinkPane(Axis),
  ClosePane,
  Sync,
  Quit,
}

/// Instructions understood by the `:` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
  Count,
  Sort,
  Sync,
  New,
  Quit,
}

impl Instruction {
  pub fn parse(input: &str) -> Option<Self> {
    match input.trim() {
      "count" => Some(Self::Count),
      "sort" => Some(Self::Sort),
      "sync" => Some(Self::Sync),
      "new" => Some(Self::New),
      "quit" | "q" => Some(Self::Quit),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_prompt_instructions() {
    assert_eq!(Instruction::parse("count"), Some(Instruction::Count));
    assert_eq!(Instruction::parse("  sort "), Some(Instruction::Sort));
    assert_eq!(Instruction::parse("q"), Some(Instruction::Quit));
    assert_eq!(Instruction::parse("graph"), None);
    assert_eq!(Instruction::parse(""), None);
  }
}
