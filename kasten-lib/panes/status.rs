//! The one-row status line under the placeable area.
//!
//! Idle, it shows a message (and echoes keys). In search and prompt mode it
//! owns the keyboard and edits a query.

use crate::{
  command::{
    Command,
    SearchPurpose,
  },
  error::Result,
  geometry::{
    Direction,
    Position,
    Rect,
  },
  input::{
    Key,
    KeyEvent,
  },
  note::NoteId,
  pane::{
    Pane,
    PaneContext,
    PaneKind,
  },
  surface::{
    Style,
    Surface,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMode {
  Idle,
  Search(SearchPurpose),
  Prompt,
}

#[derive(Debug, Clone)]
pub struct StatusBar {
  rect:    Rect,
  mode:    StatusMode,
  message: String,
  preview: Option<NoteId>,
  query:   String,
}

impl StatusBar {
  pub fn new(rect: Rect) -> Self {
    Self {
      rect,
      mode: StatusMode::Idle,
      message: String::new(),
      preview: None,
      query: String::new(),
    }
  }

  pub fn mode(&self) -> StatusMode {
    self.mode
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  /// Whether keys go to the status line instead of a pane.
  pub fn is_capturing(&self) -> bool {
    self.mode != StatusMode::Idle
  }

  pub fn set(&mut self, message: impl Into<String>) {
    self.message = message.into();
  }

  pub fn error(&mut self, message: impl std::fmt::Display) {
    self.message = format!("error: {message}");
  }

  /// Show the name of `key` while idle.
  pub fn echo(&mut self, key: KeyEvent) {
    if !self.is_capturing() {
      self.message = key.name();
    }
  }

  /// Id shown in front of the message, e.g. the note a search would pick.
  pub fn preview(&mut self, id: Option<NoteId>) {
    self.preview = id;
  }

  pub fn start_search(&mut self, purpose: SearchPurpose) {
    self.mode = StatusMode::Search(purpose);
    self.query.clear();
  }

  pub fn start_prompt(&mut self) {
    self.mode = StatusMode::Prompt;
    self.query.clear();
  }

  /// Back to idle, clearing query, message and preview.
  pub fn finish(&mut self) {
    self.mode = StatusMode::Idle;
    self.query.clear();
    self.message.clear();
    self.preview = None;
  }

  fn edit_query(&mut self, key: KeyEvent) -> bool {
    match key.key {
      Key::Backspace => self.query.pop().is_some(),
      _ => {
        match key.printable() {
          Some(ch) => {
            self.query.push(ch);
            true
          },
          None => false,
        }
      },
    }
  }

  fn line(&self) -> String {
    match self.mode {
      StatusMode::Idle => {
        match &self.preview {
          Some(id) => format!("{:<9}{}", id.as_str(), self.message),
          None => self.message.clone(),
        }
      },
      StatusMode::Search(_) => format!("/{}", self.query),
      StatusMode::Prompt => format!(":{}", self.query),
    }
  }
}

impl Pane for StatusBar {
  fn kind(&self) -> PaneKind {
    PaneKind::Status
  }

  fn rect(&self) -> Rect {
    self.rect
  }

  fn resize(&mut self, rect: Rect) {
    self.rect = rect;
  }

  fn render(&mut self, surface: &mut Surface) {
    let line = self.line();
    let mut region = surface.region(self.rect);
    region.put_line(0, &line, Style::REVERSE);
    if self.is_capturing() {
      region.set_cursor(Position::new(0, 1 + self.query.chars().count()));
    }
  }

  fn handle_key(&mut self, key: KeyEvent, _cx: &mut PaneContext) -> Result<Command> {
    let mode = self.mode;
    let command = match mode {
      StatusMode::Idle => Command::None,
      StatusMode::Search(_) => {
        match key.key {
          Key::Escape => Command::CancelSearch,
          Key::Enter => Command::AcceptSearch,
          Key::Up => Command::SearchMove(Direction::Up),
          Key::Down => Command::SearchMove(Direction::Down),
          _ if self.edit_query(key) => Command::SearchChanged(self.query.clone()),
          _ => Command::None,
        }
      },
      StatusMode::Prompt => {
        match key.key {
          Key::Escape => Command::CancelPrompt,
          Key::Enter => Command::ExecPrompt(self.query.clone()),
          _ => {
            self.edit_query(key);
            Command::None
          },
        }
      },
    };
    Ok(command)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::store::FsStore;

  fn press(status: &mut StatusBar, key: KeyEvent) -> Command {
    let dir = TempDir::new().unwrap();
    let store = FsStore::open(dir.path()).unwrap();
    let mut cut_buffer = Vec::new();
    let mut cx = PaneContext {
      store:      &store,
      cut_buffer: &mut cut_buffer,
    };
    status.handle_key(key, &mut cx).unwrap()
  }

  #[test]
  fn search_edits_query() {
    let mut status = StatusBar::new(Rect::new(23, 0, 1, 80));
    status.start_search(SearchPurpose::Browse);
    assert!(status.is_capturing());
    press(&mut status, KeyEvent::plain(Key::Char('a')));
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Char('b'))),
      Command::SearchChanged("ab".into())
    );
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Backspace)),
      Command::SearchChanged("a".into())
    );
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Down)),
      Command::SearchMove(Direction::Down)
    );
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Enter)),
      Command::AcceptSearch
    );
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Escape)),
      Command::CancelSearch
    );
  }

  #[test]
  fn backspace_on_empty_query_is_ignored() {
    let mut status = StatusBar::new(Rect::new(23, 0, 1, 80));
    status.start_search(SearchPurpose::Browse);
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Backspace)),
      Command::None
    );
  }

  #[test]
  fn prompt_returns_instruction() {
    let mut status = StatusBar::new(Rect::new(23, 0, 1, 80));
    status.start_prompt();
    for ch in "count".chars() {
      press(&mut status, KeyEvent::plain(Key::Char(ch)));
    }
    assert_eq!(
      press(&mut status, KeyEvent::plain(Key::Enter)),
      Command::ExecPrompt("count".into())
    );
  }

  #[test]
  fn echo_only_while_idle() {
    let mut status = StatusBar::new(Rect::new(23, 0, 1, 80));
    status.echo(KeyEvent::ctrl(Key::Char('s')));
    assert_eq!(status.message(), "CTRL_s");
    status.start_prompt();
    status.echo(KeyEvent::plain(Key::Char('x')));
    assert_eq!(status.message(), "CTRL_s");
  }

  #[test]
  fn renders_reverse_across_the_row() {
    let mut status = StatusBar::new(Rect::new(2, 0, 1, 20));
    status.preview(Some(NoteId::from("220113a")));
    status.set("hello");
    let mut surface = Surface::new(3, 20);
    status.render(&mut surface);
    assert_eq!(surface.row_text(2), "220113a  hello      ");
    assert_eq!(surface.cell(2, 19).unwrap().style, Style::REVERSE);
    assert_eq!(surface.cursor(), None);

    status.start_search(SearchPurpose::InsertLink);
    press(&mut status, KeyEvent::plain(Key::Char('q')));
    status.render(&mut surface);
    assert!(surface.row_text(2).starts_with("/q "));
    assert_eq!(surface.cursor(), Some(Position::new(2, 2)));
  }
}
