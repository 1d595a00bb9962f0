//! Line editor for a single note.
//!
//! The buffer is a list of logical lines; the cursor is a (line, char offset)
//! pair. Everything on screen is derived from those on each render through
//! the [`crate::wrap`] functions, including the scroll position.

use crate::{
  command::{
    Command,
    SearchPurpose,
  },
  error::Result,
  geometry::{
    Position,
    Rect,
  },
  input::{
    Key,
    KeyEvent,
  },
  note::NoteId,
  pane::{
    self,
    Pane,
    PaneContext,
    PaneKind,
  },
  store::NoteStore,
  surface::{
    Style,
    Surface,
  },
  wrap,
};

const QUIT_PROMPT: &str = " Quit without saving? ";

#[derive(Debug, Clone)]
pub struct EditorPane {
  id:           NoteId,
  rect:         Rect,
  lines:        Vec<String>,
  saved:        Vec<String>,
  cursor:       Position,
  /// Column vertical motion tries to return to.
  hidden_col:   usize,
  top:          usize,
  flash:        bool,
  confirm_quit: bool,
  cutting:      bool,
}

impl EditorPane {
  /// Editor over `lines` with the cursor at the start of `line`.
  pub fn new(id: NoteId, rect: Rect, mut lines: Vec<String>, line: usize) -> Self {
    if lines.is_empty() {
      lines.push(String::new());
    }
    let line = line.min(lines.len() - 1);
    Self {
      id,
      rect,
      saved: lines.clone(),
      lines,
      cursor: Position::new(line, 0),
      hidden_col: 0,
      top: line,
      flash: false,
      confirm_quit: false,
      cutting: false,
    }
  }

  pub fn open(id: NoteId, rect: Rect, store: &dyn NoteStore, line: usize) -> Result<Self> {
    let lines = store.read_lines(&id)?;
    Ok(Self::new(id, rect, lines, line))
  }

  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn cursor(&self) -> Position {
    self.cursor
  }

  fn line_len(&self, row: usize) -> usize {
    self.lines[row].chars().count()
  }

  fn byte_offset(&self, row: usize, col: usize) -> usize {
    let line = &self.lines[row];
    line
      .char_indices()
      .nth(col)
      .map_or(line.len(), |(idx, _)| idx)
  }

  fn move_vertically(&mut self, row: usize) {
    self.cursor.row = row;
    let len = self.line_len(row);
    self.cursor.col = self.hidden_col.min(len);
  }

  fn set_col(&mut self, col: usize) {
    self.cursor.col = col;
    self.hidden_col = col;
  }

  fn up(&mut self) {
    self.move_vertically(self.cursor.row.saturating_sub(1));
  }

  fn down(&mut self) {
    let row = (self.cursor.row + 1).min(self.lines.len() - 1);
    self.move_vertically(row);
  }

  fn page_up(&mut self) {
    self.move_vertically(self.cursor.row.saturating_sub(self.rect.rows.max(1)));
  }

  fn page_down(&mut self) {
    let row = (self.cursor.row + self.rect.rows.max(1)).min(self.lines.len() - 1);
    self.move_vertically(row);
  }

  fn left(&mut self) {
    self.set_col(self.cursor.col.saturating_sub(1));
  }

  fn right(&mut self) {
    let col = (self.cursor.col + 1).min(self.line_len(self.cursor.row));
    self.set_col(col);
  }

  pub fn insert_char(&mut self, ch: char) {
    let at = self.byte_offset(self.cursor.row, self.cursor.col);
    self.lines[self.cursor.row].insert(at, ch);
    self.set_col(self.cursor.col + 1);
  }

  pub fn insert_str(&mut self, text: &str) {
    let at = self.byte_offset(self.cursor.row, self.cursor.col);
    self.lines[self.cursor.row].insert_str(at, text);
    self.set_col(self.cursor.col + text.chars().count());
  }

  /// Delete before the cursor, joining with the previous line at column 0.
  pub fn backspace(&mut self) {
    let Position { row, col } = self.cursor;
    if col > 0 {
      let at = self.byte_offset(row, col - 1);
      self.lines[row].remove(at);
      self.set_col(col - 1);
    } else if row > 0 {
      let line = self.lines.remove(row);
      self.cursor.row = row - 1;
      let len = self.line_len(row - 1);
      self.lines[row - 1].push_str(&line);
      self.set_col(len);
    }
  }

  /// Delete under the cursor, pulling the next line up at the end of a line.
  pub fn delete(&mut self) {
    let Position { row, col } = self.cursor;
    if col < self.line_len(row) {
      let at = self.byte_offset(row, col);
      self.lines[row].remove(at);
    } else if row + 1 < self.lines.len() {
      let next = self.lines.remove(row + 1);
      self.lines[row].push_str(&next);
    }
  }

  /// Split the line at the cursor.
  pub fn newline(&mut self) {
    let at = self.byte_offset(self.cursor.row, self.cursor.col);
    let rest = self.lines[self.cursor.row].split_off(at);
    self.cursor.row += 1;
    self.lines.insert(self.cursor.row, rest);
    self.set_col(0);
  }

  /// Remove the cursor line into `cut_buffer`. Consecutive cuts collect.
  fn cut_line(&mut self, cut_buffer: &mut Vec<String>) {
    if !self.cutting {
      cut_buffer.clear();
    }
    cut_buffer.push(self.lines.remove(self.cursor.row));
    if self.lines.is_empty() {
      self.lines.push(String::new());
    }
    self.cursor.row = self.cursor.row.min(self.lines.len() - 1);
    self.set_col(0);
  }

  /// Insert `cut_buffer` above the cursor line.
  fn paste(&mut self, cut_buffer: &[String]) {
    let row = self.cursor.row;
    self
      .lines
      .splice(row..row, cut_buffer.iter().cloned());
    self.cursor.row += cut_buffer.len();
    self.set_col(0);
  }

  fn save(&mut self, store: &dyn NoteStore) -> Result<Command> {
    store.write_lines(&self.id, &self.lines)?;
    self.saved = self.lines.clone();
    self.flash = true;
    Ok(Command::Status(format!("saved #{}", self.id)))
  }

  fn quit(&mut self) -> Command {
    if self.confirm_quit || !self.is_dirty() {
      return Command::ClosePane;
    }
    self.confirm_quit = true;
    Command::None
  }
}

impl Pane for EditorPane {
  fn kind(&self) -> PaneKind {
    PaneKind::Editor
  }

  fn rect(&self) -> Rect {
    self.rect
  }

  fn resize(&mut self, rect: Rect) {
    self.rect = rect;
  }

  fn render(&mut self, surface: &mut Surface) {
    let height = self.rect.rows;
    let width = self.rect.cols.max(1);
    self.top = wrap::viewport_scroll(&self.lines, self.cursor, self.top, height, width);
    let style = if self.flash {
      Style::REVERSE
    } else {
      Style::empty()
    };
    self.flash = false;

    let mut region = surface.region(self.rect);
    region.clear();
    let mut row = 0;
    let mut cursor = None;
    for (idx, line) in self.lines.iter().enumerate().skip(self.top) {
      if row >= height {
        break;
      }
      if idx == self.cursor.row {
        let offset = wrap::logical_to_physical(self.cursor.col, width);
        cursor = Some(Position::new(row + offset.row, offset.col));
      }
      for chunk in wrap::wrap_line(line, width) {
        if row >= height {
          break;
        }
        region.put_line(row, chunk, style);
        row += 1;
      }
    }
    if self.confirm_quit {
      region.put_str(0, 0, QUIT_PROMPT, Style::REVERSE);
    }
    region.set_cursor(cursor.unwrap_or_default());
  }

  fn handle_key(&mut self, key: KeyEvent, cx: &mut PaneContext) -> Result<Command> {
    if self.confirm_quit {
      if key.is_ctrl_char('q') {
        return Ok(Command::ClosePane);
      }
      self.confirm_quit = false;
      return Ok(Command::None);
    }
    if let Some(command) = pane::window_command(key) {
      return Ok(command);
    }

    let cutting = key.is_ctrl_char('k');
    let command = match key.key {
      Key::Up if key.modifiers.is_empty() => {
        self.up();
        Command::None
      },
      Key::Down if key.modifiers.is_empty() => {
        self.down();
        Command::None
      },
      Key::Left if key.modifiers.is_empty() => {
        self.left();
        Command::None
      },
      Key::Right if key.modifiers.is_empty() => {
        self.right();
        Command::None
      },
      Key::Home => {
        self.set_col(0);
        Command::None
      },
      Key::End => {
        self.set_col(self.line_len(self.cursor.row));
        Command::None
      },
      Key::Backspace => {
        self.backspace();
        Command::None
      },
      Key::Delete => {
        self.delete();
        Command::None
      },
      Key::PageUp => {
        self.page_up();
        Command::None
      },
      Key::PageDown => {
        self.page_down();
        Command::None
      },
      Key::Enter => {
        self.newline();
        Command::None
      },
      Key::Tab => {
        self.insert_str("    ");
        Command::None
      },
      Key::Char(_) if key.is_ctrl() => self.handle_chord(key, cx)?,
      _ => {
        if let Some(ch) = key.printable() {
          self.insert_char(ch);
        }
        Command::None
      },
    };
    self.cutting = cutting;
    Ok(command)
  }

  fn note_id(&self) -> Option<&NoteId> {
    Some(&self.id)
  }

  fn top(&self) -> usize {
    self.top
  }

  fn insert_link(&mut self, link: &str) -> bool {
    self.insert_str(link);
    true
  }

  fn is_dirty(&self) -> bool {
    self.lines != self.saved
  }
}

impl EditorPane {
  fn handle_chord(&mut self, key: KeyEvent, cx: &mut PaneContext) -> Result<Command> {
    let Key::Char(ch) = key.key else {
      return Ok(Command::None);
    };
    let command = match ch.to_ascii_lowercase() {
      'a' => {
        self.set_col(0);
        Command::None
      },
      'e' => {
        self.set_col(self.line_len(self.cursor.row));
        Command::None
      },
      'k' => {
        self.cut_line(cx.cut_buffer);
        Command::None
      },
      'u' => {
        self.paste(cx.cut_buffer);
        Command::None
      },
      's' | 'w' => self.save(cx.store)?,
      'q' => self.quit(),
      'l' => Command::StartSearch(SearchPurpose::InsertLink),
      'o' if self.is_dirty() => Command::Status("save before switching to the viewer".into()),
      'o' => {
        Command::ConvertEditorToViewer {
          id:  self.id.clone(),
          row: self.top,
        }
      },
      _ => Command::None,
    };
    Ok(command)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::{
    input::Modifiers,
    store::FsStore,
  };

  fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|line| line.to_string()).collect()
  }

  fn editor(text: &[&str]) -> EditorPane {
    EditorPane::new(NoteId::from("220113a"), Rect::new(0, 0, 5, 10), lines(text), 0)
  }

  struct Fixture {
    _dir:       TempDir,
    store:      FsStore,
    cut_buffer: Vec<String>,
  }

  impl Fixture {
    fn new() -> Self {
      let dir = TempDir::new().unwrap();
      let store = FsStore::open(dir.path()).unwrap();
      Self {
        _dir: dir,
        store,
        cut_buffer: Vec::new(),
      }
    }

    fn press(&mut self, editor: &mut EditorPane, key: KeyEvent) -> Command {
      let mut cx = PaneContext {
        store:      &self.store,
        cut_buffer: &mut self.cut_buffer,
      };
      editor.handle_key(key, &mut cx).unwrap()
    }

    fn type_str(&mut self, editor: &mut EditorPane, text: &str) {
      for ch in text.chars() {
        self.press(editor, KeyEvent::plain(Key::Char(ch)));
      }
    }
  }

  #[test]
  fn empty_buffer_has_one_line() {
    let editor = EditorPane::new(NoteId::from("220113a"), Rect::new(0, 0, 5, 10), vec![], 3);
    assert_eq!(editor.lines(), [""]);
    assert_eq!(editor.cursor(), Position::zero());
  }

  #[test]
  fn typing_and_splitting_lines() {
    let mut fx = Fixture::new();
    let mut editor = editor(&[""]);
    fx.type_str(&mut editor, "helo");
    fx.press(&mut editor, KeyEvent::plain(Key::Left));
    fx.type_str(&mut editor, "l");
    assert_eq!(editor.lines(), ["hello"]);
    fx.press(&mut editor, KeyEvent::plain(Key::Left));
    fx.press(&mut editor, KeyEvent::plain(Key::Enter));
    assert_eq!(editor.lines(), ["hel", "lo"]);
    assert_eq!(editor.cursor(), Position::new(1, 0));
    fx.press(&mut editor, KeyEvent::plain(Key::Backspace));
    assert_eq!(editor.lines(), ["hello"]);
    assert_eq!(editor.cursor(), Position::new(0, 3));
  }

  #[test]
  fn vertical_motion_keeps_hidden_column() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["abcdef", "ab", "abcdef"]);
    fx.press(&mut editor, KeyEvent::plain(Key::End));
    fx.press(&mut editor, KeyEvent::plain(Key::Down));
    assert_eq!(editor.cursor(), Position::new(1, 2));
    fx.press(&mut editor, KeyEvent::plain(Key::Down));
    assert_eq!(editor.cursor(), Position::new(2, 6));
    fx.press(&mut editor, KeyEvent::ctrl(Key::Char('a')));
    fx.press(&mut editor, KeyEvent::plain(Key::Up));
    assert_eq!(editor.cursor(), Position::new(1, 0));
  }

  #[test]
  fn multibyte_edits_use_char_offsets() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["äö"]);
    fx.press(&mut editor, KeyEvent::plain(Key::End));
    fx.type_str(&mut editor, "ü");
    fx.press(&mut editor, KeyEvent::plain(Key::Left));
    fx.press(&mut editor, KeyEvent::plain(Key::Backspace));
    assert_eq!(editor.lines(), ["äü"]);
  }

  #[test]
  fn delete_removes_forward_and_joins() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["ab", "cd"]);
    fx.press(&mut editor, KeyEvent::plain(Key::Delete));
    assert_eq!(editor.lines(), ["b", "cd"]);
    fx.press(&mut editor, KeyEvent::plain(Key::End));
    fx.press(&mut editor, KeyEvent::plain(Key::Delete));
    assert_eq!(editor.lines(), ["bcd"]);
    assert_eq!(editor.cursor(), Position::new(0, 1));
    fx.press(&mut editor, KeyEvent::plain(Key::End));
    fx.press(&mut editor, KeyEvent::plain(Key::Delete));
    assert_eq!(editor.lines(), ["bcd"]);
  }

  #[test]
  fn page_keys_move_a_pane_height() {
    let mut fx = Fixture::new();
    let text: Vec<String> = (0..12).map(|i| format!("line {i}")).collect();
    let text: Vec<&str> = text.iter().map(String::as_str).collect();
    let mut editor = editor(&text);
    fx.press(&mut editor, KeyEvent::plain(Key::PageDown));
    assert_eq!(editor.cursor(), Position::new(5, 0));
    fx.press(&mut editor, KeyEvent::plain(Key::PageDown));
    fx.press(&mut editor, KeyEvent::plain(Key::PageDown));
    assert_eq!(editor.cursor(), Position::new(11, 0));
    fx.press(&mut editor, KeyEvent::plain(Key::PageUp));
    assert_eq!(editor.cursor(), Position::new(6, 0));
  }

  #[test]
  fn cut_and_paste_lines() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["one", "two", "three"]);
    fx.press(&mut editor, KeyEvent::ctrl(Key::Char('k')));
    fx.press(&mut editor, KeyEvent::ctrl(Key::Char('k')));
    assert_eq!(editor.lines(), ["three"]);
    assert_eq!(fx.cut_buffer, ["one", "two"]);
    fx.press(&mut editor, KeyEvent::plain(Key::Down));
    fx.press(&mut editor, KeyEvent::ctrl(Key::Char('u')));
    assert_eq!(editor.lines(), ["one", "two", "three"]);
    assert_eq!(editor.cursor(), Position::new(2, 0));
  }

  #[test]
  fn quit_asks_when_dirty() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["x"]);
    assert_eq!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('q'))),
      Command::ClosePane
    );

    fx.type_str(&mut editor, "y");
    assert_eq!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('q'))),
      Command::None
    );
    editor.resize(Rect::new(0, 0, 5, 30));
    let mut surface = Surface::new(6, 30);
    editor.render(&mut surface);
    assert!(surface.row_text(0).starts_with(QUIT_PROMPT));
    // any other key backs out
    assert_eq!(
      fx.press(&mut editor, KeyEvent::plain(Key::Char('z'))),
      Command::None
    );
    assert_eq!(editor.lines(), ["yx"]);
    fx.press(&mut editor, KeyEvent::ctrl(Key::Char('q')));
    assert_eq!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('q'))),
      Command::ClosePane
    );
  }

  #[test]
  fn save_writes_and_flashes() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["x"]);
    fx.type_str(&mut editor, "a");
    assert!(editor.is_dirty());
    assert_eq!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('s'))),
      Command::Status("saved #220113a".into())
    );
    assert!(!editor.is_dirty());
    assert_eq!(
      fx.store.read_lines(&NoteId::from("220113a")).unwrap(),
      ["ax"]
    );

    let mut surface = Surface::new(6, 30);
    editor.render(&mut surface);
    assert_eq!(surface.cell(0, 0).unwrap().style, Style::REVERSE);
    editor.render(&mut surface);
    assert_eq!(surface.cell(0, 0).unwrap().style, Style::empty());
  }

  #[test]
  fn convert_refuses_unsaved_changes() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["x"]);
    assert_eq!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('o'))),
      Command::ConvertEditorToViewer {
        id:  NoteId::from("220113a"),
        row: 0,
      }
    );
    fx.type_str(&mut editor, "a");
    assert!(matches!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('o'))),
      Command::Status(_)
    ));
  }

  #[test]
  fn window_chords_pass_through() {
    let mut fx = Fixture::new();
    let mut editor = editor(&["x"]);
    assert_eq!(
      fx.press(
        &mut editor,
        KeyEvent::new(Key::Up, Modifiers::CTRL | Modifiers::SHIFT)
      ),
      Command::ExpandPane(crate::geometry::Axis::Vertical)
    );
    assert_eq!(
      fx.press(&mut editor, KeyEvent::ctrl(Key::Char('l'))),
      Command::StartSearch(SearchPurpose::InsertLink)
    );
  }

  #[test]
  fn renders_wrapped_text_with_cursor() {
    let mut fx = Fixture::new();
    let long = "a".repeat(25);
    let mut editor = EditorPane::new(
      NoteId::from("220113a"),
      Rect::new(2, 3, 5, 10),
      lines(&["short", &long, "x"]),
      0,
    );
    fx.press(&mut editor, KeyEvent::plain(Key::Down));
    for _ in 0..20 {
      fx.press(&mut editor, KeyEvent::plain(Key::Right));
    }
    let mut surface = Surface::new(10, 20);
    editor.render(&mut surface);
    assert_eq!(editor.top(), 0);
    // line 1 starts on pane row 1 and the cursor sits on its third row
    assert_eq!(surface.cursor(), Some(Position::new(2 + 3, 3)));
    assert_eq!(&surface.row_text(4)[3..13], "aaaaaaaaaa");
    assert_eq!(&surface.row_text(5)[3..8], "aaaaa");
  }
}
