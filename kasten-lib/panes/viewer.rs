//! Read-only view of a note with link navigation.
//!
//! The displayed text is the note followed by a backlinks section. It is kept
//! pre-wrapped to the pane width; `top` and every link position are physical
//! rows of that wrapped text.

use crate::{
  command::Command,
  error::Result,
  geometry::{
    Position,
    Rect,
  },
  input::{
    Key,
    KeyEvent,
  },
  links::{
    self,
    Link,
    LinkKind,
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

/// Rows moved by `Ctrl-U` / `Ctrl-D`.
const PAGE: usize = 10;

#[derive(Debug, Clone)]
pub struct ViewerPane {
  id:       NoteId,
  rect:     Rect,
  /// Lines of the note itself.
  raw:      Vec<String>,
  /// `raw` plus the backlinks section.
  source:   Vec<String>,
  rows:     Vec<String>,
  links:    Vec<Link>,
  link:     Option<usize>,
  top:      usize,
  previous: Vec<NoteId>,
}

struct Loaded {
  raw:    Vec<String>,
  source: Vec<String>,
}

fn load(id: &NoteId, store: &dyn NoteStore) -> Result<Loaded> {
  let raw = store.read_lines(id)?;
  let mut source = raw.clone();
  let backlinks = store.backlinks(id)?;
  if !backlinks.is_empty() {
    source.extend([String::new(), String::new()]);
    for backlink in backlinks {
      let title = store.title(&backlink);
      source.push(format!("    <- #{backlink} {title}"));
    }
  }
  Ok(Loaded { raw, source })
}

impl ViewerPane {
  /// Viewer for `id` scrolled to physical row `top`.
  ///
  /// `top` is kept even when it leaves blank rows under the text, so an
  /// editor's scroll position survives a round trip through the viewer.
  pub fn open(id: NoteId, rect: Rect, store: &dyn NoteStore, top: usize) -> Result<Self> {
    let Loaded { raw, source } = load(&id, store)?;
    let mut viewer = Self {
      id,
      rect,
      raw,
      source,
      rows: Vec::new(),
      links: Vec::new(),
      link: None,
      top,
      previous: Vec::new(),
    };
    viewer.rewrap();
    viewer.top = viewer.top.min(viewer.rows.len().saturating_sub(1));
    Ok(viewer)
  }

  fn width(&self) -> usize {
    self.rect.cols.max(1)
  }

  fn rewrap(&mut self) {
    let width = self.width();
    self.rows = self
      .source
      .iter()
      .flat_map(|line| wrap::wrap_line(line, width))
      .map(str::to_string)
      .collect();
    self.links = links::extract(&self.source, width);
    if self.link.is_some_and(|link| link >= self.links.len()) {
      self.link = None;
    }
  }

  fn max_top(&self) -> usize {
    self.rows.len().saturating_sub(self.rect.rows)
  }

  pub fn links(&self) -> &[Link] {
    &self.links
  }

  pub fn selected_link(&self) -> Option<usize> {
    self.link
  }

  /// Physical rows of the note itself, without backlinks.
  pub fn raw_rows(&self) -> usize {
    wrap::physical_row_total(&self.raw, self.width())
  }

  fn scroll_up(&mut self, by: usize) {
    self.top = self.top.saturating_sub(by);
  }

  fn scroll_down(&mut self, by: usize) {
    self.top = (self.top + by).min(self.max_top()).max(self.top);
  }

  fn select(&mut self, index: usize, store: &dyn NoteStore) -> Command {
    self.link = Some(index);
    let link = &self.links[index];
    self.top =
      wrap::link_scroll_to_reveal(link.anchor(), link.len(), self.top, self.rect.rows, self.width());
    match link.note_id() {
      Some(id) => {
        let title = store.title(&id);
        Command::Status(format!("#{id} {title}"))
      },
      None => Command::Status(link.text.clone()),
    }
  }

  fn next_link(&mut self, store: &dyn NoteStore) -> Command {
    if self.links.is_empty() {
      return Command::None;
    }
    let index = match self.link {
      None => 0,
      Some(link) => (link + 1).min(self.links.len() - 1),
    };
    self.select(index, store)
  }

  fn previous_link(&mut self, store: &dyn NoteStore) -> Command {
    match self.link {
      Some(link) => self.select(link.saturating_sub(1), store),
      None => Command::None,
    }
  }

  fn open_link(&self) -> Command {
    let Some(link) = self.link.map(|index| &self.links[index]) else {
      return Command::None;
    };
    match link.kind {
      LinkKind::Note => Command::OpenNote(NoteId::from_link(&link.text)),
      LinkKind::Url => Command::OpenUrl(link.text.clone()),
      LinkKind::File => Command::OpenFile(link.text.clone()),
    }
  }

  /// Show `id` in place of the current note.
  fn show(&mut self, id: NoteId, store: &dyn NoteStore) -> Result<()> {
    let Loaded { raw, source } = load(&id, store)?;
    self.id = id;
    self.raw = raw;
    self.source = source;
    self.link = None;
    self.top = 0;
    self.rewrap();
    Ok(())
  }

  /// Follow the selected note link, remembering where we came from.
  fn go(&mut self, store: &dyn NoteStore) -> Result<Command> {
    let Some(id) = self.link.and_then(|index| self.links[index].note_id()) else {
      return Ok(Command::None);
    };
    let from = self.id.clone();
    self.show(id, store)?;
    self.previous.push(from);
    Ok(Command::None)
  }

  fn back(&mut self, store: &dyn NoteStore) -> Result<Command> {
    let Some(id) = self.previous.pop() else {
      return Ok(Command::None);
    };
    if let Err(err) = self.show(id.clone(), store) {
      self.previous.push(id);
      return Err(err);
    }
    Ok(Command::None)
  }

  fn reload(&mut self, store: &dyn NoteStore) -> Result<()> {
    let Loaded { raw, source } = load(&self.id, store)?;
    self.raw = raw;
    self.source = source;
    self.rewrap();
    self.top = self.top.min(self.max_top());
    Ok(())
  }

  fn to_editor(&self) -> Command {
    Command::ConvertViewerToEditor {
      id:  self.id.clone(),
      row: self.top.min(self.raw_rows().saturating_sub(1)),
    }
  }
}

impl Pane for ViewerPane {
  fn kind(&self) -> PaneKind {
    PaneKind::Viewer
  }

  fn rect(&self) -> Rect {
    self.rect
  }

  fn resize(&mut self, rect: Rect) {
    let rewrap = rect.cols != self.rect.cols;
    self.rect = rect;
    if rewrap {
      self.rewrap();
    }
    self.top = self.top.min(self.max_top());
  }

  fn render(&mut self, surface: &mut Surface) {
    let width = self.width();
    let height = self.rect.rows;
    let mut region = surface.region(self.rect);
    region.clear();
    for (row, text) in self.rows.iter().skip(self.top).take(height).enumerate() {
      region.put_str(row, 0, text, Style::empty());
    }
    let visible = self.top..self.top + height;
    for (index, link) in self.links.iter().enumerate() {
      let style = if self.link == Some(index) {
        Style::REVERSE
      } else {
        Style::UNDERLINE
      };
      for (Position { row, col }, piece) in link.segments(width) {
        if visible.contains(&row) {
          region.put_str(row - self.top, col, &piece, style);
        }
      }
    }
    region.hide_cursor();
  }

  fn handle_key(&mut self, key: KeyEvent, cx: &mut PaneContext) -> Result<Command> {
    if let Some(command) = pane::window_command(key) {
      return Ok(command);
    }
    if key.is_ctrl() {
      let command = match key.key {
        Key::Char('u') => {
          self.scroll_up(PAGE);
          Command::None
        },
        Key::Char('d') => {
          self.scroll_down(PAGE);
          Command::None
        },
        Key::Char('n') => Command::NewNote,
        Key::Char('w' | 'q') => Command::ClosePane,
        _ => Command::None,
      };
      return Ok(command);
    }

    let command = match key.key {
      Key::Up => {
        self.scroll_up(1);
        Command::None
      },
      Key::Down => {
        self.scroll_down(1);
        Command::None
      },
      Key::PageUp => {
        self.scroll_up(self.rect.rows.max(1));
        Command::None
      },
      Key::PageDown => {
        self.scroll_down(self.rect.rows.max(1));
        Command::None
      },
      Key::Right => self.next_link(cx.store),
      Key::Left => self.previous_link(cx.store),
      Key::Enter | Key::Char('o') => self.open_link(),
      Key::Char('g') => self.go(cx.store)?,
      Key::Char('b') => self.back(cx.store)?,
      Key::Char('e') => self.to_editor(),
      Key::Char('r') => {
        self.reload(cx.store)?;
        Command::None
      },
      Key::Char(':') => Command::StartPrompt,
      Key::Char('+') => Command::NewNote,
      _ => Command::None,
    };
    Ok(command)
  }

  fn note_id(&self) -> Option<&NoteId> {
    Some(&self.id)
  }

  fn top(&self) -> usize {
    self.top
  }
}
