//! Full-screen list of notes.

use crate::{
  command::{
    Command,
    SearchPurpose,
  },
  error::Result,
  geometry::{
    Direction,
    Rect,
  },
  input::{
    Key,
    KeyEvent,
  },
  note::{
    NoteId,
    NoteSummary,
  },
  pane::{
    Pane,
    PaneContext,
    PaneKind,
  },
  store::NoteStore,
  surface::{
    Style,
    Surface,
  },
};

/// Width of the id column.
const ID_COLUMN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  #[default]
  Id,
  Title,
}

#[derive(Debug, Clone)]
pub struct IndexPane {
  rect:     Rect,
  notes:    Vec<NoteSummary>,
  /// Search results while a filter is active.
  filtered: Option<Vec<NoteSummary>>,
  order:    SortOrder,
  row:      usize,
  top:      usize,
}

impl IndexPane {
  pub fn new(rect: Rect, store: &dyn NoteStore) -> Result<Self> {
    let mut index = Self {
      rect,
      notes: Vec::new(),
      filtered: None,
      order: SortOrder::default(),
      row: 0,
      top: 0,
    };
    index.reload(store)?;
    Ok(index)
  }

  /// Re-read the note list from the store.
  pub fn reload(&mut self, store: &dyn NoteStore) -> Result<()> {
    let mut notes = store.list()?;
    sort_notes(&mut notes, self.order);
    self.notes = notes;
    self.clamp_selection();
    Ok(())
  }

  /// Number of notes in the kasten, ignoring any filter.
  pub fn count(&self) -> usize {
    self.notes.len()
  }

  pub fn order(&self) -> SortOrder {
    self.order
  }

  /// Toggle between id and title order.
  pub fn sort(&mut self) {
    self.order = match self.order {
      SortOrder::Id => SortOrder::Title,
      SortOrder::Title => SortOrder::Id,
    };
    sort_notes(&mut self.notes, self.order);
    if let Some(filtered) = &mut self.filtered {
      sort_notes(filtered, self.order);
    }
  }

  pub fn visible(&self) -> &[NoteSummary] {
    self.filtered.as_deref().unwrap_or(&self.notes)
  }

  pub fn selected(&self) -> Option<&NoteSummary> {
    self.visible().get(self.row)
  }

  pub fn selected_id(&self) -> Option<NoteId> {
    self.selected().map(|note| note.id.clone())
  }

  /// Narrow the list to notes matching `query`.
  pub fn search(&mut self, query: &str, store: &dyn NoteStore) -> Result<()> {
    let mut found = store.search(query)?;
    sort_notes(&mut found, self.order);
    self.filtered = Some(found);
    self.row = 0;
    self.top = 0;
    Ok(())
  }

  /// Drop the search filter, keeping the selected note selected.
  pub fn end_search(&mut self) {
    let selected = self.selected_id();
    self.filtered = None;
    if let Some(id) = selected {
      self.row = self
        .notes
        .iter()
        .position(|note| note.id == id)
        .unwrap_or(0);
    }
    self.clamp_selection();
  }

  pub fn up(&mut self) {
    self.row = self.row.saturating_sub(1);
    self.top = self.top.min(self.row);
  }

  pub fn down(&mut self) {
    if self.row + 1 < self.visible().len() {
      self.row += 1;
    }
    self.scroll_to_selection();
  }

  /// Move the selection a pane height up or down.
  pub fn page(&mut self, direction: Direction) {
    let step = self.rect.rows.max(1);
    self.row = match direction {
      Direction::Up => self.row.saturating_sub(step),
      Direction::Down => (self.row + step).min(self.visible().len().saturating_sub(1)),
    };
    self.scroll_to_selection();
  }

  fn scroll_to_selection(&mut self) {
    if self.row < self.top {
      self.top = self.row;
    } else if self.rect.rows > 0 && self.row >= self.top + self.rect.rows {
      self.top = self.row + 1 - self.rect.rows;
    }
  }

  fn clamp_selection(&mut self) {
    self.row = self.row.min(self.visible().len().saturating_sub(1));
    self.top = self.top.min(self.row);
    self.scroll_to_selection();
  }

  fn on_selected(&self, make: impl FnOnce(NoteId) -> Command) -> Command {
    self.selected_id().map_or(Command::None, make)
  }
}

fn sort_notes(notes: &mut [NoteSummary], order: SortOrder) {
  match order {
    SortOrder::Id => notes.sort_by(|a, b| a.id.cmp(&b.id)),
    SortOrder::Title => {
      notes.sort_by(|a, b| {
        a.title
          .to_lowercase()
          .cmp(&b.title.to_lowercase())
          .then_with(|| a.id.cmp(&b.id))
      })
    },
  }
}

impl Pane for IndexPane {
  fn kind(&self) -> PaneKind {
    PaneKind::Index
  }

  fn rect(&self) -> Rect {
    self.rect
  }

  fn resize(&mut self, rect: Rect) {
    self.rect = rect;
    self.scroll_to_selection();
  }

  fn render(&mut self, surface: &mut Surface) {
    let rows = self.rect.rows;
    let top = self.top;
    let selected = self.row;
    let mut region = surface.region(self.rect);
    region.clear();
    for (offset, note) in self.visible().iter().skip(top).take(rows).enumerate() {
      let id = note.id.as_str();
      let style = if top + offset == selected {
        Style::REVERSE
      } else {
        Style::empty()
      };
      region.put_str(offset, 0, id, style);
      region.put_str(offset, ID_COLUMN.max(id.len() + 1), &note.title, Style::empty());
    }
    region.hide_cursor();
  }

  fn handle_key(&mut self, key: KeyEvent, cx: &mut PaneContext) -> Result<Command> {
    if key.is_ctrl() {
      let command = match key.key {
        Key::Up | Key::Down => Command::HideIndex,
        Key::Char('n') => Command::NewNote,
        Key::Char('f') => Command::StartSearch(SearchPurpose::Browse),
        Key::Char('q') => Command::Quit,
        _ => Command::None,
      };
      return Ok(command);
    }

    let command = match key.key {
      Key::Up => {
        self.up();
        Command::None
      },
      Key::Down => {
        self.down();
        Command::None
      },
      Key::PageUp => {
        self.page(Direction::Up);
        Command::None
      },
      Key::PageDown => {
        self.page(Direction::Down);
        Command::None
      },
      Key::Escape => Command::HideIndex,
      Key::Enter | Key::Char('o') => self.on_selected(Command::OpenNote),
      Key::Char('e') => self.on_selected(Command::EditNote),
      Key::Char('r') => {
        self.reload(cx.store)?;
        Command::Status(format!("{} notes", self.count()))
      },
      Key::Char('+') => Command::NewNote,
      Key::Char('/') => Command::StartSearch(SearchPurpose::Browse),
      Key::Char(':') => Command::StartPrompt,
      Key::Char('s') => Command::Sync,
      Key::Char('q') => Command::Quit,
      _ => Command::None,
    };
    Ok(command)
  }
}
