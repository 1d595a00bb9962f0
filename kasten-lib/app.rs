//! Application state and the per-event step of the main loop.
//!
//! The terminal client feeds every [`Event`] to [`App::step`] and then paints
//! [`App::render`]'s output. Panes never touch each other; they return a
//! [`Command`] and the app carries it out here.

use crate::{
  command::{
    Command,
    Instruction,
    SearchPurpose,
  },
  compositor::Compositor,
  config::Config,
  error::{
    Error,
    Result,
  },
  external,
  geometry::{
    Direction,
    Grid,
    Rect,
  },
  input::{
    Event,
    KeyEvent,
  },
  note::NoteId,
  pane::{
    Pane,
    PaneContext,
    PaneKind,
  },
  panes::{
    EditorPane,
    IndexPane,
    SortOrder,
    StatusBar,
    StatusMode,
    ViewerPane,
  },
  session::Session,
  store::NoteStore,
  surface::Surface,
  wrap,
};

pub struct App {
  config:      Config,
  store:       Box<dyn NoteStore>,
  compositor:  Compositor,
  index:       IndexPane,
  status:      StatusBar,
  show_index:  bool,
  cut_buffer:  Vec<String>,
  /// Message of the error reported by the previous step, if it failed.
  last_error:  Option<String>,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, store: Box<dyn NoteStore>, grid: Grid) -> Result<Self> {
    let index = IndexPane::new(grid.placeable(), store.as_ref())?;
    tracing::info!(
      notes = index.count(),
      rows = grid.rows,
      cols = grid.cols,
      "app started"
    );
    Ok(Self {
      config,
      store,
      compositor: Compositor::new(grid),
      index,
      status: StatusBar::new(grid.status_rect()),
      show_index: true,
      cut_buffer: Vec::new(),
      last_error: None,
      should_quit: false,
    })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn store(&self) -> &dyn NoteStore {
    self.store.as_ref()
  }

  pub fn compositor(&self) -> &Compositor {
    &self.compositor
  }

  pub fn index(&self) -> &IndexPane {
    &self.index
  }

  pub fn status(&self) -> &StatusBar {
    &self.status
  }

  pub fn grid(&self) -> Grid {
    self.compositor.grid()
  }

  pub fn is_index_shown(&self) -> bool {
    self.show_index
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  /// Handle one event, reporting failures in the status line.
  ///
  /// An error is only returned when the same error comes back on two steps
  /// in a row; anything else is reported and the loop carries on.
  pub fn step(&mut self, event: Event) -> Result<()> {
    match self.handle_event(event) {
      Ok(()) => {
        self.last_error = None;
        Ok(())
      },
      Err(err) => {
        let message = err.to_string();
        tracing::error!(error = %message, ?event, "event failed");
        self.status.error(&message);
        if self.last_error.as_deref() == Some(message.as_str()) {
          return Err(Error::Repeated(message));
        }
        self.last_error = Some(message);
        Ok(())
      },
    }
  }

  pub fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Resize { rows, cols } => {
        self.resize(rows, cols);
        Ok(())
      },
      Event::Key(key) => {
        let command = self.route_key(key)?;
        self.apply(command)
      },
    }
  }

  fn route_key(&mut self, key: KeyEvent) -> Result<Command> {
    self.status.echo(key);
    let mut cx = PaneContext {
      store:      self.store.as_ref(),
      cut_buffer: &mut self.cut_buffer,
    };
    if self.status.is_capturing() {
      self.status.handle_key(key, &mut cx)
    } else if self.show_index || self.compositor.is_empty() {
      self.index.handle_key(key, &mut cx)
    } else {
      self.compositor.handle_key(key, &mut cx)
    }
  }

  pub fn resize(&mut self, rows: usize, cols: usize) {
    self.compositor.resize(rows, cols);
    let grid = self.compositor.grid();
    self.index.resize(grid.placeable());
    self.status.resize(grid.status_rect());
  }

  /// Paint everything. The index covers the stack while shown and is the
  /// backdrop otherwise; the status line goes last.
  pub fn render(&mut self, surface: &mut Surface) {
    let grid = self.compositor.grid();
    surface.resize(grid.rows, grid.cols);
    surface.clear();
    if self.show_index {
      self.compositor.refresh(surface);
      self.index.render(surface);
    } else {
      self.index.render(surface);
      self.compositor.refresh(surface);
    }
    self.status.render(surface);
  }

  pub fn apply(&mut self, command: Command) -> Result<()> {
    match command {
      Command::None => {},
      Command::NewNote => {
        let id = self.store.create()?;
        self.index.reload(self.store.as_ref())?;
        self.open_editor(id, 0)?;
      },
      Command::OpenNote(id) => self.open_viewer(id, 0)?,
      Command::EditNote(id) => self.open_editor(id, 0)?,
      Command::ConvertEditorToViewer { id, row } => self.editor_to_viewer(id, row)?,
      Command::ConvertViewerToEditor { id, row } => self.viewer_to_editor(id, row)?,
      Command::ShowIndex => self.show_index = true,
      Command::HideIndex => self.show_index = false,
      Command::StartSearch(purpose) => {
        if purpose == SearchPurpose::InsertLink && !self.top_accepts_links() {
          self.status.set("no editor to insert a link into");
          return Ok(());
        }
        self.index.search("", self.store.as_ref())?;
        self.status.start_search(purpose);
        self.status.preview(self.index.selected_id());
        if purpose == SearchPurpose::Browse {
          self.show_index = true;
        }
      },
      Command::SearchChanged(query) => {
        self.index.search(&query, self.store.as_ref())?;
        self.status.preview(self.index.selected_id());
      },
      Command::SearchMove(direction) => {
        match direction {
          Direction::Up => self.index.up(),
          Direction::Down => self.index.down(),
        }
        self.status.preview(self.index.selected_id());
      },
      Command::AcceptSearch => self.accept_search(),
      Command::CancelSearch => {
        self.status.finish();
        self.index.end_search();
      },
      Command::StartPrompt => self.status.start_prompt(),
      Command::ExecPrompt(input) => {
        self.status.finish();
        self.exec_prompt(&input)?;
      },
      Command::CancelPrompt => self.status.finish(),
      Command::Status(message) => self.status.set(message),
      Command::OpenUrl(url) => {
        external::open_detached(&self.config.url_opener, &url)?;
        self.status.set(format!("opened {url}"));
      },
      Command::OpenFile(path) => {
        let expanded = kasten_loader::expand_tilde(std::path::Path::new(&path).into());
        external::open_detached(&self.config.file_opener, &expanded.to_string_lossy())?;
        self.status.set(format!("opened {path}"));
      },
      Command::RaisePane if self.show_index => self.show_index = false,
      Command::RaisePane => self.compositor.up(),
      Command::LowerPane if self.show_index => self.show_index = false,
      Command::LowerPane => self.compositor.down(),
      Command::ExpandPane(axis) => self.compositor.expand(axis),
      Command::ShrinkPane(axis) => self.compositor.shrink(axis),
      Command::ClosePane => {
        self.compositor.pop();
        if self.compositor.is_empty() {
          self.show_index = true;
        }
      },
      Command::Sync => self.sync()?,
      Command::Quit => self.quit()?,
    }
    Ok(())
  }

  fn top_accepts_links(&self) -> bool {
    !self.show_index
      && self
        .compositor
        .top()
        .is_some_and(|pane| pane.kind() == PaneKind::Editor)
  }

  fn accept_search(&mut self) {
    let purpose = self.status.mode();
    let selected = self.index.selected_id();
    self.status.finish();
    self.index.end_search();
    if purpose != StatusMode::Search(SearchPurpose::InsertLink) {
      return;
    }
    let Some(id) = selected else {
      return;
    };
    let inserted = self
      .compositor
      .top_mut()
      .is_some_and(|pane| pane.insert_link(&format!("#{id}")));
    if !inserted {
      self.status.set("no editor to insert a link into");
    }
  }

  fn exec_prompt(&mut self, input: &str) -> Result<()> {
    let Some(instruction) = Instruction::parse(input) else {
      return Err(Error::UnknownInstruction(input.trim().to_string()));
    };
    match instruction {
      Instruction::Count => self.status.set(format!("{} notes", self.index.count())),
      Instruction::Sort => {
        self.index.sort();
        let order = match self.index.order() {
          SortOrder::Id => "id",
          SortOrder::Title => "title",
        };
        self.status.set(format!("sorted by {order}"));
      },
      Instruction::Sync => self.sync()?,
      Instruction::New => self.apply(Command::NewNote)?,
      Instruction::Quit => self.quit()?,
    }
    Ok(())
  }

  /// Size for new panes, capped at a quarter of the screen.
  fn standard_rect(&self) -> Rect {
    let grid = self.compositor.grid();
    let rows = self.config.pane_rows.min(grid.rows / 2);
    let cols = self.config.pane_cols.min(grid.cols / 2);
    Rect::at(self.compositor.recommend(rows, cols), rows, cols)
  }

  pub fn open_editor(&mut self, id: NoteId, line: usize) -> Result<()> {
    let rect = self.standard_rect();
    let editor = EditorPane::open(id, rect, self.store.as_ref(), line)?;
    self.compositor.push(Box::new(editor));
    self.show_index = false;
    Ok(())
  }

  pub fn open_viewer(&mut self, id: NoteId, top: usize) -> Result<()> {
    let rect = self.standard_rect();
    let viewer = ViewerPane::open(id, rect, self.store.as_ref(), top)?;
    self.compositor.push(Box::new(viewer));
    self.show_index = false;
    Ok(())
  }

  fn active_rect(&self) -> Option<Rect> {
    self.compositor.top().map(|pane| pane.rect())
  }

  /// Swap the active editor for a viewer in the same rectangle. `line` is the
  /// editor's top line.
  fn editor_to_viewer(&mut self, id: NoteId, line: usize) -> Result<()> {
    let Some(rect) = self.active_rect() else {
      return Ok(());
    };
    let lines = self.store.read_lines(&id)?;
    let top = wrap::editor_to_viewer(&lines, rect.cols.max(1), line);
    let viewer = ViewerPane::open(id, rect, self.store.as_ref(), top)?;
    self.compositor.pop();
    self.compositor.push(Box::new(viewer));
    Ok(())
  }

  /// Swap the active viewer for an editor in the same rectangle. `row` is a
  /// physical row of the note as the viewer last loaded it; the file may have
  /// shrunk since, so it is clamped into the text read now.
  fn viewer_to_editor(&mut self, id: NoteId, row: usize) -> Result<()> {
    let Some(rect) = self.active_rect() else {
      return Ok(());
    };
    let lines = self.store.read_lines(&id)?;
    let width = rect.cols.max(1);
    let last = wrap::physical_row_total(&lines, width).saturating_sub(1);
    let line = wrap::viewer_to_editor(&lines, width, row.min(last))?;
    let editor = EditorPane::new(id, rect, lines, line);
    self.compositor.pop();
    self.compositor.push(Box::new(editor));
    Ok(())
  }

  /// Run the configured sync command. Blocks until it finishes.
  fn sync(&mut self) -> Result<()> {
    let Some(command) = self.config.sync_command.as_deref() else {
      self.status.set("no sync command configured");
      return Ok(());
    };
    let output = external::run_blocking(command, self.store.dir())?;
    self.index.reload(self.store.as_ref())?;
    let summary = output.trim().lines().last().unwrap_or("synced");
    tracing::info!(summary, "sync finished");
    self.status.set(summary.to_string());
    Ok(())
  }

  fn quit(&mut self) -> Result<()> {
    if let Some(dirty) = self.compositor.iter().find(|pane| pane.is_dirty()) {
      let id = dirty.note_id().map(NoteId::to_string).unwrap_or_default();
      self.status.set(format!("unsaved changes in #{id}"));
      return Ok(());
    }
    Session::capture(self.compositor.iter()).save(&self.config.session_file)?;
    tracing::info!("quitting");
    self.should_quit = true;
    Ok(())
  }

  /// Reopen the panes of the last session. Notes that are gone are skipped.
  pub fn restore_session(&mut self) -> Result<()> {
    if !self.config.restore_session {
      return Ok(());
    }
    let Some(session) = Session::load(&self.config.session_file)? else {
      return Ok(());
    };
    for saved in session.panes {
      let id = saved.id.clone();
      let pane: Result<Box<dyn Pane>> = match saved.kind {
        PaneKind::Editor => {
          EditorPane::open(saved.id, saved.rect, self.store.as_ref(), saved.top)
            .map(|pane| Box::new(pane) as Box<dyn Pane>)
        },
        PaneKind::Viewer => {
          ViewerPane::open(saved.id, saved.rect, self.store.as_ref(), saved.top)
            .map(|pane| Box::new(pane) as Box<dyn Pane>)
        },
        PaneKind::Index | PaneKind::Status => continue,
      };
      match pane {
        Ok(pane) => self.compositor.push(pane),
        Err(err) => tracing::warn!(%id, %err, "skipping pane from last session"),
      }
    }
    if !self.compositor.is_empty() {
      self.show_index = false;
    }
    tracing::info!(panes = self.compositor.len(), "restored session");
    Ok(())
  }
}
