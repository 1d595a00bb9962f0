//! Terminal client for kasten.
//!
//! Reads one event at a time, hands it to the app, and repaints the whole
//! surface afterwards.

mod input;
mod logging;
mod render;
mod screen;

use std::path::PathBuf;

use clap::Parser;
use crossterm::event;
use eyre::{
  Result,
  WrapErr,
};
use kasten_lib::{
  app::App,
  config::Config,
  geometry::Grid,
  note::NoteId,
  store::FsStore,
  surface::Surface,
};

use crate::screen::Screen;

#[derive(Debug, Parser)]
#[command(name = "kasten")]
#[command(about = "Terminal note tool with stacked editor and viewer panes")]
struct Cli {
  /// Config file to read instead of the default
  #[arg(long)]
  config: Option<PathBuf>,

  /// Directory holding the notes
  #[arg(long)]
  kasten_dir: Option<PathBuf>,

  /// Do not reopen the panes of the last session
  #[arg(long)]
  no_restore: bool,

  /// Log file to write to
  #[arg(long)]
  log_file: Option<PathBuf>,

  /// Note to open in a viewer, e.g. `220113a` or `#220113a`
  note: Option<String>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  kasten_loader::initialize_config_file(cli.config);
  kasten_loader::initialize_log_file(cli.log_file);
  let _log_guard = logging::init(&kasten_loader::log_file())?;

  let config_file = kasten_loader::config_file();
  let mut config = Config::load(&config_file)
    .wrap_err_with(|| format!("failed to load {}", config_file.display()))?;
  if let Some(dir) = cli.kasten_dir {
    config.kasten_dir = dir;
  }
  if cli.no_restore {
    config.restore_session = false;
  }

  let store = FsStore::open(config.kasten_dir.clone())
    .wrap_err_with(|| format!("cannot open notes in {}", config.kasten_dir.display()))?;
  let (cols, rows) = crossterm::terminal::size()?;
  let mut app = App::new(config, Box::new(store), Grid::new(rows as usize, cols as usize))?;
  app.restore_session().wrap_err("failed to restore session")?;
  if let Some(note) = cli.note {
    app.open_viewer(NoteId::from_link(&note), 0)?;
  }

  let result = Screen::enter().and_then(|mut screen| run(&mut app, &mut screen));
  tracing::info!(ok = result.is_ok(), "session ended");
  result
}

fn run(app: &mut App, screen: &mut Screen) -> Result<()> {
  let grid = app.grid();
  let mut surface = Surface::new(grid.rows, grid.cols);
  loop {
    app.render(&mut surface);
    screen.draw(&surface)?;
    if app.should_quit() {
      return Ok(());
    }
    let Some(event) = input::to_event(event::read()?) else {
      continue;
    };
    app.step(event)?;
  }
}
