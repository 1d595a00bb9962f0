//! The alternate screen the client paints into.
//!
//! Raw mode lasts as long as the [`Screen`]. Dropping it, or panicking while
//! it is alive, puts the terminal back the way it was found.

use std::io::{
  self,
  Stdout,
};

use crossterm::{
  execute,
  terminal::{
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::{
  Result,
  WrapErr,
};
use kasten_lib::surface::Surface;
use ratatui::{
  Terminal,
  backend::CrosstermBackend,
};

use crate::render;

pub struct Screen {
  terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
  pub fn enter() -> Result<Self> {
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    install_panic_hook();
    let mut screen = Self { terminal };
    enable_raw_mode().wrap_err("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    screen.terminal.clear()?;
    Ok(screen)
  }

  /// Copy `surface` to the terminal. ratatui only sends cells that changed.
  pub fn draw(&mut self, surface: &Surface) -> Result<()> {
    self.terminal.draw(|frame| render::blit(surface, frame))?;
    Ok(())
  }
}

impl Drop for Screen {
  fn drop(&mut self) {
    restore();
    let _ = self.terminal.show_cursor();
  }
}

fn restore() {
  let _ = execute!(io::stdout(), LeaveAlternateScreen);
  let _ = disable_raw_mode();
}

fn install_panic_hook() {
  let previous = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    restore();
    tracing::error!(%info, "panic");
    previous(info);
  }));
}
