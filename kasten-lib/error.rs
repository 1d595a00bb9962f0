use std::{
  io,
  path::PathBuf,
};

use thiserror::Error;

use crate::{
  config::ConfigError,
  note::NoteId,
  wrap::WrapError,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  Wrap(#[from] WrapError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("no such note #{0}")]
  NoteNotFound(NoteId),
  #[error("`{command}` failed: {reason}")]
  External { command: String, reason: String },
  #[error("unknown instruction `{0}`")]
  UnknownInstruction(String),
  #[error("session file: {0}")]
  Session(#[from] serde_json::Error),
  #[error("giving up after repeated error: {0}")]
  Repeated(String),
}

impl Error {
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub fn external(command: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::External {
      command: command.into(),
      reason:  reason.into(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
