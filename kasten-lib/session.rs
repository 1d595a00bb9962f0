//! The open panes, saved on quit and restored on the next start.

use std::{
  fs,
  io,
  path::Path,
};

use serde::{
  Deserialize,
  Serialize,
};

use crate::{
  error::{
    Error,
    Result,
  },
  geometry::Rect,
  note::NoteId,
  pane::{
    Pane,
    PaneKind,
  },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPane {
  pub id:   NoteId,
  pub kind: PaneKind,
  pub rect: Rect,
  pub top:  usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub panes: Vec<SessionPane>,
}

impl Session {
  /// Snapshot of the note panes in `panes`, bottom to top.
  pub fn capture<'a>(panes: impl IntoIterator<Item = &'a dyn Pane>) -> Self {
    let panes = panes
      .into_iter()
      .filter(|pane| matches!(pane.kind(), PaneKind::Editor | PaneKind::Viewer))
      .filter_map(|pane| {
        Some(SessionPane {
          id:   pane.note_id()?.clone(),
          kind: pane.kind(),
          rect: pane.rect(),
          top:  pane.top(),
        })
      })
      .collect();
    Self { panes }
  }

  /// Read a saved session. A missing file is not an error.
  pub fn load(path: &Path) -> Result<Option<Self>> {
    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(err) => return Err(Error::io(path, err)),
    };
    Ok(Some(serde_json::from_str(&text)?))
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }
    let text = serde_json::to_string_pretty(self)?;
    fs::write(path, text).map_err(|err| Error::io(path, err))?;
    tracing::info!(path = %path.display(), panes = self.panes.len(), "saved session");
    Ok(())
  }
}
