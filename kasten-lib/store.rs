//! Note storage.
//!
//! [`NoteStore`] is what panes and the app talk to; [`FsStore`] keeps one flat
//! file per note, named by its id, inside the kasten directory.

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use chrono::Local;

use crate::{
  error::{
    Error,
    Result,
  },
  note::{
    self,
    NOTE_TEMPLATE,
    NoteId,
    NoteSummary,
  },
};

pub trait NoteStore {
  /// Directory the notes live in. External commands run here.
  fn dir(&self) -> &Path;

  /// Every note, sorted by id. A note that cannot be read is listed with a
  /// placeholder title.
  fn list(&self) -> Result<Vec<NoteSummary>>;

  /// Logical lines of a note. An empty note yields one empty line.
  fn read_lines(&self, id: &NoteId) -> Result<Vec<String>>;

  fn write_lines(&self, id: &NoteId, lines: &[String]) -> Result<()>;

  /// Title for display. Never fails; read errors become a placeholder.
  fn title(&self, id: &NoteId) -> String;

  /// Mint a fresh id and write the new-note template under it.
  fn create(&self) -> Result<NoteId>;

  /// Notes whose title or body contains `query`, ignoring case.
  fn search(&self, query: &str) -> Result<Vec<NoteSummary>>;

  /// Ids of the notes that link to `id`.
  fn backlinks(&self, id: &NoteId) -> Result<Vec<NoteId>>;
}

#[derive(Debug, Clone)]
pub struct FsStore {
  dir: PathBuf,
}

impl FsStore {
  /// Open the store at `dir`, creating the directory if needed.
  pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir).map_err(|err| Error::io(&dir, err))?;
    Ok(Self { dir })
  }

  pub fn path(&self, id: &NoteId) -> PathBuf {
    self.dir.join(id.as_str())
  }

  fn ids(&self) -> Result<Vec<NoteId>> {
    let entries = fs::read_dir(&self.dir).map_err(|err| Error::io(&self.dir, err))?;
    let mut ids = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|err| Error::io(&self.dir, err))?;
      if !entry.file_type().is_ok_and(|ty| ty.is_file()) {
        continue;
      }
      if let Some(id) = entry.file_name().to_str().and_then(NoteId::parse) {
        ids.push(id);
      }
    }
    ids.sort();
    Ok(ids)
  }

  fn read_text(&self, id: &NoteId) -> Result<String> {
    let path = self.path(id);
    fs::read_to_string(&path).map_err(|err| {
      if err.kind() == io::ErrorKind::NotFound {
        Error::NoteNotFound(id.clone())
      } else {
        Error::io(path, err)
      }
    })
  }

  fn summary(&self, id: NoteId, text: &io::Result<String>) -> NoteSummary {
    let title = match text {
      Ok(text) => note::parse_title(text).unwrap_or_default(),
      Err(err) => unreadable(&id, err),
    };
    NoteSummary { id, title }
  }
}

fn unreadable(id: &NoteId, err: &dyn std::fmt::Display) -> String {
  tracing::warn!(%id, %err, "unreadable note");
  format!("<unreadable: {err}>")
}

impl NoteStore for FsStore {
  fn dir(&self) -> &Path {
    &self.dir
  }

  fn list(&self) -> Result<Vec<NoteSummary>> {
    Ok(
      self
        .ids()?
        .into_iter()
        .map(|id| {
          let text = fs::read_to_string(self.path(&id));
          self.summary(id, &text)
        })
        .collect(),
    )
  }

  fn read_lines(&self, id: &NoteId) -> Result<Vec<String>> {
    let text = self.read_text(id)?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    if lines.is_empty() {
      lines.push(String::new());
    }
    Ok(lines)
  }

  fn write_lines(&self, id: &NoteId, lines: &[String]) -> Result<()> {
    let path = self.path(id);
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&path, text).map_err(|err| Error::io(path, err))?;
    tracing::info!(%id, lines = lines.len(), "saved note");
    Ok(())
  }

  fn title(&self, id: &NoteId) -> String {
    match self.read_text(id) {
      Ok(text) => note::parse_title(&text).unwrap_or_default(),
      Err(err) => unreadable(id, &err),
    }
  }

  fn create(&self) -> Result<NoteId> {
    let ids = self.ids()?;
    let id = note::next_id(Local::now().date_naive(), &ids);
    let path = self.path(&id);
    fs::write(&path, format!("{NOTE_TEMPLATE}\n")).map_err(|err| Error::io(path, err))?;
    tracing::info!(%id, "created note");
    Ok(id)
  }

  fn search(&self, query: &str) -> Result<Vec<NoteSummary>> {
    let query = query.to_lowercase();
    let mut found = Vec::new();
    for id in self.ids()? {
      let text = fs::read_to_string(self.path(&id));
      let summary = self.summary(id, &text);
      let body_matches = text
        .as_ref()
        .is_ok_and(|text| text.to_lowercase().contains(&query));
      if body_matches || summary.title.to_lowercase().contains(&query) {
        found.push(summary);
      }
    }
    Ok(found)
  }

  fn backlinks(&self, id: &NoteId) -> Result<Vec<NoteId>> {
    let mut found = Vec::new();
    for other in self.ids()? {
      if &other == id {
        continue;
      }
      match fs::read_to_string(self.path(&other)) {
        Ok(text) if note::references(&text, id) => found.push(other),
        Ok(_) => {},
        Err(err) => tracing::warn!(id = %other, %err, "skipping unreadable note in backlinks"),
      }
    }
    Ok(found)
  }
}
