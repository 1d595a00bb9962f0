//! User configuration, read once at startup and handed to the app.

use std::{
  borrow::Cow,
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("invalid config {}: {source}", path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
  /// Directory with one file per note.
  pub kasten_dir:      PathBuf,
  pub session_file:    PathBuf,
  /// Shell command run by `sync`, inside `kasten_dir`.
  pub sync_command:    Option<String>,
  pub url_opener:      String,
  pub file_opener:     String,
  /// Upper bound for the height of new panes.
  pub pane_rows:       usize,
  /// Upper bound for the width of new panes.
  pub pane_cols:       usize,
  pub restore_session: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      kasten_dir:      kasten_loader::default_kasten_dir(),
      session_file:    kasten_loader::default_session_file(),
      sync_command:    None,
      url_opener:      "xdg-open".to_string(),
      file_opener:     "xdg-open".to_string(),
      pane_rows:       20,
      pane_cols:       70,
      restore_session: true,
    }
  }
}

impl Config {
  /// Read `path`, falling back to defaults when the file does not exist.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Self::default());
      },
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      },
    };
    Self::parse(&text).map_err(|source| {
      ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      }
    })
  }

  pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
    let mut config: Self = toml::from_str(text)?;
    config.kasten_dir = expand(config.kasten_dir);
    config.session_file = expand(config.session_file);
    Ok(config)
  }
}

fn expand(path: PathBuf) -> PathBuf {
  kasten_loader::expand_tilde(Cow::Owned(path)).into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.pane_rows, 20);
    assert_eq!(config.pane_cols, 70);
    assert!(config.restore_session);
  }

  #[test]
  fn partial_file_keeps_other_defaults() {
    let config = Config::parse(
      r#"
kasten-dir = "/tmp/notes"
sync-command = "git pull && git push"
pane-cols = 60
"#,
    )
    .unwrap();
    assert_eq!(config.kasten_dir, PathBuf::from("/tmp/notes"));
    assert_eq!(config.sync_command.as_deref(), Some("git pull && git push"));
    assert_eq!(config.pane_cols, 60);
    assert_eq!(config.pane_rows, 20);
    assert_eq!(config.url_opener, "xdg-open");
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(Config::parse("editor = \"vim\"").is_err());
  }

  #[test]
  fn parse_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "pane-rows = \"many\"").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
  }
}
