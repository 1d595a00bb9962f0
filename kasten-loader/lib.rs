//! Filesystem locations used by kasten.
//!
//! Every path can be overridden through an environment variable so tests and
//! portable installs never touch the user's real directories.

use std::{
  borrow::Cow,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::{
  base_strategy::{
    BaseStrategy,
    choose_base_strategy,
  },
  home_dir,
};

const APP_DIR: &str = "kasten";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("KASTEN_CONFIG_DIR") {
    return expand_tilde(Cow::Borrowed(Path::new(&dir))).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(_) => fallback_dir(),
  }
}

pub fn data_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("KASTEN_DATA_DIR") {
    return expand_tilde(Cow::Borrowed(Path::new(&dir))).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.data_dir().join(APP_DIR),
    Err(_) => fallback_dir(),
  }
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("KASTEN_CACHE_DIR") {
    return expand_tilde(Cow::Borrowed(Path::new(&dir))).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(_) => fallback_dir(),
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE
    .get_or_init(|| {
      let path = default_config_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

/// Directory holding one flat file per note.
pub fn default_kasten_dir() -> PathBuf {
  data_dir().join("kasten")
}

/// Where the list of open panes is saved between sessions.
pub fn default_session_file() -> PathBuf {
  data_dir().join("session.json")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("kasten.log")
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

/// Used when the platform exposes no home directory.
fn fallback_dir() -> PathBuf {
  PathBuf::from(".").join(format!(".{APP_DIR}"))
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde<'a>(path: Cow<'a, Path>) -> Cow<'a, Path> {
  let mut components = path.components();
  if let Some(std::path::Component::Normal(first)) = components.next()
    && first == "~"
    && let Ok(home) = home_dir()
  {
    let mut expanded = home;
    expanded.push(components.as_path());
    return Cow::Owned(expanded);
  }
  path
}

pub fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).ok();
  }
}
