//! File logging. The terminal belongs to the UI, so nothing goes to stdout.

use std::path::Path;

use eyre::{
  Result,
  eyre,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter variable, e.g. `KASTEN_LOG=kasten_lib=debug`.
const LOG_ENV: &str = "KASTEN_LOG";

/// Install the global subscriber. Logs are flushed when the guard drops.
pub fn init(path: &Path) -> Result<WorkerGuard> {
  kasten_loader::ensure_parent_dir(path);
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  let file_name = path
    .file_name()
    .ok_or_else(|| eyre!("log path {} has no file name", path.display()))?;

  let appender = tracing_appender::rolling::never(dir, file_name);
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|err| eyre!("failed to install logger: {err}"))?;
  Ok(guard)
}
