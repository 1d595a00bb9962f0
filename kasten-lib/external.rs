//! External programs: the sync command and URL/file openers.

use std::{
  path::Path,
  process::{
    Command,
    Stdio,
  },
};

use crate::error::{
  Error,
  Result,
};

/// Run `command_line` through `sh -c` inside `dir` and return its stdout.
///
/// This blocks until the command exits; the event loop does not read input
/// in the meantime. A non-zero exit status is an error carrying stderr.
pub fn run_blocking(command_line: &str, dir: &Path) -> Result<String> {
  tracing::info!(command = command_line, dir = %dir.display(), "running external command");
  let output = Command::new("sh")
    .arg("-c")
    .arg(command_line)
    .current_dir(dir)
    .stdin(Stdio::null())
    .output()
    .map_err(|err| Error::external(command_line, err.to_string()))?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = match stderr.trim().lines().last() {
      Some(line) => line.to_string(),
      None => output.status.to_string(),
    };
    return Err(Error::external(command_line, reason));
  }
  Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Start `opener target` in the background and return right away.
///
/// The opener is detached through the shell so it is neither waited on nor
/// left behind as a zombie, and its output never reaches the terminal.
pub fn open_detached(opener: &str, target: &str) -> Result<()> {
  tracing::info!(opener, target, "opening");
  let status = Command::new("sh")
    .arg("-c")
    .arg(r#""$0" "$1" >/dev/null 2>&1 &"#)
    .arg(opener)
    .arg(target)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .map_err(|err| Error::external(opener, err.to_string()))?;
  if !status.success() {
    return Err(Error::external(opener, status.to_string()));
  }
  Ok(())
}
