//! Config and data locations.
//!
//! `WER_CONFIG_DIR` and `WER_DATA_DIR` override the platform defaults.
//! A workspace is the nearest ancestor of the working directory holding a
//! `.wer` directory or a VCS root.

use std::path::{
  Path,
  PathBuf,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

use crate::Result;

const APP_DIR: &str = "wer";
const WORKSPACE_DIR: &str = ".wer";

pub fn config_dir() -> Result<PathBuf> {
  if let Some(dir) = std::env::var_os("WER_CONFIG_DIR") {
    return Ok(PathBuf::from(dir));
  }
  let strategy = choose_base_strategy()?;
  Ok(strategy.config_dir().join(APP_DIR))
}

pub fn data_dir() -> Result<PathBuf> {
  if let Some(dir) = std::env::var_os("WER_DATA_DIR") {
    return Ok(PathBuf::from(dir));
  }
  let strategy = choose_base_strategy()?;
  Ok(strategy.data_dir().join(APP_DIR))
}

pub fn config_file() -> Result<PathBuf> {
  Ok(config_dir()?.join("config.toml"))
}

/// Where sessions are saved when no file is given.
pub fn default_storage_file() -> Result<PathBuf> {
  Ok(data_dir()?.join("session.json"))
}

pub fn workspace_config_file() -> PathBuf {
  find_workspace().0.join(WORKSPACE_DIR).join("config.toml")
}

/// The workspace root for the current directory, and whether it is only a
/// fallback because no marker was found.
pub fn find_workspace() -> (PathBuf, bool) {
  match std::env::current_dir() {
    Ok(current_dir) => find_workspace_in(current_dir),
    Err(err) => {
      tracing::debug!(%err, "no working directory");
      (PathBuf::new(), true)
    },
  }
}

pub fn find_workspace_in(dir: impl AsRef<Path>) -> (PathBuf, bool) {
  let dir = dir.as_ref();
  for ancestor in dir.ancestors() {
    if ancestor.join(WORKSPACE_DIR).exists()
      || ancestor.join(".git").exists()
      || ancestor.join(".jj").exists()
    {
      return (ancestor.to_owned(), false);
    }
  }

  (dir.to_owned(), true)
}
