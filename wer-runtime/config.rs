//! Reading config files from disk.

use std::path::Path;

use wer_lib::config::{
  Config,
  ConfigError,
};

use crate::{
  Result,
  dirs,
};

/// Load the user config merged with the workspace config, or `explicit`
/// alone when given.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
  let config = match explicit {
    Some(path) => Config::from_toml(&std::fs::read_to_string(path).map_err(ConfigError::from)?)?,
    None => load_merged(&dirs::config_file()?, &dirs::workspace_config_file())?,
  };
  tracing::debug!(?config, "loaded config");
  Ok(config)
}

/// Merge `global` and `local`, where either file may be missing.
pub fn load_merged(global: &Path, local: &Path) -> Result<Config> {
  let read = |path: &Path| std::fs::read_to_string(path).map_err(ConfigError::from);
  Ok(Config::load(read(global), read(local))?)
}
