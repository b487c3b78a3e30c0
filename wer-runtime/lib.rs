//! Filesystem side of the annotator: where config and saved sessions live,
//! how config files are read, and a file-backed [`Storage`].
//!
//! [`Storage`]: wer_lib::storage::Storage

pub mod config;
pub mod dirs;
pub mod storage;

use thiserror::Error;
use wer_lib::{
  config::ConfigError,
  storage::StorageError,
};

#[derive(Debug, Error)]
pub enum RuntimeError {
  #[error("unable to locate the home directory: {0}")]
  HomeDir(#[from] etcetera::HomeDirError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
