//! Persistence interface.
//!
//! The lib only defines the interface, the saved blob and an in-memory
//! backend. Hosts provide durable implementations (see `wer-runtime`).

use std::{
  borrow::Cow,
  sync::Mutex,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::segment::Line;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("saved document is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
  #[error("storage backend is unavailable")]
  Unavailable,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Everything needed to restore a session: the annotated lines and the raw
/// text they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
  pub lines:      Vec<Line>,
  pub input_text: String,
}

impl SavedDocument {
  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string(self)?)
  }

  pub fn from_json(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }
}

pub trait Storage {
  fn name(&self) -> Cow<'_, str>;
  fn save(&self, document: &SavedDocument) -> Result<()>;
  /// `Ok(None)` when nothing has been saved yet.
  fn load(&self) -> Result<Option<SavedDocument>>;
}

/// Keeps the serialized blob in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  blob: Mutex<Option<String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Storage for MemoryStorage {
  fn name(&self) -> Cow<'_, str> {
    "memory".into()
  }

  fn save(&self, document: &SavedDocument) -> Result<()> {
    let json = document.to_json()?;
    let mut blob = self.blob.lock().map_err(|_| StorageError::Unavailable)?;
    *blob = Some(json);
    Ok(())
  }

  fn load(&self) -> Result<Option<SavedDocument>> {
    let blob = self.blob.lock().map_err(|_| StorageError::Unavailable)?;
    blob.as_deref().map(SavedDocument::from_json).transpose()
  }
}

/// A backend that stores nothing and loads nothing.
#[derive(Debug, Default)]
pub struct NoStorage;

impl Storage for NoStorage {
  fn name(&self) -> Cow<'_, str> {
    "none".into()
  }

  fn save(&self, _document: &SavedDocument) -> Result<()> {
    Err(StorageError::Unavailable)
  }

  fn load(&self) -> Result<Option<SavedDocument>> {
    Ok(None)
  }
}
