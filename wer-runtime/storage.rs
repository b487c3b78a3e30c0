//! JSON file storage for saved sessions.

use std::{
  borrow::Cow,
  io::{
    self,
    Write,
  },
  path::{
    Path,
    PathBuf,
  },
};

use tempfile::NamedTempFile;
use wer_lib::storage::{
  Result,
  SavedDocument,
  Storage,
};

/// Stores one session as a JSON file.
///
/// Saves write a sibling temp file and rename it over the target, so a
/// crash mid-save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
  path: PathBuf,
}

impl FileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Storage for FileStorage {
  fn name(&self) -> Cow<'_, str> {
    self.path.to_string_lossy()
  }

  fn save(&self, document: &SavedDocument) -> Result<()> {
    let json = document.to_json()?;
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(&self.path).map_err(|err| err.error)?;
    tracing::debug!(path = %self.path.display(), bytes = json.len(), "saved session");
    Ok(())
  }

  fn load(&self) -> Result<Option<SavedDocument>> {
    match std::fs::read_to_string(&self.path) {
      Ok(json) => SavedDocument::from_json(&json).map(Some),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(err) => Err(err.into()),
    }
  }
}
