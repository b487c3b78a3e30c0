//! Session configuration.
//!
//! ```toml
//! [history]
//! capacity = 100
//!
//! [search]
//! case-sensitive = true
//!
//! [tokenizer]
//! punctuation = "unicode"            # or "default", or { chars = "，。" }
//! split-words = ["很好", "很多"]      # scored one character at a time
//! ```

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;
use toml::Value;
use wer_core::words::DEFAULT_SPLIT_WORDS;

use crate::{
  history,
  tokenizer::{
    Punctuation,
    Tokenizer,
  },
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("bad config: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
  pub history:   HistoryConfig,
  pub search:    SearchConfig,
  pub tokenizer: TokenizerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct HistoryConfig {
  /// Undo snapshots kept before the oldest is dropped.
  pub capacity: usize,
}

impl Default for HistoryConfig {
  fn default() -> Self {
    Self {
      capacity: history::DEFAULT_CAPACITY,
    }
  }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SearchConfig {
  pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TokenizerConfig {
  pub punctuation: Punctuation,
  pub split_words: Vec<String>,
}

impl Default for TokenizerConfig {
  fn default() -> Self {
    Self {
      punctuation: Punctuation::default(),
      split_words: DEFAULT_SPLIT_WORDS.iter().map(|word| word.to_string()).collect(),
    }
  }
}

impl Config {
  pub fn from_toml(source: &str) -> Result<Self> {
    Ok(toml::from_str(source)?)
  }

  /// Combine a global and a workspace-local config file.
  ///
  /// Local keys override global ones. A file that failed to read is
  /// skipped; a file that fails to parse is an error.
  pub fn load(global: Result<String>, local: Result<String>) -> Result<Self> {
    let global = parse_table(global);
    let local = parse_table(local);

    let merged = match (global, local) {
      (_, Err(ConfigError::BadConfig(err))) | (Err(ConfigError::BadConfig(err)), _) => {
        return Err(ConfigError::BadConfig(err));
      },
      (Ok(global), Ok(local)) => merge_toml_values(global, local, 3),
      (Ok(config), Err(_)) | (Err(_), Ok(config)) => config,
      (Err(err), Err(_)) => {
        tracing::debug!(%err, "no config file found, using defaults");
        return Ok(Self::default());
      },
    };

    Ok(merged.try_into::<Self>()?)
  }

  pub fn tokenizer(&self) -> Tokenizer {
    Tokenizer::with_punctuation(self.tokenizer.punctuation.clone())
      .with_split_words(self.tokenizer.split_words.iter().cloned())
  }
}

fn parse_table(source: Result<String>) -> Result<Value> {
  let source = source?;
  let table: toml::Table = toml::from_str(&source)?;
  Ok(Value::Table(table))
}

/// Merge `right` into `left`, recursing into tables up to `merge_depth`
/// levels. Below that depth, and for non-table values, `right` wins.
pub fn merge_toml_values(left: Value, right: Value, merge_depth: usize) -> Value {
  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (name, rvalue) in right_map {
        let merged = match left_map.remove(&name) {
          Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
          None => rvalue,
        };
        left_map.insert(name, merged);
      }
      Value::Table(left_map)
    },
    (_, value) => value,
  }
}
