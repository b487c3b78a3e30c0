//! Status channel for recoverable failures and operation results.
//!
//! Nothing in the core aborts on a failed save or an empty batch merge; the
//! outcome is logged here for the host to show.

use std::{
  collections::VecDeque,
  fmt,
};

use serde::{
  Deserialize,
  Serialize,
};

/// Messages kept before the oldest is dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
  Info,
  Warning,
  Error,
}

/// The session operation a message reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
  History,
  BatchMerge,
  Save,
  Load,
}

impl fmt::Display for MessageLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      MessageLevel::Info => "info",
      MessageLevel::Warning => "warning",
      MessageLevel::Error => "error",
    })
  }
}

impl fmt::Display for Origin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Origin::History => "history",
      Origin::BatchMerge => "batch-merge",
      Origin::Save => "save",
      Origin::Load => "load",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  /// Sequence number, starting at 1.
  pub id:     u64,
  pub level:  MessageLevel,
  pub origin: Origin,
  pub text:   String,
}

impl fmt::Display for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({}): {}", self.level, self.origin, self.text)
  }
}

/// Bounded message log with one message on display.
#[derive(Debug, Clone)]
pub struct MessageCenter {
  log:      VecDeque<Message>,
  /// Id of the message on display, if it is still in the log.
  shown:    Option<u64>,
  last_id:  u64,
  capacity: usize,
}

impl Default for MessageCenter {
  fn default() -> Self {
    Self::new(DEFAULT_LOG_CAPACITY)
  }
}

impl MessageCenter {
  pub fn new(capacity: usize) -> Self {
    Self {
      log:      VecDeque::new(),
      shown:    None,
      last_id:  0,
      capacity: capacity.max(1),
    }
  }

  /// The message on display: the newest one, until dismissed.
  pub fn current(&self) -> Option<&Message> {
    let id = self.shown?;
    self.log.iter().rev().find(|message| message.id == id)
  }

  /// Every logged message, oldest first.
  pub fn log(&self) -> impl Iterator<Item = &Message> {
    self.log.iter()
  }

  /// Messages logged after `id`, for hosts that poll.
  pub fn since(&self, id: u64) -> impl Iterator<Item = &Message> {
    self.log.iter().filter(move |message| message.id > id)
  }

  pub fn len(&self) -> usize {
    self.log.len()
  }

  pub fn is_empty(&self) -> bool {
    self.log.is_empty()
  }

  pub fn push(&mut self, level: MessageLevel, origin: Origin, text: impl Into<String>) -> u64 {
    self.last_id += 1;
    let id = self.last_id;
    if self.log.len() == self.capacity {
      self.log.pop_front();
    }
    self.log.push_back(Message {
      id,
      level,
      origin,
      text: text.into(),
    });
    self.shown = Some(id);
    id
  }

  pub fn info(&mut self, origin: Origin, text: impl Into<String>) -> u64 {
    self.push(MessageLevel::Info, origin, text)
  }

  pub fn warning(&mut self, origin: Origin, text: impl Into<String>) -> u64 {
    self.push(MessageLevel::Warning, origin, text)
  }

  pub fn error(&mut self, origin: Origin, text: impl Into<String>) -> u64 {
    self.push(MessageLevel::Error, origin, text)
  }

  /// Hide the current message. It stays in the log.
  pub fn dismiss(&mut self) -> bool {
    self.shown.take().is_some()
  }

  pub fn clear(&mut self) {
    self.log.clear();
    self.shown = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn newest_message_is_current() {
    let mut center = MessageCenter::default();
    center.info(Origin::Save, "saved");
    let id = center.error(Origin::Load, "disk full");
    let current = center.current().unwrap();
    assert_eq!(current.id, id);
    assert_eq!(current.to_string(), "error (load): disk full");
    assert_eq!(center.len(), 2);
  }

  #[test]
  fn log_is_bounded() {
    let mut center = MessageCenter::new(2);
    center.info(Origin::BatchMerge, "a");
    center.info(Origin::BatchMerge, "b");
    let last = center.info(Origin::BatchMerge, "c");
    assert_eq!(last, 3);
    let texts: Vec<_> = center.log().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["b", "c"]);
    assert_eq!(center.since(2).count(), 1);
  }

  #[test]
  fn dismiss_keeps_log() {
    let mut center = MessageCenter::default();
    center.warning(Origin::History, "careful");
    assert!(center.dismiss());
    assert!(center.current().is_none());
    assert!(!center.dismiss());
    assert_eq!(center.len(), 1);
    center.clear();
    assert!(center.is_empty());
  }

  #[test]
  fn levels_order_by_severity() {
    assert!(MessageLevel::Info < MessageLevel::Warning);
    assert!(MessageLevel::Warning < MessageLevel::Error);
  }
}
