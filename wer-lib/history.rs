use std::collections::VecDeque;

use thiserror::Error;

use crate::{
  editor::BeforeAction,
  segment::{
    Line,
    LineId,
    SegmentId,
    Selection,
  },
};

pub const DEFAULT_CAPACITY: usize = 50;

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Reasons a snapshot was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
  #[error("segment {segment} on {line} has no text")]
  EmptySegment { line: LineId, segment: SegmentId },
  #[error("segment {segment} on {line} is marked both error and excluded")]
  ConflictingMarks { line: LineId, segment: SegmentId },
}

/// A full copy of the lines and the selection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
  pub lines:     Vec<Line>,
  pub selection: Selection,
}

impl State {
  /// Copy `lines` and `selection`, refusing states that break segment
  /// integrity.
  pub fn capture(lines: &[Line], selection: &Selection) -> Result<Self> {
    for line in lines {
      for segment in &line.segments {
        if segment.text.is_empty() {
          return Err(HistoryError::EmptySegment {
            line:    line.id,
            segment: segment.id,
          });
        }
        if segment.is_error && segment.is_deleted {
          return Err(HistoryError::ConflictingMarks {
            line:    line.id,
            segment: segment.id,
          });
        }
      }
    }

    Ok(Self {
      lines:     lines.to_vec(),
      selection: *selection,
    })
  }
}

/// Bounded undo stack of [`State`] snapshots.
///
/// Snapshots are pushed before each tracked edit. When the stack is full the
/// oldest snapshot is dropped. Undo pops; there is no redo.
#[derive(Debug, Clone)]
pub struct History {
  states:   VecDeque<State>,
  capacity: usize,
}

impl Default for History {
  fn default() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }
}

impl History {
  pub fn with_capacity(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      states: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Change the bound, discarding the oldest snapshots that no longer fit.
  pub fn set_capacity(&mut self, capacity: usize) {
    self.capacity = capacity.max(1);
    self.evict();
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.states.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }

  /// Push a snapshot of `lines` and `selection`.
  ///
  /// # Errors
  /// Returns an error, and leaves the stack unchanged, if the state fails
  /// the integrity check in [`State::capture`].
  pub fn save_state(&mut self, lines: &[Line], selection: &Selection) -> Result<()> {
    let state = State::capture(lines, selection)?;
    self.states.push_back(state);
    self.evict();
    Ok(())
  }

  /// Pop the most recent snapshot. `None` means there is nothing to undo.
  pub fn undo(&mut self) -> Option<State> {
    self.states.pop_back()
  }

  /// The snapshot [`History::undo`] would return.
  pub fn peek(&self) -> Option<&State> {
    self.states.back()
  }

  pub fn clear(&mut self) {
    self.states.clear();
  }

  fn evict(&mut self) {
    while self.states.len() > self.capacity {
      self.states.pop_front();
    }
  }
}

impl BeforeAction for History {
  fn before_action(&mut self, lines: &[Line], selection: &Selection) {
    if let Err(err) = self.save_state(lines, selection) {
      tracing::warn!(%err, "skipped undo snapshot");
    }
  }
}
