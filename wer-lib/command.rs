//! Discrete commands a host can send to a session.

use crate::{
  editor::Side,
  preview::EditMode,
  segment::{
    LineId,
    SegmentId,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Select { line: LineId, segment: SegmentId },
  /// Select and advance the mark cycle, as a click does.
  Toggle { line: LineId, segment: SegmentId },
  ClearSelection,
  Move(Direction),
  ExpandLeft,
  ShrinkLeft,
  ShrinkRight,
  ExpandRight,
  ToggleDelete,
  ToggleError,
  Split(Side),
  MergeWithNext,
  Undo,
  SetEditMode(EditMode),
  OpenSearch,
  Search(String),
  SetCaseSensitive(bool),
  NextMatch,
  PrevMatch,
  CloseSearch,
  BatchMerge { text: String, side: Side },
  UpdateLineText { line: LineId, text: String },
  ReparseLine(LineId),
}
