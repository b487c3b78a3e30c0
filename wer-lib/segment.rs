//! Lines, segments, their identifiers and the selection.
//!
//! A [`Line`] is one row of input text split into an ordered run of
//! [`Segment`]s. Segment offsets are half-open character ranges into the
//! line's `original_text`, in reading order and never overlapping. Between
//! two segments there is either nothing (the segments tile) or the
//! whitespace the tokenizer dropped.
//!
//! Offsets are authoritative for segment boundaries. `original_text` is only
//! recommitted on an explicit re-parse, so after boundary edits the two may
//! disagree until the line is tokenized again.

use std::{
  fmt,
  num::NonZeroU64,
};

use serde::{
  Deserialize,
  Serialize,
};

macro_rules! typed_id {
  ($T:ident, $prefix:literal) => {
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $T(NonZeroU64);

    impl $T {
      pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
      }

      pub const fn get(self) -> NonZeroU64 {
        self.0
      }
    }

    impl From<NonZeroU64> for $T {
      fn from(value: NonZeroU64) -> Self {
        Self::new(value)
      }
    }

    impl fmt::Display for $T {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, concat!($prefix, "-{}"), self.0)
      }
    }
  };
}

typed_id!(SegmentId, "seg");
typed_id!(LineId, "line");

/// Monotonic source of segment and line ids.
///
/// Each session owns its own generator, so independent sessions never share
/// counter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
  next_segment: NonZeroU64,
  next_line:    NonZeroU64,
}

impl Default for IdGenerator {
  fn default() -> Self {
    Self {
      next_segment: NonZeroU64::MIN,
      next_line:    NonZeroU64::MIN,
    }
  }
}

impl IdGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Restart both counters at 1.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  pub fn next_segment(&mut self) -> SegmentId {
    let id = self.next_segment;
    self.next_segment = id.saturating_add(1);
    SegmentId(id)
  }

  pub fn next_line(&mut self) -> LineId {
    let id = self.next_line;
    self.next_line = id.saturating_add(1);
    LineId(id)
  }
}

/// The annotation state of a segment.
///
/// Clicking a segment walks `Normal -> Error -> Excluded -> Normal`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
  #[default]
  Normal,
  Error,
  Excluded,
}

impl Mark {
  pub const fn next(self) -> Self {
    match self {
      Mark::Normal => Mark::Error,
      Mark::Error => Mark::Excluded,
      Mark::Excluded => Mark::Normal,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
  pub id:         SegmentId,
  pub text:       String,
  pub is_error:   bool,
  pub is_deleted: bool,
  #[serde(rename = "startIndex")]
  pub start:      usize,
  #[serde(rename = "endIndex")]
  pub end:        usize,
}

impl Segment {
  /// A normal segment covering `text` from character offset `start`.
  pub fn new(id: SegmentId, text: impl Into<String>, start: usize) -> Self {
    let text = text.into();
    let end = start + text.chars().count();
    Self {
      id,
      text,
      is_error: false,
      is_deleted: false,
      start,
      end,
    }
  }

  /// Same as [`Segment::new`] but with the marks of `other`.
  pub fn with_marks_of(mut self, other: &Segment) -> Self {
    self.is_error = other.is_error;
    self.is_deleted = other.is_deleted;
    self
  }

  /// Length of `text` in characters.
  pub fn len(&self) -> usize {
    self.text.chars().count()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  pub fn mark(&self) -> Mark {
    if self.is_deleted {
      Mark::Excluded
    } else if self.is_error {
      Mark::Error
    } else {
      Mark::Normal
    }
  }

  pub fn set_mark(&mut self, mark: Mark) {
    (self.is_error, self.is_deleted) = match mark {
      Mark::Normal => (false, false),
      Mark::Error => (true, false),
      Mark::Excluded => (false, true),
    };
  }

  /// Advance the three-state click cycle.
  pub fn cycle_mark(&mut self) {
    self.set_mark(self.mark().next());
  }

  /// Whether the segment counts toward word totals.
  pub fn is_counted(&self) -> bool {
    !self.is_deleted
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
  pub id:            LineId,
  pub original_text: String,
  pub segments:      Vec<Segment>,
}

impl Line {
  pub fn segment_index(&self, id: SegmentId) -> Option<usize> {
    self.segments.iter().position(|segment| segment.id == id)
  }

  pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
    self.segments.iter().find(|segment| segment.id == id)
  }

  /// The current segment texts joined back together.
  pub fn text(&self) -> String {
    self
      .segments
      .iter()
      .map(|segment| segment.text.as_str())
      .collect()
  }

  /// Whether segments are in offset order and do not overlap.
  pub fn is_ordered(&self) -> bool {
    self
      .segments
      .iter()
      .all(|segment| segment.start <= segment.end)
      && self
        .segments
        .windows(2)
        .all(|pair| pair[0].end <= pair[1].start)
  }

  /// Whether adjacent segments share their boundary offsets and the run
  /// starts at 0.
  pub fn is_tiled(&self) -> bool {
    self.segments.first().is_none_or(|first| first.start == 0)
      && self
        .segments
        .windows(2)
        .all(|pair| pair[0].end == pair[1].start)
  }
}

/// Find a line by id.
pub fn line_index(lines: &[Line], id: LineId) -> Option<usize> {
  lines.iter().position(|line| line.id == id)
}

/// The active segment, if any.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
  #[serde(rename = "selectedLineId")]
  pub line:    Option<LineId>,
  #[serde(rename = "selectedSegmentId")]
  pub segment: Option<SegmentId>,
}

impl Selection {
  pub const NONE: Selection = Selection {
    line:    None,
    segment: None,
  };

  pub const fn new(line: LineId, segment: SegmentId) -> Self {
    Self {
      line:    Some(line),
      segment: Some(segment),
    }
  }

  pub const fn is_none(&self) -> bool {
    self.line.is_none() && self.segment.is_none()
  }

  /// Resolve to `(line index, segment index)` in `lines`.
  ///
  /// Returns `None` unless both ids are set and the segment lives on the
  /// selected line.
  pub fn locate(&self, lines: &[Line]) -> Option<(usize, usize)> {
    let line = line_index(lines, self.line?)?;
    let segment = lines[line].segment_index(self.segment?)?;
    Some((line, segment))
  }

  pub fn resolve<'a>(&self, lines: &'a [Line]) -> Option<(&'a Line, &'a Segment)> {
    let (line, segment) = self.locate(lines)?;
    Some((&lines[line], &lines[line].segments[segment]))
  }
}
