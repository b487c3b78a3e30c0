//! Substring search across segment texts.
//!
//! Matches are found inside individual segments, never across a boundary.
//! Every start offset is tried, so occurrences may overlap: `"aa"` occurs
//! twice in `"aaa"`. Positions are character indices within the segment.
//!
//! [`SearchState`] keeps the query, the current match list and a cursor
//! into it. The list is recomputed from the live lines on demand; the cursor
//! is clamped whenever the list shrinks.

use std::fmt;

use crate::segment::{
  Line,
  LineId,
  SegmentId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchMatch {
  pub line:        LineId,
  pub segment:     SegmentId,
  /// Character offset of the match inside the segment text.
  pub match_index: usize,
  /// Match length in characters.
  pub match_len:   usize,
}

/// All occurrences of `query` in `lines`, in line order, then segment
/// order, then left to right. A blank query matches nothing.
pub fn find_matches(lines: &[Line], query: &str, case_sensitive: bool) -> Vec<SearchMatch> {
  if query.trim().is_empty() {
    return Vec::new();
  }
  let needle: Vec<char> = query.chars().collect();

  let mut matches = Vec::new();
  for line in lines {
    for segment in &line.segments {
      let hay: Vec<char> = segment.text.chars().collect();
      matches.extend(
        occurrences(&hay, &needle, case_sensitive).map(|match_index| SearchMatch {
          line: line.id,
          segment: segment.id,
          match_index,
          match_len: needle.len(),
        }),
      );
    }
  }
  matches
}

fn occurrences<'a>(
  hay: &'a [char],
  needle: &'a [char],
  case_sensitive: bool,
) -> impl Iterator<Item = usize> + 'a {
  hay
    .windows(needle.len())
    .enumerate()
    .filter(move |(_, window)| {
      window
        .iter()
        .zip(needle)
        .all(|(&a, &b)| chars_eq(a, b, case_sensitive))
    })
    .map(|(index, _)| index)
}

#[inline]
fn chars_eq(a: char, b: char, case_sensitive: bool) -> bool {
  a == b || (!case_sensitive && a.to_lowercase().eq(b.to_lowercase()))
}

/// What a search box should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
  /// No query.
  Idle,
  /// A query with zero matches.
  NoMatch,
  /// 1-based `current` out of `total`.
  Position { current: usize, total: usize },
}

impl fmt::Display for SearchStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SearchStatus::Idle => Ok(()),
      SearchStatus::NoMatch => f.write_str("no matches"),
      SearchStatus::Position { current, total } => write!(f, "{current}/{total}"),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
  open:           bool,
  query:          String,
  case_sensitive: bool,
  matches:        Vec<SearchMatch>,
  current:        usize,
}

impl SearchState {
  pub fn new(case_sensitive: bool) -> Self {
    Self {
      case_sensitive,
      ..Self::default()
    }
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  /// Show the search box. Nothing is computed until a query arrives.
  pub fn open(&mut self) {
    self.open = true;
  }

  /// Hide the search box and forget the query.
  pub fn close(&mut self) {
    self.open = false;
    self.query.clear();
    self.matches.clear();
    self.current = 0;
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  pub fn case_sensitive(&self) -> bool {
    self.case_sensitive
  }

  /// Replace the query and rewind to the first match.
  pub fn set_query(&mut self, query: impl Into<String>, lines: &[Line]) {
    self.open = true;
    self.query = query.into();
    self.current = 0;
    self.refresh(lines);
  }

  pub fn set_case_sensitive(&mut self, case_sensitive: bool, lines: &[Line]) {
    self.case_sensitive = case_sensitive;
    self.refresh(lines);
  }

  /// Recompute matches against `lines`, keeping the cursor in range.
  pub fn refresh(&mut self, lines: &[Line]) {
    self.matches = find_matches(lines, &self.query, self.case_sensitive);
    self.current = self.current.min(self.matches.len().saturating_sub(1));
  }

  pub fn matches(&self) -> &[SearchMatch] {
    &self.matches
  }

  /// Index of the current match, if there are any matches.
  pub fn current_index(&self) -> Option<usize> {
    (!self.matches.is_empty()).then_some(self.current)
  }

  pub fn current_match(&self) -> Option<&SearchMatch> {
    self.matches.get(self.current)
  }

  /// Step forward, wrapping from the last match to the first.
  pub fn next_match(&mut self) -> Option<&SearchMatch> {
    if self.matches.is_empty() {
      return None;
    }
    self.current = (self.current + 1) % self.matches.len();
    self.current_match()
  }

  /// Step back, wrapping from the first match to the last.
  pub fn prev_match(&mut self) -> Option<&SearchMatch> {
    if self.matches.is_empty() {
      return None;
    }
    self.current = self
      .current
      .checked_sub(1)
      .unwrap_or(self.matches.len() - 1);
    self.current_match()
  }

  pub fn status(&self) -> SearchStatus {
    if self.query.trim().is_empty() {
      SearchStatus::Idle
    } else if self.matches.is_empty() {
      SearchStatus::NoMatch
    } else {
      SearchStatus::Position {
        current: self.current + 1,
        total:   self.matches.len(),
      }
    }
  }
}
