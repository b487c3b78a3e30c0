//! Merge every plain occurrence of a token into its neighbour.
//!
//! Useful after tokenization splits off particles or suffixes that should
//! belong to an adjacent word. Only unmarked segments are eligible: a
//! segment that is excluded or marked as an error is left alone even when
//! its text matches.

use crate::{
  editor::{
    BeforeAction,
    Side,
  },
  segment::{
    Line,
    Selection,
  },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchMergeOutcome {
  pub merged: usize,
}

impl BatchMergeOutcome {
  /// True when nothing was eligible.
  pub fn is_empty(&self) -> bool {
    self.merged == 0
  }
}

/// Merge each eligible segment whose text equals `target` into its `side`
/// neighbour.
///
/// Lines are scanned back to front so removals do not disturb the indices
/// still to visit. `hook` runs once, before the first merge, and not at all
/// when nothing merges.
pub fn batch_merge<H: BeforeAction>(
  lines: &mut [Line],
  selection: &Selection,
  target: &str,
  side: Side,
  hook: &mut H,
) -> BatchMergeOutcome {
  let mut outcome = BatchMergeOutcome::default();
  if target.is_empty() {
    return outcome;
  }

  for line in 0..lines.len() {
    for index in (0..lines[line].segments.len()).rev() {
      let segments = &lines[line].segments;
      if index >= segments.len() {
        continue;
      }
      let segment = &segments[index];
      let eligible = segment.text == target && !segment.is_deleted && !segment.is_error;
      let has_neighbor = match side {
        Side::Left => index > 0,
        Side::Right => index + 1 < segments.len(),
      };
      if !eligible || !has_neighbor {
        continue;
      }

      if outcome.is_empty() {
        hook.before_action(lines, selection);
      }

      let segments = &mut lines[line].segments;
      let merged = segments.remove(index);
      match side {
        Side::Left => {
          let prev = &mut segments[index - 1];
          prev.text.push_str(&merged.text);
          prev.end = merged.end;
        },
        Side::Right => {
          let next = &mut segments[index];
          next.text.insert_str(0, &merged.text);
          next.start = merged.start;
        },
      }
      outcome.merged += 1;
    }
  }

  tracing::debug!(target_text = target, ?side, merged = outcome.merged, "batch merge");
  outcome
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    editor::Untracked,
    segment::IdGenerator,
    tokenizer::Tokenizer,
  };

  fn lines(text: &str) -> Vec<Line> {
    Tokenizer::new().tokenize(text, &mut IdGenerator::new())
  }

  fn texts(line: &Line) -> Vec<&str> {
    line.segments.iter().map(|s| s.text.as_str()).collect()
  }

  #[test]
  fn merges_left_across_lines() {
    let mut lines = lines("a x b x\nx c x");
    let outcome = batch_merge(&mut lines, &Selection::NONE, "x", Side::Left, &mut Untracked);
    assert_eq!(outcome.merged, 3);
    assert_eq!(texts(&lines[0]), vec!["ax", "bx"]);
    // Leading "x" has no left neighbour.
    assert_eq!(texts(&lines[1]), vec!["x", "cx"]);
    assert_eq!((lines[0].segments[0].start, lines[0].segments[0].end), (0, 3));
  }

  #[test]
  fn merges_right_and_moves_start() {
    let mut lines = lines("x a x");
    let outcome = batch_merge(&mut lines, &Selection::NONE, "x", Side::Right, &mut Untracked);
    assert_eq!(outcome.merged, 1);
    assert_eq!(texts(&lines[0]), vec!["xa", "x"]);
    assert_eq!((lines[0].segments[0].start, lines[0].segments[0].end), (0, 3));
  }

  #[test]
  fn marked_segments_are_never_merged() {
    let mut lines = lines("a x b x");
    lines[0].segments[1].is_error = true;
    lines[0].segments[3].is_deleted = true;
    let outcome = batch_merge(&mut lines, &Selection::NONE, "x", Side::Left, &mut Untracked);
    assert!(outcome.is_empty());
    assert_eq!(lines[0].segments.len(), 4);
  }

  #[test]
  fn hook_runs_once_per_batch() {
    let mut lines = lines("a x b x c x");
    let mut calls = 0;
    let mut seen_segments = 0;
    let outcome = batch_merge(
      &mut lines,
      &Selection::NONE,
      "x",
      Side::Left,
      &mut |lines: &[Line], _: &Selection| {
        calls += 1;
        seen_segments = lines[0].segments.len();
      },
    );
    assert_eq!(outcome.merged, 3);
    assert_eq!(calls, 1);
    // The hook saw the state before any merge.
    assert_eq!(seen_segments, 6);
  }

  #[test]
  fn no_match_skips_hook() {
    let mut lines = lines("a b");
    let mut calls = 0;
    let outcome = batch_merge(
      &mut lines,
      &Selection::NONE,
      "zz",
      Side::Right,
      &mut |_: &[Line], _: &Selection| calls += 1,
    );
    assert!(outcome.is_empty());
    assert_eq!(calls, 0);
  }
}
