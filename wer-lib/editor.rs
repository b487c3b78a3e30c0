//! Boundary editing on the selected segment.
//!
//! Every operation works on the segment named by the [`Selection`] and its
//! neighbours on the same line. Each returns `true` when it changed
//! anything. An operation whose precondition fails (nothing selected, a
//! segment too short to give up a character, no neighbour to take one from)
//! returns `false`, leaves the lines untouched and does not call the
//! [`BeforeAction`] hook.
//!
//! Character transfers shift offsets by one on each side of the moved
//! character, so any whitespace gap the tokenizer left between two segments
//! survives the edit.

use serde::{
  Deserialize,
  Serialize,
};

use crate::segment::{
  IdGenerator,
  Line,
  Segment,
  Selection,
};

/// Called exactly once before an operation mutates the lines.
///
/// Implementations see the state as it is just before the change.
pub trait BeforeAction {
  fn before_action(&mut self, lines: &[Line], selection: &Selection);
}

impl<F: FnMut(&[Line], &Selection)> BeforeAction for F {
  fn before_action(&mut self, lines: &[Line], selection: &Selection) {
    (*self)(lines, selection)
  }
}

/// A hook that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Untracked;

impl BeforeAction for Untracked {
  fn before_action(&mut self, _lines: &[Line], _selection: &Selection) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
  Left,
  Right,
}

pub struct SegmentEditor<'a> {
  lines:     &'a mut [Line],
  selection: &'a Selection,
  ids:       &'a mut IdGenerator,
}

impl<'a> SegmentEditor<'a> {
  pub fn new(lines: &'a mut [Line], selection: &'a Selection, ids: &'a mut IdGenerator) -> Self {
    Self {
      lines,
      selection,
      ids,
    }
  }

  fn locate(&self) -> Option<(usize, usize)> {
    self.selection.locate(self.lines)
  }

  /// Pull the previous segment's last character onto the front of the
  /// selected one. The previous segment is dropped once it runs dry.
  pub fn expand_left<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    if index == 0 {
      return false;
    }
    let Some(ch) = self.lines[line].segments[index - 1].text.chars().next_back() else {
      return false;
    };

    hook.before_action(self.lines, self.selection);
    let segments = &mut self.lines[line].segments;
    let prev = &mut segments[index - 1];
    prev.text.pop();
    prev.end = prev.end.saturating_sub(1);
    let prev_empty = prev.text.is_empty();

    let current = &mut segments[index];
    current.text.insert(0, ch);
    current.start = current.start.saturating_sub(1);

    if prev_empty {
      segments.remove(index - 1);
    }
    tracing::trace!(%ch, "expanded segment left");
    true
  }

  /// Hand the selected segment's first character to the previous segment,
  /// or to a new one-character segment when it is first on the line.
  pub fn shrink_left<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    let current = &self.lines[line].segments[index];
    if current.len() <= 1 {
      return false;
    }
    let Some(ch) = current.text.chars().next() else {
      return false;
    };

    hook.before_action(self.lines, self.selection);
    let segments = &mut self.lines[line].segments;
    let current = &mut segments[index];
    current.text.drain(..ch.len_utf8());
    let boundary = current.start;
    current.start += 1;

    if index > 0 {
      let prev = &mut segments[index - 1];
      prev.text.push(ch);
      prev.end += 1;
    } else {
      let segment = Segment::new(self.ids.next_segment(), ch, boundary);
      segments.insert(index, segment);
    }
    tracing::trace!(%ch, "shrank segment left");
    true
  }

  /// Hand the selected segment's last character to the next segment, or to
  /// a new one-character segment when it is last on the line.
  pub fn shrink_right<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    let current = &self.lines[line].segments[index];
    if current.len() <= 1 {
      return false;
    }
    let Some(ch) = current.text.chars().next_back() else {
      return false;
    };

    hook.before_action(self.lines, self.selection);
    let segments = &mut self.lines[line].segments;
    let current = &mut segments[index];
    current.text.pop();
    current.end = current.end.saturating_sub(1);
    let boundary = current.end;

    if let Some(next) = segments.get_mut(index + 1) {
      next.text.insert(0, ch);
      next.start = next.start.saturating_sub(1);
    } else {
      let segment = Segment::new(self.ids.next_segment(), ch, boundary);
      segments.push(segment);
    }
    tracing::trace!(%ch, "shrank segment right");
    true
  }

  /// Pull the next segment's first character onto the end of the selected
  /// one. The next segment is dropped once it runs dry.
  pub fn expand_right<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    let Some(ch) = self.lines[line]
      .segments
      .get(index + 1)
      .and_then(|next| next.text.chars().next())
    else {
      return false;
    };

    hook.before_action(self.lines, self.selection);
    let segments = &mut self.lines[line].segments;
    let next = &mut segments[index + 1];
    next.text.drain(..ch.len_utf8());
    next.start += 1;
    let next_empty = next.text.is_empty();

    let current = &mut segments[index];
    current.text.push(ch);
    current.end += 1;

    if next_empty {
      segments.remove(index + 1);
    }
    tracing::trace!(%ch, "expanded segment right");
    true
  }

  /// Flip the excluded flag. Excluding a segment clears its error mark so
  /// the two flags are never set together. Un-excluding does not bring the
  /// error mark back.
  pub fn toggle_delete<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    self.with_selected(hook, |segment| {
      segment.is_deleted = !segment.is_deleted;
      if segment.is_deleted {
        segment.is_error = false;
      }
    })
  }

  /// Advance normal -> error -> excluded -> normal.
  pub fn toggle_error<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    self.with_selected(hook, Segment::cycle_mark)
  }

  /// Break one boundary character off into its own segment carrying the
  /// same marks. The selection stays on the shortened original.
  pub fn split<H: BeforeAction>(&mut self, side: Side, hook: &mut H) -> bool {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    let current = &self.lines[line].segments[index];
    if current.len() < 2 {
      return false;
    }
    let ch = match side {
      Side::Left => current.text.chars().next(),
      Side::Right => current.text.chars().next_back(),
    };
    let Some(ch) = ch else {
      return false;
    };

    hook.before_action(self.lines, self.selection);
    let id = self.ids.next_segment();
    let segments = &mut self.lines[line].segments;
    let current = &mut segments[index];
    match side {
      Side::Left => {
        current.text.drain(..ch.len_utf8());
        let piece = Segment::new(id, ch, current.start).with_marks_of(current);
        current.start += 1;
        segments.insert(index, piece);
      },
      Side::Right => {
        current.text.pop();
        current.end = current.end.saturating_sub(1);
        let piece = Segment::new(id, ch, current.end).with_marks_of(current);
        segments.insert(index + 1, piece);
      },
    }
    tracing::trace!(%ch, ?side, "split segment");
    true
  }

  /// Absorb the next segment. The result is an error if either half was
  /// and excluded only if both were.
  pub fn merge_with_next<H: BeforeAction>(&mut self, hook: &mut H) -> bool {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    if index + 1 >= self.lines[line].segments.len() {
      return false;
    }

    hook.before_action(self.lines, self.selection);
    let segments = &mut self.lines[line].segments;
    let next = segments.remove(index + 1);
    let current = &mut segments[index];
    current.text.push_str(&next.text);
    current.end = next.end;
    current.is_error |= next.is_error;
    current.is_deleted &= next.is_deleted;
    tracing::trace!(merged = %next.id, into = %current.id, "merged segments");
    true
  }

  fn with_selected<H, F>(&mut self, hook: &mut H, apply: F) -> bool
  where
    H: BeforeAction,
    F: FnOnce(&mut Segment),
  {
    let Some((line, index)) = self.locate() else {
      return false;
    };
    hook.before_action(self.lines, self.selection);
    apply(&mut self.lines[line].segments[index]);
    true
  }
}
