//! Which characters a boundary edit would move.
//!
//! While a boundary modifier is held the host shows the character that the
//! next arrow key would shift. In [`EditMode::Left`] that is the selected
//! segment's first character (moved by shrink-left) and the previous
//! segment's last character (moved by expand-left); [`EditMode::Right`]
//! mirrors this against the next segment.

use serde::{
  Deserialize,
  Serialize,
};

use crate::segment::{
  Line,
  SegmentId,
  Selection,
};

/// Which boundary-adjustment set is engaged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
  #[default]
  None,
  Left,
  Right,
}

/// Where in its segment a highlighted character sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharPosition {
  Start,
  End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharHighlight {
  pub segment:  SegmentId,
  pub ch:       char,
  pub position: CharPosition,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPreview {
  /// Character of the selected segment at the engaged boundary.
  pub current:  Option<CharHighlight>,
  /// Character of the neighbour across that boundary.
  pub neighbor: Option<CharHighlight>,
}

impl BoundaryPreview {
  pub fn is_empty(&self) -> bool {
    self.current.is_none() && self.neighbor.is_none()
  }
}

/// Derive the preview for `selection` under `mode`.
///
/// Empty when the mode is [`EditMode::None`], nothing is selected, the
/// selected segment has no text, or there is no neighbour on the engaged
/// side.
pub fn boundary_preview(lines: &[Line], selection: &Selection, mode: EditMode) -> BoundaryPreview {
  let Some((line, index)) = selection.locate(lines) else {
    return BoundaryPreview::default();
  };
  let segments = &lines[line].segments;
  let current = &segments[index];
  if current.text.is_empty() {
    return BoundaryPreview::default();
  }

  let (neighbor, current_ch, current_pos, neighbor_ch, neighbor_pos) = match mode {
    EditMode::None => return BoundaryPreview::default(),
    EditMode::Left => {
      let Some(prev) = index.checked_sub(1).map(|i| &segments[i]) else {
        return BoundaryPreview::default();
      };
      (
        prev,
        current.text.chars().next(),
        CharPosition::Start,
        prev.text.chars().next_back(),
        CharPosition::End,
      )
    },
    EditMode::Right => {
      let Some(next) = segments.get(index + 1) else {
        return BoundaryPreview::default();
      };
      (
        next,
        current.text.chars().next_back(),
        CharPosition::End,
        next.text.chars().next(),
        CharPosition::Start,
      )
    },
  };

  BoundaryPreview {
    current:  current_ch.map(|ch| CharHighlight {
      segment: current.id,
      ch,
      position: current_pos,
    }),
    neighbor: neighbor_ch.map(|ch| CharHighlight {
      segment: neighbor.id,
      ch,
      position: neighbor_pos,
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    segment::IdGenerator,
    tokenizer::Tokenizer,
  };

  fn setup() -> (Vec<Line>, Selection) {
    let lines = Tokenizer::new().tokenize("今天天氣很好", &mut IdGenerator::new());
    let selection = Selection::new(lines[0].id, lines[0].segments[1].id);
    (lines, selection)
  }

  #[test]
  fn left_mode_previews_both_sides() {
    let (lines, selection) = setup();
    let preview = boundary_preview(&lines, &selection, EditMode::Left);
    let current = preview.current.unwrap();
    let neighbor = preview.neighbor.unwrap();
    assert_eq!((current.ch, current.position), ('天', CharPosition::Start));
    assert_eq!(current.segment, lines[0].segments[1].id);
    assert_eq!((neighbor.ch, neighbor.position), ('天', CharPosition::End));
    assert_eq!(neighbor.segment, lines[0].segments[0].id);
  }

  #[test]
  fn right_mode_previews_next() {
    let (lines, selection) = setup();
    let preview = boundary_preview(&lines, &selection, EditMode::Right);
    assert_eq!(preview.current.map(|h| h.ch), Some('氣'));
    assert_eq!(preview.neighbor.map(|h| (h.ch, h.position)), Some(('很', CharPosition::Start)));
  }

  #[test]
  fn no_neighbor_or_mode_is_empty() {
    let (lines, _) = setup();
    let first = Selection::new(lines[0].id, lines[0].segments[0].id);
    assert!(boundary_preview(&lines, &first, EditMode::Left).is_empty());
    let last = Selection::new(lines[0].id, lines[0].segments[3].id);
    assert!(boundary_preview(&lines, &last, EditMode::Right).is_empty());
    assert!(boundary_preview(&lines, &first, EditMode::None).is_empty());
    assert!(boundary_preview(&lines, &Selection::NONE, EditMode::Left).is_empty());
  }

  #[test]
  fn empty_current_is_empty() {
    let (mut lines, selection) = setup();
    lines[0].segments[1].text.clear();
    assert!(boundary_preview(&lines, &selection, EditMode::Left).is_empty());
  }
}
