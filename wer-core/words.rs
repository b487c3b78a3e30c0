//! Word-granularity units of a single line of text.
//!
//! Boundaries come from ICU4X word segmentation with dictionary support, so
//! unspaced CJK runs break into words ("今天天氣" -> "今天", "天氣") while
//! space-delimited scripts break on UAX #29 rules. Unit positions are
//! reported as character indices, not byte indices.
//!
//! The dictionary joins some adverb + adjective pairs ("很好") that
//! annotators count as two words. [`words`] splits those back into single
//! characters using [`DEFAULT_SPLIT_WORDS`]; [`words_with`] takes a custom
//! list.

use icu_segmenter::{
  WordSegmenter,
  options::WordBreakInvariantOptions,
};

use crate::chars::str_is_blank;

/// Dictionary words that are scored one character at a time.
pub const DEFAULT_SPLIT_WORDS: &[&str] = &[
  "很好", "很多", "很少", "很大", "很小", "很快", "很慢", "很久", "很高", "很長", "不好", "太好",
];

/// One unit between two adjacent word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordUnit<'a> {
  pub text:  &'a str,
  /// Character index of the first character.
  pub start: usize,
  /// Character index one past the last character.
  pub end:   usize,
}

impl WordUnit<'_> {
  /// Whether this unit holds nothing but whitespace.
  pub fn is_blank(&self) -> bool {
    str_is_blank(self.text)
  }
}

/// Split `text` at every word boundary, whitespace runs included.
///
/// The units tile `text`: the first starts at 0, each starts where the
/// previous ended, and the last ends at `text.chars().count()`.
pub fn word_units(text: &str) -> Vec<WordUnit<'_>> {
  if text.is_empty() {
    return Vec::new();
  }

  let segmenter = WordSegmenter::new_auto(WordBreakInvariantOptions::default());
  let mut breakpoints: Vec<usize> = segmenter.segment_str(text).collect();
  if breakpoints.first().copied() != Some(0) {
    breakpoints.insert(0, 0);
  }
  if breakpoints.last().copied() != Some(text.len()) {
    breakpoints.push(text.len());
  }

  let mut units = Vec::with_capacity(breakpoints.len().saturating_sub(1));
  let mut char_pos = 0;
  for pair in breakpoints.windows(2) {
    let (from, to) = (pair[0], pair[1]);
    if from >= to {
      continue;
    }
    let slice = &text[from..to];
    let len = slice.chars().count();
    units.push(WordUnit {
      text:  slice,
      start: char_pos,
      end:   char_pos + len,
    });
    char_pos += len;
  }
  units
}

/// Like [`word_units`] but without whitespace-only units, and with
/// [`DEFAULT_SPLIT_WORDS`] broken into characters.
pub fn words(text: &str) -> impl Iterator<Item = WordUnit<'_>> {
  words_with(text, |word| DEFAULT_SPLIT_WORDS.contains(&word)).into_iter()
}

/// Non-blank units of `text`. Units for which `split` returns true become
/// one unit per character.
pub fn words_with<F>(text: &str, split: F) -> Vec<WordUnit<'_>>
where
  F: Fn(&str) -> bool,
{
  let mut out = Vec::new();
  for unit in word_units(text) {
    if unit.is_blank() {
      continue;
    }
    if !split(unit.text) {
      out.push(unit);
      continue;
    }
    for (offset, (byte, ch)) in unit.text.char_indices().enumerate() {
      let start = unit.start + offset;
      out.push(WordUnit {
        text: &unit.text[byte..byte + ch.len_utf8()],
        start,
        end: start + 1,
      });
    }
  }
  out
}
