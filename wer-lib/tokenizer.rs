//! Raw text to lines of segments.
//!
//! Input is split into lines, blank lines are dropped, and each remaining
//! line is broken at word boundaries. Whitespace-only units are discarded;
//! every other unit becomes a [`Segment`] whose offsets are its character
//! position in the line. Units that are pure punctuation start out excluded.
//!
//! The tokenizer never resets the [`IdGenerator`] it is handed. Callers that
//! want a fresh id space call [`IdGenerator::reset`] first.

use std::{
  fmt,
  sync::Arc,
};

use serde::{
  Deserialize,
  Serialize,
};
use wer_core::{
  chars::{
    char_is_common_punctuation,
    char_is_punctuation,
    str_is_blank,
  },
  words::{
    DEFAULT_SPLIT_WORDS,
    words_with,
  },
};

use crate::segment::{
  IdGenerator,
  Line,
  LineId,
  Segment,
};

/// Which tokens start out excluded.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Punctuation {
  /// Common CJK and ASCII punctuation marks.
  #[default]
  Default,
  /// Anything Unicode classifies as punctuation or symbol.
  Unicode,
  /// Exactly the listed characters.
  Chars(String),
}

impl Punctuation {
  pub fn matches_char(&self, ch: char) -> bool {
    match self {
      Punctuation::Default => char_is_common_punctuation(ch),
      Punctuation::Unicode => char_is_punctuation(ch),
      Punctuation::Chars(chars) => chars.contains(ch),
    }
  }

  /// A token is punctuation when every one of its characters is.
  pub fn matches_token(&self, token: &str) -> bool {
    !token.is_empty() && token.chars().all(|ch| self.matches_char(ch))
  }
}

type ExcludePredicate = dyn Fn(&str) -> bool + Send + Sync;

#[derive(Clone)]
pub struct Tokenizer {
  exclude:     Arc<ExcludePredicate>,
  /// Dictionary words broken into single characters.
  split_words: Arc<[String]>,
}

impl fmt::Debug for Tokenizer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Tokenizer").finish_non_exhaustive()
  }
}

impl Default for Tokenizer {
  fn default() -> Self {
    Self::with_punctuation(Punctuation::Default)
  }
}

impl Tokenizer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_punctuation(punctuation: Punctuation) -> Self {
    Self::with_predicate(move |token| punctuation.matches_token(token))
  }

  /// Use an arbitrary predicate to decide which tokens start excluded.
  pub fn with_predicate<F>(predicate: F) -> Self
  where
    F: Fn(&str) -> bool + Send + Sync + 'static,
  {
    Self {
      exclude:     Arc::new(predicate),
      split_words: default_split_words(),
    }
  }

  /// Replace the list of words tokenized one character at a time.
  pub fn with_split_words<I, S>(mut self, words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.split_words = words.into_iter().map(Into::into).collect();
    self
  }

  pub fn splits(&self, word: &str) -> bool {
    self.split_words.iter().any(|split| split == word)
  }

  pub fn is_excluded(&self, token: &str) -> bool {
    (self.exclude)(token)
  }

  /// Tokenize multi-line input. Blank lines produce no [`Line`] and consume
  /// no id.
  pub fn tokenize(&self, raw: &str, ids: &mut IdGenerator) -> Vec<Line> {
    let lines: Vec<Line> = raw
      .lines()
      .filter(|text| !str_is_blank(text))
      .map(|text| {
        let id = ids.next_line();
        self.tokenize_line(text, id, ids)
      })
      .collect();
    tracing::debug!(
      lines = lines.len(),
      segments = lines.iter().map(|line| line.segments.len()).sum::<usize>(),
      "tokenized input"
    );
    lines
  }

  /// Tokenize a single line, keeping `existing` as its id when given.
  pub fn reparse_line(&self, text: &str, existing: Option<LineId>, ids: &mut IdGenerator) -> Line {
    let id = existing.unwrap_or_else(|| ids.next_line());
    self.tokenize_line(text, id, ids)
  }

  fn tokenize_line(&self, text: &str, id: LineId, ids: &mut IdGenerator) -> Line {
    let segments = words_with(text, |word| self.splits(word))
      .into_iter()
      .map(|unit| {
        let mut segment = Segment::new(ids.next_segment(), unit.text, unit.start);
        segment.is_deleted = self.is_excluded(unit.text);
        segment
      })
      .collect();
    Line {
      id,
      original_text: text.to_string(),
      segments,
    }
  }
}

fn default_split_words() -> Arc<[String]> {
  DEFAULT_SPLIT_WORDS.iter().map(|word| word.to_string()).collect()
}

/// Give every line and segment a fresh id from `ids`, in document order.
///
/// Text, marks, offsets and ordering are untouched.
pub fn reassign_ids(lines: &mut [Line], ids: &mut IdGenerator) {
  for line in lines {
    line.id = ids.next_line();
    for segment in &mut line.segments {
      segment.id = ids.next_segment();
    }
  }
}
