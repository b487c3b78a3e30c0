//! Live annotation state and the operations a host drives it with.
//!
//! A [`Session`] owns the lines, the selection, the id generator and the
//! undo history. Every operation takes the current selection as implicit
//! context, pushes an undo snapshot right before it changes anything, and
//! leaves the search results in step with the new state.
//!
//! # Example
//!
//! ```
//! use wer_lib::session::Session;
//!
//! let mut session = Session::default();
//! session.set_input("今天天氣很好。");
//!
//! let line = session.lines()[0].id;
//! let first = session.lines()[0].segments[0].id;
//! session.toggle(line, first);
//!
//! let stats = session.stats();
//! assert_eq!((stats.total_count, stats.error_count), (4, 1));
//! ```

use crate::{
  batch::{
    self,
    BatchMergeOutcome,
  },
  command::{
    Command,
    Direction,
  },
  config::Config,
  editor::{
    BeforeAction,
    SegmentEditor,
    Side,
  },
  history::History,
  messages::{
    MessageCenter,
    Origin,
  },
  preview::{
    BoundaryPreview,
    EditMode,
    boundary_preview,
  },
  search::{
    SearchMatch,
    SearchState,
    SearchStatus,
  },
  segment::{
    IdGenerator,
    Line,
    LineId,
    Segment,
    SegmentId,
    Selection,
    line_index,
  },
  stats::Stats,
  storage::{
    SavedDocument,
    Storage,
  },
  tokenizer::{
    Tokenizer,
    reassign_ids,
  },
};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
  pub lines:     &'a [Line],
  pub selection: Selection,
  pub edit_mode: EditMode,
  pub preview:   BoundaryPreview,
  pub matches:   &'a [SearchMatch],
  pub current:   Option<usize>,
}

/// Snapshots into the history and reports snapshots it had to skip.
struct Tracked<'a> {
  history:  &'a mut History,
  messages: &'a mut MessageCenter,
}

impl BeforeAction for Tracked<'_> {
  fn before_action(&mut self, lines: &[Line], selection: &Selection) {
    if let Err(err) = self.history.save_state(lines, selection) {
      tracing::warn!(%err, "skipped undo snapshot");
      self
        .messages
        .warning(Origin::History, format!("this edit cannot be undone: {err}"));
    }
  }
}

#[derive(Debug)]
pub struct Session {
  lines:      Vec<Line>,
  input_text: String,
  selection:  Selection,
  edit_mode:  EditMode,
  ids:        IdGenerator,
  tokenizer:  Tokenizer,
  history:    History,
  search:     SearchState,
  messages:   MessageCenter,
}

impl Default for Session {
  fn default() -> Self {
    Self::new(&Config::default())
  }
}

impl Session {
  pub fn new(config: &Config) -> Self {
    Self {
      lines:      Vec::new(),
      input_text: String::new(),
      selection:  Selection::NONE,
      edit_mode:  EditMode::None,
      ids:        IdGenerator::new(),
      tokenizer:  config.tokenizer(),
      history:    History::with_capacity(config.history.capacity),
      search:     SearchState::new(config.search.case_sensitive),
      messages:   MessageCenter::default(),
    }
  }

  /// Replace the tokenizer used by future parses.
  pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
    self.tokenizer = tokenizer;
    self
  }

  pub fn lines(&self) -> &[Line] {
    &self.lines
  }

  pub fn input_text(&self) -> &str {
    &self.input_text
  }

  pub fn selection(&self) -> Selection {
    self.selection
  }

  pub fn selected_segment(&self) -> Option<&Segment> {
    self
      .selection
      .resolve(&self.lines)
      .map(|(_, segment)| segment)
  }

  pub fn edit_mode(&self) -> EditMode {
    self.edit_mode
  }

  pub fn history(&self) -> &History {
    &self.history
  }

  pub fn search(&self) -> &SearchState {
    &self.search
  }

  pub fn messages(&self) -> &MessageCenter {
    &self.messages
  }

  pub fn messages_mut(&mut self) -> &mut MessageCenter {
    &mut self.messages
  }

  pub fn view(&self) -> SessionView<'_> {
    SessionView {
      lines:     &self.lines,
      selection: self.selection,
      edit_mode: self.edit_mode,
      preview:   self.boundary_preview(),
      matches:   self.search.matches(),
      current:   self.search.current_index(),
    }
  }

  /// Selection for the segment at `(line, segment)` positions, if present.
  pub fn selection_at(&self, line: usize, segment: usize) -> Option<Selection> {
    let line = self.lines.get(line)?;
    let segment = line.segments.get(segment)?;
    Some(Selection::new(line.id, segment.id))
  }

  // Document lifecycle.

  /// Tokenize `text` from scratch, discarding every mark, the undo history
  /// and the selection. Hosts should confirm with the user first.
  pub fn set_input(&mut self, text: impl Into<String>) {
    let text = text.into();
    self.ids.reset();
    self.lines = self.tokenizer.tokenize(&text, &mut self.ids);
    self.input_text = text;
    self.reset_transient_state();
  }

  /// Drop the whole document.
  pub fn clear(&mut self) {
    self.lines.clear();
    self.input_text.clear();
    self.ids.reset();
    self.reset_transient_state();
  }

  pub fn reset_id_counters(&mut self) {
    self.ids.reset();
  }

  /// Renumber every line and segment from 1, keeping all other state.
  ///
  /// The selection follows its segment. Undo snapshots still refer to the
  /// old ids, so the history is cleared.
  pub fn reassign_ids(&mut self) {
    let position = self.selection.locate(&self.lines);
    self.ids.reset();
    reassign_ids(&mut self.lines, &mut self.ids);
    self.selection = position
      .and_then(|(line, segment)| self.selection_at(line, segment))
      .unwrap_or(Selection::NONE);
    self.history.clear();
    self.search.refresh(&self.lines);
  }

  fn reset_transient_state(&mut self) {
    self.history.clear();
    self.selection = Selection::NONE;
    self.edit_mode = EditMode::None;
    self.search.close();
  }

  // Selection.

  /// Select a segment. Unknown ids leave the selection unchanged.
  pub fn select(&mut self, line: LineId, segment: SegmentId) -> bool {
    let selection = Selection::new(line, segment);
    if selection.locate(&self.lines).is_none() {
      return false;
    }
    self.selection = selection;
    true
  }

  pub fn clear_selection(&mut self) {
    self.selection = Selection::NONE;
  }

  /// Move the selection to a logically adjacent segment.
  ///
  /// Left and right walk the reading order, crossing line ends. Up and down
  /// keep the segment index, clamped to the target line. With nothing
  /// selected the first segment is selected.
  pub fn select_adjacent(&mut self, direction: Direction) -> bool {
    let Some((line, index)) = self.selection.locate(&self.lines) else {
      return match self.first_position() {
        Some((line, segment)) => self.select_position(line, segment),
        None => false,
      };
    };

    let target = match direction {
      Direction::Left if index > 0 => Some((line, index - 1)),
      Direction::Left => self
        .nonempty_line_before(line)
        .map(|l| (l, self.lines[l].segments.len() - 1)),
      Direction::Right if index + 1 < self.lines[line].segments.len() => Some((line, index + 1)),
      Direction::Right => self.nonempty_line_after(line).map(|l| (l, 0)),
      Direction::Up => self
        .nonempty_line_before(line)
        .map(|l| (l, index.min(self.lines[l].segments.len() - 1))),
      Direction::Down => self
        .nonempty_line_after(line)
        .map(|l| (l, index.min(self.lines[l].segments.len() - 1))),
    };

    match target {
      Some((line, segment)) => self.select_position(line, segment),
      None => false,
    }
  }

  fn select_position(&mut self, line: usize, segment: usize) -> bool {
    match self.selection_at(line, segment) {
      Some(selection) => {
        self.selection = selection;
        true
      },
      None => false,
    }
  }

  fn first_position(&self) -> Option<(usize, usize)> {
    self
      .lines
      .iter()
      .position(|line| !line.segments.is_empty())
      .map(|line| (line, 0))
  }

  fn nonempty_line_before(&self, line: usize) -> Option<usize> {
    (0..line)
      .rev()
      .find(|&l| !self.lines[l].segments.is_empty())
  }

  fn nonempty_line_after(&self, line: usize) -> Option<usize> {
    (line + 1..self.lines.len()).find(|&l| !self.lines[l].segments.is_empty())
  }

  // Segment editing.

  fn edit<F>(&mut self, op: F) -> bool
  where
    F: FnOnce(&mut SegmentEditor<'_>, &mut Tracked<'_>) -> bool,
  {
    let applied = {
      let mut editor = SegmentEditor::new(&mut self.lines, &self.selection, &mut self.ids);
      let mut hook = Tracked {
        history:  &mut self.history,
        messages: &mut self.messages,
      };
      op(&mut editor, &mut hook)
    };
    if applied {
      self.search.refresh(&self.lines);
    }
    applied
  }

  pub fn expand_left(&mut self) -> bool {
    self.edit(|editor, hook| editor.expand_left(hook))
  }

  pub fn shrink_left(&mut self) -> bool {
    self.edit(|editor, hook| editor.shrink_left(hook))
  }

  pub fn shrink_right(&mut self) -> bool {
    self.edit(|editor, hook| editor.shrink_right(hook))
  }

  pub fn expand_right(&mut self) -> bool {
    self.edit(|editor, hook| editor.expand_right(hook))
  }

  pub fn toggle_delete(&mut self) -> bool {
    self.edit(|editor, hook| editor.toggle_delete(hook))
  }

  pub fn toggle_error(&mut self) -> bool {
    self.edit(|editor, hook| editor.toggle_error(hook))
  }

  pub fn split(&mut self, side: Side) -> bool {
    self.edit(|editor, hook| editor.split(side, hook))
  }

  pub fn merge_with_next(&mut self) -> bool {
    self.edit(|editor, hook| editor.merge_with_next(hook))
  }

  /// Click on a segment: select it and advance its mark.
  pub fn toggle(&mut self, line: LineId, segment: SegmentId) -> bool {
    self.select(line, segment) && self.toggle_error()
  }

  /// Commit new text for a line without re-tokenizing it.
  pub fn update_line_text(&mut self, line: LineId, text: impl Into<String>) -> bool {
    let text = text.into();
    let Some(index) = line_index(&self.lines, line) else {
      return false;
    };
    if self.lines[index].original_text == text {
      return false;
    }
    Tracked {
      history:  &mut self.history,
      messages: &mut self.messages,
    }
    .before_action(&self.lines, &self.selection);
    self.lines[index].original_text = text;
    true
  }

  /// Re-tokenize one line from its committed text. The line keeps its id;
  /// its segments and their marks are replaced. A line whose text yields
  /// no segments is removed.
  pub fn reparse_line(&mut self, line: LineId) -> bool {
    let Some(index) = line_index(&self.lines, line) else {
      return false;
    };
    Tracked {
      history:  &mut self.history,
      messages: &mut self.messages,
    }
    .before_action(&self.lines, &self.selection);
    let text = self.lines[index].original_text.clone();
    let reparsed = self.tokenizer.reparse_line(&text, Some(line), &mut self.ids);
    tracing::debug!(%line, segments = reparsed.segments.len(), "reparsed line");
    let selected = self.selection.line == Some(line);
    if reparsed.segments.is_empty() {
      self.lines.remove(index);
      if selected {
        self.selection = Selection::NONE;
      }
    } else {
      self.lines[index] = reparsed;
      if selected {
        self.selection = self.selection_at(index, 0).unwrap_or(Selection::NONE);
      }
    }
    self.search.refresh(&self.lines);
    true
  }

  /// Restore the state from before the last tracked edit.
  pub fn undo(&mut self) -> bool {
    let Some(state) = self.history.undo() else {
      return false;
    };
    self.lines = state.lines;
    self.selection = state.selection;
    self.search.refresh(&self.lines);
    true
  }

  /// Merge every plain `text` segment into its `side` neighbour.
  pub fn batch_merge(&mut self, text: &str, side: Side) -> BatchMergeOutcome {
    let mut hook = Tracked {
      history:  &mut self.history,
      messages: &mut self.messages,
    };
    let outcome = batch::batch_merge(&mut self.lines, &self.selection, text, side, &mut hook);
    if outcome.is_empty() {
      self
        .messages
        .info(Origin::BatchMerge, format!("no eligible matches for {text:?}"));
      return outcome;
    }

    if self.selection.locate(&self.lines).is_none() {
      self.selection = Selection::NONE;
    }
    self.search.refresh(&self.lines);
    self.messages.info(
      Origin::BatchMerge,
      format!("merged {} segment(s)", outcome.merged),
    );
    outcome
  }

  // Search.

  pub fn open_search(&mut self) {
    self.search.open();
  }

  pub fn close_search(&mut self) {
    self.search.close();
  }

  /// Set the query and select its first match.
  pub fn set_search_query(&mut self, query: impl Into<String>) -> SearchStatus {
    self.search.set_query(query, &self.lines);
    if let Some(found) = self.search.current_match().copied() {
      self.select_match(&found);
    }
    self.search.status()
  }

  pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
    self.search.set_case_sensitive(case_sensitive, &self.lines);
  }

  pub fn next_match(&mut self) -> Option<SearchMatch> {
    let found = self.search.next_match().copied()?;
    self.select_match(&found);
    Some(found)
  }

  pub fn prev_match(&mut self) -> Option<SearchMatch> {
    let found = self.search.prev_match().copied()?;
    self.select_match(&found);
    Some(found)
  }

  pub fn search_status(&self) -> SearchStatus {
    self.search.status()
  }

  fn select_match(&mut self, found: &SearchMatch) {
    self.selection = Selection::new(found.line, found.segment);
  }

  // Boundary preview.

  pub fn set_edit_mode(&mut self, mode: EditMode) {
    self.edit_mode = mode;
  }

  pub fn boundary_preview(&self) -> BoundaryPreview {
    boundary_preview(&self.lines, &self.selection, self.edit_mode)
  }

  // Statistics.

  pub fn stats(&self) -> Stats {
    Stats::for_lines(&self.lines)
  }

  pub fn line_stats(&self, line: LineId) -> Option<Stats> {
    line_index(&self.lines, line).map(|index| Stats::for_line(&self.lines[index]))
  }

  // Persistence.

  pub fn saved_document(&self) -> SavedDocument {
    SavedDocument {
      lines:      self.lines.clone(),
      input_text: self.input_text.clone(),
    }
  }

  /// Save through `storage`. A failure is logged and published as an error
  /// message; the live state is untouched either way.
  pub fn save(&mut self, storage: &dyn Storage) -> bool {
    match storage.save(&self.saved_document()) {
      Ok(()) => {
        self
          .messages
          .info(Origin::Save, format!("saved to {}", storage.name()));
        true
      },
      Err(err) => {
        tracing::warn!(%err, storage = %storage.name(), "failed to save session");
        self
          .messages
          .error(Origin::Save, format!("save failed: {err}"));
        false
      },
    }
  }

  /// Replace the document with the one in `storage`.
  ///
  /// Ids are renumbered so they cannot collide with ids this session
  /// hands out later. Returns `false`, leaving the session as it was, when
  /// nothing is stored or loading fails.
  pub fn load(&mut self, storage: &dyn Storage) -> bool {
    match storage.load() {
      Ok(Some(document)) => {
        self.lines = document.lines;
        self.input_text = document.input_text;
        self.ids.reset();
        reassign_ids(&mut self.lines, &mut self.ids);
        self.reset_transient_state();
        tracing::debug!(lines = self.lines.len(), storage = %storage.name(), "loaded session");
        true
      },
      Ok(None) => {
        self
          .messages
          .info(Origin::Load, format!("nothing saved in {}", storage.name()));
        false
      },
      Err(err) => {
        tracing::warn!(%err, storage = %storage.name(), "failed to load session");
        self
          .messages
          .error(Origin::Load, format!("load failed: {err}"));
        false
      },
    }
  }

  // Commands.

  /// Run one command. Returns whether it changed anything.
  pub fn execute(&mut self, command: Command) -> bool {
    match command {
      Command::Select { line, segment } => self.select(line, segment),
      Command::Toggle { line, segment } => self.toggle(line, segment),
      Command::ClearSelection => {
        let had = !self.selection.is_none();
        self.clear_selection();
        had
      },
      Command::Move(direction) => self.select_adjacent(direction),
      Command::ExpandLeft => self.expand_left(),
      Command::ShrinkLeft => self.shrink_left(),
      Command::ShrinkRight => self.shrink_right(),
      Command::ExpandRight => self.expand_right(),
      Command::ToggleDelete => self.toggle_delete(),
      Command::ToggleError => self.toggle_error(),
      Command::Split(side) => self.split(side),
      Command::MergeWithNext => self.merge_with_next(),
      Command::Undo => self.undo(),
      Command::SetEditMode(mode) => {
        let changed = self.edit_mode != mode;
        self.set_edit_mode(mode);
        changed
      },
      Command::OpenSearch => {
        self.open_search();
        true
      },
      Command::Search(query) => {
        self.set_search_query(query);
        true
      },
      Command::SetCaseSensitive(case_sensitive) => {
        self.set_case_sensitive(case_sensitive);
        true
      },
      Command::NextMatch => self.next_match().is_some(),
      Command::PrevMatch => self.prev_match().is_some(),
      Command::CloseSearch => {
        self.close_search();
        true
      },
      Command::BatchMerge { text, side } => !self.batch_merge(&text, side).is_empty(),
      Command::UpdateLineText { line, text } => self.update_line_text(line, text),
      Command::ReparseLine(line) => self.reparse_line(line),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::{
    MemoryStorage,
    NoStorage,
  };

  fn session(text: &str) -> Session {
    let mut session = Session::default();
    session.set_input(text);
    session
  }

  fn select(session: &mut Session, line: usize, segment: usize) {
    let selection = session.selection_at(line, segment).unwrap();
    assert!(session.select(selection.line.unwrap(), selection.segment.unwrap()));
  }

  fn texts(session: &Session, line: usize) -> Vec<String> {
    session.lines()[line]
      .segments
      .iter()
      .map(|s| s.text.clone())
      .collect()
  }

  #[test]
  fn edits_push_history_and_undo_restores() {
    let mut s = session("今天天氣很好。");
    select(&mut s, 0, 1);
    let before = s.lines().to_vec();

    assert!(s.expand_left());
    assert_eq!(s.history().len(), 1);
    assert!(s.undo());
    assert_eq!(s.lines(), before.as_slice());
    assert!(!s.undo());
  }

  #[test]
  fn failed_precondition_leaves_history_alone() {
    let mut s = session("今天天氣很好。");
    select(&mut s, 0, 0);
    assert!(!s.expand_left());
    select(&mut s, 0, 2);
    assert!(!s.split(Side::Left));
    assert!(!s.shrink_right());
    assert!(s.history().is_empty());

    s.clear_selection();
    assert!(!s.toggle_error());
    assert!(s.history().is_empty());
  }

  #[test]
  fn undo_restores_selection() {
    let mut s = session("今天天氣");
    select(&mut s, 0, 0);
    let selection = s.selection();
    s.split(Side::Left);
    s.select_adjacent(Direction::Right);
    assert_ne!(s.selection(), selection);
    assert!(s.undo());
    assert!(!s.undo());
    assert_eq!(s.selection(), selection);
    assert_eq!(texts(&s, 0), vec!["今天", "天氣"]);
  }

  #[test]
  fn set_input_resets_everything() {
    let mut s = session("今天");
    select(&mut s, 0, 0);
    s.toggle_error();
    s.set_edit_mode(EditMode::Left);
    s.set_input("好");
    assert!(s.history().is_empty());
    assert!(s.selection().is_none());
    assert_eq!(s.edit_mode(), EditMode::None);
    assert_eq!(s.lines()[0].id.to_string(), "line-1");
    assert_eq!(s.lines()[0].segments[0].id.to_string(), "seg-1");
  }

  #[test]
  fn adjacent_navigation_crosses_lines() {
    let mut s = session("a b c\nd e");
    assert!(s.select_adjacent(Direction::Right));
    assert_eq!(s.selected_segment().unwrap().text, "a");

    select(&mut s, 0, 2);
    assert!(s.select_adjacent(Direction::Right));
    assert_eq!(s.selected_segment().unwrap().text, "d");
    assert!(s.select_adjacent(Direction::Left));
    assert_eq!(s.selected_segment().unwrap().text, "c");

    assert!(s.select_adjacent(Direction::Down));
    assert_eq!(s.selected_segment().unwrap().text, "e");
    assert!(!s.select_adjacent(Direction::Down));
    assert!(s.select_adjacent(Direction::Up));
    assert_eq!(s.selected_segment().unwrap().text, "b");
  }

  #[test]
  fn select_rejects_unknown_ids() {
    let mut s = session("a b\nc");
    let line = s.lines()[1].id;
    let foreign = s.lines()[0].segments[0].id;
    assert!(!s.select(line, foreign));
    assert!(s.selection().is_none());
  }

  #[test]
  fn toggle_is_tracked_click() {
    let mut s = session("今天天氣很好。");
    let line = s.lines()[0].id;
    let segment = s.lines()[0].segments[0].id;
    assert!(s.toggle(line, segment));
    assert!(s.lines()[0].segments[0].is_error);
    assert_eq!(s.selection(), Selection::new(line, segment));
    assert_eq!(s.history().len(), 1);
  }

  #[test]
  fn reparse_line_keeps_id_and_resets_marks() {
    let mut s = session("今天天氣\n很好");
    select(&mut s, 0, 0);
    s.toggle_error();
    let line = s.lines()[0].id;

    assert!(s.update_line_text(line, "今天下雨"));
    assert!(!s.update_line_text(line, "今天下雨"));
    assert_eq!(texts(&s, 0), vec!["今天", "天氣"]);

    assert!(s.reparse_line(line));
    assert_eq!(s.lines()[0].id, line);
    assert_eq!(s.lines()[0].original_text, "今天下雨");
    assert!(s.lines()[0].segments.iter().all(|seg| !seg.is_error));
    assert_eq!(s.selection().segment, Some(s.lines()[0].segments[0].id));

    s.undo();
    assert_eq!(texts(&s, 0), vec!["今天", "天氣"]);
    assert_eq!(s.lines()[0].original_text, "今天下雨");
  }

  #[test]
  fn set_input_forgets_search() {
    let mut s = session("a b");
    s.set_search_query("a");
    s.set_input("a a a");
    assert_eq!(s.search().query(), "");
    assert!(!s.search().is_open());
    assert!(s.search().matches().is_empty());
  }

  #[test]
  fn reparse_drops_line_left_blank() {
    let mut s = session("a\nb");
    select(&mut s, 0, 0);
    let (first, second) = (s.lines()[0].id, s.lines()[1].id);

    assert!(s.update_line_text(first, "   "));
    assert!(s.reparse_line(first));
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.lines()[0].id, second);
    assert!(s.lines().iter().all(|line| !line.segments.is_empty()));
    assert!(s.selection().is_none());

    assert!(s.undo());
    assert_eq!(s.lines().len(), 2);
    assert_eq!(s.lines()[0].id, first);
  }

  #[test]
  fn search_navigation_selects_matches() {
    let mut s = session("ab b\nb");
    let status = s.set_search_query("b");
    assert_eq!(status.to_string(), "1/3");
    assert_eq!(s.selected_segment().unwrap().text, "ab");

    let found = s.prev_match().unwrap();
    assert_eq!(found.line, s.lines()[1].id);
    assert_eq!(s.selection().line, Some(s.lines()[1].id));
    assert_eq!(s.search_status().to_string(), "3/3");
  }

  #[test]
  fn search_follows_edits() {
    let mut s = session("aa aa");
    s.set_search_query("aa");
    assert_eq!(s.search().matches().len(), 2);
    s.prev_match();
    s.shrink_right();
    assert_eq!(s.search().matches().len(), 1);
    assert_eq!(s.search_status().to_string(), "1/1");
  }

  #[test]
  fn batch_merge_reports_and_repairs_selection() {
    let mut s = session("a x b x");
    select(&mut s, 0, 3);
    let outcome = s.batch_merge("x", Side::Left);
    assert_eq!(outcome.merged, 2);
    assert!(s.selection().is_none());
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.messages().current().unwrap().text, "merged 2 segment(s)");

    let outcome = s.batch_merge("x", Side::Left);
    assert!(outcome.is_empty());
    assert_eq!(s.history().len(), 1);
    assert!(s.messages().current().unwrap().text.contains("no eligible"));

    s.undo();
    assert_eq!(texts(&s, 0), vec!["a", "x", "b", "x"]);
  }

  #[test]
  fn preview_follows_edit_mode() {
    let mut s = session("今天天氣");
    select(&mut s, 0, 1);
    assert!(s.boundary_preview().is_empty());
    s.set_edit_mode(EditMode::Left);
    let view = s.view();
    assert_eq!(view.preview.neighbor.map(|h| h.ch), Some('天'));
    assert_eq!(view.edit_mode, EditMode::Left);
  }

  #[test]
  fn save_and_load_renumber_ids() {
    let storage = MemoryStorage::new();
    let mut s = session("今天天氣很好。\n我們");
    select(&mut s, 0, 0);
    s.toggle_error();
    assert!(s.save(&storage));

    let mut restored = Session::default();
    // Burn some ids so loaded ones would collide without renumbering.
    restored.set_input("x y z");
    assert!(restored.load(&storage));
    assert_eq!(restored.input_text(), "今天天氣很好。\n我們");
    assert!(restored.lines()[0].segments[0].is_error);
    assert_eq!(restored.lines()[1].segments[0].id.to_string(), "seg-6");
    assert!(restored.history().is_empty());

    restored.reparse_line(restored.lines()[1].id);
    let ids: std::collections::HashSet<_> = restored
      .lines()
      .iter()
      .flat_map(|line| line.segments.iter().map(|seg| seg.id))
      .collect();
    let count: usize = restored.lines().iter().map(|l| l.segments.len()).sum();
    assert_eq!(ids.len(), count);
  }

  #[test]
  fn storage_failures_are_reported() {
    let mut s = session("今天");
    assert!(!s.save(&NoStorage));
    assert_eq!(
      s.messages().current().map(|m| m.level),
      Some(crate::messages::MessageLevel::Error)
    );
    assert!(!s.load(&NoStorage));
    assert_eq!(texts(&s, 0), vec!["今天"]);
  }

  #[test]
  fn skipped_snapshot_is_reported() {
    let mut ids = IdGenerator::new();
    let line = Line {
      id:            ids.next_line(),
      original_text: "ab".into(),
      segments:      vec![
        Segment::new(ids.next_segment(), "", 0),
        Segment::new(ids.next_segment(), "ab", 0),
      ],
    };
    let storage = MemoryStorage::new();
    storage
      .save(&SavedDocument {
        lines:      vec![line],
        input_text: "ab".into(),
      })
      .unwrap();

    let mut s = Session::default();
    assert!(s.load(&storage));
    select(&mut s, 0, 1);
    assert!(s.toggle_error());
    assert!(s.lines()[0].segments[1].is_error);
    assert!(s.history().is_empty());
    let message = s.messages().current().unwrap();
    assert_eq!(message.level, crate::messages::MessageLevel::Warning);
    assert_eq!(message.origin, crate::messages::Origin::History);
  }

  #[test]
  fn reassign_ids_keeps_selection_position() {
    let mut s = session("a b\nc d");
    select(&mut s, 1, 1);
    s.toggle_error();
    s.reassign_ids();
    assert_eq!(s.selected_segment().unwrap().text, "d");
    assert!(s.selected_segment().unwrap().is_error);
    assert!(s.history().is_empty());
  }

  #[test]
  fn execute_dispatches_commands() {
    let mut s = session("今天天氣很好");
    let line = s.lines()[0].id;
    let segment = s.lines()[0].segments[2].id;
    assert!(s.execute(Command::Select { line, segment }));
    assert!(s.execute(Command::ExpandRight));
    assert_eq!(texts(&s, 0), vec!["今天", "天氣", "很好"]);
    assert!(!s.execute(Command::ExpandRight));
    assert!(s.execute(Command::Split(Side::Right)));
    assert!(s.execute(Command::Undo));
    assert!(s.execute(Command::SetEditMode(EditMode::Right)));
    assert!(!s.execute(Command::SetEditMode(EditMode::Right)));
    assert!(s.execute(Command::BatchMerge {
      text: "很好".into(),
      side: Side::Left,
    }));
    assert_eq!(texts(&s, 0), vec!["今天", "天氣很好"]);
  }
}
