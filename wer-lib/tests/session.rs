//! End-to-end tests driving a session the way a host would.

use wer_lib::{
  command::{
    Command,
    Direction,
  },
  config::Config,
  editor::Side,
  preview::{
    CharPosition,
    EditMode,
  },
  search::SearchStatus,
  session::Session,
  storage::MemoryStorage,
};

fn session(text: &str) -> Session {
  let mut session = Session::default();
  session.set_input(text);
  session
}

fn texts(session: &Session, line: usize) -> Vec<&str> {
  session.lines()[line]
    .segments
    .iter()
    .map(|s| s.text.as_str())
    .collect()
}

fn click(session: &mut Session, line: usize, segment: usize) {
  let target = session.selection_at(line, segment).expect("segment exists");
  let (line, segment) = (target.line.unwrap(), target.segment.unwrap());
  assert!(session.execute(Command::Toggle { line, segment }));
}

#[test]
fn test_annotate_and_count() {
  let mut s = session("今天天氣很好。");
  assert_eq!(texts(&s, 0), vec!["今天", "天氣", "很", "好", "。"]);
  let excluded: Vec<bool> = s.lines()[0].segments.iter().map(|seg| seg.is_deleted).collect();
  assert_eq!(excluded, vec![false, false, false, false, true]);

  click(&mut s, 0, 0);
  assert!(s.lines()[0].segments[0].is_error);

  let stats = s.stats();
  assert_eq!(stats.total_count, 4);
  assert_eq!(stats.error_count, 1);
  assert_eq!(s.line_stats(s.lines()[0].id), Some(stats));
  assert!((stats.wer() - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_merge_carries_error_mark() {
  let mut s = session("今天天氣很好。");
  click(&mut s, 0, 1);
  s.execute(Command::Move(Direction::Left));
  assert_eq!(s.selected_segment().map(|seg| seg.text.as_str()), Some("今天"));

  assert!(s.execute(Command::MergeWithNext));
  let merged = &s.lines()[0].segments[0];
  assert_eq!(merged.text, "今天天氣");
  assert!(merged.is_error);
  assert!(!merged.is_deleted);
  assert_eq!((merged.start, merged.end), (0, 4));
}

#[test]
fn test_undo_walks_back_through_edits() {
  let mut s = session("今天天氣很好。");
  let original = s.lines().to_vec();
  let line = s.lines()[0].id;
  let segment = s.lines()[0].segments[1].id;
  s.execute(Command::Select { line, segment });

  let edits = [
    Command::ExpandLeft,
    Command::ShrinkRight,
    Command::ToggleError,
    Command::Split(Side::Left),
    Command::ToggleDelete,
  ];
  for edit in edits {
    assert!(s.execute(edit));
  }
  assert_eq!(s.history().len(), 5);

  while s.execute(Command::Undo) {}
  assert_eq!(s.lines(), original.as_slice());
  assert_eq!(s.selection().segment, Some(segment));
}

#[test]
fn test_history_keeps_fifty_snapshots() {
  let mut s = session("今天天氣很好。");
  click(&mut s, 0, 0);
  for _ in 1..60 {
    s.toggle_error();
  }
  assert_eq!(s.history().len(), 50);

  let mut undone = 0;
  while s.undo() {
    undone += 1;
  }
  assert_eq!(undone, 50);
  // The ten oldest snapshots were evicted, so ten toggles stay applied.
  assert!(s.lines()[0].segments[0].is_error);
}

#[test]
fn test_history_capacity_from_config() {
  let config = Config::from_toml("[history]\ncapacity = 3").unwrap();
  let mut s = Session::new(&config);
  s.set_input("今天天氣");
  click(&mut s, 0, 0);
  for _ in 0..5 {
    s.toggle_error();
  }
  assert_eq!(s.history().len(), 3);
}

#[test]
fn test_batch_merge_skips_marked_segments() {
  let mut s = session("a x b x\nc x");
  click(&mut s, 0, 1);
  s.clear_selection();
  let before = s.history().len();

  let outcome = s.batch_merge("x", Side::Left);
  assert_eq!(outcome.merged, 2);
  assert_eq!(texts(&s, 0), vec!["a", "x", "bx"]);
  assert_eq!(texts(&s, 1), vec!["cx"]);
  assert_eq!(s.history().len(), before + 1);

  let merged = &s.lines()[0].segments[2];
  assert_eq!((merged.start, merged.end), (4, 7));
}

#[test]
fn test_batch_merge_right() {
  let mut s = session("x a x b");
  assert!(s.execute(Command::BatchMerge {
    text: "x".into(),
    side: Side::Right,
  }));
  assert_eq!(texts(&s, 0), vec!["xa", "xb"]);
  assert_eq!(s.lines()[0].segments[0].start, 0);
}

#[test]
fn test_search_counts_overlapping_matches() {
  let mut s = session("aaa");
  assert_eq!(s.set_search_query("aa"), SearchStatus::Position {
    current: 1,
    total:   2,
  });
  let offsets: Vec<usize> = s.search().matches().iter().map(|m| m.match_index).collect();
  assert_eq!(offsets, vec![0, 1]);

  s.execute(Command::NextMatch);
  assert_eq!(s.search_status().to_string(), "2/2");
  s.execute(Command::NextMatch);
  assert_eq!(s.search_status().to_string(), "1/2");

  assert_eq!(s.set_search_query("zz"), SearchStatus::NoMatch);
  assert_eq!(s.set_search_query("   "), SearchStatus::Idle);
  assert_eq!(s.search_status().to_string(), "");
}

#[test]
fn test_search_case_sensitivity() {
  let mut s = session("Hello hello");
  s.set_search_query("hello");
  assert_eq!(s.search().matches().len(), 2);
  s.execute(Command::SetCaseSensitive(true));
  assert_eq!(s.search().matches().len(), 1);
  assert_eq!(s.search_status().to_string(), "1/1");
}

#[test]
fn test_boundary_preview_tracks_selection() {
  let mut s = session("今天天氣很好");
  let line = s.lines()[0].id;
  let segment = s.lines()[0].segments[1].id;
  s.execute(Command::Select { line, segment });
  s.execute(Command::SetEditMode(EditMode::Right));

  let preview = s.boundary_preview();
  let current = preview.current.unwrap();
  let neighbor = preview.neighbor.unwrap();
  assert_eq!((current.ch, current.position), ('氣', CharPosition::End));
  assert_eq!((neighbor.ch, neighbor.position), ('很', CharPosition::Start));

  s.execute(Command::ExpandRight);
  let preview = s.boundary_preview();
  assert_eq!(preview.current.map(|h| h.ch), Some('很'));
  assert_eq!(preview.neighbor.map(|h| h.ch), Some('好'));
}

#[test]
fn test_save_load_round_trip() {
  let storage = MemoryStorage::new();
  let mut s = session("今天天氣很好。\n我們去公園");
  click(&mut s, 1, 0);
  assert!(s.save(&storage));

  let mut restored = Session::default();
  assert!(restored.load(&storage));
  assert_eq!(restored.input_text(), s.input_text());
  assert_eq!(restored.stats(), s.stats());
  assert!(restored.lines()[1].segments[0].is_error);
  assert!(restored.selection().is_none());
}

#[test]
fn test_line_edit_and_reparse() {
  let mut s = session("今天天氣\n很好");
  let line = s.lines()[1].id;
  assert!(s.execute(Command::UpdateLineText {
    line,
    text: "很好。".into(),
  }));
  assert!(s.execute(Command::ReparseLine(line)));
  assert_eq!(s.lines()[1].id, line);
  assert_eq!(texts(&s, 1).concat(), "很好。");

  let reparsed = &s.lines()[1].segments;
  assert!(reparsed.last().is_some_and(|seg| seg.text == "。" && seg.is_deleted));
  assert_eq!(s.stats().total_count, 2 + reparsed.len() - 1);
}
