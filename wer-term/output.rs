//! Plain-text and JSON reports of an annotated session.

use std::fmt::Write;

use serde_json::{
  Value,
  json,
};
use wer_lib::{
  segment::{
    Line,
    Mark,
    Segment,
  },
  session::Session,
  stats::Stats,
};

/// One row per line, then a totals row.
///
/// Errors print as `*word*` and excluded segments as `[word]`.
pub fn render_table(session: &Session) -> String {
  let mut out = String::new();
  for line in session.lines() {
    let stats = Stats::for_line(line);
    let _ = writeln!(
      out,
      "{:<8} {}  ({}/{})",
      line.id.to_string(),
      render_segments(line),
      stats.error_count,
      stats.total_count,
    );
  }
  let _ = writeln!(out, "{}", render_totals(&session.stats()));
  out
}

fn render_segments(line: &Line) -> String {
  line
    .segments
    .iter()
    .map(render_segment)
    .collect::<Vec<_>>()
    .join(" ")
}

fn render_segment(segment: &Segment) -> String {
  match segment.mark() {
    Mark::Normal => segment.text.clone(),
    Mark::Error => format!("*{}*", segment.text),
    Mark::Excluded => format!("[{}]", segment.text),
  }
}

fn render_totals(stats: &Stats) -> String {
  format!(
    "words {}  errors {}  wer {:.2}%",
    stats.total_count,
    stats.error_count,
    stats.wer()
  )
}

pub fn render_json(session: &Session) -> serde_json::Result<String> {
  serde_json::to_string_pretty(&report(session))
}

fn report(session: &Session) -> Value {
  let stats = session.stats();
  json!({
    "lines": session.lines(),
    "stats": {
      "totalCount": stats.total_count,
      "errorCount": stats.error_count,
      "wer": stats.wer(),
    },
  })
}
