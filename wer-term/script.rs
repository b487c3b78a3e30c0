//! Script replay - maps one text line to one session command.
//!
//! Line and segment positions are 1-based and resolved against the session
//! at the moment the line runs, so earlier commands can shift them.

use thiserror::Error;
use wer_lib::{
  command::{
    Command,
    Direction,
  },
  editor::Side,
  preview::EditMode,
  segment::{
    LineId,
    SegmentId,
  },
  session::Session,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
  #[error("unknown command `{0}`")]
  Unknown(String),
  #[error("`{command}` expects {usage}")]
  Usage {
    command: &'static str,
    usage:   &'static str,
  },
  #[error("no line {0}")]
  NoLine(usize),
  #[error("no segment {segment} on line {line}")]
  NoSegment { line: usize, segment: usize },
}

pub type Result<T> = std::result::Result<T, ScriptError>;

/// Outcome of replaying a script.
#[derive(Debug, Default)]
pub struct ScriptReport {
  pub applied: usize,
  pub ignored: usize,
  pub errors:  Vec<(usize, ScriptError)>,
}

/// Run every line of `source` against `session`. Bad lines are recorded and
/// skipped.
pub fn run_script(session: &mut Session, source: &str) -> ScriptReport {
  let mut report = ScriptReport::default();
  for (number, line) in source.lines().enumerate() {
    let number = number + 1;
    match parse_line(line, session) {
      Ok(Some(command)) => {
        tracing::trace!(number, ?command, "script command");
        if session.execute(command) {
          report.applied += 1;
        } else {
          report.ignored += 1;
        }
      },
      Ok(None) => {},
      Err(err) => {
        tracing::warn!(number, %err, "skipping script line");
        report.errors.push((number, err));
      },
    }
  }
  report
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, session: &Session) -> Result<Option<Command>> {
  let line = line.trim();
  if line.is_empty() || line.starts_with('#') {
    return Ok(None);
  }
  let (name, rest) = line
    .split_once(char::is_whitespace)
    .map_or((line, ""), |(name, rest)| (name, rest.trim()));

  let command = match name {
    "select" => {
      let (line, segment) = position(session, "select", rest)?;
      Command::Select { line, segment }
    },
    "toggle" => {
      let (line, segment) = position(session, "toggle", rest)?;
      Command::Toggle { line, segment }
    },
    "expand-left" => Command::ExpandLeft,
    "shrink-left" => Command::ShrinkLeft,
    "shrink-right" => Command::ShrinkRight,
    "expand-right" => Command::ExpandRight,
    "delete" => Command::ToggleDelete,
    "error" => Command::ToggleError,
    "split" => Command::Split(side("split", rest)?),
    "merge" => Command::MergeWithNext,
    "undo" => Command::Undo,
    "search" => Command::Search(rest.to_string()),
    "next" => Command::NextMatch,
    "prev" => Command::PrevMatch,
    "batch-merge" => {
      const USAGE: &str = "TEXT left|right";
      let (text, dir) = rest.rsplit_once(char::is_whitespace).ok_or(ScriptError::Usage {
        command: "batch-merge",
        usage:   USAGE,
      })?;
      Command::BatchMerge {
        text: text.trim().to_string(),
        side: side("batch-merge", dir)?,
      }
    },
    "mode" => Command::SetEditMode(match rest {
      "none" => EditMode::None,
      "left" => EditMode::Left,
      "right" => EditMode::Right,
      _ => {
        return Err(ScriptError::Usage {
          command: "mode",
          usage:   "none|left|right",
        });
      },
    }),
    "reparse" => Command::ReparseLine(line_id(session, "reparse", rest)?),
    "edit" => {
      let (number, text) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(number, text)| (number, text.trim()));
      Command::UpdateLineText {
        line: line_id(session, "edit", number)?,
        text: text.to_string(),
      }
    },
    "move" => Command::Move(match rest {
      "left" => Direction::Left,
      "right" => Direction::Right,
      "up" => Direction::Up,
      "down" => Direction::Down,
      _ => {
        return Err(ScriptError::Usage {
          command: "move",
          usage:   "left|right|up|down",
        });
      },
    }),
    _ => return Err(ScriptError::Unknown(name.to_string())),
  };
  Ok(Some(command))
}

fn side(command: &'static str, arg: &str) -> Result<Side> {
  match arg.trim() {
    "left" => Ok(Side::Left),
    "right" => Ok(Side::Right),
    _ => {
      Err(ScriptError::Usage {
        command,
        usage: "left|right",
      })
    },
  }
}

fn number(command: &'static str, usage: &'static str, arg: Option<&str>) -> Result<usize> {
  arg
    .and_then(|arg| arg.parse::<usize>().ok())
    .filter(|&n| n > 0)
    .ok_or(ScriptError::Usage { command, usage })
}

fn line_id(session: &Session, command: &'static str, arg: &str) -> Result<LineId> {
  let line = number(command, "a 1-based LINE", Some(arg.trim()))?;
  session
    .lines()
    .get(line - 1)
    .map(|l| l.id)
    .ok_or(ScriptError::NoLine(line))
}

fn position(session: &Session, command: &'static str, args: &str) -> Result<(LineId, SegmentId)> {
  const USAGE: &str = "1-based LINE SEGMENT";
  let mut args = args.split_whitespace();
  let line = number(command, USAGE, args.next())?;
  let segment = number(command, USAGE, args.next())?;
  if line > session.lines().len() {
    return Err(ScriptError::NoLine(line));
  }
  let selection = session
    .selection_at(line - 1, segment - 1)
    .ok_or(ScriptError::NoSegment { line, segment })?;
  match (selection.line, selection.segment) {
    (Some(line_id), Some(segment_id)) => Ok((line_id, segment_id)),
    _ => Err(ScriptError::NoSegment { line, segment }),
  }
}
