//! Command-line annotator.
//!
//! Tokenizes a transcript, optionally replays an annotation script over it,
//! and prints the annotated lines with their word error rate.

mod output;
mod script;

use std::{
  fs::File,
  io::Read,
  path::PathBuf,
  sync::Mutex,
};

use clap::{
  ArgAction,
  Parser,
};
use eyre::{
  Result,
  WrapErr,
};
use tracing_subscriber::EnvFilter;
use wer_lib::{
  messages::MessageLevel,
  session::Session,
};
use wer_runtime::{
  dirs,
  storage::FileStorage,
};

#[derive(Debug, Parser)]
#[command(name = "wer")]
#[command(about = "Mark recognition errors in a transcript and compute its word error rate")]
struct Cli {
  /// Transcript to annotate; stdin when omitted
  file: Option<PathBuf>,

  /// Replay annotation commands from this file, one per line
  #[arg(long, value_name = "FILE")]
  script: Option<PathBuf>,

  /// Continue the saved session instead of reading a transcript
  #[arg(long, conflicts_with = "file")]
  resume: bool,

  /// Save the session when done
  #[arg(long)]
  save: bool,

  /// Print lines and statistics as JSON
  #[arg(long)]
  json: bool,

  /// Use this config file instead of the user and workspace ones
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,

  /// Write logs to this file instead of stderr
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose, cli.log.as_ref())?;

  let config =
    wer_runtime::config::load_config(cli.config.as_deref()).wrap_err("failed to load config")?;
  let mut session = Session::new(&config);
  let storage = FileStorage::new(dirs::default_storage_file()?);

  if cli.resume {
    if !session.load(&storage) {
      report_messages(&session);
      eyre::bail!("no session to resume in {}", storage.path().display());
    }
  } else {
    session.set_input(read_input(cli.file.as_ref())?);
  }

  if let Some(path) = &cli.script {
    let source = std::fs::read_to_string(path)
      .wrap_err_with(|| format!("failed to read script {}", path.display()))?;
    let report = script::run_script(&mut session, &source);
    for (number, err) in &report.errors {
      eprintln!("{}:{number}: {err}", path.display());
    }
    tracing::info!(
      applied = report.applied,
      ignored = report.ignored,
      errors = report.errors.len(),
      "replayed script"
    );
  }

  if cli.save && !session.save(&storage) {
    report_messages(&session);
    eyre::bail!("failed to save session");
  }

  if cli.json {
    println!("{}", output::render_json(&session)?);
  } else {
    print!("{}", output::render_table(&session));
  }
  report_messages(&session);
  Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
  match file {
    Some(path) => {
      std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
    },
    None => {
      let mut input = String::new();
      std::io::stdin()
        .read_to_string(&mut input)
        .wrap_err("failed to read stdin")?;
      Ok(input)
    },
  }
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  match log_file {
    Some(path) => {
      let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    },
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    },
  }
  Ok(())
}

fn report_messages(session: &Session) {
  for message in session.messages().log() {
    if message.level > MessageLevel::Info {
      eprintln!("{message}");
    }
  }
}
