//! Banker -- a cash-and-property ledger for tabletop property-trading games.
//!
//! This binary reads commands from stdin, one per line, and writes one JSON
//! response per command to stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use banker::banker::Banker;
use banker::config::{BankerConfig, ConfigError};
use banker::ledger::SnapshotFileError;
use banker::session::{Flow, Session};

#[derive(Parser, Debug)]
#[command(name = "banker")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot to restore before reading commands
    #[arg(short, long)]
    load: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("BANKER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotFileError),
}

fn load_banker(args: &Args) -> Result<Banker, StartupError> {
    let config = match &args.config {
        Some(path) => BankerConfig::load(path)?,
        None => BankerConfig::default(),
    };
    let mut banker = Banker::new(config);
    if let Some(path) = &args.load {
        banker.load_file(path)?;
    }
    Ok(banker)
}

/// Runs the protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let banker = match load_banker(&args) {
        Ok(banker) => banker,
        Err(err) => {
            tracing::error!(%err, "failed to start");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(version = %banker.ledger().version(), "banker ready");

    let mut session = Session::new(banker);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                tracing::error!(%err, "failed to read stdin");
                return ExitCode::FAILURE;
            }
        };

        let (response, flow) = session.handle_line(&line);
        if let Some(response) = response {
            if writeln!(out, "{}", response.to_line()).and_then(|_| out.flush()).is_err() {
                return ExitCode::FAILURE;
            }
        }
        if flow == Flow::Quit {
            break;
        }
    }
    ExitCode::SUCCESS
}
