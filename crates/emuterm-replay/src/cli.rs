#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use emuterm_core::BridgeConfig;
use emuterm_core::logging::{self, LogFormat};

use crate::error::{ReplayError, Result};
use crate::replay::{Replayer, TranscriptLine};
use crate::trace::{TraceEvent, parse_trace};

#[derive(Debug, Parser)]
#[command(
    name = "emuterm-replay",
    about = "Replay a JSONL trace of terminal bridge events",
    version
)]
pub struct Cli {
    /// Bridge configuration (TOML, or JSON by `.json` extension).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial toolbar width, applied before the first event.
    #[arg(long, value_name = "W")]
    pub width: Option<f64>,

    /// Log as JSON lines instead of text.
    #[arg(long)]
    pub json_log: bool,

    /// Trace to replay.
    #[arg(value_name = "TRACE.jsonl")]
    pub trace: PathBuf,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let format = if cli.json_log {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    if let Err(err) = logging::init(format) {
        eprintln!("emuterm-replay: {err}");
    }
    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

/// Replay `cli.trace`, writing one transcript line per effect to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => BridgeConfig::from_file(path).map_err(|source| ReplayError::Config {
            path: path.clone(),
            source,
        })?,
        None => BridgeConfig::default(),
    };
    let events = parse_trace(BufReader::new(File::open(&cli.trace)?))?;
    tracing::info!(
        trace = %cli.trace.display(),
        events = events.len(),
        "replaying trace"
    );

    let mut replayer = Replayer::new(&config);
    let mut lines: Vec<TranscriptLine> = Vec::new();
    if let Some(width) = cli.width {
        lines.extend(replayer.apply(&TraceEvent::Toolbar { width }));
    }
    lines.extend(replayer.replay(&events));

    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cli_for(trace: PathBuf) -> Cli {
        Cli {
            config: None,
            width: None,
            json_log: false,
            trace,
        }
    }

    #[test]
    fn missing_trace_is_io_error() {
        let dir = tempdir().unwrap();
        let mut out = Vec::new();
        let err = run(&cli_for(dir.path().join("absent.jsonl")), &mut out).unwrap_err();
        assert!(matches!(err, ReplayError::Io(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_config_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let trace = dir.path().join("t.jsonl");
        fs::write(&trace, "").unwrap();
        let config = dir.path().join("bridge.toml");
        fs::write(&config, "[toolbar]\nmin_button_width = -1.0\n").unwrap();

        let mut cli = cli_for(trace);
        cli.config = Some(config);
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ReplayError::Config { .. }));
        assert!(err.to_string().contains("bridge.toml"));
    }

    #[test]
    fn args_parse() {
        let cli = Cli::try_parse_from([
            "emuterm-replay",
            "--width",
            "320",
            "--json-log",
            "session.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.width, Some(320.0));
        assert!(cli.json_log);
        assert_eq!(cli.trace, PathBuf::from("session.jsonl"));
        assert!(cli.config.is_none());
    }
}
