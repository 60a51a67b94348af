#![forbid(unsafe_code)]

//! Offline replay of terminal bridge traces.
//!
//! A trace is JSONL, one [`trace::TraceEvent`] per line. Replaying drives a
//! [`emuterm_core::TerminalBridge`] wired to recording collaborators and
//! reports, line by line, every byte chunk that reached the emulator or the
//! surface.

pub mod cli;
pub mod error;
pub mod replay;
pub mod trace;

pub use cli::{Cli, run, run_from_env};
pub use error::{ReplayError, Result};
pub use replay::{Replayer, TranscriptLine};
pub use trace::{TraceEvent, parse_trace};
