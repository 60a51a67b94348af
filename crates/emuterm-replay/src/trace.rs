#![forbid(unsafe_code)]

//! Trace file format.
//!
//! ```text
//! # boot, then log in
//! {"kind":"output","data":"buildroot login: "}
//! {"kind":"ready"}
//! {"kind":"toolbar","width":375}
//! {"kind":"input","event":{"kind":"text","text":"root"}}
//! {"kind":"tap","key":"control"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use emuterm_core::LogicalKey;
use emuterm_core::input::InputEventJson;
use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Keyboard or paste input.
    Input { event: InputEventJson },
    /// Toolbar button tap.
    Tap { key: LogicalKey },
    /// Emulator output.
    Output { data: String },
    /// Rendering surface finished loading.
    Ready,
    /// Surface settled on a new cell grid.
    Resize { cols: u16, rows: u16 },
    /// Toolbar width changed.
    Toolbar { width: f64 },
}

impl TraceEvent {
    /// Parse one trace line. `None` for blank and comment lines.
    pub fn parse_line(line: &str) -> Option<serde_json::Result<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(serde_json::from_str(trimmed))
    }
}

/// Read a whole trace.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match TraceEvent::parse_line(&line) {
            None => {}
            Some(Ok(event)) => events.push(event),
            Some(Err(source)) => {
                return Err(ReplayError::Parse {
                    line: index + 1,
                    source,
                });
            }
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_parses() {
        let trace = r#"
# comment
{"kind":"input","event":{"kind":"return"}}
{"kind":"tap","key":"arrow_up"}
{"kind":"output","data":"\u001b[2J"}
{"kind":"ready"}
{"kind":"resize","cols":80,"rows":24}

{"kind":"toolbar","width":375.5}
"#;
        let events = parse_trace(trace.as_bytes()).unwrap();
        assert_eq!(
            events,
            vec![
                TraceEvent::Input {
                    event: InputEventJson::Return
                },
                TraceEvent::Tap {
                    key: LogicalKey::ArrowUp
                },
                TraceEvent::Output {
                    data: "\x1b[2J".to_string()
                },
                TraceEvent::Ready,
                TraceEvent::Resize { cols: 80, rows: 24 },
                TraceEvent::Toolbar { width: 375.5 },
            ]
        );
    }

    #[test]
    fn parse_error_names_the_line() {
        let trace = "{\"kind\":\"ready\"}\n\n{\"kind\":\"bogus\"}\n";
        let err = parse_trace(trace.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::Parse { line: 3, .. }));
        assert!(err.to_string().starts_with("trace line 3:"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let line = r#"{"kind":"tap","key":"hyper"}"#;
        assert!(matches!(TraceEvent::parse_line(line), Some(Err(_))));
    }

    #[test]
    fn indented_comment_is_skipped() {
        assert!(TraceEvent::parse_line("   # later").is_none());
    }
}
