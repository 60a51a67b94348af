#![forbid(unsafe_code)]

//! Drives a recording bridge from trace events.

use std::fmt;

use emuterm_core::recording::{RecordingEmulator, RecordingSurface, bytes_to_hex};
use emuterm_core::{BridgeConfig, InputEvent, TerminalBridge, ToolbarGeometry};

use crate::trace::TraceEvent;

/// One observable effect of a trace event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    /// Bytes delivered to the emulator.
    Send(Vec<u8>),
    /// Bytes written to the surface.
    Write(Vec<u8>),
    /// Grid forwarded to the emulator.
    Resize { cols: u16, rows: u16 },
    /// Labels of the visible toolbar buttons, left to right.
    Toolbar(Vec<&'static str>),
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(bytes) => write!(f, "send {}", bytes_to_hex(bytes)),
            Self::Write(bytes) => write!(f, "write {}", bytes_to_hex(bytes)),
            Self::Resize { cols, rows } => write!(f, "resize {cols}x{rows}"),
            Self::Toolbar(labels) => write!(f, "toolbar {}", labels.join(" ")),
        }
    }
}

pub struct Replayer {
    bridge: TerminalBridge<RecordingSurface, RecordingEmulator>,
    toolbar_height: f64,
}

impl Replayer {
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            bridge: TerminalBridge::new(
                RecordingSurface::default(),
                RecordingEmulator::default(),
                config,
            ),
            toolbar_height: config.toolbar.height,
        }
    }

    /// Apply one event and return what it caused, in order.
    pub fn apply(&mut self, event: &TraceEvent) -> Vec<TranscriptLine> {
        let sent_before = self.bridge.emulator().sent.len();
        let resizes_before = self.bridge.emulator().resizes.len();
        let writes_before = self.bridge.surface().writes.len();
        let mut toolbar = None;

        match event {
            TraceEvent::Input { event } => {
                self.bridge.handle_input(&InputEvent::from(event.clone()));
            }
            TraceEvent::Tap { key } => {
                let outcome = self.bridge.tap(*key);
                tracing::trace!(%key, ?outcome, "replayed tap");
            }
            TraceEvent::Output { data } => self.bridge.on_output(data.as_bytes()),
            TraceEvent::Ready => {
                self.bridge.surface_ready();
            }
            TraceEvent::Resize { cols, rows } => {
                self.bridge.surface_resized(*cols, *rows);
            }
            TraceEvent::Toolbar { width } => {
                self.bridge
                    .resize_toolbar(ToolbarGeometry::new(*width, self.toolbar_height));
                toolbar = Some(self.visible_labels());
            }
        }

        let emulator = self.bridge.emulator();
        let mut lines: Vec<TranscriptLine> = emulator.sent[sent_before..]
            .iter()
            .cloned()
            .map(TranscriptLine::Send)
            .collect();
        lines.extend(
            emulator.resizes[resizes_before..]
                .iter()
                .map(|&(cols, rows)| TranscriptLine::Resize { cols, rows }),
        );
        lines.extend(
            self.bridge.surface().writes[writes_before..]
                .iter()
                .cloned()
                .map(TranscriptLine::Write),
        );
        lines.extend(toolbar.map(TranscriptLine::Toolbar));
        lines
    }

    /// Apply every event, concatenating the transcript.
    pub fn replay<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a TraceEvent>,
    ) -> Vec<TranscriptLine> {
        events.into_iter().flat_map(|event| self.apply(event)).collect()
    }

    #[must_use]
    pub fn visible_labels(&self) -> Vec<&'static str> {
        self.bridge
            .toolbar()
            .layout()
            .buttons
            .iter()
            .map(|button| button.descriptor.label)
            .collect()
    }

    #[must_use]
    pub fn bridge(&self) -> &TerminalBridge<RecordingSurface, RecordingEmulator> {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emuterm_core::LogicalKey;
    use emuterm_core::input::InputEventJson;

    fn text(s: &str) -> TraceEvent {
        TraceEvent::Input {
            event: InputEventJson::Text {
                text: s.to_string(),
            },
        }
    }

    #[test]
    fn output_is_held_until_ready() {
        let mut replayer = Replayer::new(&BridgeConfig::default());
        let early = replayer.apply(&TraceEvent::Output {
            data: "login: ".to_string(),
        });
        assert!(early.is_empty());
        let flushed = replayer.apply(&TraceEvent::Ready);
        assert_eq!(flushed, vec![TranscriptLine::Write(b"login: ".to_vec())]);
        assert!(replayer.apply(&TraceEvent::Ready).is_empty());
    }

    #[test]
    fn sticky_control_then_plain_text() {
        let mut replayer = Replayer::new(&BridgeConfig::default());
        let lines = replayer.replay(&[
            TraceEvent::Toolbar { width: 375.0 },
            TraceEvent::Tap {
                key: LogicalKey::Control,
            },
            text("c"),
            text("c"),
        ]);
        let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "toolbar esc ^ ⎇ ⇥ ← ↑ ↓ →".to_string(),
                "send 03".to_string(),
                "send 63".to_string(),
            ]
        );
    }

    #[test]
    fn repeated_resize_is_reported_once() {
        let mut replayer = Replayer::new(&BridgeConfig::default());
        let resize = TraceEvent::Resize { cols: 80, rows: 24 };
        assert_eq!(
            replayer.apply(&resize),
            vec![TranscriptLine::Resize { cols: 80, rows: 24 }]
        );
        assert!(replayer.apply(&resize).is_empty());
    }

    #[test]
    fn hidden_key_tap_produces_nothing() {
        let mut replayer = Replayer::new(&BridgeConfig::default());
        replayer.apply(&TraceEvent::Toolbar { width: 320.0 });
        let lines = replayer.apply(&TraceEvent::Tap {
            key: LogicalKey::End,
        });
        assert!(lines.is_empty());
    }
}
