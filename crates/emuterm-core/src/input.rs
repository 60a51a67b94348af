#![forbid(unsafe_code)]

//! Raw input events delivered by the rendering surface and the key toolbar.
//!
//! This module focuses on:
//! - the fixed set of toolbar keys ([`LogicalKey`]) and their base byte
//!   sequences,
//! - the normalized [`InputEvent`] handed to the encoder, and
//! - a JSON encoding suitable for record/replay.

use serde::{Deserialize, Serialize};

/// Keys offered by the on-screen toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalKey {
    Escape,
    Control,
    Alternate,
    Tab,
    Home,
    End,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    ArrowRight,
}

impl LogicalKey {
    /// Every key, in toolbar order.
    pub const ALL: [Self; 10] = [
        Self::Escape,
        Self::Control,
        Self::Alternate,
        Self::Tab,
        Self::Home,
        Self::End,
        Self::ArrowLeft,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowRight,
    ];

    /// Whether this key is a sticky modifier rather than a sequence-producing key.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(self, Self::Control | Self::Alternate)
    }

    /// Fixed byte sequence sent for this key before modifiers are applied.
    ///
    /// Home/End use the CSI `H`/`F` forms. Modifier keys have no sequence.
    #[must_use]
    pub const fn base_sequence(self) -> Option<&'static [u8]> {
        let sequence: &'static [u8] = match self {
            Self::Escape => b"\x1b",
            Self::Tab => b"\t",
            Self::Home => b"\x1b[H",
            Self::End => b"\x1b[F",
            Self::ArrowLeft => b"\x1b[D",
            Self::ArrowUp => b"\x1b[A",
            Self::ArrowDown => b"\x1b[B",
            Self::ArrowRight => b"\x1b[C",
            Self::Control | Self::Alternate => return None,
        };
        Some(sequence)
    }

    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::Control => "control",
            Self::Alternate => "alternate",
            Self::Tab => "tab",
            Self::Home => "home",
            Self::End => "end",
            Self::ArrowLeft => "arrow_left",
            Self::ArrowUp => "arrow_up",
            Self::ArrowDown => "arrow_down",
            Self::ArrowRight => "arrow_right",
        }
    }

    /// Parse a key name. Accepts the snake_case names and a few host spellings.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "escape" | "Escape" | "esc" => Self::Escape,
            "control" | "Control" | "ctrl" => Self::Control,
            "alternate" | "Alt" | "alt" => Self::Alternate,
            "tab" | "Tab" => Self::Tab,
            "home" | "Home" => Self::Home,
            "end" | "End" => Self::End,
            "arrow_left" | "ArrowLeft" => Self::ArrowLeft,
            "arrow_up" | "ArrowUp" => Self::ArrowUp,
            "arrow_down" | "ArrowDown" => Self::ArrowDown,
            "arrow_right" | "ArrowRight" => Self::ArrowRight,
            _ => return None,
        })
    }
}

impl std::fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized input event from the rendering surface or the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Inserted text: a typed character or a pasted string.
    Text(String),
    /// A toolbar key or hardware key with a fixed sequence.
    Key(LogicalKey),
    /// Delete-backward.
    Backspace,
    /// Return / Enter.
    Return,
}

impl InputEvent {
    /// Convenience constructor for text insertion.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Encode this event as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&InputEventJson::from(self))
    }

    /// Decode a previously encoded event JSON string.
    ///
    /// Errors occur if the JSON does not match the expected schema.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let json: InputEventJson = serde_json::from_str(s)?;
        Ok(Self::from(json))
    }
}

/// JSON encoding used by traces: a `kind` tag plus the minimum fields for replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEventJson {
    Text { text: String },
    Key { key: LogicalKey },
    Backspace,
    Return,
}

impl From<&InputEvent> for InputEventJson {
    fn from(value: &InputEvent) -> Self {
        match value {
            InputEvent::Text(text) => Self::Text { text: text.clone() },
            InputEvent::Key(key) => Self::Key { key: *key },
            InputEvent::Backspace => Self::Backspace,
            InputEvent::Return => Self::Return,
        }
    }
}

impl From<InputEventJson> for InputEvent {
    fn from(value: InputEventJson) -> Self {
        match value {
            InputEventJson::Text { text } => Self::Text(text),
            InputEventJson::Key { key } => Self::Key(key),
            InputEventJson::Backspace => Self::Backspace,
            InputEventJson::Return => Self::Return,
        }
    }
}
