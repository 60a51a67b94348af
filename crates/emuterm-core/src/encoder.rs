#![forbid(unsafe_code)]

//! VT input encoding: ([`InputEvent`], [`ModifierSet`]) → bytes for the emulator.
//!
//! # Rules
//!
//! 1. Every event first resolves to its base sequence: toolbar keys use the
//!    fixed table in [`LogicalKey::base_sequence`], text uses its UTF-8 bytes,
//!    Backspace is DEL and Return is CR.
//! 2. Alternate prefixes the output with the meta introducer (`ESC [` by
//!    default, bare `ESC` with [`MetaPrefix::Escape`]).
//! 3. Control replaces a single-byte base in `?`..=`_` (letters are uppercased
//!    first) with `byte ^ 0x40`, the C0 control code. Any other base is sent
//!    unchanged.
//! 4. Text longer than one character is sent verbatim; modifiers never apply
//!    to it.
//!
//! Empty input encodes to nothing.
//!
//! The encoder is pure. Clearing the sticky modifiers afterwards is the
//! caller's job (see [`crate::bridge::TerminalBridge`]).

use serde::{Deserialize, Serialize};

use crate::input::{InputEvent, LogicalKey};
use crate::modifiers::ModifierSet;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;
const CR: u8 = b'\r';

/// How Alternate is expressed on the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaPrefix {
    /// `ESC [` before the key's sequence.
    #[default]
    Csi,
    /// A single `ESC` before the key's sequence (xterm "meta sends escape").
    Escape,
}

impl MetaPrefix {
    #[must_use]
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Self::Csi => b"\x1b[",
            Self::Escape => b"\x1b",
        }
    }
}

/// Stateless input encoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEncoder {
    meta_prefix: MetaPrefix,
}

impl SequenceEncoder {
    #[must_use]
    pub const fn new(meta_prefix: MetaPrefix) -> Self {
        Self { meta_prefix }
    }

    #[must_use]
    pub const fn meta_prefix(&self) -> MetaPrefix {
        self.meta_prefix
    }

    /// Encode `event` under the active `modifiers`.
    #[must_use]
    pub fn encode(&self, event: &InputEvent, modifiers: ModifierSet) -> Vec<u8> {
        let mut utf8 = [0u8; 4];
        let base: &[u8] = match event {
            InputEvent::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => return Vec::new(),
                    (Some(ch), None) => ch.encode_utf8(&mut utf8).as_bytes(),
                    (Some(_), Some(_)) => return text.as_bytes().to_vec(),
                }
            }
            InputEvent::Key(key) => key_sequence(*key),
            InputEvent::Backspace => &[DEL],
            InputEvent::Return => &[CR],
        };
        if base.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(base.len() + 2);
        if modifiers.contains(ModifierSet::ALTERNATE) {
            out.extend_from_slice(self.meta_prefix.bytes());
        }
        match (modifiers.contains(ModifierSet::CONTROL), base) {
            (true, &[byte]) => match control_byte(byte) {
                Some(ctrl) => out.push(ctrl),
                None => out.push(byte),
            },
            _ => out.extend_from_slice(base),
        }
        out
    }
}

/// Encode with the default (`ESC [`) meta prefix.
#[must_use]
pub fn encode(event: &InputEvent, modifiers: ModifierSet) -> Vec<u8> {
    SequenceEncoder::default().encode(event, modifiers)
}

fn key_sequence(key: LogicalKey) -> &'static [u8] {
    key.base_sequence().unwrap_or_default()
}

/// C0 control code for `byte`, if Control has a standard meaning for it.
///
/// Lowercase letters are folded to uppercase first, so `c` and `C` both
/// produce ETX (0x03). `?` maps to DEL.
#[must_use]
pub const fn control_byte(byte: u8) -> Option<u8> {
    let upper = byte.to_ascii_uppercase();
    if upper >= b'?' && upper <= b'_' {
        Some(upper ^ 0x40)
    } else {
        None
    }
}
