#![forbid(unsafe_code)]

//! In-memory collaborators that record what the bridge does.
//!
//! Used by the replay tool and by tests in place of a real emulator and a
//! real rendering surface.

use crate::bridge::Emulator;
use crate::relay::RenderSurface;

/// Emulator stand-in that keeps every input chunk and resize.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingEmulator {
    pub sent: Vec<Vec<u8>>,
    pub resizes: Vec<(u16, u16)>,
}

impl RecordingEmulator {
    /// All sent bytes, concatenated.
    #[must_use]
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.sent.concat()
    }
}

impl Emulator for RecordingEmulator {
    fn send_input(&mut self, bytes: &[u8]) {
        self.sent.push(bytes.to_vec());
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.resizes.push((columns, rows));
    }
}

/// Surface stand-in that keeps every write, preserving boundaries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSurface {
    pub writes: Vec<Vec<u8>>,
}

impl RecordingSurface {
    /// All written bytes, concatenated.
    #[must_use]
    pub fn written_bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl RenderSurface for RecordingSurface {
    fn write(&mut self, bytes: &[u8]) {
        self.writes.push(bytes.to_vec());
    }
}

/// Lowercase hex, for transcripts and logs.
#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(bytes_to_hex(&[0x1b, 0x5b, 0x0a, 0xff]), "1b5b0aff");
        assert_eq!(bytes_to_hex(&[]), "");
    }
}
