#![forbid(unsafe_code)]

//! Frame of the rendering surface inside its host view.
//!
//! The surface is inset from the view's safe area by minimum margins, and
//! the bottom margin grows to clear the on-screen keyboard.

use serde::{Deserialize, Serialize};

use crate::geometry::{Insets, Rect, sanitize_length};

/// Minimum margins around the terminal surface, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportMargins {
    pub min_top: f64,
    pub min_side: f64,
    pub min_bottom: f64,
}

impl Default for ViewportMargins {
    fn default() -> Self {
        Self {
            min_top: 25.0,
            min_side: 5.0,
            min_bottom: 5.0,
        }
    }
}

/// Height of the part of `keyboard` that covers `bounds`; 0 if it doesn't.
#[must_use]
pub fn keyboard_inset(bounds: Rect, keyboard: Option<Rect>) -> f64 {
    keyboard
        .and_then(|frame| bounds.intersection_opt(&frame))
        .map_or(0.0, |hit| hit.height)
}

/// Frame for the terminal surface.
///
/// Each side uses the larger of the safe-area inset and its minimum margin;
/// the bottom additionally clears `keyboard_inset`.
#[must_use]
pub fn terminal_frame(
    bounds: Rect,
    safe_area: Insets,
    keyboard_inset: f64,
    margins: ViewportMargins,
) -> Rect {
    let insets = Insets {
        top: sanitize_length(safe_area.top).max(margins.min_top),
        left: sanitize_length(safe_area.left).max(margins.min_side),
        right: sanitize_length(safe_area.right).max(margins.min_side),
        bottom: sanitize_length(safe_area.bottom)
            .max(margins.min_bottom)
            .max(sanitize_length(keyboard_inset)),
    };
    bounds.inset(insets)
}

/// Remembers the current keyboard inset so relayout happens only on change.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct KeyboardTracker {
    inset: f64,
}

impl KeyboardTracker {
    #[must_use]
    pub const fn inset(&self) -> f64 {
        self.inset
    }

    /// Record a keyboard frame change. Returns `true` if a relayout is needed.
    pub fn update(&mut self, bounds: Rect, keyboard: Option<Rect>) -> bool {
        let inset = keyboard_inset(bounds, keyboard);
        if inset == self.inset {
            return false;
        }
        tracing::debug!(previous = self.inset, inset, "keyboard inset changed");
        self.inset = inset;
        true
    }
}
