#![forbid(unsafe_code)]

//! Terminal I/O bridge: the one place where input, modifiers, toolbar and
//! output meet.
//!
//! ```text
//! keyboard / toolbar ──► ModifierState (read) ──► SequenceEncoder ──► Emulator::send_input
//!                                   ▲                                   │
//!                                   └────────── cleared ◄───────────────┘
//!
//! emulator output ──► OutputHandle ──► (owner thread) ──► OutputRelay ──► RenderSurface
//! ```
//!
//! # State machine
//!
//! `Buffering` until the surface signals readiness, then `Ready` for good.
//! Input is accepted in both states; only output delivery differs, and the
//! relay owns that distinction.
//!
//! # Invariants
//!
//! 1. After every input event the sticky modifier set is empty.
//! 2. Empty encodings never reach the emulator.
//! 3. Hidden toolbar buttons can't be tapped.
//! 4. The emulator only hears about grid sizes that actually changed.

use crate::config::BridgeConfig;
use crate::encoder::SequenceEncoder;
use crate::input::{InputEvent, LogicalKey};
use crate::modifiers::{Modifier, ModifierSet, ModifierState};
use crate::relay::{OutputHandle, OutputQueue, OutputRelay, RenderSurface, output_channel};
use crate::toolbar::{DEFAULT_DESCRIPTORS, KeyDescriptor, KeyToolbar, ToolbarGeometry};

/// The emulator collaborator's input side.
pub trait Emulator {
    /// Transmit encoded bytes to the emulator's input stream.
    fn send_input(&mut self, bytes: &[u8]);

    /// Report a new terminal grid.
    fn resize(&mut self, columns: u16, rows: u16);
}

impl<E: Emulator + ?Sized> Emulator for &mut E {
    fn send_input(&mut self, bytes: &[u8]) {
        (**self).send_input(bytes);
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        (**self).resize(columns, rows);
    }
}

/// Output delivery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Buffering,
    Ready,
}

/// What a toolbar tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The key is not currently visible; nothing happened.
    Ignored,
    /// A sticky modifier changed; `active` is the new highlight state.
    ModifierToggled { modifier: Modifier, active: bool },
    /// The key was encoded and `bytes` bytes were sent.
    Sent { bytes: usize },
}

/// Orchestrates the output relay, modifier state, encoder and toolbar.
#[derive(Debug)]
pub struct TerminalBridge<S, E> {
    relay: OutputRelay<S>,
    emulator: E,
    modifiers: ModifierState,
    encoder: SequenceEncoder,
    toolbar: KeyToolbar,
    grid: Option<(u16, u16)>,
    output_tx: OutputHandle,
    output_rx: OutputQueue,
}

impl<S: RenderSurface, E: Emulator> TerminalBridge<S, E> {
    /// Bridge with the shipped toolbar table.
    #[must_use]
    pub fn new(surface: S, emulator: E, config: &BridgeConfig) -> Self {
        Self::with_descriptors(surface, emulator, config, DEFAULT_DESCRIPTORS.to_vec())
    }

    /// Bridge with a custom toolbar table.
    #[must_use]
    pub fn with_descriptors(
        surface: S,
        emulator: E,
        config: &BridgeConfig,
        descriptors: Vec<KeyDescriptor>,
    ) -> Self {
        let (output_tx, output_rx) = output_channel();
        Self {
            relay: OutputRelay::new(surface),
            emulator,
            modifiers: ModifierState::new(),
            encoder: SequenceEncoder::new(config.encoder.meta_prefix),
            toolbar: KeyToolbar::new(
                descriptors,
                config.toolbar.min_button_width,
                config.toolbar.height,
            ),
            grid: None,
            output_tx,
            output_rx,
        }
    }

    #[must_use]
    pub const fn state(&self) -> BridgeState {
        if self.relay.is_ready() {
            BridgeState::Ready
        } else {
            BridgeState::Buffering
        }
    }

    // -- output ------------------------------------------------------------

    /// The rendering surface finished initializing.
    ///
    /// Returns `true` on the Buffering → Ready transition, `false` if the
    /// bridge was already ready. Anything already queued on the output handle
    /// is pulled in first so it keeps its place ahead of later output.
    pub fn surface_ready(&mut self) -> bool {
        self.pump_output();
        self.relay.on_ready()
    }

    /// Emulator output delivered on the owning thread.
    pub fn on_output(&mut self, bytes: &[u8]) {
        self.pump_output();
        self.relay.feed(bytes);
    }

    /// Producer handle for emulator output arriving on other threads.
    #[must_use]
    pub fn output_handle(&self) -> OutputHandle {
        self.output_tx.clone()
    }

    /// Apply output queued through [`output_handle`](Self::output_handle).
    ///
    /// Call from the owning thread whenever the host is notified that output
    /// is available. Returns the number of bytes moved.
    pub fn pump_output(&mut self) -> usize {
        self.output_rx.drain_into(&mut self.relay)
    }

    /// Bytes still held for a surface that isn't ready.
    #[must_use]
    pub fn pending_output(&self) -> usize {
        self.relay.pending_len()
    }

    // -- input -------------------------------------------------------------

    /// Encode one input event, send it, and clear the sticky modifiers.
    ///
    /// A modifier key toggles its modifier instead. Returns the number of
    /// bytes sent to the emulator.
    pub fn handle_input(&mut self, event: &InputEvent) -> usize {
        if let InputEvent::Key(key) = event
            && let Some(modifier) = Modifier::from_key(*key)
        {
            self.modifiers.toggle(modifier);
            return 0;
        }

        let modifiers = self.modifiers.current();
        let bytes = self.encoder.encode(event, modifiers);
        if bytes.is_empty() {
            tracing::trace!(?event, "empty input dropped");
        } else {
            tracing::trace!(len = bytes.len(), ?modifiers, "input encoded");
            self.emulator.send_input(&bytes);
        }
        self.modifiers.clear();
        bytes.len()
    }

    /// Insert text from the keyboard or a paste.
    pub fn insert_text(&mut self, text: &str) -> usize {
        self.handle_input(&InputEvent::Text(text.to_owned()))
    }

    /// Flip a sticky modifier directly (e.g. from a hardware key).
    pub fn toggle_modifier(&mut self, modifier: Modifier) -> bool {
        self.modifiers.toggle(modifier)
    }

    /// Active sticky modifiers.
    #[must_use]
    pub const fn modifiers(&self) -> ModifierSet {
        self.modifiers.current()
    }

    /// Whether the toolbar button for `key` should be drawn highlighted.
    #[must_use]
    pub const fn is_highlighted(&self, key: LogicalKey) -> bool {
        match Modifier::from_key(key) {
            Some(modifier) => self.modifiers.is_active(modifier),
            None => false,
        }
    }

    // -- toolbar -----------------------------------------------------------

    /// Handle a tap on the toolbar button for `key`.
    pub fn tap(&mut self, key: LogicalKey) -> TapOutcome {
        if !self.toolbar.is_visible(key) {
            tracing::debug!(%key, "tap on hidden toolbar key ignored");
            return TapOutcome::Ignored;
        }
        if let Some(modifier) = Modifier::from_key(key) {
            let active = self.modifiers.toggle(modifier);
            return TapOutcome::ModifierToggled { modifier, active };
        }
        let bytes = self.handle_input(&InputEvent::Key(key));
        TapOutcome::Sent { bytes }
    }

    /// Handle a tap at a point in toolbar coordinates.
    pub fn tap_at(&mut self, x: f64, y: f64) -> TapOutcome {
        match self.toolbar.hit_test(x, y) {
            Some(key) => self.tap(key),
            None => TapOutcome::Ignored,
        }
    }

    /// Recompute the toolbar for a new size. Returns `true` if the visible
    /// set changed.
    pub fn resize_toolbar(&mut self, geometry: ToolbarGeometry) -> bool {
        self.toolbar.resize(geometry)
    }

    #[must_use]
    pub fn toolbar(&self) -> &KeyToolbar {
        &self.toolbar
    }

    // -- geometry ----------------------------------------------------------

    /// The surface settled on a new cell grid after layout.
    ///
    /// Forwards the size to the emulator when it differs from the last one.
    /// Zero-sized grids are ignored.
    pub fn surface_resized(&mut self, columns: u16, rows: u16) -> bool {
        if columns == 0 || rows == 0 || self.grid == Some((columns, rows)) {
            return false;
        }
        tracing::debug!(columns, rows, "terminal grid resized");
        self.grid = Some((columns, rows));
        self.emulator.resize(columns, rows);
        true
    }

    /// Last grid forwarded to the emulator.
    #[must_use]
    pub const fn grid(&self) -> Option<(u16, u16)> {
        self.grid
    }

    // -- collaborators -----------------------------------------------------

    #[must_use]
    pub fn surface(&self) -> &S {
        self.relay.surface()
    }

    #[must_use]
    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut E {
        &mut self.emulator
    }

    /// Tear down, returning the collaborators.
    #[must_use]
    pub fn into_parts(self) -> (S, E) {
        (self.relay.into_surface(), self.emulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::MetaPrefix;
    use crate::recording::{RecordingEmulator, RecordingSurface};
    use proptest::prelude::*;

    type Bridge = TerminalBridge<RecordingSurface, RecordingEmulator>;

    fn bridge() -> Bridge {
        let mut bridge = TerminalBridge::new(
            RecordingSurface::default(),
            RecordingEmulator::default(),
            &BridgeConfig::default(),
        );
        bridge.resize_toolbar(ToolbarGeometry::new(1024.0, 44.0));
        bridge
    }

    #[test]
    fn starts_buffering_and_latches_ready() {
        let mut b = bridge();
        assert_eq!(b.state(), BridgeState::Buffering);
        assert!(b.surface_ready());
        assert_eq!(b.state(), BridgeState::Ready);
        assert!(!b.surface_ready());
        assert_eq!(b.state(), BridgeState::Ready);
    }

    #[test]
    fn control_a_then_plain_a() {
        let mut b = bridge();
        assert_eq!(
            b.tap(LogicalKey::Control),
            TapOutcome::ModifierToggled {
                modifier: Modifier::Control,
                active: true
            }
        );
        assert!(b.is_highlighted(LogicalKey::Control));
        assert_eq!(b.insert_text("a"), 1);
        assert!(b.modifiers().is_empty());
        assert!(!b.is_highlighted(LogicalKey::Control));
        assert_eq!(b.insert_text("a"), 1);
        assert_eq!(b.emulator().sent, vec![vec![0x01], vec![0x61]]);
    }

    #[test]
    fn modifier_tap_twice_cancels() {
        let mut b = bridge();
        b.tap(LogicalKey::Alternate);
        b.tap(LogicalKey::Alternate);
        b.insert_text("x");
        assert_eq!(b.emulator().sent_bytes(), b"x");
    }

    #[test]
    fn alternate_arrow_is_prefixed() {
        let mut b = bridge();
        b.tap(LogicalKey::Alternate);
        assert_eq!(b.tap(LogicalKey::ArrowUp), TapOutcome::Sent { bytes: 5 });
        assert_eq!(b.emulator().sent_bytes(), b"\x1b[\x1b[A");
        assert!(b.modifiers().is_empty());
    }

    #[test]
    fn escape_meta_prefix_from_config() {
        let config = BridgeConfig::from_toml_str("[encoder]\nmeta_prefix = \"escape\"\n").unwrap();
        assert_eq!(config.encoder.meta_prefix, MetaPrefix::Escape);
        let mut b = TerminalBridge::new(
            RecordingSurface::default(),
            RecordingEmulator::default(),
            &config,
        );
        b.toggle_modifier(Modifier::Alternate);
        b.insert_text("b");
        assert_eq!(b.emulator().sent_bytes(), b"\x1bb");
    }

    #[test]
    fn empty_text_sends_nothing_but_clears_modifiers() {
        let mut b = bridge();
        b.tap(LogicalKey::Control);
        assert_eq!(b.insert_text(""), 0);
        assert!(b.emulator().sent.is_empty());
        assert!(b.modifiers().is_empty());
    }

    #[test]
    fn hidden_keys_cannot_be_tapped() {
        let mut b = bridge();
        b.resize_toolbar(ToolbarGeometry::new(320.0, 44.0));
        assert_eq!(b.tap(LogicalKey::Home), TapOutcome::Ignored);
        assert_eq!(b.tap(LogicalKey::Alternate), TapOutcome::Ignored);
        assert!(b.modifiers().is_empty());
        assert!(b.emulator().sent.is_empty());
    }

    #[test]
    fn toolbar_starts_with_nothing_visible() {
        let mut b = TerminalBridge::new(
            RecordingSurface::default(),
            RecordingEmulator::default(),
            &BridgeConfig::default(),
        );
        assert_eq!(b.tap(LogicalKey::Escape), TapOutcome::Ignored);
    }

    #[test]
    fn tap_at_point_hits_visible_button() {
        let mut b = bridge();
        b.resize_toolbar(ToolbarGeometry::new(440.0, 44.0));
        // Tab is the fourth button, [132, 176).
        assert_eq!(b.tap_at(150.0, 20.0), TapOutcome::Sent { bytes: 1 });
        assert_eq!(b.emulator().sent_bytes(), b"\t");
        assert_eq!(b.tap_at(500.0, 20.0), TapOutcome::Ignored);
    }

    #[test]
    fn modifier_key_event_toggles_instead_of_sending() {
        let mut b = bridge();
        assert_eq!(b.handle_input(&InputEvent::Key(LogicalKey::Control)), 0);
        assert_eq!(b.modifiers(), ModifierSet::CONTROL);
        b.handle_input(&InputEvent::text("d"));
        assert_eq!(b.emulator().sent_bytes(), [0x04]);
    }

    #[test]
    fn output_is_buffered_until_ready() {
        let mut b = bridge();
        b.on_output(b"OpenSBI ");
        b.on_output(b"v0.9\r\n");
        assert!(b.surface().writes.is_empty());
        assert_eq!(b.pending_output(), 14);
        b.surface_ready();
        b.on_output(b"login: ");
        assert_eq!(
            b.surface().writes,
            vec![b"OpenSBI v0.9\r\n".to_vec(), b"login: ".to_vec()]
        );
    }

    #[test]
    fn handle_output_keeps_order_with_direct_output() {
        let mut b = bridge();
        let handle = b.output_handle();
        std::thread::spawn(move || {
            handle.send(b"one ".to_vec());
            handle.send(b"two ".to_vec());
        })
        .join()
        .unwrap();
        b.on_output(b"three");
        b.surface_ready();
        assert_eq!(b.surface().written_bytes(), b"one two three");
    }

    #[test]
    fn resize_is_forwarded_only_on_change() {
        let mut b = bridge();
        assert!(b.surface_resized(80, 24));
        assert!(!b.surface_resized(80, 24));
        assert!(!b.surface_resized(0, 24));
        assert!(b.surface_resized(100, 30));
        assert_eq!(b.emulator().resizes, vec![(80, 24), (100, 30)]);
        assert_eq!(b.grid(), Some((100, 30)));
    }

    proptest! {
        #[test]
        fn modifiers_empty_after_every_event(
            control in any::<bool>(),
            alternate in any::<bool>(),
            text in "\\PC{0,4}",
        ) {
            let mut b = bridge();
            if control {
                b.tap(LogicalKey::Control);
            }
            if alternate {
                b.tap(LogicalKey::Alternate);
            }
            b.insert_text(&text);
            prop_assert!(b.modifiers().is_empty());
            prop_assert_eq!(b.emulator().sent.is_empty(), text.is_empty());
        }
    }
}
