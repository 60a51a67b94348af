#![no_main]

use emuterm_core::recording::{RecordingEmulator, RecordingSurface};
use emuterm_core::{BridgeConfig, InputEvent, LogicalKey, TerminalBridge, ToolbarGeometry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Each pair of bytes is one bridge event: an opcode and an argument.
    let mut bridge = TerminalBridge::new(
        RecordingSurface::default(),
        RecordingEmulator::default(),
        &BridgeConfig::default(),
    );
    let mut expected_output = Vec::new();

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0], pair[1]);
        match op % 7 {
            0 => {
                bridge.on_output(&[arg]);
                expected_output.push(arg);
            }
            1 => {
                bridge.surface_ready();
            }
            2 => {
                let key = LogicalKey::ALL[usize::from(arg) % LogicalKey::ALL.len()];
                let _ = bridge.tap(key);
            }
            3 => {
                let ch = char::from(arg);
                bridge.handle_input(&InputEvent::Text(ch.to_string()));
            }
            4 => {
                bridge.resize_toolbar(ToolbarGeometry::new(f64::from(arg) * 4.0, 44.0));
            }
            5 => {
                bridge.surface_resized(u16::from(arg), u16::from(arg / 2));
            }
            _ => {
                bridge.handle_input(&InputEvent::Backspace);
            }
        }
        // Every non-modifier keystroke consumes the sticky modifiers.
        if matches!(op % 7, 3 | 6) {
            assert!(bridge.modifiers().is_empty());
        }
    }

    bridge.surface_ready();
    assert_eq!(bridge.surface().written_bytes(), expected_output);
});
