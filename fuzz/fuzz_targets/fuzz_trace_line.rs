#![no_main]

use emuterm_core::BridgeConfig;
use emuterm_replay::{Replayer, TraceEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must either fail to parse or replay without panicking.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut replayer = Replayer::new(&BridgeConfig::default());
    for line in text.lines() {
        if let Some(Ok(event)) = TraceEvent::parse_line(line) {
            let _ = replayer.apply(&event);
        }
    }
});
