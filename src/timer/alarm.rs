use std::cell::Cell;
use std::io::{Write, stdout};

use tracing::debug;

/// Something that can signal the end of a countdown.
///
/// Playback is best-effort: implementations swallow their own failures.
pub trait Alarm {
    fn ring(&self);
}

/// Rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Alarm for TerminalBell {
    fn ring(&self) {
        let mut out = stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            debug!(%err, "alarm bell failed");
        }
    }
}

/// Counts rings instead of making noise.
#[derive(Debug, Default)]
pub struct RecordingAlarm {
    rings: Cell<usize>,
}

impl RecordingAlarm {
    pub fn rings(&self) -> usize {
        self.rings.get()
    }
}

impl Alarm for RecordingAlarm {
    fn ring(&self) {
        self.rings.set(self.rings.get() + 1);
    }
}
