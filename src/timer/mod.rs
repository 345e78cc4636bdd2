//! Persisted countdown timer.
//!
//! The countdown is a small state machine: `Paused ⇄ Running`, with an
//! automatic `Running → Paused` transition when it reaches zero. The
//! recurring one-second tick is a [`Ticker`] owned by the countdown; it
//! exists exactly while the countdown runs, so dropping it cancels the tick.

mod alarm;

use serde_json::{Value, json};
use tracing::debug;

use crate::store::{KeyValueStore, MUTED, REMAINING_SECONDS, RUNNING};

pub use alarm::{Alarm, RecordingAlarm, TerminalBell};

/// Tick period.
pub const TICK_INTERVAL_MS: u64 = 1000;

pub const PLAY_GLYPH: &str = "▶";
pub const PAUSE_GLYPH: &str = "⏸";
pub const MUTED_GLYPH: &str = "🔇";
pub const UNMUTED_GLYPH: &str = "🔊";

/// Parse `HH:MM:SS` into total seconds.
///
/// Exactly three colon-separated fields are required and each must start
/// with an integer; anything else is zero. Fields are not range-checked and a
/// negative total is clamped to zero.
pub fn parse_time(text: &str) -> u64 {
    let fields: Vec<_> = text.split(':').map(crate::fields::parse_int_prefix).collect();
    let [Some(h), Some(m), Some(s)] = fields.as_slice() else {
        return 0;
    };
    h.checked_mul(3600)
        .zip(m.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m)?.checked_add(*s))
        .map_or(0, |total| u64::try_from(total).unwrap_or(0))
}

/// Format seconds as zero-padded `HH:MM:SS`. Negative input shows as zero.
pub fn format_time(seconds: i64) -> String {
    let sec = seconds.max(0);
    format!("{:02}:{:02}:{:02}", sec / 3600, (sec % 3600) / 60, sec % 60)
}

/// Deadline-based repeating tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    interval_ms: u64,
    next_due_ms: u64,
}

impl Ticker {
    /// Start ticking every `interval_ms`, first tick one interval after `now_ms`.
    pub const fn start(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            next_due_ms: now_ms.saturating_add(interval_ms),
        }
    }

    pub const fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Number of ticks that came due by `now_ms`; advances the deadline past them.
    pub fn take_due(&mut self, now_ms: u64) -> u32 {
        if now_ms < self.next_due_ms || self.interval_ms == 0 {
            return 0;
        }
        let due = (now_ms - self.next_due_ms) / self.interval_ms + 1;
        self.next_due_ms = self
            .next_due_ms
            .saturating_add(due.saturating_mul(self.interval_ms));
        u32::try_from(due).unwrap_or(u32::MAX)
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running.
    Idle,
    /// One second elapsed, time remains.
    Counting,
    /// The countdown reached zero and paused itself.
    Finished { alarm: bool },
}

/// Countdown state: remaining seconds, mute flag and the live ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining_seconds: u64,
    muted: bool,
    ticker: Option<Ticker>,
}

impl Countdown {
    pub const fn new() -> Self {
        Self {
            remaining_seconds: 0,
            muted: false,
            ticker: None,
        }
    }

    /// Restore from the store and resume if it was running with time left.
    pub fn hydrate(store: &dyn KeyValueStore, now_ms: u64) -> Self {
        let mut countdown = Self {
            remaining_seconds: store
                .get(REMAINING_SECONDS)
                .as_ref()
                .and_then(Value::as_u64)
                .unwrap_or(0),
            muted: matches!(store.get(MUTED), Some(Value::Bool(true))),
            ticker: None,
        };
        let was_running = matches!(store.get(RUNNING), Some(Value::Bool(true)));
        debug!(
            remaining = countdown.remaining_seconds,
            muted = countdown.muted,
            was_running,
            "countdown restored"
        );
        if was_running && countdown.remaining_seconds > 0 {
            countdown.start(now_ms, store);
        }
        countdown
    }

    pub const fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub const fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Remaining time as `HH:MM:SS`.
    pub fn display(&self) -> String {
        format_time(i64::try_from(self.remaining_seconds).unwrap_or(i64::MAX))
    }

    pub const fn play_glyph(&self) -> &'static str {
        if self.is_running() {
            PAUSE_GLYPH
        } else {
            PLAY_GLYPH
        }
    }

    pub const fn mute_glyph(&self) -> &'static str {
        if self.muted { MUTED_GLYPH } else { UNMUTED_GLYPH }
    }

    /// Deadline of the next tick while running.
    pub fn next_tick_due_ms(&self) -> Option<u64> {
        self.ticker.map(|ticker| ticker.next_due_ms())
    }

    /// Ticks that came due by `now_ms`.
    pub fn due_ticks(&mut self, now_ms: u64) -> u32 {
        self.ticker.as_mut().map_or(0, |ticker| ticker.take_due(now_ms))
    }

    /// Set the duration from the field text. Ignored while running.
    pub fn set_duration(&mut self, text: &str, store: &dyn KeyValueStore) -> bool {
        if self.is_running() {
            return false;
        }
        self.remaining_seconds = parse_time(text);
        debug!(remaining = self.remaining_seconds, "duration set");
        self.save(store);
        true
    }

    /// Pause if running, start otherwise.
    pub fn toggle_play(&mut self, now_ms: u64, store: &dyn KeyValueStore) {
        if self.is_running() {
            self.pause(store);
        } else {
            self.start(now_ms, store);
        }
    }

    /// Begin ticking. No-op with nothing left or when already running.
    pub fn start(&mut self, now_ms: u64, store: &dyn KeyValueStore) -> bool {
        if self.remaining_seconds == 0 || self.is_running() {
            return false;
        }
        self.ticker = Some(Ticker::start(TICK_INTERVAL_MS, now_ms));
        debug!(remaining = self.remaining_seconds, "countdown started");
        self.save(store);
        true
    }

    /// Stop ticking and persist.
    pub fn pause(&mut self, store: &dyn KeyValueStore) {
        self.ticker = None;
        debug!(remaining = self.remaining_seconds, "countdown paused");
        self.save(store);
    }

    /// Advance one second.
    pub fn tick(&mut self, store: &dyn KeyValueStore) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.save(store);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counting;
        }
        self.pause(store);
        TickOutcome::Finished { alarm: !self.muted }
    }

    /// Flip the mute flag and persist it on its own.
    pub fn toggle_mute(&mut self, store: &dyn KeyValueStore) -> bool {
        self.muted = !self.muted;
        store.set(&[(MUTED, json!(self.muted))]);
        self.muted
    }

    fn save(&self, store: &dyn KeyValueStore) {
        store.set(&[
            (REMAINING_SECONDS, json!(self.remaining_seconds)),
            (RUNNING, json!(self.is_running())),
        ]);
    }
}
