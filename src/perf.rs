//! Timing instrumentation and the event log.
//!
//! A [`Scope`] is a `tracing` span that also measures itself. With `--perf`
//! on, finished scopes are folded into a per-name [`Timing`] table that is
//! printed when the app exits. `--render-debug-log PATH` opens an event log
//! that receives [`log_event`] lines and every recorded scope.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::span::EnteredSpan;

static PERF_ENABLED: AtomicBool = AtomicBool::new(false);
static STATE: LazyLock<Mutex<PerfState>> = LazyLock::new(|| Mutex::new(PerfState::default()));

/// Aggregate timings for one scope name.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Timing {
    pub count: u64,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl Timing {
    fn add(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.max_ms = self.max_ms.max(ms);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

struct EventLog {
    opened: Instant,
    out: BufWriter<File>,
}

impl EventLog {
    fn write_line(&mut self, name: &str, detail: &str) {
        let at_ms = self.opened.elapsed().as_secs_f64() * 1000.0;
        let _ = writeln!(self.out, "[{at_ms:>10.3} ms] {name}: {detail}");
        let _ = self.out.flush();
    }
}

#[derive(Default)]
struct PerfState {
    log: Option<EventLog>,
    timings: BTreeMap<&'static str, Timing>,
}

fn state() -> MutexGuard<'static, PerfState> {
    STATE.lock().expect("perf state lock poisoned")
}

/// A measured region. Timing is recorded when it is dropped.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
    _span: EnteredSpan,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::trace!(
            scope = self.name,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "scope finished"
        );
        if is_enabled() {
            record(self.name, elapsed);
        }
    }
}

pub fn set_enabled(enabled: bool) {
    PERF_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    PERF_ENABLED.load(Ordering::Relaxed)
}

/// Enter a `perf` span named `name` and start its clock.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
        _span: tracing::debug_span!("perf", scope = name).entered(),
    }
}

/// Fold one measurement into the table and echo it to the event log.
pub fn record(name: &'static str, elapsed: Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    let mut state = state();
    state.timings.entry(name).or_default().add(ms);
    if let Some(log) = state.log.as_mut() {
        log.write_line("perf.scope", &format!("{name} {ms:.3} ms"));
    }
}

/// Aggregate for `name`, if it was ever recorded.
pub fn timing(name: &str) -> Option<Timing> {
    state().timings.get(name).copied()
}

/// One line per recorded scope, sorted by name.
pub fn summary() -> Vec<String> {
    state()
        .timings
        .iter()
        .map(|(name, t)| {
            format!(
                "{name}: {} calls, mean {:.2} ms, max {:.2} ms",
                t.count,
                t.mean_ms(),
                t.max_ms
            )
        })
        .collect()
}

/// Print the timing table to stderr. Call after the terminal is restored.
pub fn report_summary() {
    if !is_enabled() {
        return;
    }
    for line in summary() {
        eprintln!("[perf] {line}");
    }
}

/// Open (or close, with `None`) the event log file.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let log = match path {
        Some(path) => {
            let mut log = EventLog {
                opened: Instant::now(),
                out: BufWriter::new(File::create(path)?),
            };
            writeln!(log.out, "sidenote event log start")?;
            log.out.flush()?;
            Some(log)
        }
        None => None,
    };
    state().log = log;
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    state().log.is_some()
}

/// Append one event line to the log, if it is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    if let Some(log) = state().log.as_mut() {
        log.write_line(name, detail.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());
        drop(scope("test.enabled.scope"));
        assert_eq!(timing("test.enabled.scope").map(|t| t.count), Some(1));

        set_enabled(false);
        assert!(!is_enabled());
        drop(scope("test.disabled.scope"));
        assert_eq!(timing("test.disabled.scope"), None);
    }

    #[test]
    fn test_record_aggregates_per_name() {
        record("test.aggregate", Duration::from_millis(2));
        record("test.aggregate", Duration::from_millis(6));
        let t = timing("test.aggregate").unwrap();
        assert_eq!(t.count, 2);
        assert!((t.mean_ms() - 4.0).abs() < 1e-9);
        assert!((t.max_ms - 6.0).abs() < 1e-9);
        assert!(
            summary()
                .iter()
                .any(|line| line.starts_with("test.aggregate: 2 calls"))
        );
    }

    #[test]
    fn test_timing_for_unknown_name_is_none() {
        assert_eq!(timing("test.never.recorded"), None);
        assert!((Timing::default().mean_ms()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_debug_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());
        log_event("test.event", "hello world");
        record("test.logged", Duration::from_millis(1));
        set_debug_log_path(None).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("sidenote event log start"));
        assert!(content.contains("test.event: hello world"));
        assert!(content.contains("perf.scope: test.logged"));
    }
}
