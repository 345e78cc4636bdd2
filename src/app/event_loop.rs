use std::io::stdout;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::store::JsonFileStore;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Longest idle wait between polls.
const IDLE_POLL_MS: u64 = 250;

/// How long to wait for input before the next timer deadline.
pub(super) fn poll_timeout_ms(
    now_ms: u64,
    next_tick_ms: Option<u64>,
    needs_render: bool,
    resize_pending: bool,
) -> u64 {
    if needs_render {
        return 0;
    }
    let base = if resize_pending { 10 } else { IDLE_POLL_MS };
    next_tick_ms.map_or(base, |due| base.min(due.saturating_sub(now_ms)))
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened, the terminal cannot be
    /// initialized, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let run_scope = crate::perf::scope("app.run.total");

        let open_scope = crate::perf::scope("app.open_store");
        let store = JsonFileStore::open(&self.store_path)
            .with_context(|| format!("Failed to open store {}", self.store_path.display()))?;
        let quarantined = store.quarantined().map(Path::to_path_buf);
        drop(open_scope);

        // Initialize terminal
        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - sidenote requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let start = Instant::now();
        let mut model = Model::new(Rc::new(store), (size.width, size.height), 0);
        model.notes.set_checklist_mode(self.checklist);
        model.store_path = Some(self.store_path.clone());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        if let Some(moved) = quarantined {
            model.show_toast(
                ToastLevel::Warning,
                format!("Unreadable store moved to {}", moved.display()),
            );
        }
        crate::perf::log_event(
            "init.model",
            format!(
                "terminal={}x{} lines={} remaining={} running={}",
                size.width,
                size.height,
                model.notes.document().line_count(),
                model.timer.remaining_seconds(),
                model.timer.is_running()
            ),
        );

        // Main loop
        let result = self.event_loop(&mut terminal, &mut model, start);

        // Restore terminal
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        if let Err(err) = Self::flush_store(&model) {
            eprintln!("[warn] {err}");
        }
        drop(run_scope);
        crate::perf::report_summary();
        result
    }

    pub(super) fn dispatch(&self, model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        start: Instant,
    ) -> Result<()> {
        let clock = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture)?;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = clock();
            model.now_ms = now_ms;

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                self.dispatch(model, Message::Resize(width, height));
                needs_render = true;
            }

            let due = model.timer.due_ticks(now_ms);
            for _ in 0..due {
                let _tick_scope = crate::perf::scope("timer.tick");
                self.dispatch(model, Message::Tick);
                needs_render = true;
            }
            if due > 1 {
                crate::perf::log_event("timer.catch_up", format!("ticks={due}"));
            }

            // Handle events
            let poll_ms = poll_timeout_ms(
                now_ms,
                model.timer.next_tick_due_ms(),
                needs_render,
                resize_debouncer.is_pending(),
            );
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = clock();
                model.now_ms = event_ms;
                let msg = self.handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    self.dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    let drain_ms = clock();
                    model.now_ms = drain_ms;
                    let msg =
                        self.handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        drained += 1;
                        self.dispatch(model, msg);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;
                let _draw_scope = crate::perf::scope("frame.draw");
                terminal.draw(|frame| self.view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_debouncer_waits_for_delay() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(120, 40, 1_000);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(1_050), None);
        assert_eq!(debouncer.take_ready(1_100), Some((120, 40)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_resize_debouncer_keeps_latest_size() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(100, 30, 0);
        debouncer.queue(90, 20, 50);
        assert_eq!(debouncer.take_ready(120), None);
        assert_eq!(debouncer.take_ready(150), Some((90, 20)));
    }

    #[test]
    fn test_poll_timeout_is_bounded_by_next_tick() {
        assert_eq!(poll_timeout_ms(1_000, Some(1_040), false, false), 40);
        assert_eq!(poll_timeout_ms(1_000, Some(5_000), false, false), IDLE_POLL_MS);
        assert_eq!(poll_timeout_ms(1_000, Some(900), false, false), 0);
    }

    #[test]
    fn test_poll_timeout_without_timer() {
        assert_eq!(poll_timeout_ms(0, None, false, false), IDLE_POLL_MS);
        assert_eq!(poll_timeout_ms(0, None, false, true), 10);
        assert_eq!(poll_timeout_ms(0, None, true, false), 0);
    }
}
