use tracing::{debug, warn};

use crate::app::{App, Message, Model};
use crate::store::StoreError;

impl App {
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Tick => {
                if model.take_alarm_pending() {
                    crate::perf::log_event("timer.alarm", "ring");
                    self.alarm.ring();
                }
            }
            Message::ConfirmClearAll => {
                crate::perf::log_event("notes.clear", "store entry removed");
            }
            _ => {}
        }
    }

    /// Wait for pending writes and report whether the last one landed.
    pub(super) fn flush_store(model: &Model) -> Result<(), StoreError> {
        let _flush_scope = crate::perf::scope("store.flush");
        match model.store.flush() {
            Ok(()) => {
                debug!("store flushed");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "failed to flush store");
                Err(err)
            }
        }
    }
}
