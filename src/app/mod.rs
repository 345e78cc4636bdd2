//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::rc::Rc;

use crate::timer::{Alarm, TerminalBell};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    store_path: PathBuf,
    checklist: bool,
    alarm: Rc<dyn Alarm>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application persisting to the given store file.
    pub fn new(store_path: PathBuf) -> Self {
        Self {
            store_path,
            checklist: false,
            alarm: Rc::new(TerminalBell),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Start with checklist mode on.
    pub const fn with_checklist(mut self, enabled: bool) -> Self {
        self.checklist = enabled;
        self
    }

    /// Replace the alarm played when a countdown finishes.
    pub fn with_alarm(mut self, alarm: Rc<dyn Alarm>) -> Self {
        self.alarm = alarm;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
