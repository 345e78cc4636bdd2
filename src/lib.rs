// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # Sidenote
//!
//! A terminal side panel with checklist-aware notes and a countdown timer.
//!
//! Sidenote keeps two small tools on screen:
//! - A line editor where Enter always starts a new line, optionally with a
//!   checkbox, and text can be bold, italic, underlined, highlighted or resized
//! - A countdown timer that survives restarts and rings when it reaches zero
//!
//! Both persist every change to a JSON key-value file.
//!
//! ## Architecture
//!
//! Sidenote uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`notes`]: Styled line document and the checklist editor
//! - [`timer`]: Countdown, time parsing and the alarm
//! - [`store`]: Key-value persistence
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved default flags

pub mod app;
pub mod config;
pub mod fields;
pub mod notes;
pub mod perf;
pub mod store;
pub mod timer;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::notes::{Document, NoteEditor};
    pub use crate::store::KeyValueStore;
    pub use crate::timer::Countdown;
}
