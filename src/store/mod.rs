//! Persistence adapter.
//!
//! Both panels read their state from a small key-value store at startup and
//! write back after every mutation. Writes are fire-and-forget: callers never
//! wait for them and never see a failure, the store logs it instead.

mod file;
mod memory;

use std::path::PathBuf;
use std::rc::Rc;

use serde_json::Value;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, StoreWrite};

/// Serialized note document snapshot.
pub const NOTES_CONTENT: &str = "notesContent";
/// Remaining countdown seconds.
pub const REMAINING_SECONDS: &str = "remainingSeconds";
/// Whether the countdown was running at the last write.
pub const RUNNING: &str = "running";
/// Alarm mute flag.
pub const MUTED: &str = "muted";

/// Errors raised by store backends.
///
/// These never reach the panels; they are surfaced when opening or
/// flushing a store and logged by the background writer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start store writer: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("store writer thread has stopped")]
    WriterGone,
    #[error("changes not saved to {path}: {reason}")]
    Unsaved { path: PathBuf, reason: String },
}

/// An asynchronous key-value store over named keys.
///
/// `set` and `remove` return immediately; the backend decides when the
/// change reaches durable storage. Reads observe every earlier write.
pub trait KeyValueStore {
    /// Read a key, `None` when absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write several keys as one update.
    fn set(&self, entries: &[(&str, Value)]);

    /// Delete a key entirely.
    fn remove(&self, key: &str);

    /// Block until earlier writes have been attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the latest write failed or the backend can no
    /// longer accept writes.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store handle shared by the note editor and the countdown.
pub type SharedStore = Rc<dyn KeyValueStore>;
