use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError};

enum WriteCommand {
    Snapshot(String),
    /// Acked with the error of the latest failed write, if it was not since
    /// superseded by a successful one.
    Flush(Sender<Option<String>>),
}

/// A JSON object file with a background writer.
///
/// The whole file is read once on open and kept in memory. Every mutation
/// serializes the map and hands it to a writer thread, which coalesces
/// queued snapshots and replaces the file atomically. Last write wins.
///
/// A file that is not a JSON object is moved aside to `<path>.corrupt`
/// before the store starts empty.
pub struct JsonFileStore {
    path: PathBuf,
    quarantined: Option<PathBuf>,
    entries: RefCell<Map<String, Value>>,
    tx: Option<Sender<WriteCommand>>,
    writer: Option<JoinHandle<()>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file starts empty. A malformed one is renamed to
    /// `<path>.corrupt` first, see [`Self::quarantined`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or moved
    /// aside, if its parent directory cannot be created, or if the writer
    /// thread fails to start.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let (entries, quarantined) = match load_entries(&path)? {
            Loaded::Entries(entries) => (entries, None),
            Loaded::Malformed => (Map::new(), Some(quarantine(&path)?)),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let (tx, rx) = mpsc::channel();
        let writer_path = path.clone();
        let writer = std::thread::Builder::new()
            .name("sidenote-store".to_string())
            .spawn(move || run_writer(&writer_path, &rx))
            .map_err(StoreError::Spawn)?;

        debug!(path = %path.display(), keys = entries.len(), "store opened");
        Ok(Self {
            path,
            quarantined,
            entries: RefCell::new(entries),
            tx: Some(tx),
            writer: Some(writer),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable store file was moved when this store opened.
    pub fn quarantined(&self) -> Option<&Path> {
        self.quarantined.as_deref()
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string_pretty(&*self.entries.borrow()) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "failed to encode store snapshot");
                return;
            }
        };
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(WriteCommand::Snapshot(snapshot)).is_err() {
            warn!(path = %self.path.display(), "store writer is gone; change kept in memory only");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, entries: &[(&str, Value)]) {
        {
            let mut map = self.entries.borrow_mut();
            for (key, value) in entries {
                map.insert((*key).to_string(), value.clone());
            }
        }
        self.persist();
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
        self.persist();
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(tx) = &self.tx else {
            return Ok(());
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        tx.send(WriteCommand::Flush(ack_tx))
            .map_err(|_| StoreError::WriterGone)?;
        match ack_rx.recv() {
            Ok(None) => Ok(()),
            Ok(Some(reason)) => Err(StoreError::Unsaved {
                path: self.path.clone(),
                reason,
            }),
            Err(_) => Err(StoreError::WriterGone),
        }
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit.
        drop(self.tx.take());
        if let Some(writer) = self.writer.take()
            && writer.join().is_err()
        {
            warn!(path = %self.path.display(), "store writer panicked");
        }
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("keys", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}

enum Loaded {
    Entries(Map<String, Value>),
    Malformed,
}

fn load_entries(path: &Path) -> Result<Loaded, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Loaded::Entries(Map::new())),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Loaded::Entries(Map::new()));
    }
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(Loaded::Entries(map)),
        Ok(_) => {
            warn!(path = %path.display(), "store file is not a JSON object");
            Ok(Loaded::Malformed)
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "store file is malformed");
            Ok(Loaded::Malformed)
        }
    }
}

/// Move an unreadable store file to `<path>.corrupt`, replacing any older copy.
fn quarantine(path: &Path) -> Result<PathBuf, StoreError> {
    let mut name = OsString::from(path.as_os_str());
    name.push(".corrupt");
    let target = PathBuf::from(name);
    fs::rename(path, &target).map_err(|source| StoreError::Write {
        path: target.clone(),
        source,
    })?;
    warn!(from = %path.display(), to = %target.display(), "unreadable store moved aside");
    Ok(target)
}

fn run_writer(path: &Path, rx: &Receiver<WriteCommand>) {
    let mut unsaved: Option<String> = None;
    while let Ok(command) = rx.recv() {
        let mut latest = None;
        let mut acks = Vec::new();
        match command {
            WriteCommand::Snapshot(snapshot) => latest = Some(snapshot),
            WriteCommand::Flush(ack) => acks.push(ack),
        }
        // Only the newest queued snapshot needs to reach disk.
        while let Ok(next) = rx.try_recv() {
            match next {
                WriteCommand::Snapshot(snapshot) => latest = Some(snapshot),
                WriteCommand::Flush(ack) => acks.push(ack),
            }
        }
        if let Some(snapshot) = latest {
            let _write_scope = crate::perf::scope("store.write");
            match write_atomically(path, &snapshot) {
                Ok(()) => {
                    debug!(path = %path.display(), bytes = snapshot.len(), "store written");
                    unsaved = None;
                }
                Err(err) => {
                    warn!(%err, "store write failed");
                    unsaved = Some(err.to_string());
                }
            }
        }
        for ack in acks {
            let _ = ack.send(unsaved.clone());
        }
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.get("muted"), None);
    }

    #[test]
    fn test_malformed_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("muted"), None);

        let moved = dir.path().join("store.json.corrupt");
        assert_eq!(store.quarantined(), Some(moved.as_path()));
        assert_eq!(std::fs::read_to_string(&moved).unwrap(), "{ not json");
    }

    #[test]
    fn test_malformed_file_survives_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "shopping list\n- milk\n").unwrap();
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set(&[("muted", json!(true))]);
            store.flush().unwrap();
        }
        let kept = std::fs::read_to_string(dir.path().join("notes.txt.corrupt")).unwrap();
        assert_eq!(kept, "shopping list\n- milk\n");
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("muted"), Some(json!(true)));
        assert_eq!(reopened.quarantined(), None);
    }

    #[test]
    fn test_valid_file_is_not_quarantined() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"muted": true}"#).unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.quarantined(), None);
        assert!(!dir.path().join("store.json.corrupt").exists());
    }

    #[test]
    fn test_flush_reports_failed_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).unwrap();
        // A directory in the file's place makes the final rename fail.
        std::fs::create_dir(&path).unwrap();

        store.set(&[("remainingSeconds", json!(5))]);
        let err = store.flush().unwrap_err();
        assert!(matches!(err, StoreError::Unsaved { .. }), "{err}");

        std::fs::remove_dir(&path).unwrap();
        store.set(&[("remainingSeconds", json!(6))]);
        store.flush().unwrap();
    }

    #[test]
    fn test_set_is_visible_immediately_and_on_disk_after_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = JsonFileStore::open(&path).unwrap();

        store.set(&[("remainingSeconds", json!(90)), ("running", json!(true))]);
        assert_eq!(store.get("remainingSeconds"), Some(json!(90)));

        store.flush().unwrap();
        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["remainingSeconds"], json!(90));
        assert_eq!(on_disk["running"], json!(true));
    }

    #[test]
    fn test_remove_deletes_key_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set(&[("notesContent", json!("x"))]);
        store.remove("notesContent");
        store.flush().unwrap();

        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk.get("notesContent").is_none());
    }

    #[test]
    fn test_drop_drains_pending_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = JsonFileStore::open(&path).unwrap();
            for i in 0..50 {
                store.set(&[("remainingSeconds", json!(i))]);
            }
        }
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("remainingSeconds"), Some(json!(49)));
    }
}
