use std::cell::RefCell;

use serde_json::{Map, Value};

use super::KeyValueStore;

/// One recorded mutation against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Set(Vec<(String, Value)>),
    Remove(String),
}

impl StoreWrite {
    /// Whether this write touched `key`.
    pub fn touches(&self, key: &str) -> bool {
        match self {
            Self::Set(entries) => entries.iter().any(|(k, _)| k == key),
            Self::Remove(k) => k == key,
        }
    }
}

/// In-memory store that keeps a log of every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<Map<String, Value>>,
    writes: RefCell<Vec<StoreWrite>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with entries. Seeding is not logged.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.borrow_mut();
            for (key, value) in entries {
                map.insert(key.to_string(), value);
            }
        }
        store
    }

    /// Every write since creation (or the last [`Self::clear_writes`]).
    pub fn writes(&self) -> Vec<StoreWrite> {
        self.writes.borrow().clone()
    }

    /// Number of logged writes that touched `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.writes.borrow().iter().filter(|w| w.touches(key)).count()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, entries: &[(&str, Value)]) {
        let mut map = self.entries.borrow_mut();
        let mut logged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
            logged.push(((*key).to_string(), value.clone()));
        }
        self.writes.borrow_mut().push(StoreWrite::Set(logged));
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
        self.writes
            .borrow_mut()
            .push(StoreWrite::Remove(key.to_string()));
    }
}
