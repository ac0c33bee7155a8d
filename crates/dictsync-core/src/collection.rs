//! Collection seam and the in-memory reference collection.
//!
//! [`Collection`] is the boundary to the storage engine's key/value
//! primitives; the gateway and the tests only ever talk to this trait.
//! [`ChangeSource`] is the engine's change-tracking seam: whoever pumps
//! notifications drains it and hands the result to the dispatcher.
//! [`MemoryCollection`] implements both over an insertion-ordered map and
//! is the collection used in embeddings without a native engine.

use indexmap::IndexMap;

use crate::changeset::{ChangeTracker, Changeset};
use crate::error::Error;
use crate::value::Value;

/// Key/value primitives of the native collection.
///
/// Each call is an independent primitive: there is no batching and no
/// cross-key transaction at this layer.
pub trait Collection {
    /// Insert or overwrite `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<(), Error>;

    /// Look up `key`.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Delete `key`. Returns `Ok(false)` when the key was absent, which is
    /// not an error.
    fn remove(&mut self, key: &str) -> Result<bool, Error>;

    /// Whether `key` is present.
    fn contains_key(&self, key: &str) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the collection holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Change-tracking seam of the storage engine.
pub trait ChangeSource {
    /// Drains the changeset accumulated since the previous drain, or
    /// `None` when nothing changed.
    fn take_changeset(&mut self) -> Option<Changeset>;
}

/// Insertion-ordered in-memory collection with change tracking.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    entries: IndexMap<String, Value>,
    tracker: ChangeTracker,
}

impl MemoryCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Collection for MemoryCollection {
    fn set(&mut self, key: &str, value: Value) -> Result<(), Error> {
        let existed = self.entries.contains_key(key);
        self.entries.insert(key.to_string(), value);
        self.tracker.record_set(key, existed);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn remove(&mut self, key: &str) -> Result<bool, Error> {
        // shift_remove keeps the remaining entries in insertion order.
        if self.entries.shift_remove(key).is_some() {
            self.tracker.record_remove(key);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl ChangeSource for MemoryCollection {
    fn take_changeset(&mut self) -> Option<Changeset> {
        self.tracker.take()
    }
}
