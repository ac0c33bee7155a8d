//! Changesets and the mutation tracker that produces them.
//!
//! A [`Changeset`] describes the keys inserted, modified, and deleted on a
//! collection since the previous dispatch. The [`ChangeTracker`] records raw
//! mutations as they happen and nets them against the state at the last
//! drain, so a key inserted and removed inside the same window produces no
//! entry at all.

use indexmap::IndexSet;
use serde::Serialize;

/// The set of keys inserted, modified, or removed since the last dispatch.
///
/// Consumed read-only by the notification dispatcher; serializable so the
/// gateway can marshal it into the host's value representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Changeset {
    /// Keys that did not exist at the last dispatch and do now.
    pub insertions: IndexSet<String>,
    /// Keys that existed at the last dispatch and were written since.
    pub modifications: IndexSet<String>,
    /// Keys that existed at the last dispatch and no longer do.
    pub deletions: IndexSet<String>,
}

impl Changeset {
    /// True when no key changed.
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.modifications.is_empty() && self.deletions.is_empty()
    }

    /// Total number of changed keys.
    pub fn len(&self) -> usize {
        self.insertions.len() + self.modifications.len() + self.deletions.len()
    }
}

/// Records collection mutations and nets them into a [`Changeset`].
///
/// The tracker is told about each primitive mutation via [`record_set`]
/// and [`record_remove`]; [`take`] drains the pending changeset and resets
/// the window.
///
/// [`record_set`]: ChangeTracker::record_set
/// [`record_remove`]: ChangeTracker::record_remove
/// [`take`]: ChangeTracker::take
#[derive(Debug, Default)]
pub struct ChangeTracker {
    pending: Changeset,
}

impl ChangeTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `set` primitive.
    ///
    /// `existed` is whether the key was present in the collection before
    /// this write.
    pub fn record_set(&mut self, key: &str, existed: bool) {
        if self.pending.deletions.shift_remove(key) {
            // Existed at the baseline, deleted in this window, re-added:
            // net effect is a modification.
            self.pending.modifications.insert(key.to_string());
            return;
        }
        if self.pending.insertions.contains(key) {
            // Still new relative to the baseline.
            return;
        }
        if existed {
            self.pending.modifications.insert(key.to_string());
        } else {
            self.pending.insertions.insert(key.to_string());
        }
    }

    /// Records a `remove` primitive for a key that was present.
    pub fn record_remove(&mut self, key: &str) {
        if self.pending.insertions.shift_remove(key) {
            // Inserted and removed inside the window: invisible at the
            // baseline, invisible now.
            return;
        }
        self.pending.modifications.shift_remove(key);
        self.pending.deletions.insert(key.to_string());
    }

    /// True when no net change is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drains the pending changeset, or `None` when nothing changed.
    pub fn take(&mut self) -> Option<Changeset> {
        if self.pending.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}
