//! Previous-state snapshot persistence
//!
//! The evaluator diffs each fresh earthquake list against the last seen
//! one. The storage medium is injectable so the diff logic is
//! independent of where a host keeps its state (memory, browser
//! storage bridge, a file).

use std::collections::HashMap;
use std::sync::Mutex;
use vakt_common::{Earthquake, QuakeId};

/// Snapshot of the last-seen earthquake list, keyed by identity
pub type Snapshot = HashMap<QuakeId, Earthquake>;

/// Injectable persistence for the evaluator's previous-state snapshot
pub trait SnapshotStore: Send + Sync {
    /// Last saved snapshot; empty when nothing was saved yet
    fn load(&self) -> Snapshot;

    /// Replace the stored snapshot wholesale
    fn save(&self, snapshot: Snapshot);
}

/// In-memory store, lives for the lifetime of the consumer
#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Snapshot>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Snapshot {
        self.inner.lock().expect("snapshot lock poisoned").clone()
    }

    fn save(&self, snapshot: Snapshot) {
        *self.inner.lock().expect("snapshot lock poisoned") = snapshot;
    }
}
