//! In-memory state store for testing.
//!
//! `MemStore` implements `StateStore` over a `BTreeMap`. A batch is applied
//! to a copy of the map and swapped in under the write lock, so readers see
//! either the old map or the new one and a failed batch leaves no trace.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::batch::WriteBatch;
use crate::error::StoreError;
use crate::state_store::StateStore;

/// In-memory state store backed by `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemStore {
    data: RwLock<Arc<BTreeMap<Vec<u8>, Vec<u8>>>>,
    /// Fail the next `apply_batch` (fault injection for atomicity tests).
    fail_next: AtomicBool,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `apply_batch` fail without applying anything.
    pub fn fail_next_commit(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Returns the number of committed entries.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns true if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Clone a handle to the current committed map.
    ///
    /// The handle is immutable and unaffected by later commits.
    pub fn snapshot(&self) -> Arc<BTreeMap<Vec<u8>, Vec<u8>>> {
        match self.data.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

impl StateStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.snapshot().get(key).cloned())
    }

    fn apply_batch(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("mem store lock poisoned".into()))?;

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".into()));
        }

        let mut next = BTreeMap::clone(&guard);
        for (key, value) in batch.iter() {
            next.insert(key.clone(), value.clone());
        }
        *guard = Arc::new(next);
        Ok(())
    }
}
