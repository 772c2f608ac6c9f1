//! Transactional store: one exclusive write scope, snapshot reads.
//!
//! `KvStore` layers the block write discipline over a `StateStore`:
//!
//! - `open_write_scope` hands out at most one `WriteScope` at a time. A
//!   second request fails immediately with `ScopeAlreadyOpen` rather than
//!   blocking, because the only caller is the serialized block driver.
//! - `WriteScope::put` buffers into a `WriteBatch`. Nothing is visible to
//!   readers until `WriteScope::commit`.
//! - `WriteScope::commit` consumes the scope, so a committed scope cannot
//!   be written to again. Dropping a scope discards its writes.
//! - `KvStore::get` reads committed state only. It never observes an open
//!   scope and never waits on one.
//!
//! The writer slot is a flag, not a lock. Writes within a scope are
//! single-writer because the scope is `&mut`-only and the block driver
//! is serialized. The flag exists to turn a driver bug into an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kvstore_primitives::{Key, Value};

use crate::batch::WriteBatch;
use crate::error::StoreError;
use crate::state_store::StateStore;

/// Transactional key-value store over a committed-state backend.
///
/// Cheap to clone. Clones share the backend and the writer slot.
pub struct KvStore<S> {
    backend: Arc<S>,
    writer: Arc<AtomicBool>,
}

impl<S> Clone for KvStore<S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            writer: Arc::clone(&self.writer),
        }
    }
}

impl<S: StateStore> KvStore<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Wrap a shared backend.
    pub fn from_arc(backend: Arc<S>) -> Self {
        Self {
            backend,
            writer: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Access the backend.
    pub fn backend(&self) -> &Arc<S> {
        &self.backend
    }

    /// Read a key from the committed snapshot.
    pub fn get(&self, key: &[u8]) -> Result<Option<Value>, StoreError> {
        self.backend.get(key)
    }

    /// Open the block write scope.
    ///
    /// Fails with `ScopeAlreadyOpen` if another scope is still live.
    pub fn open_write_scope(&self) -> Result<WriteScope<S>, StoreError> {
        if self
            .writer
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StoreError::ScopeAlreadyOpen);
        }
        tracing::trace!("write scope opened");
        Ok(WriteScope {
            backend: Arc::clone(&self.backend),
            batch: WriteBatch::new(),
            _slot: WriterSlot(Arc::clone(&self.writer)),
        })
    }

    /// Returns true while a write scope is live.
    pub fn has_open_scope(&self) -> bool {
        self.writer.load(Ordering::Acquire)
    }
}

/// Releases the writer slot when the scope goes away, committed or not.
struct WriterSlot(Arc<AtomicBool>);

impl Drop for WriterSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Exclusive handle through which one block's writes are buffered.
pub struct WriteScope<S: StateStore> {
    backend: Arc<S>,
    batch: WriteBatch,
    _slot: WriterSlot,
}

impl<S: StateStore> WriteScope<S> {
    /// Buffer a record. Visible to readers only after `commit`.
    pub fn put(&mut self, key: Key, value: Value) {
        self.batch.put(key, value);
    }

    /// Records buffered so far.
    pub fn batch(&self) -> &WriteBatch {
        &self.batch
    }

    /// Number of distinct keys buffered.
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Atomically persist every buffered record and close the scope.
    ///
    /// On error nothing is persisted. The writer slot is released either way.
    pub fn commit(self) -> Result<usize, StoreError> {
        let written = self.batch.len();
        self.backend.apply_batch(&self.batch)?;
        tracing::trace!(records = written, "write scope committed");
        Ok(written)
    }
}

impl<S: StateStore> std::fmt::Debug for WriteScope<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteScope")
            .field("records", &self.batch.len())
            .finish()
    }
}
