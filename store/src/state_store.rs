//! Backend storage abstraction.
//!
//! `StateStore` is the committed-state backend under the transactional
//! store. It answers point reads against the last committed state and
//! applies a whole block's `WriteBatch` as one atomic unit.
//!
//! Implementations:
//! - `RedbStore`: durable, one redb write transaction per batch
//! - `MemStore`: in-memory, for tests

use crate::batch::WriteBatch;
use crate::error::StoreError;

/// Committed-state backend.
///
/// Implementations must give readers snapshot isolation with respect to
/// `apply_batch`. A read that starts before a batch lands sees none of it.
/// A read that starts after sees all of it.
pub trait StateStore: Send + Sync {
    /// Get the committed value for a key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Durably apply every record in `batch`, all or nothing.
    fn apply_batch(&self, batch: &WriteBatch) -> Result<(), StoreError>;
}
