//! Buffered writes for one block.
//!
//! A `WriteBatch` collects every record written while a block is open.
//! Nothing in it is visible to readers until the whole batch is applied to
//! the backend in a single atomic transaction.

use std::collections::BTreeMap;

use kvstore_primitives::{Key, Value};

/// Write buffer for a block's records.
///
/// Uses `BTreeMap` so the batch is applied in key order on every node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: BTreeMap<Key, Value>,
}

impl WriteBatch {
    /// Create a new empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a record. A later write to the same key replaces the earlier one.
    pub fn put(&mut self, key: Key, value: Value) {
        self.writes.insert(key, value);
    }

    /// Look up a buffered value.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.writes.get(key)
    }

    /// Iterate buffered records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.writes.iter()
    }

    /// Number of distinct keys written.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
