//! `kvstore-store`: transactional key-value store for the KV store application.
//!
//! This crate provides:
//!
//! - `KvStore` / `WriteScope`: one exclusive block write scope at a time,
//!   atomic commit, and reads that only see committed state
//! - `StateStore` trait: committed-state backend abstraction
//! - `RedbStore`: durable redb backend rooted at a storage directory
//! - `MemStore`: in-memory backend for tests, with commit fault injection
//! - `WriteBatch`: the key-ordered buffer a scope commits
//! - `StoreError`: storage error type

pub mod error;
pub mod batch;
pub mod state_store;
pub mod mem_store;
pub mod redb_store;
pub mod kv;

// Re-export commonly used types at the crate root.
pub use error::StoreError;
pub use batch::WriteBatch;
pub use state_store::StateStore;
pub use mem_store::MemStore;
pub use redb_store::RedbStore;
pub use kv::{KvStore, WriteScope};
