//! `kvstore-app`: the key-value store ABCI application.
//!
//! This crate implements the block lifecycle over a transactional store:
//! validate each transaction against committed state, buffer accepted
//! records in the block's write scope, and commit the block atomically.
//!
//! ## Architecture
//!
//! - [`validation`]: payload split and duplicate check shared by `CheckTx` and `DeliverTx`
//! - [`application::KvStoreApp`]: one method per ABCI call; the block scope is passed explicitly
//! - [`block::BlockScope`]: the open block's write scope and counters
//! - [`consensus::ConsensusState`]: lifecycle state machine for wire-driven calls
//! - [`digest::CommitDigest`]: hook producing the `Commit` response digest

pub mod error;
pub mod validation;
pub mod digest;
pub mod block;
pub mod lifecycle;
pub mod application;
pub mod consensus;

// Re-export key types for convenience
pub use application::KvStoreApp;
pub use block::{BlockScope, BlockStats};
pub use consensus::ConsensusState;
pub use digest::{CommitDigest, PlaceholderDigest};
pub use error::AppError;
pub use lifecycle::{Lifecycle, Phase};
pub use validation::{check_tx, validate_tx, TxCheck};
