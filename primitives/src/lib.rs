//! `kvstore-primitives`: shared types for the KV store ABCI application.
//!
//! This crate provides the transaction payload format, validation response
//! codes, the ABCI request/response messages, and the length-delimited frame
//! codec used by the socket transport. It is shared by the store, the block
//! lifecycle state machine, and the node.

pub mod types;
pub mod error;
pub mod tx;
pub mod abci;
pub mod codec;

// Re-export commonly used types at the crate root for convenience.
pub use types::{Key, Value, COMMIT_DIGEST_LEN, GAS_WANTED, TX_SEPARATOR, ZERO_DIGEST};
pub use error::{CodecError, ResponseCode};
pub use tx::{split_tx, KvTx};
pub use abci::{Request, Response};
pub use codec::{AbciCodec, ClientCodec, ServerCodec};
