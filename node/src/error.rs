//! Node error types.

use std::path::PathBuf;

use kvstore_app::AppError;
use kvstore_primitives::CodecError;
use kvstore_store::StoreError;

/// Top-level error type for the node crate.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Config file could not be read or parsed.
    #[error("config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Socket I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame on the wire could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Opening the store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The application rejected the call.
    #[error(transparent)]
    App(#[from] AppError),

    /// The consensus actor has stopped.
    #[error("consensus actor is not running")]
    ActorStopped,
}
