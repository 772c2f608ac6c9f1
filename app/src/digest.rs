//! Commit digest hook.
//!
//! `Commit` returns a digest of the application state in its `data` field.
//! The digest is produced by a `CommitDigest` implementation so a real
//! state hash can be swapped in without touching the lifecycle code. The
//! default, `PlaceholderDigest`, always returns eight zero bytes.

use kvstore_primitives::ZERO_DIGEST;
use kvstore_store::WriteBatch;

/// Produces the `Commit` response digest for a block.
pub trait CommitDigest: Send + Sync {
    /// Compute the digest for a block about to be committed.
    ///
    /// `block` holds the records the block writes, in key order.
    fn digest(&self, block: &WriteBatch) -> Vec<u8>;
}

/// Fixed all-zero 8-byte digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderDigest;

impl CommitDigest for PlaceholderDigest {
    fn digest(&self, _block: &WriteBatch) -> Vec<u8> {
        ZERO_DIGEST.to_vec()
    }
}

impl<F> CommitDigest for F
where
    F: Fn(&WriteBatch) -> Vec<u8> + Send + Sync,
{
    fn digest(&self, block: &WriteBatch) -> Vec<u8> {
        self(block)
    }
}
