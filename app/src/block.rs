//! The open block: its write scope and delivery counters.

use kvstore_primitives::ResponseCode;
use kvstore_store::{StateStore, WriteBatch, WriteScope};

/// Per-block transaction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockStats {
    /// `DeliverTx` calls received.
    pub delivered: u64,
    /// Transactions written into the scope.
    pub accepted: u64,
    /// Transactions rejected for a missing separator.
    pub malformed: u64,
    /// Transactions rejected as already applied.
    pub duplicate: u64,
}

impl BlockStats {
    /// Count one delivered transaction by its outcome.
    pub fn record(&mut self, code: ResponseCode) {
        self.delivered += 1;
        match code {
            ResponseCode::Ok => self.accepted += 1,
            ResponseCode::Malformed => self.malformed += 1,
            ResponseCode::Duplicate => self.duplicate += 1,
        }
    }
}

/// Handle for the block currently being built.
///
/// Returned by `begin_block`, borrowed mutably by `deliver_tx` and
/// `end_block`, and consumed by `commit`. Holding one means holding the
/// store's only write scope.
pub struct BlockScope<S: StateStore> {
    pub(crate) scope: WriteScope<S>,
    pub(crate) stats: BlockStats,
    pub(crate) ended: bool,
}

impl<S: StateStore> BlockScope<S> {
    pub(crate) fn new(scope: WriteScope<S>) -> Self {
        Self {
            scope,
            stats: BlockStats::default(),
            ended: false,
        }
    }

    /// Counters for the transactions delivered so far.
    pub fn stats(&self) -> BlockStats {
        self.stats
    }

    /// Records this block will write on commit.
    pub fn pending(&self) -> &WriteBatch {
        self.scope.batch()
    }

    /// Whether `EndBlock` has been received.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl<S: StateStore> std::fmt::Debug for BlockScope<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockScope")
            .field("scope", &self.scope)
            .field("stats", &self.stats)
            .field("ended", &self.ended)
            .finish()
    }
}
