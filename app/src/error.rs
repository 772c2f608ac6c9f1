//! Application error types.

use kvstore_store::StoreError;

use crate::lifecycle::Phase;

/// Fatal errors from the block lifecycle state machine.
///
/// Recoverable transaction outcomes (malformed, duplicate) are not errors;
/// they are reported as response codes. Everything here terminates the
/// call that raised it and must be surfaced to the consensus engine.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A lifecycle call arrived in a phase where it is not allowed.
    #[error("protocol violation: {call} received while {phase}")]
    ProtocolViolation { call: &'static str, phase: Phase },

    /// The store failed to read or commit.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A request envelope carried no call.
    #[error("request carries no value")]
    EmptyRequest,
}

impl AppError {
    pub(crate) fn violation(call: &'static str, phase: Phase) -> Self {
        Self::ProtocolViolation { call, phase }
    }
}
