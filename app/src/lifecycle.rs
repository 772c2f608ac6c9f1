//! Explicit block lifecycle phases.
//!
//! ```text
//! Idle ──BeginBlock──▶ BlockOpen
//!                          │  DeliverTx* / EndBlock
//!                          ▼
//!                      BlockOpen ──Commit──▶ Idle
//! ```

use std::fmt;

use kvstore_store::StateStore;

use crate::block::BlockScope;

/// Lifecycle phase, without the scope it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No block in progress.
    Idle,
    /// A block's write scope is open.
    BlockOpen,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::BlockOpen => write!(f, "BlockOpen"),
        }
    }
}

/// Lifecycle state owning the open block, if any.
#[derive(Debug)]
pub enum Lifecycle<S: StateStore> {
    Idle,
    BlockOpen(BlockScope<S>),
}

impl<S: StateStore> Lifecycle<S> {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::BlockOpen(_) => Phase::BlockOpen,
        }
    }
}

impl<S: StateStore> Default for Lifecycle<S> {
    fn default() -> Self {
        Self::Idle
    }
}
