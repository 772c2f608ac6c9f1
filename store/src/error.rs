//! Store error types.

/// Errors raised by the transactional key-value store.
///
/// Every variant is fatal for the call that hit it. The store never retries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write scope is already open. Only one block may write at a time.
    #[error("a write scope is already open")]
    ScopeAlreadyOpen,

    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend failure not covered by the variants above.
    #[error("backend error: {0}")]
    Backend(String),
}
