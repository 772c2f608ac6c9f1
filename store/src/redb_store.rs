//! Durable state store on redb.
//!
//! All records live in a single table named `store`. redb allows one write
//! transaction at a time and serves readers from MVCC snapshots, so:
//!
//! - a block's batch is applied inside one write transaction and becomes
//!   visible (and durable) only when that transaction commits;
//! - every `get` opens its own read transaction and sees the last
//!   committed state, never a half-applied batch.

use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition};

use crate::batch::WriteBatch;
use crate::error::StoreError;
use crate::state_store::StateStore;

/// The single logical table mapping key bytes to value bytes.
const STORE_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("store");

/// File name of the database inside the storage directory.
pub const DB_FILE_NAME: &str = "state.redb";

/// redb-backed committed state.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the store under `storage_dir`.
    ///
    /// Creates the directory if it does not exist.
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = storage_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Self::open_file(dir.join(DB_FILE_NAME))
    }

    /// Open (or create) the store at an explicit database file path.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let db = Database::create(&path)?;

        // Create the table up front so readers never race its creation.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STORE_TABLE)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "opened redb store");
        Ok(Self { db, path })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

impl StateStore for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(STORE_TABLE)?;
        let value = table.get(key)?.map(|v| v.value().to_vec());
        Ok(value)
    }

    fn apply_batch(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STORE_TABLE)?;
            for (key, value) in batch.iter() {
                table.insert(key.as_slice(), value.as_slice())?;
            }
        }
        // Dropping an uncommitted transaction aborts it, so any `?` above
        // leaves the committed state untouched.
        write_txn.commit()?;
        Ok(())
    }
}
