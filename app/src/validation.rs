//! Transaction admission check.
//!
//! Shared by `CheckTx` and `DeliverTx`:
//!
//! 1. Split the payload on the first `=`. No separator → `Malformed`.
//! 2. Look the key up in the committed snapshot. Stored value byte-equal
//!    to the payload value → `Duplicate`.
//! 3. Otherwise → `Ok`.
//!
//! The lookup always goes to committed state, even while a block is open.
//! Two identical transactions in the same block are therefore both
//! accepted: the first one's write is not yet visible to the second.

use kvstore_primitives::{KvTx, ResponseCode};
use kvstore_store::{KvStore, StateStore, StoreError};

/// Outcome of checking one transaction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxCheck {
    /// Well formed and not already applied.
    Accepted(KvTx),
    /// No separator in the payload.
    Malformed,
    /// Committed state already holds this key with this value.
    Duplicate,
}

impl TxCheck {
    /// Wire code for this outcome.
    pub fn code(&self) -> ResponseCode {
        match self {
            Self::Accepted(_) => ResponseCode::Ok,
            Self::Malformed => ResponseCode::Malformed,
            Self::Duplicate => ResponseCode::Duplicate,
        }
    }
}

/// Check a raw payload against the committed snapshot.
pub fn check_tx<S: StateStore>(store: &KvStore<S>, raw: &[u8]) -> Result<TxCheck, StoreError> {
    let Some(tx) = KvTx::decode(raw) else {
        return Ok(TxCheck::Malformed);
    };

    match store.get(&tx.key)? {
        Some(stored) if stored == tx.value => Ok(TxCheck::Duplicate),
        _ => Ok(TxCheck::Accepted(tx)),
    }
}

/// Validate a raw payload, returning only its response code.
pub fn validate_tx<S: StateStore>(
    store: &KvStore<S>,
    raw: &[u8],
) -> Result<ResponseCode, StoreError> {
    Ok(check_tx(store, raw)?.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstore_store::{MemStore, WriteBatch};

    fn store_with(pairs: &[(&[u8], &[u8])]) -> KvStore<MemStore> {
        let mem = MemStore::new();
        let mut batch = WriteBatch::new();
        for (k, v) in pairs {
            batch.put(k.to_vec(), v.to_vec());
        }
        mem.apply_batch(&batch).unwrap();
        KvStore::new(mem)
    }

    #[test]
    fn test_new_key_accepted() {
        let store = store_with(&[]);
        assert_eq!(
            check_tx(&store, b"foo=bar").unwrap(),
            TxCheck::Accepted(KvTx::new(b"foo".to_vec(), b"bar".to_vec()))
        );
        assert_eq!(validate_tx(&store, b"foo=bar").unwrap(), ResponseCode::Ok);
    }

    #[test]
    fn test_no_separator_malformed() {
        let store = store_with(&[]);
        assert_eq!(validate_tx(&store, b"nosuchseparator").unwrap(), ResponseCode::Malformed);
        assert_eq!(validate_tx(&store, b"").unwrap(), ResponseCode::Malformed);
    }

    #[test]
    fn test_identical_record_duplicate() {
        let store = store_with(&[(b"foo", b"bar")]);
        assert_eq!(validate_tx(&store, b"foo=bar").unwrap(), ResponseCode::Duplicate);
    }

    #[test]
    fn test_changed_value_accepted() {
        let store = store_with(&[(b"foo", b"bar")]);
        assert_eq!(validate_tx(&store, b"foo=baz").unwrap(), ResponseCode::Ok);
        assert_eq!(validate_tx(&store, b"foo=").unwrap(), ResponseCode::Ok);
    }

    #[test]
    fn test_value_containing_separator() {
        let store = store_with(&[(b"a", b"b=c")]);
        assert_eq!(validate_tx(&store, b"a=b=c").unwrap(), ResponseCode::Duplicate);
        assert_eq!(validate_tx(&store, b"a=b").unwrap(), ResponseCode::Ok);
    }

    #[test]
    fn test_empty_value_duplicate() {
        let store = store_with(&[(b"k", b"")]);
        assert_eq!(validate_tx(&store, b"k=").unwrap(), ResponseCode::Duplicate);
    }

    #[test]
    fn test_ignores_open_scope() {
        let store = store_with(&[]);
        let mut scope = store.open_write_scope().unwrap();
        scope.put(b"foo".to_vec(), b"bar".to_vec());

        // The pending write is invisible to validation.
        assert_eq!(validate_tx(&store, b"foo=bar").unwrap(), ResponseCode::Ok);
    }

    #[test]
    fn test_store_failure_propagates() {
        struct BrokenStore;
        impl StateStore for BrokenStore {
            fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
                Err(StoreError::Backend("read failed".into()))
            }
            fn apply_batch(&self, _batch: &WriteBatch) -> Result<(), StoreError> {
                Err(StoreError::Backend("write failed".into()))
            }
        }

        let store = KvStore::new(BrokenStore);
        assert!(validate_tx(&store, b"foo=bar").is_err());
        // Malformed payloads never touch the store.
        assert_eq!(validate_tx(&store, b"nope").unwrap(), ResponseCode::Malformed);
    }
}
