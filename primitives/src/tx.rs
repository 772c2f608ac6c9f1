//! Transaction payload decoding.
//!
//! Transactions arrive as opaque bytes. The only structure is a single
//! separator splitting key from value:
//!
//! ```text
//! [key bytes] '=' [value bytes]
//! ```
//!
//! The split happens at the first `=`. Everything after it, including any
//! further `=` bytes, is the value. There is no escaping.

use crate::types::{Key, Value, TX_SEPARATOR};

/// A decoded `key=value` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvTx {
    /// Record key (bytes before the first separator).
    pub key: Key,
    /// Record value (bytes after the first separator).
    pub value: Value,
}

impl KvTx {
    /// Build a transaction from its parts.
    pub fn new(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Decode a raw payload. Returns `None` if no separator is present.
    pub fn decode(raw: &[u8]) -> Option<Self> {
        let (key, value) = split_tx(raw)?;
        Some(Self::new(key, value))
    }
}

/// Split a raw payload on the first separator without copying.
pub fn split_tx(raw: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = raw.iter().position(|b| *b == TX_SEPARATOR)?;
    Some((&raw[..pos], &raw[pos + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple() {
        let tx = KvTx::decode(b"foo=bar").unwrap();
        assert_eq!(tx.key, b"foo");
        assert_eq!(tx.value, b"bar");
    }

    #[test]
    fn test_decode_no_separator() {
        assert_eq!(KvTx::decode(b"nosuchseparator"), None);
        assert_eq!(KvTx::decode(b""), None);
    }

    #[test]
    fn test_decode_splits_on_first_separator() {
        let tx = KvTx::decode(b"a=b=c").unwrap();
        assert_eq!(tx.key, b"a");
        assert_eq!(tx.value, b"b=c");
    }

    #[test]
    fn test_decode_empty_parts() {
        let tx = KvTx::decode(b"=v").unwrap();
        assert!(tx.key.is_empty());
        assert_eq!(tx.value, b"v");

        let tx = KvTx::decode(b"k=").unwrap();
        assert_eq!(tx.key, b"k");
        assert!(tx.value.is_empty());

        let tx = KvTx::decode(b"=").unwrap();
        assert!(tx.key.is_empty());
        assert!(tx.value.is_empty());
    }

    #[test]
    fn test_decode_binary_bytes() {
        let raw = [0x00, 0xff, b'=', 0x01, 0x3d];
        let tx = KvTx::decode(&raw).unwrap();
        assert_eq!(tx.key, vec![0x00, 0xff]);
        assert_eq!(tx.value, vec![0x01, 0x3d]);
    }

    #[test]
    fn test_split_tx_borrows() {
        let raw = b"key=value";
        let (k, v) = split_tx(raw).unwrap();
        assert_eq!(k, b"key");
        assert_eq!(v, b"value");
    }
}
