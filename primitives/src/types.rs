//! Core type aliases and constants for the KV store application.
//!
//! These are shared by the store, the block lifecycle state machine, and
//! the socket transport.

/// Raw key bytes of a record.
pub type Key = Vec<u8>;

/// Raw value bytes of a record.
pub type Value = Vec<u8>;

/// Byte separating key from value in a transaction payload (ASCII `=`).
pub const TX_SEPARATOR: u8 = b'=';

/// Gas reported as wanted by every `CheckTx` response.
pub const GAS_WANTED: i64 = 1;

/// Length in bytes of the digest returned by `Commit`.
pub const COMMIT_DIGEST_LEN: usize = 8;

/// Placeholder commit digest: eight zero bytes.
pub const ZERO_DIGEST: [u8; COMMIT_DIGEST_LEN] = [0u8; COMMIT_DIGEST_LEN];

/// Default ABCI listen port.
pub const DEFAULT_ABCI_PORT: u16 = 26658;

/// `Query` log text when the key is present in the committed snapshot.
pub const QUERY_LOG_EXISTS: &str = "exists";

/// `Query` log text when the key is absent from the committed snapshot.
pub const QUERY_LOG_MISSING: &str = "does not exist";

/// Render bytes for log output: UTF-8 text when printable, hex otherwise.
pub fn display_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => s.to_string(),
        _ => {
            let mut out = String::with_capacity(2 + bytes.len() * 2);
            out.push_str("0x");
            for byte in bytes {
                use std::fmt::Write;
                let _ = write!(out, "{:02x}", byte);
            }
            out
        }
    }
}
