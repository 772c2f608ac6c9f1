//! Node configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use kvstore_primitives::types::DEFAULT_ABCI_PORT;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Configuration for the KV store node.
///
/// Every field has a default, so a config file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Address the ABCI socket server binds.
    /// Default: `127.0.0.1:26658`.
    pub listen_addr: SocketAddr,

    /// Directory holding the redb database file.
    /// Default: `tmp/storage`.
    pub storage_dir: PathBuf,

    /// Default log level when `RUST_LOG` is unset and no `-v` is given.
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_ABCI_PORT)),
            storage_dir: PathBuf::from("tmp/storage"),
            log_level: "info".to_string(),
        }
    }
}

impl NodeConfig {
    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| NodeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            NodeError::Config { reason, .. } => NodeError::Config {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a config from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, NodeError> {
        serde_json::from_str(raw).map_err(|e| NodeError::Config {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }
}
