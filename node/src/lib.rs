//! `kvstore-node`: ABCI socket server and node bootstrap.
//!
//! - [`config::NodeConfig`]: listen address, storage directory, log level
//! - [`server`]: TCP server, consensus actor, per-connection frame loop
//! - [`error::NodeError`]: transport and bootstrap failures

pub mod config;
pub mod error;
pub mod server;

pub use config::NodeConfig;
pub use error::NodeError;
pub use server::{run, serve, spawn_consensus, ConsensusHandle};
