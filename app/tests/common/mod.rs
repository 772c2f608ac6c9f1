//! Shared test helpers for integration tests.
//!
//! Provides app factories over the in-memory and redb backends, and thin
//! wrappers that drive the consensus state with raw payloads.

#![allow(dead_code)]

use kvstore_app::{ConsensusState, KvStoreApp};
use kvstore_primitives::abci::{response, Request, ResponseCheckTx, ResponseCommit, ResponseQuery};
use kvstore_store::{KvStore, MemStore, RedbStore, StateStore};

// ── Factories ──

pub fn mem_app() -> KvStoreApp<MemStore> {
    KvStoreApp::new(KvStore::new(MemStore::new()))
}

pub fn mem_consensus() -> ConsensusState<MemStore> {
    ConsensusState::new(mem_app())
}

pub fn redb_consensus(dir: &std::path::Path) -> ConsensusState<RedbStore> {
    let store = RedbStore::open(dir).unwrap();
    ConsensusState::new(KvStoreApp::new(KvStore::new(store)))
}

// ── Request Drivers ──

pub fn check_tx<S: StateStore>(cs: &mut ConsensusState<S>, tx: &str) -> ResponseCheckTx {
    match cs.handle(Request::check_tx(tx)).unwrap().value {
        Some(response::Value::CheckTx(r)) => r,
        other => panic!("expected CheckTx response, got {other:?}"),
    }
}

pub fn deliver_tx<S: StateStore>(cs: &mut ConsensusState<S>, tx: &str) -> u32 {
    match cs.handle(Request::deliver_tx(tx)).unwrap().value {
        Some(response::Value::DeliverTx(r)) => r.code,
        other => panic!("expected DeliverTx response, got {other:?}"),
    }
}

pub fn query<S: StateStore>(cs: &mut ConsensusState<S>, key: &str) -> ResponseQuery {
    match cs.handle(Request::query(key)).unwrap().value {
        Some(response::Value::Query(r)) => r,
        other => panic!("expected Query response, got {other:?}"),
    }
}

pub fn commit<S: StateStore>(cs: &mut ConsensusState<S>) -> ResponseCommit {
    match cs.handle(Request::commit()).unwrap().value {
        Some(response::Value::Commit(r)) => r,
        other => panic!("expected Commit response, got {other:?}"),
    }
}

/// Run one full block delivering `txs`, returning each DeliverTx code.
pub fn run_block<S: StateStore>(
    cs: &mut ConsensusState<S>,
    txs: &[&str],
) -> Vec<u32> {
    cs.handle(Request::begin_block()).unwrap();
    let codes = txs.iter().map(|tx| deliver_tx(cs, tx)).collect();
    let height = cs.height() as i64 + 1;
    cs.handle(Request::end_block(height)).unwrap();
    commit(cs);
    codes
}
