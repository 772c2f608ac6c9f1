//! The KV store application: one method per ABCI call.
//!
//! `KvStoreApp` is the deterministic core. The block write scope is an
//! explicit value rather than application state:
//!
//! - `begin_block` opens the store's write scope and returns a `BlockScope`
//! - `deliver_tx` / `end_block` borrow it mutably
//! - `commit` consumes it, so a committed block cannot be written again
//!
//! Read calls (`check_tx`, `query`) take `&self` and only touch committed
//! state. A clone of the app can serve them while another clone is in the
//! middle of a block.

use std::sync::Arc;

use kvstore_primitives::abci::{
    RequestBeginBlock, RequestCheckTx, RequestDeliverTx, RequestEcho, RequestEndBlock,
    RequestInfo, RequestInitChain, RequestQuery, RequestSetOption, ResponseBeginBlock,
    ResponseCheckTx, ResponseCommit, ResponseDeliverTx, ResponseEcho, ResponseEndBlock,
    ResponseInfo, ResponseInitChain, ResponseQuery, ResponseSetOption,
};
use kvstore_primitives::types::{display_bytes, QUERY_LOG_EXISTS, QUERY_LOG_MISSING};
use kvstore_primitives::GAS_WANTED;
use kvstore_store::{KvStore, StateStore, StoreError};

use crate::block::BlockScope;
use crate::digest::{CommitDigest, PlaceholderDigest};
use crate::error::AppError;
use crate::lifecycle::Phase;
use crate::validation::{check_tx, validate_tx, TxCheck};

/// The deterministic application over a transactional store.
pub struct KvStoreApp<S: StateStore> {
    store: KvStore<S>,
    digest: Arc<dyn CommitDigest>,
}

impl<S: StateStore> Clone for KvStoreApp<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            digest: Arc::clone(&self.digest),
        }
    }
}

impl<S: StateStore> std::fmt::Debug for KvStoreApp<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStoreApp")
            .field("block_open", &self.store.has_open_scope())
            .finish_non_exhaustive()
    }
}

impl<S: StateStore> KvStoreApp<S> {
    /// Create an app with the placeholder commit digest.
    pub fn new(store: KvStore<S>) -> Self {
        Self {
            store,
            digest: Arc::new(PlaceholderDigest),
        }
    }

    /// Replace the commit digest hook.
    pub fn with_digest(mut self, digest: impl CommitDigest + 'static) -> Self {
        self.digest = Arc::new(digest);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &KvStore<S> {
        &self.store
    }

    // ── Informational calls ──

    pub fn echo(&self, _req: &RequestEcho) -> ResponseEcho {
        ResponseEcho::default()
    }

    pub fn info(&self, _req: &RequestInfo) -> ResponseInfo {
        ResponseInfo::default()
    }

    pub fn set_option(&self, _req: &RequestSetOption) -> ResponseSetOption {
        ResponseSetOption::default()
    }

    /// No genesis state is loaded.
    pub fn init_chain(&self, req: &RequestInitChain) -> ResponseInitChain {
        tracing::debug!(chain_id = %req.chain_id, "init chain");
        ResponseInitChain::default()
    }

    // ── Read calls ──

    /// Admission check against the committed snapshot. Never mutates state.
    pub fn check_tx(&self, req: &RequestCheckTx) -> Result<ResponseCheckTx, AppError> {
        let code = validate_tx(&self.store, &req.tx).map_err(|e| self.read_failure("CheckTx", e))?;
        tracing::trace!(tx = %display_bytes(&req.tx), %code, "check tx");
        Ok(ResponseCheckTx {
            code: code.as_u32(),
            gas_wanted: GAS_WANTED,
            ..Default::default()
        })
    }

    /// Point lookup against the committed snapshot, never the open block.
    pub fn query(&self, req: &RequestQuery) -> Result<ResponseQuery, AppError> {
        let found = self
            .store
            .get(&req.data)
            .map_err(|e| self.read_failure("Query", e))?;

        let resp = match found {
            Some(value) => ResponseQuery {
                log: QUERY_LOG_EXISTS.to_string(),
                key: req.data.clone(),
                value,
                ..Default::default()
            },
            None => ResponseQuery {
                log: QUERY_LOG_MISSING.to_string(),
                ..Default::default()
            },
        };
        Ok(resp)
    }

    // ── Block lifecycle ──

    /// Open the block write scope.
    ///
    /// Fails with `ProtocolViolation` if a block is already open.
    pub fn begin_block(&self, req: &RequestBeginBlock) -> Result<BlockScope<S>, AppError> {
        let scope = self.store.open_write_scope().map_err(|e| match e {
            StoreError::ScopeAlreadyOpen => AppError::violation("BeginBlock", Phase::BlockOpen),
            other => AppError::Store(other),
        })?;
        tracing::debug!(hash = %display_bytes(&req.hash), "begin block");
        Ok(BlockScope::new(scope))
    }

    /// Validate against committed state and, if accepted, buffer the record.
    pub fn deliver_tx(
        &self,
        block: &mut BlockScope<S>,
        req: &RequestDeliverTx,
    ) -> Result<ResponseDeliverTx, AppError> {
        let checked = check_tx(&self.store, &req.tx).map_err(|e| {
            tracing::error!(error = %e, "deliver tx: store read failed");
            AppError::Store(e)
        })?;
        let code = checked.code();
        block.stats.record(code);

        match checked {
            TxCheck::Accepted(tx) => {
                tracing::trace!(key = %display_bytes(&tx.key), "deliver tx accepted");
                block.scope.put(tx.key, tx.value);
            }
            TxCheck::Malformed | TxCheck::Duplicate => {
                tracing::debug!(tx = %display_bytes(&req.tx), %code, "deliver tx rejected");
            }
        }

        Ok(ResponseDeliverTx {
            code: code.as_u32(),
            ..Default::default()
        })
    }

    pub fn end_block(&self, block: &mut BlockScope<S>, req: &RequestEndBlock) -> ResponseEndBlock {
        block.ended = true;
        tracing::debug!(height = req.height, "end block");
        ResponseEndBlock::default()
    }

    /// Atomically commit the block and close its scope.
    ///
    /// On a storage failure nothing from the block is persisted.
    pub fn commit(&self, block: BlockScope<S>) -> Result<ResponseCommit, AppError> {
        let BlockScope { scope, stats, .. } = block;
        let data = self.digest.digest(scope.batch());

        let written = scope.commit().map_err(|e| {
            tracing::error!(error = %e, "commit failed, block discarded");
            AppError::Store(e)
        })?;

        tracing::info!(
            records = written,
            delivered = stats.delivered,
            accepted = stats.accepted,
            malformed = stats.malformed,
            duplicate = stats.duplicate,
            "block committed"
        );
        Ok(ResponseCommit {
            data,
            retain_height: 0,
        })
    }

    fn read_failure(&self, call: &'static str, err: StoreError) -> AppError {
        tracing::error!(call, error = %err, "store read failed");
        AppError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstore_primitives::ResponseCode;
    use kvstore_store::{MemStore, WriteBatch};

    fn app() -> KvStoreApp<MemStore> {
        KvStoreApp::new(KvStore::new(MemStore::new()))
    }

    fn deliver(app: &KvStoreApp<MemStore>, block: &mut BlockScope<MemStore>, tx: &[u8]) -> u32 {
        app.deliver_tx(block, &RequestDeliverTx { tx: tx.to_vec() })
            .unwrap()
            .code
    }

    fn check(app: &KvStoreApp<MemStore>, tx: &[u8]) -> ResponseCheckTx {
        app.check_tx(&RequestCheckTx {
            tx: tx.to_vec(),
            ..Default::default()
        })
        .unwrap()
    }

    fn query(app: &KvStoreApp<MemStore>, key: &[u8]) -> ResponseQuery {
        app.query(&RequestQuery {
            data: key.to_vec(),
            ..Default::default()
        })
        .unwrap()
    }

    // ── Test: informational calls are empty ──

    #[test]
    fn test_noop_calls_return_empty() {
        let app = app();
        assert_eq!(
            app.echo(&RequestEcho { message: "hi".into() }),
            ResponseEcho::default()
        );
        assert_eq!(app.info(&RequestInfo::default()), ResponseInfo::default());
        assert_eq!(
            app.set_option(&RequestSetOption::default()),
            ResponseSetOption::default()
        );
        assert_eq!(
            app.init_chain(&RequestInitChain::default()),
            ResponseInitChain::default()
        );
    }

    // ── Test: check tx reports gas wanted ──

    #[test]
    fn test_check_tx_gas_wanted() {
        let app = app();
        let resp = check(&app, b"foo=bar");
        assert_eq!(resp.code, ResponseCode::Ok.as_u32());
        assert_eq!(resp.gas_wanted, 1);

        let resp = check(&app, b"nosep");
        assert_eq!(resp.code, ResponseCode::Malformed.as_u32());
        assert_eq!(resp.gas_wanted, 1);
    }

    // ── Test: full block then reads ──

    #[test]
    fn test_block_then_query() {
        let app = app();
        let mut block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        assert_eq!(deliver(&app, &mut block, b"foo=bar"), 0);
        app.end_block(&mut block, &RequestEndBlock { height: 1 });
        assert!(block.is_ended());

        let resp = app.commit(block).unwrap();
        assert_eq!(resp.data, vec![0u8; 8]);

        let q = query(&app, b"foo");
        assert_eq!(q.log, "exists");
        assert_eq!(q.key, b"foo");
        assert_eq!(q.value, b"bar");

        assert_eq!(check(&app, b"foo=bar").code, 2);
        assert_eq!(check(&app, b"foo=baz").code, 0);
    }

    // ── Test: query miss ──

    #[test]
    fn test_query_missing() {
        let q = query(&app(), b"nothing");
        assert_eq!(q.log, "does not exist");
        assert!(q.key.is_empty());
        assert!(q.value.is_empty());
    }

    // ── Test: uncommitted writes are invisible ──

    #[test]
    fn test_open_block_invisible_to_reads() {
        let app = app();
        let mut block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        deliver(&app, &mut block, b"foo=bar");

        assert_eq!(query(&app, b"foo").log, "does not exist");
        assert_eq!(check(&app, b"foo=bar").code, 0);
        assert_eq!(block.pending().get(b"foo"), Some(&b"bar".to_vec()));
    }

    // ── Test: same-block duplicates are both accepted ──

    #[test]
    fn test_same_block_duplicates_both_accepted() {
        let app = app();
        let mut block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        assert_eq!(deliver(&app, &mut block, b"k=v"), 0);
        assert_eq!(deliver(&app, &mut block, b"k=v"), 0);
        assert_eq!(block.stats().accepted, 2);
        assert_eq!(block.pending().len(), 1);
        app.commit(block).unwrap();

        assert_eq!(check(&app, b"k=v").code, 2);
    }

    // ── Test: rejected tx leaves scope untouched ──

    #[test]
    fn test_rejected_tx_not_written() {
        let app = app();
        let mut block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        assert_eq!(deliver(&app, &mut block, b"nosuchseparator"), 1);
        assert!(block.pending().is_empty());
        assert_eq!(block.stats().malformed, 1);
        app.commit(block).unwrap();

        assert_eq!(query(&app, b"nosuchseparator").log, "does not exist");
    }

    // ── Test: second begin block is a violation ──

    #[test]
    fn test_begin_block_twice() {
        let app = app();
        let _block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        let err = app.begin_block(&RequestBeginBlock::default()).unwrap_err();
        assert!(matches!(
            err,
            AppError::ProtocolViolation { call: "BeginBlock", phase: Phase::BlockOpen }
        ));
    }

    // ── Test: custom digest hook ──

    #[test]
    fn test_custom_digest() {
        let app = app().with_digest(|block: &WriteBatch| {
            let mut out = Vec::new();
            for (k, v) in block.iter() {
                out.extend_from_slice(k);
                out.extend_from_slice(v);
            }
            out
        });
        let mut block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        deliver(&app, &mut block, b"b=2");
        deliver(&app, &mut block, b"a=1");
        assert_eq!(app.commit(block).unwrap().data, b"a1b2");
    }

    // ── Test: failed commit persists nothing ──

    #[test]
    fn test_failed_commit_atomic() {
        let app = app();
        let mut block = app.begin_block(&RequestBeginBlock::default()).unwrap();
        for tx in [b"a=1", b"b=2", b"c=3"] {
            assert_eq!(deliver(&app, &mut block, tx), 0);
        }

        app.store().backend().fail_next_commit();
        let err = app.commit(block).unwrap_err();
        assert!(matches!(err, AppError::Store(_)));

        for key in [b"a", b"b", b"c"] {
            assert_eq!(query(&app, key).log, "does not exist");
        }
        // The scope was released; a new block can start.
        assert!(app.begin_block(&RequestBeginBlock::default()).is_ok());
    }
}
