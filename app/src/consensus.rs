//! Wire-driven block lifecycle.
//!
//! `ConsensusState` owns the lifecycle for calls that arrive as `Request`
//! envelopes. It holds the open `BlockScope` between calls and rejects any
//! call that is not legal in the current phase:
//!
//! | Call       | Idle                 | BlockOpen              |
//! |------------|----------------------|------------------------|
//! | BeginBlock | open scope           | violation              |
//! | DeliverTx  | violation            | validate + buffer      |
//! | EndBlock   | violation            | mark ended             |
//! | Commit     | violation            | commit, back to Idle   |
//! | InitChain  | no-op                | no-op                  |
//!
//! Read and informational calls are legal in either phase.
//!
//! A violation leaves the phase unchanged. A failed commit discards the
//! block and returns to `Idle`.

use kvstore_primitives::abci::{request, Request, Response, ResponseBeginBlock, ResponseFlush};
use kvstore_store::StateStore;

use crate::application::KvStoreApp;
use crate::error::AppError;
use crate::lifecycle::{Lifecycle, Phase};

/// Serialized block driver over a `KvStoreApp`.
#[derive(Debug)]
pub struct ConsensusState<S: StateStore> {
    app: KvStoreApp<S>,
    lifecycle: Lifecycle<S>,
    height: u64,
}

impl<S: StateStore> ConsensusState<S> {
    pub fn new(app: KvStoreApp<S>) -> Self {
        Self {
            app,
            lifecycle: Lifecycle::Idle,
            height: 0,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Number of blocks committed through this driver.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn app(&self) -> &KvStoreApp<S> {
        &self.app
    }

    /// Dispatch one request.
    ///
    /// Recoverable transaction outcomes come back as response codes inside
    /// `Ok`. `Err` means the call could not be honored at all.
    pub fn handle(&mut self, req: Request) -> Result<Response, AppError> {
        let value = req.value.ok_or(AppError::EmptyRequest)?;
        let name = value.name();
        tracing::trace!(call = name, phase = %self.phase(), "handle request");

        self.dispatch(name, value).inspect_err(|e| {
            if matches!(e, AppError::ProtocolViolation { .. }) {
                tracing::error!(error = %e, "rejected out-of-order call");
            }
        })
    }

    fn dispatch(
        &mut self,
        name: &'static str,
        value: request::Value,
    ) -> Result<Response, AppError> {
        let resp = match value {
            request::Value::Echo(r) => self.app.echo(&r).into(),
            request::Value::Flush(_) => ResponseFlush {}.into(),
            request::Value::Info(r) => self.app.info(&r).into(),
            request::Value::SetOption(r) => self.app.set_option(&r).into(),
            request::Value::Query(r) => self.app.query(&r)?.into(),
            request::Value::CheckTx(r) => self.app.check_tx(&r)?.into(),

            request::Value::InitChain(r) => self.app.init_chain(&r).into(),
            request::Value::BeginBlock(r) => {
                self.require_idle(name)?;
                let block = self.app.begin_block(&r)?;
                self.lifecycle = Lifecycle::BlockOpen(block);
                ResponseBeginBlock {}.into()
            }
            request::Value::DeliverTx(r) => match &mut self.lifecycle {
                Lifecycle::BlockOpen(block) => self.app.deliver_tx(block, &r)?.into(),
                Lifecycle::Idle => return Err(AppError::violation(name, Phase::Idle)),
            },
            request::Value::EndBlock(r) => match &mut self.lifecycle {
                Lifecycle::BlockOpen(block) => self.app.end_block(block, &r).into(),
                Lifecycle::Idle => return Err(AppError::violation(name, Phase::Idle)),
            },
            request::Value::Commit(_) => {
                let Lifecycle::BlockOpen(block) = std::mem::take(&mut self.lifecycle) else {
                    return Err(AppError::violation(name, Phase::Idle));
                };
                let resp = self.app.commit(block)?;
                self.height += 1;
                resp.into()
            }
        };
        Ok(resp)
    }

    fn require_idle(&self, call: &'static str) -> Result<(), AppError> {
        match self.phase() {
            Phase::Idle => Ok(()),
            phase => Err(AppError::violation(call, phase)),
        }
    }
}
