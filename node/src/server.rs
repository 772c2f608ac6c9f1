//! ABCI socket server.
//!
//! Each accepted connection reads length-delimited `Request` frames and
//! writes one `Response` frame per request, in order.
//!
//! - Block lifecycle calls (`InitChain`, `BeginBlock`, `DeliverTx`,
//!   `EndBlock`, `Commit`) are forwarded to the consensus actor. The actor
//!   is a dedicated thread that exclusively owns the `ConsensusState`, so
//!   lifecycle calls are serialized no matter which connection sends them.
//! - Read calls (`Echo`, `Flush`, `Info`, `SetOption`, `Query`, `CheckTx`)
//!   are answered on the connection task from a clone of the app. They
//!   never wait on the actor. `Query` and `CheckTx` hit the store, so they
//!   run on the blocking pool.
//!
//! A fatal error on a connection is answered with a `ResponseException`
//! and the connection is closed.

use std::future::Future;
use std::net::SocketAddr;
use std::thread::JoinHandle;

use kvstore_app::{AppError, ConsensusState, KvStoreApp};
use kvstore_primitives::abci::{request, Request, Response, ResponseFlush};
use kvstore_primitives::ServerCodec;
use kvstore_store::StateStore;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio_util::codec::Framed;

use crate::error::NodeError;

/// Pending lifecycle calls the actor may queue before senders wait.
const CONSENSUS_QUEUE_DEPTH: usize = 64;

// ── Consensus actor ──

struct ConsensusCall {
    req: Request,
    reply: oneshot::Sender<Result<Response, AppError>>,
}

/// Sender side of the consensus actor. Cheap to clone.
#[derive(Clone)]
pub struct ConsensusHandle {
    tx: mpsc::Sender<ConsensusCall>,
}

impl ConsensusHandle {
    /// Send a lifecycle call to the actor and wait for its answer.
    pub async fn call(&self, req: Request) -> Result<Response, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ConsensusCall { req, reply })
            .await
            .map_err(|_| NodeError::ActorStopped)?;
        let result = rx.await.map_err(|_| NodeError::ActorStopped)?;
        Ok(result?)
    }
}

/// Start the consensus actor thread.
///
/// The thread exits once every `ConsensusHandle` has been dropped. An open
/// block is discarded at that point.
pub fn spawn_consensus<S>(
    mut state: ConsensusState<S>,
) -> Result<(ConsensusHandle, JoinHandle<()>), NodeError>
where
    S: StateStore + 'static,
{
    let (tx, mut rx) = mpsc::channel::<ConsensusCall>(CONSENSUS_QUEUE_DEPTH);
    let thread = std::thread::Builder::new()
        .name("consensus".into())
        .spawn(move || {
            tracing::debug!("consensus actor started");
            while let Some(call) = rx.blocking_recv() {
                let result = state.handle(call.req);
                // The caller may have gone away; the state change stands.
                let _ = call.reply.send(result);
            }
            tracing::debug!(
                height = state.height(),
                phase = %state.phase(),
                "consensus actor stopped"
            );
        })?;
    Ok((ConsensusHandle { tx }, thread))
}

// ── Server ──

/// Accept ABCI connections on `listener` until `shutdown` resolves.
///
/// On shutdown, open connections are closed and the consensus actor is
/// joined before returning.
pub async fn serve<S, F>(
    listener: TcpListener,
    app: KvStoreApp<S>,
    shutdown: F,
) -> Result<(), NodeError>
where
    S: StateStore + 'static,
    F: Future<Output = ()>,
{
    let (consensus, actor) = spawn_consensus(ConsensusState::new(app.clone()))?;
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    tracing::info!(addr = %listener.local_addr()?, "ABCI server listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                tracing::debug!(%peer, "connection opened");
                let app = app.clone();
                let consensus = consensus.clone();
                connections.spawn(async move {
                    match handle_connection(stream, &app, &consensus).await {
                        Ok(()) => tracing::debug!(%peer, "connection closed"),
                        Err(e) => {
                            tracing::warn!(%peer, error = %e, "connection closed with error")
                        }
                    }
                });
            }
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        tracing::error!(error = %e, "connection task panicked");
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!(open = connections.len(), "server shutting down");
    connections.shutdown().await;
    drop(consensus);

    tokio::task::spawn_blocking(move || {
        if actor.join().is_err() {
            tracing::error!("consensus actor panicked");
        }
    })
    .await
    .map_err(|e| NodeError::Io(std::io::Error::other(e)))?;

    tracing::info!("server stopped");
    Ok(())
}

/// Serve one connection until the peer closes it or a fatal error occurs.
async fn handle_connection<S: StateStore + 'static>(
    stream: TcpStream,
    app: &KvStoreApp<S>,
    consensus: &ConsensusHandle,
) -> Result<(), NodeError> {
    stream.set_nodelay(true)?;
    let mut framed = Framed::new(stream, ServerCodec::new());

    while let Some(frame) = framed.next().await {
        let outcome = match frame {
            Ok(req) => dispatch(app, consensus, req).await,
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(resp) => framed.send(resp).await?,
            Err(e) => {
                framed.send(Response::exception(e.to_string())).await?;
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Route one request to the consensus actor or the read path.
async fn dispatch<S: StateStore + 'static>(
    app: &KvStoreApp<S>,
    consensus: &ConsensusHandle,
    req: Request,
) -> Result<Response, NodeError> {
    let value = req.value.ok_or(AppError::EmptyRequest)?;
    tracing::trace!(call = value.name(), lifecycle = value.is_consensus(), "request");
    let resp = match value {
        request::Value::Echo(r) => app.echo(&r).into(),
        request::Value::Flush(_) => ResponseFlush {}.into(),
        request::Value::Info(r) => app.info(&r).into(),
        request::Value::SetOption(r) => app.set_option(&r).into(),
        request::Value::Query(r) => read_blocking(app, move |app| app.query(&r)).await?.into(),
        request::Value::CheckTx(r) => {
            read_blocking(app, move |app| app.check_tx(&r)).await?.into()
        }
        lifecycle => consensus.call(Request::from(lifecycle)).await?,
    };
    Ok(resp)
}

/// Run a store-backed read on the blocking pool.
async fn read_blocking<S, T, F>(app: &KvStoreApp<S>, read: F) -> Result<T, NodeError>
where
    S: StateStore + 'static,
    T: Send + 'static,
    F: FnOnce(&KvStoreApp<S>) -> Result<T, AppError> + Send + 'static,
{
    let app = app.clone();
    let result = tokio::task::spawn_blocking(move || read(&app))
        .await
        .map_err(|e| NodeError::Io(std::io::Error::other(e)))?;
    Ok(result?)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn run<S, F>(
    addr: SocketAddr,
    app: KvStoreApp<S>,
    shutdown: F,
) -> Result<(), NodeError>
where
    S: StateStore + 'static,
    F: Future<Output = ()>,
{
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown).await
}
