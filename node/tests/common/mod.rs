//! Shared test helpers for socket integration tests.
//!
//! Starts a server on an ephemeral port and provides a minimal framed
//! client.

#![allow(dead_code)]

use std::net::SocketAddr;

use kvstore_app::KvStoreApp;
use kvstore_node::{serve, NodeError};
use kvstore_primitives::abci::{response, Request, Response};
use kvstore_primitives::ClientCodec;
use kvstore_store::{KvStore, MemStore};
use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

/// A server running in the background.
pub struct TestServer {
    pub addr: SocketAddr,
    pub app: KvStoreApp<MemStore>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), NodeError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let app = KvStoreApp::new(KvStore::new(MemStore::new()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(serve(listener, app.clone(), async move {
            let _ = stopped.await;
        }));
        Self {
            addr,
            app,
            stop: Some(stop),
            task,
        }
    }

    pub async fn connect(&self) -> Client {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        Client {
            framed: Framed::new(stream, ClientCodec::new()),
        }
    }

    /// Stop the server and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.unwrap().unwrap();
    }
}

/// Framed ABCI client.
pub struct Client {
    framed: Framed<TcpStream, ClientCodec>,
}

impl Client {
    /// Write bytes straight to the socket, bypassing the codec.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.framed.get_mut().write_all(bytes).await.unwrap();
    }

    pub async fn send(&mut self, req: &Request) {
        self.framed.send(req.clone()).await.unwrap();
    }

    /// Read the next response, or `None` if the server closed the connection.
    pub async fn recv(&mut self) -> Option<Response> {
        self.framed.next().await.map(|frame| frame.unwrap())
    }

    pub async fn call(&mut self, req: Request) -> response::Value {
        self.send(&req).await;
        self.recv()
            .await
            .and_then(|r| r.value)
            .expect("server closed the connection")
    }

    pub async fn deliver_tx(&mut self, tx: &str) -> u32 {
        match self.call(Request::deliver_tx(tx)).await {
            response::Value::DeliverTx(r) => r.code,
            other => panic!("expected DeliverTx response, got {other:?}"),
        }
    }

    pub async fn check_tx(&mut self, tx: &str) -> u32 {
        match self.call(Request::check_tx(tx)).await {
            response::Value::CheckTx(r) => r.code,
            other => panic!("expected CheckTx response, got {other:?}"),
        }
    }

    pub async fn query(&mut self, key: &str) -> (String, Vec<u8>) {
        match self.call(Request::query(key)).await {
            response::Value::Query(r) => (r.log, r.value),
            other => panic!("expected Query response, got {other:?}"),
        }
    }
}
