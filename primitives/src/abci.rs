//! ABCI request and response messages.
//!
//! These are the boundary types between the consensus engine and the
//! application. Field tags follow the ABCI 0.34 `types.proto` so the
//! messages are wire compatible with a real consensus engine. Only the
//! fields this application reads or writes are modeled. Prost skips
//! unknown fields on decode, so the omitted ones are dropped silently.

/// Envelope for every inbound call.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Request {
    #[prost(oneof = "request::Value", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11")]
    pub value: Option<request::Value>,
}

/// Oneof variants of [`Request`].
pub mod request {
    use super::*;

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        #[prost(message, tag = "1")]
        Echo(RequestEcho),
        #[prost(message, tag = "2")]
        Flush(RequestFlush),
        #[prost(message, tag = "3")]
        Info(RequestInfo),
        #[prost(message, tag = "4")]
        SetOption(RequestSetOption),
        #[prost(message, tag = "5")]
        InitChain(RequestInitChain),
        #[prost(message, tag = "6")]
        Query(RequestQuery),
        #[prost(message, tag = "7")]
        BeginBlock(RequestBeginBlock),
        #[prost(message, tag = "8")]
        CheckTx(RequestCheckTx),
        #[prost(message, tag = "9")]
        DeliverTx(RequestDeliverTx),
        #[prost(message, tag = "10")]
        EndBlock(RequestEndBlock),
        #[prost(message, tag = "11")]
        Commit(RequestCommit),
    }

    impl Value {
        /// Name of the call, for logs and error messages.
        pub fn name(&self) -> &'static str {
            match self {
                Self::Echo(_) => "Echo",
                Self::Flush(_) => "Flush",
                Self::Info(_) => "Info",
                Self::SetOption(_) => "SetOption",
                Self::InitChain(_) => "InitChain",
                Self::Query(_) => "Query",
                Self::BeginBlock(_) => "BeginBlock",
                Self::CheckTx(_) => "CheckTx",
                Self::DeliverTx(_) => "DeliverTx",
                Self::EndBlock(_) => "EndBlock",
                Self::Commit(_) => "Commit",
            }
        }

        /// True for calls that belong to the serialized block lifecycle.
        pub fn is_consensus(&self) -> bool {
            matches!(
                self,
                Self::InitChain(_)
                    | Self::BeginBlock(_)
                    | Self::DeliverTx(_)
                    | Self::EndBlock(_)
                    | Self::Commit(_)
            )
        }
    }
}

impl Request {
    pub fn echo(message: impl Into<String>) -> Self {
        Self::from(request::Value::Echo(RequestEcho {
            message: message.into(),
        }))
    }

    pub fn flush() -> Self {
        Self::from(request::Value::Flush(RequestFlush {}))
    }

    pub fn info() -> Self {
        Self::from(request::Value::Info(RequestInfo::default()))
    }

    pub fn init_chain(chain_id: impl Into<String>) -> Self {
        Self::from(request::Value::InitChain(RequestInitChain {
            chain_id: chain_id.into(),
            ..Default::default()
        }))
    }

    pub fn query(data: impl Into<Vec<u8>>) -> Self {
        Self::from(request::Value::Query(RequestQuery {
            data: data.into(),
            ..Default::default()
        }))
    }

    pub fn begin_block() -> Self {
        Self::from(request::Value::BeginBlock(RequestBeginBlock::default()))
    }

    pub fn check_tx(tx: impl Into<Vec<u8>>) -> Self {
        Self::from(request::Value::CheckTx(RequestCheckTx {
            tx: tx.into(),
            r#type: CheckTxType::New as i32,
        }))
    }

    pub fn deliver_tx(tx: impl Into<Vec<u8>>) -> Self {
        Self::from(request::Value::DeliverTx(RequestDeliverTx { tx: tx.into() }))
    }

    pub fn end_block(height: i64) -> Self {
        Self::from(request::Value::EndBlock(RequestEndBlock { height }))
    }

    pub fn commit() -> Self {
        Self::from(request::Value::Commit(RequestCommit {}))
    }
}

impl From<request::Value> for Request {
    fn from(value: request::Value) -> Self {
        Self { value: Some(value) }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestEcho {
    #[prost(string, tag = "1")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestFlush {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestInfo {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(uint64, tag = "2")]
    pub block_version: u64,
    #[prost(uint64, tag = "3")]
    pub p2p_version: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestSetOption {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestInitChain {
    #[prost(string, tag = "2")]
    pub chain_id: String,
    #[prost(bytes = "vec", tag = "5")]
    pub app_state_bytes: Vec<u8>,
    #[prost(int64, tag = "6")]
    pub initial_height: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestQuery {
    /// Key to look up.
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
    #[prost(string, tag = "2")]
    pub path: String,
    #[prost(int64, tag = "3")]
    pub height: i64,
    #[prost(bool, tag = "4")]
    pub prove: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestBeginBlock {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: Vec<u8>,
}

/// Whether a `CheckTx` is a first admission or a mempool recheck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum CheckTxType {
    New = 0,
    Recheck = 1,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestCheckTx {
    #[prost(bytes = "vec", tag = "1")]
    pub tx: Vec<u8>,
    #[prost(enumeration = "CheckTxType", tag = "2")]
    pub r#type: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestDeliverTx {
    #[prost(bytes = "vec", tag = "1")]
    pub tx: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestEndBlock {
    #[prost(int64, tag = "1")]
    pub height: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestCommit {}

// ── Responses ──

/// Envelope for every outbound reply.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Response {
    #[prost(oneof = "response::Value", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12")]
    pub value: Option<response::Value>,
}

/// Oneof variants of [`Response`].
pub mod response {
    use super::*;

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        #[prost(message, tag = "1")]
        Exception(ResponseException),
        #[prost(message, tag = "2")]
        Echo(ResponseEcho),
        #[prost(message, tag = "3")]
        Flush(ResponseFlush),
        #[prost(message, tag = "4")]
        Info(ResponseInfo),
        #[prost(message, tag = "5")]
        SetOption(ResponseSetOption),
        #[prost(message, tag = "6")]
        InitChain(ResponseInitChain),
        #[prost(message, tag = "7")]
        Query(ResponseQuery),
        #[prost(message, tag = "8")]
        BeginBlock(ResponseBeginBlock),
        #[prost(message, tag = "9")]
        CheckTx(ResponseCheckTx),
        #[prost(message, tag = "10")]
        DeliverTx(ResponseDeliverTx),
        #[prost(message, tag = "11")]
        EndBlock(ResponseEndBlock),
        #[prost(message, tag = "12")]
        Commit(ResponseCommit),
    }
}

impl Response {
    /// Build the reply that reports a fatal error to the consensus engine.
    pub fn exception(error: impl Into<String>) -> Self {
        Self::from(response::Value::Exception(ResponseException {
            error: error.into(),
        }))
    }
}

impl From<response::Value> for Response {
    fn from(value: response::Value) -> Self {
        Self { value: Some(value) }
    }
}

macro_rules! impl_into_response {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Response {
                fn from(inner: $ty) -> Self {
                    Self::from(response::Value::$variant(inner))
                }
            }
        )*
    };
}

impl_into_response! {
    ResponseEcho => Echo,
    ResponseFlush => Flush,
    ResponseInfo => Info,
    ResponseSetOption => SetOption,
    ResponseInitChain => InitChain,
    ResponseQuery => Query,
    ResponseBeginBlock => BeginBlock,
    ResponseCheckTx => CheckTx,
    ResponseDeliverTx => DeliverTx,
    ResponseEndBlock => EndBlock,
    ResponseCommit => Commit,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseException {
    #[prost(string, tag = "1")]
    pub error: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseEcho {
    #[prost(string, tag = "1")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseFlush {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseInfo {
    #[prost(string, tag = "1")]
    pub data: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(uint64, tag = "3")]
    pub app_version: u64,
    #[prost(int64, tag = "4")]
    pub last_block_height: i64,
    #[prost(bytes = "vec", tag = "5")]
    pub last_block_app_hash: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseSetOption {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    #[prost(string, tag = "3")]
    pub log: String,
    #[prost(string, tag = "4")]
    pub info: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseInitChain {
    #[prost(bytes = "vec", tag = "3")]
    pub app_hash: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseQuery {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    /// "exists" or "does not exist".
    #[prost(string, tag = "3")]
    pub log: String,
    #[prost(string, tag = "4")]
    pub info: String,
    #[prost(int64, tag = "5")]
    pub index: i64,
    #[prost(bytes = "vec", tag = "6")]
    pub key: Vec<u8>,
    #[prost(bytes = "vec", tag = "7")]
    pub value: Vec<u8>,
    #[prost(int64, tag = "9")]
    pub height: i64,
    #[prost(string, tag = "10")]
    pub codespace: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseBeginBlock {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseCheckTx {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
    #[prost(string, tag = "3")]
    pub log: String,
    #[prost(string, tag = "4")]
    pub info: String,
    #[prost(int64, tag = "5")]
    pub gas_wanted: i64,
    #[prost(int64, tag = "6")]
    pub gas_used: i64,
    #[prost(string, tag = "8")]
    pub codespace: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseDeliverTx {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
    #[prost(string, tag = "3")]
    pub log: String,
    #[prost(string, tag = "4")]
    pub info: String,
    #[prost(int64, tag = "5")]
    pub gas_wanted: i64,
    #[prost(int64, tag = "6")]
    pub gas_used: i64,
    #[prost(string, tag = "8")]
    pub codespace: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseEndBlock {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseCommit {
    /// Commit digest.
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub retain_height: i64,
}
