//! Response codes and primitive-level errors.
//!
//! `CheckTx` and `DeliverTx` report the outcome of transaction validation
//! as a `u32` code on the wire. The repr values below are the wire values
//! and must not change.

use std::fmt;

/// Outcome of validating a transaction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ResponseCode {
    /// Accepted: well formed and not already applied.
    Ok = 0,
    /// No `=` separator in the payload.
    Malformed = 1,
    /// The committed snapshot already holds this exact key and value.
    Duplicate = 2,
}

impl ResponseCode {
    /// Return the wire representation of this code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Malformed => write!(f, "MALFORMED"),
            Self::Duplicate => write!(f, "DUPLICATE"),
        }
    }
}

/// Errors raised while framing or decoding ABCI messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The length prefix could not be decoded.
    #[error("invalid length prefix: {0}")]
    InvalidLength(#[source] prost::DecodeError),

    /// The length prefix ran past the maximum varint width.
    #[error("length prefix longer than {0} bytes")]
    PrefixTooLong(usize),

    /// A frame declared a length above the configured maximum.
    #[error("frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    /// The frame body is not a valid protobuf message.
    #[error("invalid message: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A message could not be written into the frame buffer.
    #[error("encode failed: {0}")]
    Encode(#[from] prost::EncodeError),

    /// The underlying stream failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
