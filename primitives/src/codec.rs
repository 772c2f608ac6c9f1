//! Length-delimited framing for ABCI messages.
//!
//! Each message on the socket is a protobuf `Request` or `Response`
//! preceded by its encoded length as an unsigned protobuf varint:
//!
//! ```text
//! [len: uvarint] [message: len bytes] [len: uvarint] [message] ...
//! ```
//!
//! `AbciCodec` plugs into `tokio_util::codec::Framed`. It decodes one
//! message type and encodes another, so the server side reads requests and
//! writes responses while a client does the reverse.

use std::fmt;
use std::marker::PhantomData;

use bytes::{Buf, BytesMut};
use prost::Message;
use tokio_util::codec::{Decoder, Encoder};

use crate::abci::{Request, Response};
use crate::error::CodecError;

/// Maximum bytes a varint length prefix may occupy.
const MAX_VARINT_LEN: usize = 10;

/// Default upper bound on a single frame body (64 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Codec for the application side of the socket.
pub type ServerCodec = AbciCodec<Request, Response>;

/// Codec for the consensus engine side of the socket.
pub type ClientCodec = AbciCodec<Response, Request>;

/// Varint length-delimited protobuf codec.
///
/// Decodes `D` frames and encodes `E` frames.
pub struct AbciCodec<D, E> {
    max_frame_len: usize,
    _marker: PhantomData<fn(E) -> D>,
}

impl<D, E> AbciCodec<D, E> {
    /// Create a codec with the default frame limit.
    pub fn new() -> Self {
        Self::with_max_frame_len(DEFAULT_MAX_FRAME_LEN)
    }

    /// Create a codec that rejects frames longer than `max_frame_len`.
    pub fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self {
            max_frame_len,
            _marker: PhantomData,
        }
    }
}

impl<D, E> Default for AbciCodec<D, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, E> Clone for AbciCodec<D, E> {
    fn clone(&self) -> Self {
        Self::with_max_frame_len(self.max_frame_len)
    }
}

impl<D, E> fmt::Debug for AbciCodec<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbciCodec")
            .field("max_frame_len", &self.max_frame_len)
            .finish()
    }
}

impl<D, E> Decoder for AbciCodec<D, E>
where
    D: Message + Default,
{
    type Item = D;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some((prefix_len, body_len)) = peek_length(src)? else {
            return Ok(None);
        };
        if body_len > self.max_frame_len {
            return Err(CodecError::FrameTooLarge {
                len: body_len,
                max: self.max_frame_len,
            });
        }
        if src.len() < prefix_len + body_len {
            src.reserve(prefix_len + body_len - src.len());
            return Ok(None);
        }

        src.advance(prefix_len);
        let body = src.split_to(body_len).freeze();
        Ok(Some(D::decode(body)?))
    }
}

impl<D, E> Encoder<E> for AbciCodec<D, E>
where
    E: Message,
{
    type Error = CodecError;

    fn encode(&mut self, item: E, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = item.encoded_len();
        if len > self.max_frame_len {
            return Err(CodecError::FrameTooLarge {
                len,
                max: self.max_frame_len,
            });
        }
        dst.reserve(prost::length_delimiter_len(len) + len);
        item.encode_length_delimited(dst)?;
        Ok(())
    }
}

/// Read the length prefix without consuming it.
///
/// Returns `(prefix_len, body_len)`, or `None` if the varint is incomplete.
fn peek_length(src: &[u8]) -> Result<Option<(usize, usize)>, CodecError> {
    let window = &src[..src.len().min(MAX_VARINT_LEN)];
    let Some(end) = window.iter().position(|b| b & 0x80 == 0) else {
        if window.len() < MAX_VARINT_LEN {
            return Ok(None);
        }
        return Err(CodecError::PrefixTooLong(MAX_VARINT_LEN));
    };
    let body_len =
        prost::decode_length_delimiter(&src[..=end]).map_err(CodecError::InvalidLength)?;
    Ok(Some((end + 1, body_len)))
}
