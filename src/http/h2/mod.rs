//! HTTP/2 protocol implementation
//!
//! This module implements the slice of HTTP/2 an h2c server needs to answer
//! simple requests after an HTTP/1.1 upgrade.
//!
//! # Architecture
//!
//! - **Frame codec** (`codec`): byte buffer to frame records and back
//! - **Header codec** (`header_codec`): per-connection HPACK state (via the
//!   `loona-hpack` crate)
//! - **Stream table** (`stream`): requests waiting for their DATA frame,
//!   keyed by connection and stream id
//! - **Connection session** (`server`): the per-connection state machine
//!   tying the above to the route table
//!
//! Flow control, priorities, server push, CONTINUATION frames and error
//! frames are not implemented. Each read from the transport is expected to
//! hold whole frames.
//!
//! # Examples
//!
//! ```
//! use bytes::Bytes;
//! use h2c::http::h2::{Frame, FrameCodec, FrameFlags, FrameType};
//!
//! let frame = Frame::new(FrameType::Data, FrameFlags::from_u8(FrameFlags::END_STREAM), 1, Bytes::from("hi"));
//! let wire = FrameCodec::encode(&frame).unwrap();
//! assert_eq!(FrameCodec::decode(&wire).unwrap(), vec![frame]);
//! ```

pub mod codec;
pub mod error;
pub mod frames;
pub mod header_codec;
pub mod server;
pub mod stream;

pub use codec::FrameCodec;
pub use error::{Error, Result};
pub use frames::{Frame, FrameFlags, FrameType};
pub use header_codec::HeaderCodec;
pub use server::{H2Connection, SessionState};
pub use stream::{ConnectionId, StreamId, StreamTable};

/// HTTP/2 connection preface sent by clients
///
/// From RFC 7540 Section 3.5:
/// "PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n"
pub const CONNECTION_PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// HPACK dynamic table size both sides start with (RFC 7540 Section 6.5.2)
pub const DEFAULT_HEADER_TABLE_SIZE: usize = 4096;

/// Stream carrying the response to the request that asked for the upgrade
pub const UPGRADE_STREAM_ID: StreamId = 1;
