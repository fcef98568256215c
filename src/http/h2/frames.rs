//! HTTP/2 frame types and utilities
//!
//! This module defines the frame record exchanged with the codec, as laid
//! out in RFC 7540 Section 4.1.

use super::stream::StreamId;
use bytes::Bytes;
use std::fmt;

/// Frame type tags this crate recognises (RFC 7540 Section 6)
///
/// Only DATA, HEADERS, SETTINGS and WINDOW_UPDATE are acted on by the
/// server; the rest are decoded and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameType {
    Data = 0x0,
    Headers = 0x1,
    Priority = 0x2,
    RstStream = 0x3,
    Settings = 0x4,
    PushPromise = 0x5,
    Ping = 0x6,
    Goaway = 0x7,
    WindowUpdate = 0x8,
    Continuation = 0x9,
}

impl FrameType {
    /// Convert frame type to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create frame type from u8
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x0 => Some(FrameType::Data),
            0x1 => Some(FrameType::Headers),
            0x2 => Some(FrameType::Priority),
            0x3 => Some(FrameType::RstStream),
            0x4 => Some(FrameType::Settings),
            0x5 => Some(FrameType::PushPromise),
            0x6 => Some(FrameType::Ping),
            0x7 => Some(FrameType::Goaway),
            0x8 => Some(FrameType::WindowUpdate),
            0x9 => Some(FrameType::Continuation),
            _ => None,
        }
    }

    /// Get frame type name
    pub fn name(&self) -> &'static str {
        match self {
            FrameType::Data => "DATA",
            FrameType::Headers => "HEADERS",
            FrameType::Priority => "PRIORITY",
            FrameType::RstStream => "RST_STREAM",
            FrameType::Settings => "SETTINGS",
            FrameType::PushPromise => "PUSH_PROMISE",
            FrameType::Ping => "PING",
            FrameType::Goaway => "GOAWAY",
            FrameType::WindowUpdate => "WINDOW_UPDATE",
            FrameType::Continuation => "CONTINUATION",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:x})", self.name(), self.as_u8())
    }
}

/// HTTP/2 frame flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags(u8);

impl FrameFlags {
    pub fn empty() -> Self {
        FrameFlags(0)
    }

    pub fn from_u8(flags: u8) -> Self {
        FrameFlags(flags)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Whether any bit of `flag` is set
    pub fn is_set(&self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// END_STREAM flag (0x1)
    pub const END_STREAM: u8 = 0x1;

    /// ACK flag (0x1) - used for SETTINGS and PING
    pub const ACK: u8 = 0x1;

    /// END_HEADERS flag (0x4)
    pub const END_HEADERS: u8 = 0x4;

    pub fn is_end_stream(&self) -> bool {
        self.is_set(Self::END_STREAM)
    }

    pub fn is_ack(&self) -> bool {
        self.is_set(Self::ACK)
    }

    pub fn is_end_headers(&self) -> bool {
        self.is_set(Self::END_HEADERS)
    }
}

/// Generic HTTP/2 frame
///
/// The type byte is kept raw so frames of unknown type survive a decode and
/// re-encode unchanged; use `kind()` to classify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw frame type byte
    pub frame_type: u8,
    /// Frame flags
    pub flags: FrameFlags,
    /// Stream ID (31 bits)
    pub stream_id: StreamId,
    /// Frame payload
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame
    pub fn new(frame_type: FrameType, flags: FrameFlags, stream_id: StreamId, payload: Bytes) -> Self {
        Frame::from_raw(frame_type.as_u8(), flags, stream_id, payload)
    }

    /// Create a frame from a raw type byte
    pub fn from_raw(frame_type: u8, flags: FrameFlags, stream_id: StreamId, payload: Bytes) -> Self {
        Frame {
            frame_type,
            flags,
            stream_id,
            payload,
        }
    }

    /// HEADERS frame carrying a complete header block
    pub fn headers(stream_id: StreamId, header_block: Bytes) -> Self {
        Frame::new(
            FrameType::Headers,
            FrameFlags::from_u8(FrameFlags::END_HEADERS),
            stream_id,
            header_block,
        )
    }

    /// DATA frame ending the stream
    pub fn data(stream_id: StreamId, data: Bytes) -> Self {
        Frame::new(
            FrameType::Data,
            FrameFlags::from_u8(FrameFlags::END_STREAM),
            stream_id,
            data,
        )
    }

    /// Frame type, if it is one this crate knows
    pub fn kind(&self) -> Option<FrameType> {
        FrameType::from_u8(self.frame_type)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}", kind.name())?,
            None => write!(f, "UNKNOWN(0x{:x})", self.frame_type)?,
        }
        write!(
            f,
            " stream={} flags=0x{:x} len={}",
            self.stream_id,
            self.flags.as_u8(),
            self.payload.len()
        )
    }
}
