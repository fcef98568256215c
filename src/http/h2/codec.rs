//! HTTP/2 frame encoding and decoding
//!
//! `FrameCodec::decode` turns one read's worth of bytes into frames and
//! `FrameCodec::encode` does the reverse. Both are stateless. A read is
//! expected to contain only whole frames; a buffer that ends inside a frame
//! is reported as malformed rather than buffered for the next read.

use super::error::{Error, Result};
use super::frames::{Frame, FrameFlags};
use super::stream::StreamId;
use super::CONNECTION_PREFACE;
use bytes::{BufMut, Bytes, BytesMut};

/// HTTP/2 frame header size (9 bytes)
pub const FRAME_HEADER_SIZE: usize = 9;

/// Maximum frame payload size (16MB - 1)
pub const MAX_FRAME_SIZE: usize = 0x00FF_FFFF;

/// Reserved high bit of the stream id field
const STREAM_ID_MASK: u32 = 0x7FFF_FFFF;

/// Read a big-endian unsigned integer of 1 to 4 bytes
pub fn read_uint_be(bytes: &[u8]) -> u32 {
    debug_assert!((1..=4).contains(&bytes.len()));
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Write the low `width` bytes (1 to 4) of `value` in big-endian order
pub fn write_uint_be<B: BufMut>(value: u32, width: usize, buf: &mut B) {
    debug_assert!((1..=4).contains(&width));
    buf.put_slice(&value.to_be_bytes()[4 - width..]);
}

/// Frame codec for encoding/decoding HTTP/2 frames
pub struct FrameCodec;

impl FrameCodec {
    /// Encode a frame header
    ///
    /// `length` must not exceed `MAX_FRAME_SIZE`; `encode_into` checks this
    /// before calling here.
    pub fn encode_header(frame_type: u8, flags: FrameFlags, stream_id: StreamId, length: usize) -> [u8; FRAME_HEADER_SIZE] {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        let mut buf = &mut header[..];

        write_uint_be(length as u32, 3, &mut buf);
        buf.put_u8(frame_type);
        buf.put_u8(flags.as_u8());
        write_uint_be(stream_id & STREAM_ID_MASK, 4, &mut buf);

        header
    }

    /// Decode a frame header into (type, flags, stream id, payload length)
    pub fn decode_header(bytes: &[u8; FRAME_HEADER_SIZE]) -> (u8, FrameFlags, StreamId, usize) {
        let length = read_uint_be(&bytes[0..3]) as usize;
        let frame_type = bytes[3];
        let flags = FrameFlags::from_u8(bytes[4]);
        let stream_id = read_uint_be(&bytes[5..9]) & STREAM_ID_MASK;

        (frame_type, flags, stream_id, length)
    }

    /// Decode every frame in `buf`
    ///
    /// A leading connection preface is skipped. An empty buffer yields
    /// `Error::EmptyInput`, a buffer ending mid-frame `Error::MalformedFrame`.
    pub fn decode(buf: &[u8]) -> Result<Vec<Frame>> {
        if buf.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut rest = buf.strip_prefix(CONNECTION_PREFACE).unwrap_or(buf);
        let mut frames = Vec::new();

        while !rest.is_empty() {
            let header: &[u8; FRAME_HEADER_SIZE] = rest
                .get(..FRAME_HEADER_SIZE)
                .and_then(|h| h.try_into().ok())
                .ok_or_else(|| {
                    Error::MalformedFrame(format!(
                        "need {} header bytes, have {}",
                        FRAME_HEADER_SIZE,
                        rest.len()
                    ))
                })?;
            let (frame_type, flags, stream_id, length) = Self::decode_header(header);
            rest = &rest[FRAME_HEADER_SIZE..];

            if rest.len() < length {
                return Err(Error::MalformedFrame(format!(
                    "declared payload of {} bytes, have {}",
                    length,
                    rest.len()
                )));
            }

            let payload = Bytes::copy_from_slice(&rest[..length]);
            rest = &rest[length..];

            frames.push(Frame::from_raw(frame_type, flags, stream_id, payload));
        }

        Ok(frames)
    }

    /// Append the wire form of `frame` to `buf`
    ///
    /// Fails with `Error::FrameTooLarge`, leaving `buf` untouched, when the
    /// payload does not fit the 3-byte length field.
    pub fn encode_into(frame: &Frame, buf: &mut BytesMut) -> Result<()> {
        if frame.payload.len() > MAX_FRAME_SIZE {
            return Err(Error::FrameTooLarge(frame.payload.len()));
        }

        buf.reserve(FRAME_HEADER_SIZE + frame.payload.len());
        buf.put_slice(&Self::encode_header(
            frame.frame_type,
            frame.flags,
            frame.stream_id,
            frame.payload.len(),
        ));
        buf.put_slice(&frame.payload);
        Ok(())
    }

    /// Encode a frame: 9-byte header followed by the payload
    pub fn encode(frame: &Frame) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + frame.payload.len());
        Self::encode_into(frame, &mut buf)?;
        Ok(buf.freeze())
    }
}
