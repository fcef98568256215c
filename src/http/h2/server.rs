//! HTTP/2 connection session
//!
//! One `H2Connection` drives one accepted connection from the HTTP/1.1
//! upgrade request to the steady HTTP/2 state:
//!
//! ```text
//! AwaitingUpgrade --101 sent--> NegotiatingSettings --SETTINGS ACK--> Serving
//! ```
//!
//! Every read after the upgrade is decoded into frames, each frame is
//! handled in order, and everything produced for that read goes out in a
//! single write. The one exception is the SETTINGS acknowledgment that
//! releases the upgrade request, which is flushed on its own first.

use super::codec::{FrameCodec, MAX_FRAME_SIZE};
use super::error::{Error, Result};
use super::frames::{Frame, FrameType};
use super::header_codec::HeaderCodec;
use super::stream::{ConnectionId, StreamId, StreamTable};
use super::UPGRADE_STREAM_ID;
use crate::http::{self, upgrade, Dispatched, Http1Responder, Request, Router, SessionOps, Status};
use bytes::{Bytes, BytesMut};
use std::mem;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Default transport read size
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Connection session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the HTTP/1.1 request that asks for h2c
    AwaitingUpgrade,
    /// 101 sent; holds the upgrade request until the peer acknowledges
    /// our SETTINGS
    NegotiatingSettings(Request),
    /// Steady state
    Serving,
    /// Connection finished
    Closed,
}

/// HTTP/2 connection session
pub struct H2Connection<S: SessionOps> {
    session: S,
    id: ConnectionId,
    peer: String,
    router: Arc<Router>,
    streams: Arc<StreamTable>,
    header_codec: HeaderCodec,
    http1: Http1Responder,
    state: SessionState,
    read_buffer_size: usize,
}

impl<S: SessionOps> H2Connection<S> {
    /// Create a session for a freshly accepted connection
    pub fn new(session: S, id: ConnectionId, router: Arc<Router>, streams: Arc<StreamTable>) -> Self {
        let peer = session.peer();
        H2Connection {
            session,
            id,
            peer,
            http1: Http1Responder::new(Arc::clone(&router)),
            router,
            streams,
            header_codec: HeaderCodec::new(),
            state: SessionState::AwaitingUpgrade,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Set the size of each transport read
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Get a reference to the underlying session
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Serve the connection until the peer closes it or a fatal error occurs
    ///
    /// A clean close by the peer returns `Ok(())`. Pending streams of this
    /// connection are purged either way.
    pub fn run(&mut self) -> Result<()> {
        info!(conn = %self.id, peer = %self.peer, "connection accepted");
        let mut buf = vec![0u8; self.read_buffer_size];

        let result = loop {
            let n = match self.session.read(&mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(e) => break Err(Error::from(e)),
            };
            trace!(conn = %self.id, len = n, "read");

            match self.handle_read(&buf[..n]) {
                Ok(()) => {}
                Err(e) if !e.is_fatal() => {
                    debug!(conn = %self.id, error = %e, "ignoring read");
                }
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = &result {
            warn!(conn = %self.id, peer = %self.peer, error = %e, "connection failed");
        }
        self.teardown();
        result
    }

    /// Process one read from the transport
    pub fn handle_read(&mut self, buf: &[u8]) -> Result<()> {
        match self.state {
            SessionState::AwaitingUpgrade => self.handle_upgrade(buf),
            SessionState::NegotiatingSettings(_) | SessionState::Serving => self.handle_frames(buf),
            SessionState::Closed => Err(Error::ConnectionClosed),
        }
    }

    fn handle_upgrade(&mut self, buf: &[u8]) -> Result<()> {
        match upgrade::upgrade(&mut self.session, buf) {
            Ok(request) => {
                self.state = SessionState::NegotiatingSettings(request);
                Ok(())
            }
            Err(Error::UpgradeNotRequested(request)) => {
                debug!(conn = %self.id, "upgrade not requested, answering as HTTP/1.1");
                self.http1.serve(&mut self.session, &request)?;
                Ok(())
            }
            Err(Error::Http(e)) if !matches!(e, http::Error::Io(_) | http::Error::ConnectionClosed) => {
                debug!(conn = %self.id, error = %e, "bad HTTP/1.1 request");
                Http1Responder::send_response(&mut self.session, &Http1Responder::bad_request())?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn handle_frames(&mut self, buf: &[u8]) -> Result<()> {
        let frames = FrameCodec::decode(buf)?;
        debug!(conn = %self.id, count = frames.len(), "frames received");

        let mut out = BytesMut::new();
        for frame in frames {
            self.handle_frame(frame, &mut out)?;
        }

        if !out.is_empty() {
            self.session.write_all(&out)?;
        }
        Ok(())
    }

    fn handle_frame(&mut self, frame: Frame, out: &mut BytesMut) -> Result<()> {
        trace!(conn = %self.id, frame = %frame, "frame");

        match frame.kind() {
            Some(FrameType::Settings) if frame.flags.is_ack() && self.awaiting_settings_ack() => {
                // The acknowledgment goes out alone, ahead of any response
                self.session.write_all(&FrameCodec::encode(&frame)?)?;

                if let SessionState::NegotiatingSettings(request) =
                    mem::replace(&mut self.state, SessionState::Serving)
                {
                    self.respond(&request, UPGRADE_STREAM_ID, out)?;
                }
            }
            Some(FrameType::Settings | FrameType::WindowUpdate) => {
                FrameCodec::encode_into(&frame, out)?;
            }
            Some(FrameType::Headers) => self.on_headers(frame, out)?,
            Some(FrameType::Data) => self.on_data(frame, out)?,
            Some(
                FrameType::Priority
                | FrameType::RstStream
                | FrameType::PushPromise
                | FrameType::Ping
                | FrameType::Goaway
                | FrameType::Continuation,
            )
            | None => {
                trace!(conn = %self.id, frame = %frame, "ignored");
            }
        }
        Ok(())
    }

    fn awaiting_settings_ack(&self) -> bool {
        matches!(self.state, SessionState::NegotiatingSettings(_))
    }

    fn on_headers(&mut self, frame: Frame, out: &mut BytesMut) -> Result<()> {
        let request = match self.header_codec.decode_request(&frame.payload) {
            Ok(request) => request,
            Err(e) if !e.is_fatal() => {
                warn!(conn = %self.id, stream_id = frame.stream_id, error = %e, "dropping HEADERS frame");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if request.method().expects_body() && !frame.flags.is_end_stream() {
            debug!(
                conn = %self.id,
                stream_id = frame.stream_id,
                method = %request.method(),
                path = request.path(),
                "awaiting DATA"
            );
            self.streams.put(self.id, frame.stream_id, request);
            return Ok(());
        }

        self.respond(&request, frame.stream_id, out)
    }

    fn on_data(&mut self, frame: Frame, out: &mut BytesMut) -> Result<()> {
        match self.streams.remove(self.id, frame.stream_id) {
            Some(mut request) => {
                request.set_body(frame.payload);
                self.respond(&request, frame.stream_id, out)
            }
            None => {
                trace!(conn = %self.id, stream_id = frame.stream_id, "DATA without pending request");
                Ok(())
            }
        }
    }

    /// Dispatch `request` and append its HEADERS + DATA frames to `out`
    ///
    /// A body too large for one DATA frame is replaced by an empty 500
    /// response. The check happens before the header block is encoded, since
    /// encoding updates the HPACK table the peer is tracking.
    fn respond(&mut self, request: &Request, stream_id: StreamId, out: &mut BytesMut) -> Result<()> {
        let mut outcome = self.router.dispatch(request);
        if outcome.body.len() > MAX_FRAME_SIZE {
            warn!(
                conn = %self.id,
                stream_id,
                path = request.path(),
                len = outcome.body.len(),
                "response body exceeds frame size"
            );
            outcome = Dispatched {
                status: Status::INTERNAL_SERVER_ERROR,
                body: String::new(),
            };
        }

        debug!(
            conn = %self.id,
            stream_id,
            method = %request.method(),
            path = request.path(),
            status = outcome.status.code(),
            "response"
        );

        let block = self
            .header_codec
            .encode_response(outcome.status, outcome.body.len())?;
        FrameCodec::encode_into(&Frame::headers(stream_id, block), out)?;
        FrameCodec::encode_into(&Frame::data(stream_id, Bytes::from(outcome.body)), out)
    }

    fn teardown(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;

        let purged = self.streams.purge(self.id);
        if purged > 0 {
            debug!(conn = %self.id, purged, "dropped pending streams");
        }
        if let Err(e) = self.session.close() {
            debug!(conn = %self.id, error = %e, "shutdown failed");
        }
        info!(conn = %self.id, peer = %self.peer, "connection closed");
    }
}

impl<S: SessionOps> Drop for H2Connection<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
