//! HTTP/1.1 side of the h2c server
//!
//! This module holds everything a connection needs before (and around) the
//! switch to HTTP/2: request parsing, the upgrade handshake, the plain
//! HTTP/1.1 fallback responder and the route table shared by both protocols.
//!
//! # Architecture
//!
//! The I/O code is written against the `SessionOps` trait so the same
//! connection logic runs over a `TcpStream` or over an in-memory transport
//! in tests:
//!
//! - `SessionOps` trait defines operations (read, write, close, peer)
//! - `FdSessionOps` implements them for a plain TCP stream
//! - `Router` maps `(method, path)` to a handler returning a body string
//!
//! # Examples
//!
//! ```
//! use h2c::http::{Method, Request, Router};
//!
//! let mut router = Router::new();
//! router.get("/ping", |_req| "pong".to_string());
//!
//! let outcome = router.dispatch(&Request::new(Method::Get, "/ping"));
//! assert_eq!(outcome.status.code(), 200);
//! assert_eq!(outcome.body, "pong");
//! ```

pub mod h2;
pub mod headers;
pub mod message;
pub mod parser;
pub mod router;
pub mod server;
pub mod session;
pub mod upgrade;

pub use headers::Headers;
pub use message::{HttpResponse, Method, Request, Status};
pub use parser::parse_request;
pub use router::{Dispatched, Handler, Router};
pub use server::Http1Responder;
pub use session::{FdSessionOps, SessionOps};
pub use upgrade::{upgrade_requested, SWITCHING_PROTOCOLS_RESPONSE};

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP operation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Too many headers (limit {})", MAX_HEADERS)]
    TooManyHeaders,

    #[error("Incomplete message")]
    Incomplete,

    #[error("Connection closed")]
    ConnectionClosed,
}

/// Maximum number of headers per message
pub const MAX_HEADERS: usize = 64;

/// CRLF line ending
pub const CRLF: &str = "\r\n";

/// Blank line separating the header block from the body
pub const HEADERS_SEPARATOR: &str = "\r\n\r\n";
