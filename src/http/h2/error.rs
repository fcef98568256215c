//! HTTP/2 error types
//!
//! Every error is local to one connection. Whether the connection survives
//! it is decided by `Error::is_fatal`.

use crate::http::Request;

/// HTTP/2 errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the HTTP/1.1 layer (parsing or transport)
    #[error("HTTP error: {0}")]
    Http(#[from] crate::http::Error),

    /// Buffer ended before a declared frame header or payload
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Payload longer than a 24-bit length prefix can describe
    #[error("Frame payload of {0} bytes exceeds the maximum frame size")]
    FrameTooLarge(usize),

    /// Decode was called on an empty buffer
    #[error("Empty input")]
    EmptyInput,

    /// First request did not ask for `Upgrade: h2c`
    #[error("Upgrade was not requested for {} {}", .0.method(), .0.path())]
    UpgradeNotRequested(Box<Request>),

    /// HPACK header block could not be decoded
    #[error("Header decode error: {0}")]
    HeaderDecode(String),

    /// HPACK header block decoded but lacks a usable request
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,
}

impl Error {
    /// Whether this error must end the connection
    ///
    /// An empty read and an undecodable header block only affect the current
    /// read or frame; everything else closes the connection.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::EmptyInput | Error::HeaderDecode(_) | Error::InvalidHeader(_)
        )
    }
}

/// Result type for HTTP/2 operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedFrame("need 9 bytes, have 3".to_string());
        assert_eq!(err.to_string(), "Malformed frame: need 9 bytes, have 3");

        let err = Error::UpgradeNotRequested(Box::new(Request::new(Method::Get, "/ping")));
        assert_eq!(err.to_string(), "Upgrade was not requested for GET /ping");

        let err = Error::FrameTooLarge(0x0100_0000);
        assert_eq!(err.to_string(), "Frame payload of 16777216 bytes exceeds the maximum frame size");
    }

    #[test]
    fn test_is_fatal() {
        assert!(!Error::EmptyInput.is_fatal());
        assert!(!Error::HeaderDecode("bad index".to_string()).is_fatal());
        assert!(Error::MalformedFrame("short".to_string()).is_fatal());
        assert!(Error::ConnectionClosed.is_fatal());
        assert!(Error::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe)).is_fatal());
    }
}
