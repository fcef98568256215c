//! HTTP/1.1 to h2c upgrade handshake
//!
//! The first read on a connection is parsed as an HTTP/1.1 request. If it
//! asks for `Upgrade: h2c` the fixed 101 response is written and the parsed
//! request is handed back so it can be answered on stream 1 once the peer
//! acknowledges our SETTINGS.

use super::h2::{Error, Result};
use super::{parse_request, Request, SessionOps};
use tracing::{debug, info};

/// Upgrade token for HTTP/2 over cleartext TCP
pub const H2C_TOKEN: &str = "h2c";

/// Response sent when switching to HTTP/2
pub const SWITCHING_PROTOCOLS_RESPONSE: &[u8] =
    b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: h2c\r\nConnection: Upgrade\r\n\r\n";

/// Whether `request` asks to switch to h2c
pub fn upgrade_requested(request: &Request) -> bool {
    request.headers().get("Upgrade") == Some(H2C_TOKEN)
}

/// Parse the first read of a connection and decide whether it upgrades
///
/// Returns `Error::UpgradeNotRequested` carrying the parsed request when the
/// request is well-formed but does not ask for h2c.
pub fn negotiate(buf: &[u8]) -> Result<Request> {
    let request = parse_request(buf)?;

    if !upgrade_requested(&request) {
        return Err(Error::UpgradeNotRequested(Box::new(request)));
    }

    Ok(request)
}

/// Run the handshake: negotiate and, on success, write the 101 response
pub fn upgrade<S: SessionOps>(session: &mut S, buf: &[u8]) -> Result<Request> {
    let request = negotiate(buf)?;
    debug!(method = %request.method(), path = request.path(), "upgrade requested");

    session.write_all(SWITCHING_PROTOCOLS_RESPONSE)?;
    info!(peer = %session.peer(), "switching to HTTP/2");

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    #[test]
    fn test_negotiate_upgrade() {
        let data = b"GET /ping HTTP/1.1\r\nHost: localhost\r\nConnection: Upgrade, HTTP2-Settings\r\nUpgrade: h2c\r\nHTTP2-Settings: AAMAAABkAAQCAAAAAAIAAAAA\r\n\r\n";
        let request = negotiate(data).unwrap();

        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.path(), "/ping");
    }

    #[test]
    fn test_negotiate_without_upgrade() {
        let data = b"GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n";

        match negotiate(data) {
            Err(Error::UpgradeNotRequested(request)) => assert_eq!(request.path(), "/ping"),
            other => panic!("expected UpgradeNotRequested, got {:?}", other),
        }
    }

    #[test]
    fn test_negotiate_other_upgrade_token() {
        let data = b"GET /chat HTTP/1.1\r\nUpgrade: websocket\r\n\r\n";
        assert!(matches!(negotiate(data), Err(Error::UpgradeNotRequested(_))));
    }

    #[test]
    fn test_negotiate_malformed() {
        assert!(matches!(negotiate(b"garbage"), Err(Error::Http(_))));
    }

    #[test]
    fn test_switching_protocols_literal() {
        assert_eq!(
            SWITCHING_PROTOCOLS_RESPONSE,
            b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: h2c\r\nConnection: Upgrade\r\n\r\n"
        );
    }
}
