//! HTTP/1.1 request parsing
//!
//! The server only ever parses the first read of a connection, which is
//! assumed to hold a whole request: the header block is everything before
//! the first blank line and the body is everything after it.

use super::{Error, Headers, Method, Request, Result, CRLF, HEADERS_SEPARATOR, MAX_HEADERS};
use bytes::Bytes;

/// Find the first occurrence of `needle` in `buf`
fn find(buf: &[u8], needle: &[u8]) -> Option<usize> {
    buf.windows(needle.len()).position(|w| w == needle)
}

/// Parse HTTP request line
///
/// Format: METHOD PATH [VERSION]
/// The version token is accepted but not interpreted.
pub fn parse_request_line(line: &str) -> Result<(Method, String)> {
    let mut parts = line.split(' ').filter(|part| !part.is_empty());

    match (parts.next(), parts.next()) {
        (Some(method), Some(path)) => Ok((Method::from_str(method)?, path.to_string())),
        _ => Err(Error::Parse(format!("Invalid request line: {:?}", line))),
    }
}

/// Parse a complete HTTP/1.1 request held in `buf`
///
/// Returns `Error::Incomplete` when the blank line ending the header block
/// is missing and `Error::TooManyHeaders` when it holds more than
/// `MAX_HEADERS` header lines.
pub fn parse_request(buf: &[u8]) -> Result<Request> {
    let sep = find(buf, HEADERS_SEPARATOR.as_bytes()).ok_or(Error::Incomplete)?;

    let head = String::from_utf8_lossy(&buf[..sep]);
    let body = &buf[sep + HEADERS_SEPARATOR.len()..];

    let mut lines = head.trim().split(CRLF);
    let request_line = lines
        .next()
        .ok_or_else(|| Error::Parse("Empty request".to_string()))?;
    let (method, path) = parse_request_line(request_line)?;

    let mut headers = Headers::new();
    for (count, line) in lines.enumerate() {
        if count >= MAX_HEADERS {
            return Err(Error::TooManyHeaders);
        }
        let (name, value) = Headers::parse_header_line(line)?;
        headers.insert(name, value);
    }

    let mut request = Request::new(method, path);
    *request.headers_mut() = headers;
    request.set_body(Bytes::copy_from_slice(body));
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_line() {
        let (method, path) = parse_request_line("GET /index.html HTTP/1.1").unwrap();
        assert_eq!(method, Method::Get);
        assert_eq!(path, "/index.html");

        // Version is optional
        let (method, path) = parse_request_line("POST /echo").unwrap();
        assert_eq!(method, Method::Post);
        assert_eq!(path, "/echo");

        assert!(parse_request_line("GET").is_err());
        assert!(parse_request_line("").is_err());
    }

    #[test]
    fn test_parse_request() {
        let data = b"GET /ping HTTP/1.1\r\nHost: localhost\r\nUpgrade: h2c\r\n\r\n";
        let req = parse_request(data).unwrap();

        assert_eq!(req.method(), &Method::Get);
        assert_eq!(req.path(), "/ping");
        assert_eq!(req.headers().get("Host"), Some("localhost"));
        assert_eq!(req.headers().get("Upgrade"), Some("h2c"));
        assert!(req.body().is_empty());
    }

    #[test]
    fn test_parse_request_with_body() {
        let data = b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let req = parse_request(data).unwrap();

        assert_eq!(req.method(), &Method::Post);
        assert_eq!(req.body(), b"hello");
    }

    #[test]
    fn test_parse_request_incomplete() {
        let data = b"GET /ping HTTP/1.1\r\nHost: localhost\r\n";
        assert!(matches!(parse_request(data), Err(Error::Incomplete)));
    }

    #[test]
    fn test_parse_request_bad_header() {
        let data = b"GET /ping HTTP/1.1\r\nNoSeparator\r\n\r\n";
        assert!(matches!(parse_request(data), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_parse_request_header_limit() {
        let mut data = b"GET /ping HTTP/1.1\r\n".to_vec();
        for i in 0..MAX_HEADERS {
            data.extend_from_slice(format!("X-Filler-{}: {}\r\n", i, i).as_bytes());
        }
        let mut full = data.clone();
        full.extend_from_slice(b"\r\n");
        assert_eq!(parse_request(&full).unwrap().headers().len(), MAX_HEADERS);

        // One more line, here the upgrade request itself, rejects the request
        data.extend_from_slice(b"Upgrade: h2c\r\n\r\n");
        assert!(matches!(parse_request(&data), Err(Error::TooManyHeaders)));
    }

    #[test]
    fn test_find() {
        assert_eq!(find(b"Hello\r\n\r\nWorld", b"\r\n\r\n"), Some(5));
        assert_eq!(find(b"NoEOL", b"\r\n"), None);
        assert_eq!(find(b"\r\n", b"\r\n"), Some(0));
    }
}
