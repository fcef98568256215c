//! HTTP message types
//!
//! This module defines the protocol-neutral `Request` that both the HTTP/1.1
//! upgrade path and the HTTP/2 HEADERS path produce, plus the status and
//! response types used on the HTTP/1.1 wire.

use super::{Error, Headers, Result, CRLF};
use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;

/// HTTP methods
///
/// Methods outside the standard set are kept verbatim as `Extension`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
    Extension(String),
}

impl Method {
    /// Parse method from a request token
    pub fn from_str(s: &str) -> Result<Self> {
        let method = match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "CONNECT" => Method::Connect,
            "OPTIONS" => Method::Options,
            "TRACE" => Method::Trace,
            "PATCH" => Method::Patch,
            _ if is_token(s) => Method::Extension(s.to_string()),
            _ => return Err(Error::InvalidMethod(s.to_string())),
        };
        Ok(method)
    }

    /// Convert method to string
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
            Method::Extension(name) => name,
        }
    }

    /// Whether a request with this method carries a body in later frames
    pub fn expects_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol token written in HTTP/1.1 status lines
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    code: u16,
}

impl Status {
    /// Get the status code
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Get the canonical reason phrase for this status code
    pub fn reason_phrase(&self) -> &'static str {
        match self.code {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    pub const OK: Status = Status { code: 200 };
    pub const BAD_REQUEST: Status = Status { code: 400 };
    pub const NOT_FOUND: Status = Status { code: 404 };
    pub const INTERNAL_SERVER_ERROR: Status = Status { code: 500 };
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason_phrase())
    }
}

/// Application-level request
///
/// Built either from an HTTP/1.1 request line or from a decoded HEADERS
/// block. The body stays empty until a DATA frame (or the HTTP/1.1 body)
/// supplies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Create a new request with no headers and an empty body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Create a builder for constructing requests
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Attach the request body
    pub fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }
}

/// Builder for requests
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    headers: Headers,
    body: Bytes,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the request, defaulting to `GET /`
    pub fn build(self) -> Request {
        Request {
            method: self.method.unwrap_or(Method::Get),
            path: self.path.unwrap_or_else(|| "/".to_string()),
            headers: self.headers,
            body: self.body,
        }
    }
}

/// HTTP/1.1 response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: Status,
    headers: Headers,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new response with no headers and no body
    pub fn new(status: Status) -> Self {
        HttpResponse {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Response carrying `body` with a matching `Content-Length`
    pub fn with_body(status: Status, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let mut response = HttpResponse::new(status);
        response
            .headers
            .insert("Content-Length", body.len().to_string());
        response.body = body;
        response
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert the response to wire format
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        // Status line
        buf.extend_from_slice(HTTP_VERSION.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.status.to_string().as_bytes());
        buf.extend_from_slice(CRLF.as_bytes());

        for (name, value) in self.headers.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(CRLF.as_bytes());
        }

        buf.extend_from_slice(CRLF.as_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!(Method::from_str("GET").unwrap(), Method::Get);
        assert_eq!(Method::from_str("POST").unwrap(), Method::Post);
        assert_eq!(
            Method::from_str("PURGE").unwrap(),
            Method::Extension("PURGE".to_string())
        );
        assert!(Method::from_str("").is_err());
        assert!(Method::from_str("GE T").is_err());
    }

    #[test]
    fn test_method_expects_body() {
        assert!(Method::Post.expects_body());
        assert!(Method::Put.expects_body());
        assert!(!Method::Get.expects_body());
        assert!(!Method::Extension("PURGE".to_string()).expects_body());
    }

    #[test]
    fn test_status() {
        assert_eq!(Status::OK.code(), 200);
        assert_eq!(Status::OK.reason_phrase(), "OK");
        assert_eq!(Status::INTERNAL_SERVER_ERROR.to_string(), "500 Internal Server Error");
    }

    #[test]
    fn test_request_builder() {
        let req = Request::builder()
            .method(Method::Post)
            .path("/echo")
            .header("content-type", "text/plain")
            .body("hello")
            .build();

        assert_eq!(req.method(), &Method::Post);
        assert_eq!(req.path(), "/echo");
        assert_eq!(req.body(), b"hello");
        assert_eq!(req.body_text(), "hello");
        assert_eq!(req.headers().get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_response_to_wire() {
        let resp = HttpResponse::with_body(Status::OK, "pong");

        let wire = String::from_utf8(resp.to_wire()).unwrap();
        assert_eq!(wire, "HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\npong");
    }

    #[test]
    fn test_empty_response_to_wire() {
        let resp = HttpResponse::with_body(Status::BAD_REQUEST, Vec::new());

        let wire = String::from_utf8(resp.to_wire()).unwrap();
        assert_eq!(wire, "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
    }
}
