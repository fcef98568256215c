//! Plain HTTP/1.1 responder
//!
//! Connections whose first request does not ask for `Upgrade: h2c` are
//! answered as HTTP/1.1 through the same route table the HTTP/2 side uses.

use super::{HttpResponse, Request, Result, Router, SessionOps, Status};
use std::sync::Arc;
use tracing::debug;

/// HTTP/1.1 responder
pub struct Http1Responder {
    router: Arc<Router>,
}

impl Http1Responder {
    /// Create a responder dispatching through `router`
    pub fn new(router: Arc<Router>) -> Self {
        Http1Responder { router }
    }

    /// Build the response for a parsed request
    ///
    /// A routed request gets `200 OK` with its body, anything else
    /// `404 Not Found` with an empty body.
    pub fn respond(&self, request: &Request) -> HttpResponse {
        let outcome = self.router.dispatch(request);
        debug!(
            method = %request.method(),
            path = request.path(),
            status = outcome.status.code(),
            "HTTP/1.1 request"
        );
        HttpResponse::with_body(outcome.status, outcome.body)
    }

    /// Response for a request that could not be parsed
    pub fn bad_request() -> HttpResponse {
        HttpResponse::with_body(Status::BAD_REQUEST, Vec::new())
    }

    /// Write `response` to `session`
    pub fn send_response<S: SessionOps>(session: &mut S, response: &HttpResponse) -> Result<()> {
        session.write_all(&response.to_wire())
    }

    /// Answer `request` on `session`
    pub fn serve<S: SessionOps>(&self, session: &mut S, request: &Request) -> Result<()> {
        let response = self.respond(request);
        Self::send_response(session, &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::session::FdSessionOps;
    use crate::http::{parse_request, Method};
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn responder() -> Http1Responder {
        let mut router = Router::new();
        router.get("/ping", |_| "pong".to_string());
        Http1Responder::new(Arc::new(router))
    }

    #[test]
    fn test_respond_routed() {
        let response = responder().respond(&Request::new(Method::Get, "/ping"));
        assert_eq!(response.status(), Status::OK);
        assert_eq!(response.body(), b"pong");
        assert_eq!(response.headers().get("Content-Length"), Some("4"));
    }

    #[test]
    fn test_respond_missing() {
        let response = responder().respond(&Request::new(Method::Get, "/nope"));
        assert_eq!(response.status(), Status::NOT_FOUND);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_serve_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .unwrap();

            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            assert_eq!(response, "HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\npong");
        });

        let (stream, _) = listener.accept().unwrap();
        let mut session = FdSessionOps::new(stream);

        let mut buf = vec![0u8; 1024];
        let n = session.read(&mut buf).unwrap();
        let request = parse_request(&buf[..n]).unwrap();
        responder().serve(&mut session, &request).unwrap();
        session.close().unwrap();

        handle.join().unwrap();
    }
}
