//! Route table
//!
//! Routes are registered once at startup and looked up by exact
//! `(method, path)` match. The table is then shared read-only between
//! connection threads behind an `Arc`.

use super::{Method, Request, Status};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Request handler: takes the finished request and returns the body
pub type Handler = Arc<dyn Fn(&Request) -> String + Send + Sync>;

/// Outcome of dispatching a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub status: Status,
    pub body: String,
}

/// Route table keyed by path, then method
#[derive(Default, Clone)]
pub struct Router {
    routes: HashMap<String, HashMap<Method, Handler>>,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Router::default()
    }

    /// Register `handler` for `method` and `path`, replacing any previous one
    pub fn register<F>(&mut self, method: Method, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.routes
            .entry(path.into())
            .or_default()
            .insert(method, Arc::new(handler));
        self
    }

    /// Register a GET handler
    pub fn get<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.register(Method::Get, path, handler)
    }

    /// Register a POST handler
    pub fn post<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.register(Method::Post, path, handler)
    }

    /// Look up the handler registered for exactly `method` and `path`
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&Handler> {
        self.routes.get(path)?.get(method)
    }

    /// Run the matching handler, or report 404 with an empty body
    pub fn dispatch(&self, request: &Request) -> Dispatched {
        match self.lookup(request.method(), request.path()) {
            Some(handler) => Dispatched {
                status: Status::OK,
                body: handler(request),
            },
            None => Dispatched {
                status: Status::NOT_FOUND,
                body: String::new(),
            },
        }
    }

    /// Number of registered `(method, path)` pairs
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (path, methods) in &self.routes {
            for method in methods.keys() {
                list.entry(&format_args!("{} {}", method, path));
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        let mut router = Router::new();
        router
            .get("/ping", |_| "pong".to_string())
            .post("/echo", |req| req.body_text().into_owned());
        router
    }

    #[test]
    fn test_dispatch_hit() {
        let outcome = router().dispatch(&Request::new(Method::Get, "/ping"));
        assert_eq!(outcome.status, Status::OK);
        assert_eq!(outcome.body, "pong");
    }

    #[test]
    fn test_dispatch_miss() {
        let outcome = router().dispatch(&Request::new(Method::Get, "/missing"));
        assert_eq!(outcome.status, Status::NOT_FOUND);
        assert_eq!(outcome.body, "");
    }

    #[test]
    fn test_lookup_is_exact_on_method() {
        let router = router();
        assert!(router.lookup(&Method::Get, "/ping").is_some());
        assert!(router.lookup(&Method::Post, "/ping").is_none());
        assert!(router.lookup(&Method::Get, "/ping/").is_none());
    }

    #[test]
    fn test_handler_sees_body() {
        let req = Request::builder()
            .method(Method::Post)
            .path("/echo")
            .body("hello")
            .build();
        let outcome = router().dispatch(&req);
        assert_eq!(outcome.body, "hello");
    }

    #[test]
    fn test_len() {
        assert_eq!(router().len(), 2);
        assert!(Router::new().is_empty());
    }
}
