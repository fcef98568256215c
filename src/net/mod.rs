//! Listener and accept loop
//!
//! Every accepted connection gets its own named thread running an
//! `H2Connection` to completion. The route table and the pending-stream
//! table are shared by all of them.

use crate::http::h2::{ConnectionId, H2Connection, StreamTable};
use crate::http::{FdSessionOps, Router};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:80";

/// Default listen backlog
pub const DEFAULT_BACKLOG: u32 = 128;

/// Default size of each connection read
pub const DEFAULT_READ_BUFFER_SIZE: usize = crate::http::h2::server::DEFAULT_READ_BUFFER_SIZE;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub backlog: u32,
    pub read_buffer_size: usize,
}

impl ServerConfig {
    /// Create a configuration listening on `bind_address`
    pub fn new(bind_address: SocketAddr) -> Self {
        ServerConfig {
            bind_address,
            backlog: DEFAULT_BACKLOG,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig::new(SocketAddr::from(([0, 0, 0, 0], 80)))
    }
}

/// Create a blocking TCP listener with SO_REUSEADDR and the given backlog
pub fn bind_listener(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = Socket::new(
        match addr {
            SocketAddr::V4(_) => Domain::IPV4,
            SocketAddr::V6(_) => Domain::IPV6,
        },
        Type::STREAM,
        Some(Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog.min(i32::MAX as u32) as i32)?;

    Ok(socket.into())
}

/// h2c server
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    router: Arc<Router>,
    streams: Arc<StreamTable>,
}

impl Server {
    /// Bind the listener described by `config`
    pub fn bind(config: ServerConfig, router: Router) -> io::Result<Self> {
        let listener = bind_listener(config.bind_address, config.backlog)?;
        info!(
            addr = %listener.local_addr()?,
            backlog = config.backlog,
            routes = router.len(),
            "listening"
        );

        Ok(Server {
            listener,
            config,
            router: Arc::new(router),
            streams: Arc::new(StreamTable::new()),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared pending-stream table
    pub fn streams(&self) -> Arc<StreamTable> {
        Arc::clone(&self.streams)
    }

    /// Accept connections forever
    ///
    /// Failed accepts are logged and skipped; only a listener that can no
    /// longer be used ends the loop.
    pub fn serve(self) -> io::Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let id = ConnectionId::next();
        let router = Arc::clone(&self.router);
        let streams = Arc::clone(&self.streams);
        let read_buffer_size = self.config.read_buffer_size;

        let spawned = thread::Builder::new()
            .name(format!("h2c-{}", id.as_u64()))
            .spawn(move || serve_connection(stream, id, router, streams, read_buffer_size));

        if let Err(e) = spawned {
            warn!(conn = %id, error = %e, "failed to spawn connection thread");
        }
    }
}

/// Run one accepted connection to completion on the current thread
pub fn serve_connection(
    stream: TcpStream,
    id: ConnectionId,
    router: Arc<Router>,
    streams: Arc<StreamTable>,
    read_buffer_size: usize,
) {
    let session = FdSessionOps::new(stream);
    let mut conn = H2Connection::new(session, id, router, streams).with_read_buffer_size(read_buffer_size);

    // Failures are already logged by the session
    if conn.run().is_err() {
        debug!(conn = %id, "connection ended with error");
    }
}
