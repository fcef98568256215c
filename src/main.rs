//! h2c-server: answers HTTP/1.1 and upgraded HTTP/2 cleartext requests.
//!
//! Routes: `GET /ping` returns `pong`, `GET /version` returns the crate
//! version.

use clap::Parser;
use h2c::http::Router;
use h2c::net::{Server, ServerConfig, DEFAULT_BACKLOG, DEFAULT_BIND_ADDRESS, DEFAULT_READ_BUFFER_SIZE};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "h2c-server")]
#[command(about = "Minimal HTTP/2 cleartext (h2c) server", version)]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind: SocketAddr,

    /// Listen backlog
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    backlog: u32,

    /// Bytes requested per connection read
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    read_buffer: usize,

    /// Log filter, overrides RUST_LOG (e.g. "h2c=debug")
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "h2c=info,h2c_server=info".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("h2c-server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::new(args.bind)
        .backlog(args.backlog)
        .read_buffer_size(args.read_buffer);

    let server = Server::bind(config, routes())?;
    server.serve()?;

    Ok(())
}

fn routes() -> Router {
    let mut router = Router::new();
    router
        .get("/ping", |_| "pong".to_string())
        .get("/version", |_| env!("CARGO_PKG_VERSION").to_string());
    router
}
