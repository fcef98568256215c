//! Session operations abstraction
//!
//! Connection logic is written against `SessionOps` rather than a concrete
//! socket, so a session can run over a `TcpStream` in production and over a
//! scripted in-memory transport in tests.

use super::{Error, Result};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

/// Session operations trait
pub trait SessionOps {
    /// Read data from the session
    ///
    /// Returns `Ok(0)` when the peer has closed the connection.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write data to the session, returning how much was accepted
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Close the session
    fn close(&mut self) -> Result<()>;

    /// Printable identity of the remote peer, used for logging
    fn peer(&self) -> String;

    /// Write the whole buffer
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.write(&buf[written..])?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            written += n;
        }
        Ok(())
    }
}

/// Plain TCP session operations
pub struct FdSessionOps {
    stream: TcpStream,
    peer: String,
}

impl FdSessionOps {
    /// Create new session operations from a TCP stream
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        FdSessionOps { stream, peer }
    }
}

impl SessionOps for FdSessionOps {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.stream.read(buf).map_err(Error::from)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.stream.write(buf).map_err(Error::from)
    }

    fn close(&mut self) -> Result<()> {
        self.stream.shutdown(Shutdown::Both).map_err(Error::from)
    }

    fn peer(&self) -> String {
        self.peer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_fd_session_ops() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(b"Hello").unwrap();
            let mut buf = [0u8; 5];
            stream.read_exact(&mut buf).unwrap();
            assert_eq!(&buf, b"World");
        });

        let stream = TcpStream::connect(addr).unwrap();
        let mut session = FdSessionOps::new(stream);
        assert_eq!(session.peer(), addr.to_string());

        let mut buf = [0u8; 5];
        let mut read = 0;
        while read < buf.len() {
            read += session.read(&mut buf[read..]).unwrap();
        }
        assert_eq!(&buf, b"Hello");

        SessionOps::write_all(&mut session, b"World").unwrap();

        handle.join().unwrap();
        let _ = session.close();
    }
}
