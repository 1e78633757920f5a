//! UDP datagram transport
//!
//! Each chunk becomes one datagram to a fixed peer, mirroring one
//! notification on a small wireless characteristic.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use super::{Transport, TransportError};

/// Connected UDP socket sending one datagram per chunk
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local port and connect it to `target`
    pub fn connect<A: ToSocketAddrs>(target: A) -> Result<Self, TransportError> {
        let peer = target.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "target resolved to no address")
        })?;

        let local: SocketAddr = if peer.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(peer)?;
        tracing::info!(%peer, local = ?socket.local_addr().ok(), "UDP transport connected");

        Ok(Self { socket, peer })
    }

    /// Bound how long a single write may block
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.socket.set_write_timeout(timeout)?;
        Ok(())
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for UdpTransport {
    fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        let written = self.socket.send(chunk)?;
        if written != chunk.len() {
            return Err(TransportError::ShortWrite {
                written,
                len: chunk.len(),
            });
        }
        Ok(())
    }
}
