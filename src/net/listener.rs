//! TCP listener.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//! - Report an occupied address distinctly, since it is fatal at startup

use std::io;
use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};

use crate::config::ListenerConfig;
use crate::error::ServeError;

/// Bound TCP listener.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ServeError> {
        Self::bind_addr(&config.bind_address).await
    }

    /// Bind to an explicit address string.
    pub async fn bind_addr(address: &str) -> Result<Self, ServeError> {
        let addr: SocketAddr = address.parse().map_err(|e| ServeError::Bind {
            address: address.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, e),
        })?;

        let inner = TcpListener::bind(addr).await.map_err(|e| match e.kind() {
            io::ErrorKind::AddrInUse => ServeError::AddressInUse {
                address: address.to_string(),
            },
            _ => ServeError::Bind {
                address: address.to_string(),
                source: e,
            },
        })?;

        let local_addr = inner.local_addr()?;
        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner })
    }

    /// Wrap an already bound Tokio listener.
    pub fn from_tcp(inner: TcpListener) -> Self {
        Self { inner }
    }

    /// Accept the next connection.
    pub async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        let (stream, addr) = self.inner.accept().await?;
        tracing::debug!(peer_addr = %addr, "Connection accepted");
        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}
