//! HTTP server: accept loop and connection workers.
//!
//! # Responsibilities
//! - Accept connections and hand them to the worker pool
//! - Answer `503` when the pool rejects a connection
//! - Per connection: read once, run the pipeline, write, close
//! - Stop accepting on shutdown, then drain the pool within a deadline
//!
//! # Data Flow
//! ```text
//! Listener.accept ─▶ WorkerPool queue ─▶ serve_connection
//!                                          │ read (timeout)
//!                                          │ spawn_blocking(Engine::respond)
//!                                          ▼
//!                                        write_all ─▶ close ─▶ discard unread input
//! ```
//!
//! # Design Decisions
//! - Only the first read is parsed. Input beyond it (a body larger than the
//!   read buffer, pipelined requests) is read and discarded for a short
//!   window after the response, so closing does not reset the connection
//!   before the client has read the response
//! - On shutdown, connections still waiting for their first byte are closed
//!   without a response; workers that outlive the drain deadline are aborted

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::http::pipeline::{Engine, Exchange};
use crate::http::response::encode_error;
use crate::http::Status;
use crate::net::{ConnectionGuard, ConnectionState, ConnectionTracker, Listener, WorkerPool};
use crate::observability::metrics;

/// How long unread input is discarded after a response before closing.
const DISCARD_WINDOW: Duration = Duration::from_millis(100);

/// An accepted connection waiting for a worker.
#[derive(Debug)]
struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    guard: ConnectionGuard,
}

#[derive(Debug, Clone)]
struct ReadSettings {
    buffer_bytes: usize,
    timeout: Option<Duration>,
    /// Flips to `true` once the server stops accepting.
    closing: watch::Receiver<bool>,
}

/// Embedded HTTP server.
pub struct HttpServer {
    config: ServerConfig,
    engine: Arc<Engine>,
    tracker: ConnectionTracker,
}

impl HttpServer {
    pub fn new(config: ServerConfig, engine: Engine) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Handle for observing in-flight connections.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Run the accept loop until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.engine.routes().len(),
            "HTTP server starting"
        );

        let (closing_tx, closing) = watch::channel(false);
        let settings = ReadSettings {
            buffer_bytes: self.config.listener.read_buffer_bytes.max(1),
            timeout: match self.config.listener.read_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            closing,
        };

        let engine = Arc::clone(&self.engine);
        let pool = WorkerPool::start(&self.config.pool, move |connection: Connection| {
            let engine = Arc::clone(&engine);
            let settings = settings.clone();
            async move { serve_connection(connection, engine, settings).await }
        });

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let connection = Connection {
                            stream,
                            peer,
                            guard: self.tracker.track(),
                        };
                        // A blocking submit must not hide the shutdown signal.
                        tokio::select! {
                            submitted = pool.submit(connection) => {
                                if let Err(connection) = submitted {
                                    tokio::spawn(reject(connection));
                                }
                            }
                            _ = shutdown.recv() => {
                                tracing::info!("Shutdown signal received while queue was full");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
            }
        }

        drop(listener);
        let _ = closing_tx.send(true);

        let drain = Duration::from_secs(self.config.pool.drain_timeout_secs);
        let deadline = Instant::now() + drain;
        pool.shutdown(drain).await;

        // Rejections are written outside the pool.
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !self.tracker.wait_for_drain(remaining).await {
            tracing::warn!(
                active = self.tracker.active_count(),
                "Connections still open after drain deadline"
            );
        }

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }
}

/// Answer a connection the pool had no room for.
async fn reject(mut connection: Connection) {
    let id = connection.guard.id();
    metrics::record_connection_rejected();
    tracing::warn!(
        connection_id = %id,
        peer_addr = %connection.peer,
        "Worker queue full, rejecting connection"
    );

    let bytes = encode_error(Status::ServiceUnavailable);
    if let Err(e) = connection.stream.write_all(&bytes).await {
        tracing::debug!(connection_id = %id, error = %e, "Failed to write rejection");
    }
    close(&mut connection.stream).await;
}

/// Send FIN, then read and drop whatever the peer still sends for a short
/// window so the close is not turned into a reset.
async fn close(stream: &mut TcpStream) {
    let _ = stream.shutdown().await;

    let mut scratch = [0u8; 4096];
    let discard = async {
        while let Ok(n) = stream.read(&mut scratch).await {
            if n == 0 {
                break;
            }
        }
    };
    let _ = tokio::time::timeout(DISCARD_WINDOW, discard).await;
}

/// First read of a connection. `None` when the read timed out or the server
/// began shutting down first.
async fn read_request(
    stream: &mut TcpStream,
    buf: &mut [u8],
    settings: &mut ReadSettings,
) -> Option<std::io::Result<usize>> {
    let timeout = settings.timeout;
    let read = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, stream.read(buf)).await.ok(),
            None => Some(stream.read(buf).await),
        }
    };

    tokio::select! {
        biased;
        read = read => read,
        _ = settings.closing.wait_for(|closing| *closing) => None,
    }
}

async fn serve_connection(
    mut connection: Connection,
    engine: Arc<Engine>,
    mut settings: ReadSettings,
) {
    let id = connection.guard.id();
    let start = Instant::now();
    tracing::trace!(
        connection_id = %id,
        peer_addr = %connection.peer,
        state = ConnectionState::Reading.label(),
        "Reading request"
    );

    let mut buf = vec![0u8; settings.buffer_bytes];
    let Some(read) = read_request(&mut connection.stream, &mut buf, &mut settings).await else {
        tracing::debug!(
            connection_id = %id,
            timeout = ?settings.timeout,
            "No request before timeout or shutdown, closing"
        );
        return;
    };

    let n = match read {
        Ok(0) => {
            tracing::trace!(connection_id = %id, "Peer closed before sending");
            return;
        }
        Ok(n) => n,
        Err(e) => {
            tracing::debug!(connection_id = %id, error = %e, "Read failed");
            return;
        }
    };
    buf.truncate(n);

    let exchange = match tokio::task::spawn_blocking(move || engine.respond(&buf)).await {
        Ok(Some(exchange)) => exchange,
        Ok(None) => return,
        Err(e) => {
            tracing::error!(connection_id = %id, error = %e, "Request processing panicked");
            Exchange::rejected(Status::InternalServerError, None)
        }
    };

    if let Err(e) = connection.stream.write_all(&exchange.bytes).await {
        tracing::debug!(connection_id = %id, error = %e, "Write failed");
    }

    let status = exchange.status();
    let method = exchange.method.as_ref().map(|m| m.as_str()).unwrap_or("-");
    metrics::record_request(method, status.code(), exchange.state.label(), start);

    tracing::debug!(
        connection_id = %id,
        method = method,
        path = exchange.path.as_deref().unwrap_or("-"),
        status = status.code(),
        outcome = exchange.state.label(),
        state = ConnectionState::Responded.label(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Response written"
    );

    close(&mut connection.stream).await;
}
