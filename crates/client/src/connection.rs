// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent connection to the configuration database
//!
//! `SocketConnection` multiplexes concurrent in-flight requests over one
//! stream, correlating each response to its request by id. Unsolicited
//! server pushes and connection lifecycle changes are surfaced as
//! [`ConnectionUpdate`]s on a separate channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::protocol::{self, ProtocolError, Request, RequestFrame, Response, ServerFrame, ServerPush};

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single request/response exchange
pub fn timeout_rpc() -> Duration {
    parse_duration_ms("QDB_TIMEOUT_RPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for establishing the connection
pub fn timeout_connect() -> Duration {
    parse_duration_ms("QDB_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Connection errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    #[error("Request timed out")]
    Timeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The single async primitive the client facade depends on: submit a
/// typed request, obtain the typed response, or learn the exchange
/// failed.
#[async_trait]
pub trait Connection: Clone + Send + Sync + 'static {
    async fn submit(&self, request: Request) -> Result<Response, ConnectionError>;
}

/// Out-of-band connection traffic: lifecycle changes and server pushes
#[derive(Debug)]
pub enum ConnectionUpdate {
    Opened,
    Closed,
    Push(ServerPush),
}

/// Receiver for connection updates
pub type UpdateReceiver = mpsc::UnboundedReceiver<ConnectionUpdate>;

struct Pending {
    map: HashMap<u64, oneshot::Sender<Result<Response, ConnectionError>>>,
    closed: bool,
}

/// Production connection over a TCP stream.
///
/// Cheap to clone; all clones share the stream and the pending-request
/// table.
#[derive(Clone)]
pub struct SocketConnection {
    writer: Arc<tokio::sync::Mutex<OwnedWriteHalf>>,
    pending: Arc<Mutex<Pending>>,
    next_id: Arc<AtomicU64>,
}

impl SocketConnection {
    /// Connect to the database service.
    ///
    /// Returns the connection and the update channel. `Opened` is
    /// delivered immediately; `Closed` is delivered once the stream is
    /// lost, after every outstanding request has been failed.
    pub async fn connect(addr: &str) -> Result<(Self, UpdateReceiver), ConnectionError> {
        let stream = tokio::time::timeout(timeout_connect(), TcpStream::connect(addr))
            .await
            .map_err(|_| ConnectionError::Timeout)??;

        let (reader, writer) = stream.into_split();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let pending = Arc::new(Mutex::new(Pending {
            map: HashMap::new(),
            closed: false,
        }));

        let _ = update_tx.send(ConnectionUpdate::Opened);
        tokio::spawn(read_loop(reader, Arc::clone(&pending), update_tx));

        debug!(addr, "connected");

        Ok((
            Self {
                writer: Arc::new(tokio::sync::Mutex::new(writer)),
                pending,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            update_rx,
        ))
    }

    fn register(
        &self,
        id: u64,
    ) -> Result<oneshot::Receiver<Result<Response, ConnectionError>>, ConnectionError> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.closed {
            return Err(ConnectionError::Closed);
        }
        pending.map.insert(id, tx);
        Ok(rx)
    }

    fn forget(&self, id: u64) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .map
            .remove(&id);
    }
}

#[async_trait]
impl Connection for SocketConnection {
    async fn submit(&self, request: Request) -> Result<Response, ConnectionError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let rx = self.register(id)?;

        let data = protocol::encode(&RequestFrame { id, request })?;
        {
            let mut writer = self.writer.lock().await;
            if let Err(e) = protocol::write_message(&mut *writer, &data).await {
                self.forget(id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(timeout_rpc(), rx).await {
            Ok(Ok(result)) => result,
            // Sender dropped without resolving; the read loop is gone
            Ok(Err(_)) => Err(ConnectionError::Closed),
            Err(_) => {
                self.forget(id);
                Err(ConnectionError::Timeout)
            }
        }
    }
}

/// Route inbound frames until the stream is lost, then fail everything
/// still outstanding.
async fn read_loop(
    mut reader: OwnedReadHalf,
    pending: Arc<Mutex<Pending>>,
    updates: mpsc::UnboundedSender<ConnectionUpdate>,
) {
    loop {
        let bytes = match protocol::read_message(&mut reader).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "read loop stopped");
                break;
            }
        };

        let frame: ServerFrame = match protocol::decode(&bytes) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "dropping malformed frame");
                continue;
            }
        };

        match frame {
            ServerFrame::Response { id, response } => {
                let tx = pending
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .map
                    .remove(&id);
                match tx {
                    Some(tx) => {
                        let _ = tx.send(Ok(response));
                    }
                    // Late response to a timed-out request
                    None => warn!(id, "response for unknown request"),
                }
            }
            ServerFrame::Push { push } => {
                let _ = updates.send(ConnectionUpdate::Push(push));
            }
        }
    }

    // The stream is gone; nothing will resolve outstanding requests, so
    // fail them all rather than leave callers suspended forever.
    let drained: Vec<_> = {
        let mut pending = pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.closed = true;
        pending.map.drain().collect()
    };
    for (_, tx) in drained {
        let _ = tx.send(Err(ConnectionError::Closed));
    }

    let _ = updates.send(ConnectionUpdate::Closed);
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
