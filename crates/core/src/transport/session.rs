//! One authenticated connection, scoped to a single exchange.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::{ReadMode, TransportError};

const READ_CHUNK_SIZE: usize = 4096;

/// Counts of sessions opened and closed by one transport.
#[derive(Debug, Default)]
pub struct SessionStats {
    opened: AtomicU64,
    closed: AtomicU64,
}

impl SessionStats {
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> u64 {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sessions opened but not yet closed.
    pub fn open_sessions(&self) -> u64 {
        self.opened().saturating_sub(self.closed())
    }
}

/// Accounting for one opened session; counted as closed when dropped.
#[derive(Debug)]
pub(crate) struct SessionLease {
    stats: Arc<SessionStats>,
}

impl SessionLease {
    pub(crate) fn open(stats: &Arc<SessionStats>) -> Self {
        stats.opened.fetch_add(1, Ordering::SeqCst);
        Self {
            stats: Arc::clone(stats),
        }
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// An open connection owned by exactly one exchange.
///
/// The session is released when [`Session::close`] consumes it, or when it is
/// dropped on an early return.
#[derive(Debug)]
pub struct Session<S> {
    stream: S,
    peer: String,
    _lease: SessionLease,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S, peer: String, lease: SessionLease) -> Self {
        Self {
            stream,
            peer,
            _lease: lease,
        }
    }

    /// Writes the full request.
    pub async fn send(&mut self, request: &[u8]) -> Result<(), TransportError> {
        self.stream
            .write_all(request)
            .await
            .map_err(|source| self.write_error(source))?;
        self.stream
            .flush()
            .await
            .map_err(|source| self.write_error(source))
    }

    /// Reads until the peer closes the connection.
    pub async fn receive_all(&mut self) -> Result<Vec<u8>, TransportError> {
        self.receive(ReadMode::UntilClose).await
    }

    /// Reads chunks in arrival order until the peer closes or the mode's limit is hit.
    ///
    /// A closure without TLS `close_notify` counts as a clean close; any other
    /// read failure is reported as [`TransportError::ReadInterrupted`].
    pub async fn receive(&mut self, mode: ReadMode) -> Result<Vec<u8>, TransportError> {
        let limit = mode.limit();
        let mut payload = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        while payload.len() < limit {
            let want = (limit - payload.len()).min(READ_CHUNK_SIZE);
            match self.stream.read(&mut chunk[..want]).await {
                Ok(0) => break,
                Ok(n) => payload.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!(peer = %self.peer, "Peer closed without close_notify");
                    break;
                }
                Err(source) => {
                    return Err(TransportError::ReadInterrupted {
                        endpoint: self.peer.clone(),
                        received: payload.len(),
                        source,
                    });
                }
            }
        }

        debug!(peer = %self.peer, bytes = payload.len(), "Response received");
        Ok(payload)
    }

    /// Shuts the session down and releases it.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, "Session shutdown failed: {}", e);
        }
    }

    fn write_error(&self, source: io::Error) -> TransportError {
        TransportError::Write {
            endpoint: self.peer.clone(),
            source,
        }
    }
}
