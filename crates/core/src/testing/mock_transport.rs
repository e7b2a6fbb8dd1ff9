//! Mock transport for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{
    HttpRequest, ReadMode, ServiceEndpoint, SessionLease, SessionStats, Transport, TransportError,
};

/// A recorded exchange for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedExchange {
    /// Where the request was sent.
    pub endpoint: ServiceEndpoint,
    /// The request that was sent.
    pub request: HttpRequest,
    /// How the response was to be read.
    pub mode: ReadMode,
    /// Whether the exchange succeeded.
    pub success: bool,
}

impl RecordedExchange {
    /// The request body decoded as JSON, if any.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.request
            .body()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// Failure to inject for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// TCP connect refused; no session is opened.
    Connect,
    /// Peer reset during the handshake; the session is opened and released.
    Handshake,
    /// Peer reset after part of the response arrived.
    ReadInterrupted,
}

impl MockFailure {
    fn into_error(self, endpoint: &ServiceEndpoint) -> TransportError {
        let authority = endpoint.authority();
        match self {
            Self::Connect => TransportError::Connect {
                endpoint: authority,
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            },
            Self::Handshake => TransportError::Handshake {
                endpoint: authority,
                source: io::Error::new(io::ErrorKind::ConnectionReset, "reset during handshake"),
            },
            Self::ReadInterrupted => TransportError::ReadInterrupted {
                endpoint: authority,
                received: 64,
                source: io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"),
            },
        }
    }
}

/// Mock implementation of the Transport trait.
///
/// Provides controllable behavior for testing:
/// - Return configured responses per request path
/// - Queue one-shot responses ahead of the configured one
/// - Simulate connect, handshake and mid-response failures
/// - Record every exchange for assertions
/// - Account for sessions the same way the TLS transport does
///
/// Paths with no configured response get an empty reply (peer closed
/// without sending anything).
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Response returned for a path on every exchange.
    responses: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// One-shot responses, used before `responses`.
    queued: Arc<RwLock<HashMap<String, VecDeque<Vec<u8>>>>>,
    /// Failures injected per path, until cleared.
    failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    /// Recorded exchanges.
    exchanges: Arc<RwLock<Vec<RecordedExchange>>>,
    stats: Arc<SessionStats>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned for `path`.
    pub async fn set_response(&self, path: &str, response: Vec<u8>) {
        self.responses
            .write()
            .await
            .insert(path.to_string(), response);
    }

    /// Queue a response used once for `path`, ahead of the configured one.
    pub async fn push_response(&self, path: &str, response: Vec<u8>) {
        self.queued
            .write()
            .await
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    /// Make every exchange with `path` fail until cleared.
    pub async fn set_failure(&self, path: &str, failure: MockFailure) {
        self.failures
            .write()
            .await
            .insert(path.to_string(), failure);
    }

    /// Clear an injected failure.
    pub async fn clear_failure(&self, path: &str) {
        self.failures.write().await.remove(path);
    }

    /// Get all recorded exchanges, in the order they were issued.
    pub async fn recorded_exchanges(&self) -> Vec<RecordedExchange> {
        self.exchanges.read().await.clone()
    }

    /// Recorded exchanges with `path`.
    pub async fn exchanges_with(&self, path: &str) -> Vec<RecordedExchange> {
        self.exchanges
            .read()
            .await
            .iter()
            .filter(|e| e.endpoint.path == path)
            .cloned()
            .collect()
    }

    /// Get the number of exchanges attempted.
    pub async fn exchange_count(&self) -> usize {
        self.exchanges.read().await.len()
    }

    /// Session accounting.
    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    async fn next_response(&self, path: &str) -> Vec<u8> {
        if let Some(response) = self
            .queued
            .write()
            .await
            .get_mut(path)
            .and_then(|queue| queue.pop_front())
        {
            return response;
        }
        self.responses
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    async fn record(
        &self,
        endpoint: &ServiceEndpoint,
        request: &HttpRequest,
        mode: ReadMode,
        success: bool,
    ) {
        self.exchanges.write().await.push(RecordedExchange {
            endpoint: endpoint.clone(),
            request: request.clone(),
            mode,
            success,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn exchange(
        &self,
        endpoint: &ServiceEndpoint,
        request: &HttpRequest,
        mode: ReadMode,
    ) -> Result<Vec<u8>, TransportError> {
        let failure = self.failures.read().await.get(&endpoint.path).copied();

        if failure == Some(MockFailure::Connect) {
            self.record(endpoint, request, mode, false).await;
            return Err(MockFailure::Connect.into_error(endpoint));
        }

        let _lease = SessionLease::open(&self.stats);

        if let Some(failure) = failure {
            self.record(endpoint, request, mode, false).await;
            return Err(failure.into_error(endpoint));
        }

        let mut response = self.next_response(&endpoint.path).await;
        if let ReadMode::Bounded(limit) = mode {
            response.truncate(limit);
        }
        self.record(endpoint, request, mode, true).await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> ServiceEndpoint {
        ServiceEndpoint::new("127.0.0.1", 8000, "/api/vendas")
    }

    #[tokio::test]
    async fn test_queued_responses_take_priority() {
        let transport = MockTransport::new();
        transport.set_response("/api/vendas", b"steady".to_vec()).await;
        transport.push_response("/api/vendas", b"first".to_vec()).await;

        let request = HttpRequest::get(&endpoint());
        let first = transport
            .exchange(&endpoint(), &request, ReadMode::UntilClose)
            .await
            .unwrap();
        let second = transport
            .exchange(&endpoint(), &request, ReadMode::UntilClose)
            .await
            .unwrap();

        assert_eq!(first, b"first".to_vec());
        assert_eq!(second, b"steady".to_vec());
        assert_eq!(transport.exchange_count().await, 2);
    }

    #[tokio::test]
    async fn test_bounded_mode_truncates() {
        let transport = MockTransport::new();
        transport.set_response("/api/vendas", b"0123456789".to_vec()).await;

        let request = HttpRequest::get(&endpoint());
        let response = transport
            .exchange(&endpoint(), &request, ReadMode::Bounded(4))
            .await
            .unwrap();
        assert_eq!(response, b"0123".to_vec());
    }

    #[tokio::test]
    async fn test_session_accounting_by_failure_kind() {
        let transport = MockTransport::new();
        let request = HttpRequest::get(&endpoint());

        transport.set_failure("/api/vendas", MockFailure::Connect).await;
        assert!(transport
            .exchange(&endpoint(), &request, ReadMode::UntilClose)
            .await
            .is_err());
        assert_eq!(transport.stats().opened(), 0);

        transport.set_failure("/api/vendas", MockFailure::Handshake).await;
        assert!(transport
            .exchange(&endpoint(), &request, ReadMode::UntilClose)
            .await
            .is_err());
        assert_eq!(transport.stats().opened(), 1);
        assert_eq!(transport.stats().closed(), 1);

        transport.clear_failure("/api/vendas").await;
        assert!(transport
            .exchange(&endpoint(), &request, ReadMode::UntilClose)
            .await
            .is_ok());
        assert_eq!(transport.stats().opened(), 2);
        assert_eq!(transport.stats().open_sessions(), 0);

        let exchanges = transport.recorded_exchanges().await;
        assert_eq!(
            exchanges.iter().map(|e| e.success).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }
}
