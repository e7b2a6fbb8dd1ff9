//! Trait definitions for the transport module.

use async_trait::async_trait;

use super::{HttpRequest, ReadMode, ServiceEndpoint, TransportError};

/// A transport that runs one request/response exchange per call.
///
/// Implementations open a fresh session for every call and release it on
/// every exit path before returning.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the name of this transport implementation.
    fn name(&self) -> &str;

    /// Sends `request` to `endpoint` and returns the raw response bytes.
    async fn exchange(
        &self,
        endpoint: &ServiceEndpoint,
        request: &HttpRequest,
        mode: ReadMode,
    ) -> Result<Vec<u8>, TransportError>;
}
