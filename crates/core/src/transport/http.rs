//! Minimal HTTP/1.1 framing for single-shot exchanges.
//!
//! Requests always carry `Connection: close` so the peer ends the exchange by
//! closing the session. Responses are not parsed; callers get the raw bytes
//! and can split off the body for logging or substring checks.

use serde::Serialize;
use std::fmt;

use super::{ServiceEndpoint, TransportError};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete HTTP/1.1 request for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    host: String,
    path: String,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A bodiless GET for the endpoint's path.
    pub fn get(endpoint: &ServiceEndpoint) -> Self {
        Self {
            method: HttpMethod::Get,
            host: endpoint.host.clone(),
            path: endpoint.path.clone(),
            body: None,
        }
    }

    /// A POST carrying `body` serialized as JSON.
    pub fn post_json<T>(endpoint: &ServiceEndpoint, body: &T) -> Result<Self, TransportError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self {
            method: HttpMethod::Post,
            host: endpoint.host.clone(),
            path: endpoint.path.clone(),
            body: Some(serde_json::to_vec(body)?),
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Serializes the request line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\n",
            self.method, self.path, self.host
        );
        if let Some(body) = &self.body {
            head.push_str("Content-Type: application/json\r\n");
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }
        bytes
    }
}

/// Everything after the header block of a raw response.
///
/// Returns the whole input when no header terminator is present.
pub fn response_body(raw: &[u8]) -> &[u8] {
    raw.windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
        .map(|idx| &raw[idx + HEADER_TERMINATOR.len()..])
        .unwrap_or(raw)
}

/// The first line of a raw response, if it is valid UTF-8.
pub fn status_line(raw: &[u8]) -> Option<&str> {
    let end = raw
        .windows(2)
        .position(|window| window == b"\r\n")
        .unwrap_or(raw.len());
    std::str::from_utf8(&raw[..end]).ok().filter(|line| !line.is_empty())
}
