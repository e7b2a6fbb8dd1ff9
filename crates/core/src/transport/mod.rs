//! TLS transport to the remote services.
//!
//! Every request/response exchange runs over its own [`Session`]: open a TCP
//! socket, perform a client-certificate handshake, write one complete
//! HTTP/1.1 request, read until the peer closes, then shut the session down.
//! Sessions are never reused across exchanges.
//!
//! # Example
//!
//! ```ignore
//! use salebridge_core::transport::{
//!     CredentialBundle, HttpRequest, ReadMode, ServerTrust, ServiceEndpoint, TlsContext,
//!     TlsTransport, Transport,
//! };
//!
//! let credentials = CredentialBundle::load(&cert_path, &key_path)?;
//! let context = TlsContext::new(&credentials, ServerTrust::AcceptAny)?;
//! let transport = TlsTransport::new(&context);
//!
//! let endpoint = ServiceEndpoint::new("127.0.0.1", 8000, "/api/vendas");
//! let raw = transport
//!     .exchange(&endpoint, &HttpRequest::get(&endpoint), ReadMode::UntilClose)
//!     .await?;
//! ```

mod credentials;
mod error;
mod http;
mod session;
mod tls;
mod traits;
mod types;
mod verifier;

pub use credentials::{CredentialBundle, CredentialError, ServerTrust};
pub use error::TransportError;
pub use http::{response_body, status_line, HttpMethod, HttpRequest};
pub use session::{Session, SessionStats};
pub use tls::{TlsContext, TlsTransport};
pub use traits::Transport;
pub use types::{ReadMode, ServiceEndpoint};

pub(crate) use session::SessionLease;
