//! Testing utilities and mock implementations.
//!
//! [`MockTransport`] stands in for the TLS transport so the whole pipeline
//! can run without remote services or certificates.
//!
//! # Example
//!
//! ```rust,ignore
//! use salebridge_core::testing::{fixtures, MockTransport};
//!
//! let transport = Arc::new(MockTransport::new());
//! transport.set_response("/api/system-info", fixtures::attestation_accepted()).await;
//! transport
//!     .set_response("/api/vendas", fixtures::sales_response(&[fixtures::sale_json(200.0, "Rua X, 10", "5599999999")]))
//!     .await;
//!
//! let mut poller = SalePoller::from_config(transport.clone(), &Config::default());
//! poller.poll_once().await;
//!
//! assert_eq!(transport.exchange_count().await, 4);
//! ```

mod mock_transport;

pub use mock_transport::{MockFailure, MockTransport, RecordedExchange};

/// Test fixtures and helper functions.
pub mod fixtures {
    /// A raw HTTP/1.1 response with the given status (e.g. `"200 OK"`) and body.
    pub fn http_response(status: &str, body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .into_bytes()
    }

    /// Reply of a sales service that accepts the system descriptor.
    pub fn attestation_accepted() -> Vec<u8> {
        http_response("200 OK", r#"{"message": "Valid system information received"}"#)
    }

    /// One sale record as the sales service renders it.
    pub fn sale_json(total: f64, address: &str, phone: &str) -> String {
        format!(
            r#"{{"Data": "2024-06-10", "Endereco": "{}", "ID": 1, "IDCliente": 1, "IDVendedor": 1, "Telefone": "{}", "Total": {:.2}}}"#,
            address, phone, total
        )
    }

    /// Latest-sale response listing `records` oldest first.
    pub fn sales_response(records: &[String]) -> Vec<u8> {
        http_response("200 OK", &format!("{{\"vendas\": [{}]}}", records.join(", ")))
    }
}
