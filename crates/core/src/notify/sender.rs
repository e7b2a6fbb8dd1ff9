//! Notification sender.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::transport::{HttpRequest, ReadMode, ServiceEndpoint, Transport};

/// Message addressed to a customer's phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "numero_telefone")]
    pub phone: String,
    #[serde(rename = "mensagem")]
    pub message: String,
}

/// What happened to one notification. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The messaging service replied; the reply is kept for logging only.
    Delivered { response: String },
    /// The exchange failed; no retry is attempted.
    Failed(String),
}

/// Sends confirmation messages, one fresh session per message.
pub struct NotificationSender {
    transport: Arc<dyn Transport>,
    endpoint: ServiceEndpoint,
}

impl NotificationSender {
    pub fn new(transport: Arc<dyn Transport>, endpoint: ServiceEndpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub async fn send(&self, phone: &str, message: &str) -> NotificationOutcome {
        let notification = Notification {
            phone: phone.to_string(),
            message: message.to_string(),
        };

        let request = match HttpRequest::post_json(&self.endpoint, &notification) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to encode notification: {}", e);
                return NotificationOutcome::Failed(e.to_string());
            }
        };

        match self
            .transport
            .exchange(&self.endpoint, &request, ReadMode::UntilClose)
            .await
        {
            Ok(raw) => {
                let response = String::from_utf8_lossy(&raw).into_owned();
                info!(phone = %phone, "Response from messaging service: {}", response);
                NotificationOutcome::Delivered { response }
            }
            Err(e) => {
                warn!(phone = %phone, endpoint = %self.endpoint, "Failed to send notification: {}", e);
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}
