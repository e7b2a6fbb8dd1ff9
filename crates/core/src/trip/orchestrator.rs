//! Threshold rule and the book-then-notify chain.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::extract::SaleRecord;
use crate::notify::NotificationSender;
use crate::transport::{HttpRequest, ReadMode, ServiceEndpoint, Transport};

use super::{BookingOutcome, TripBooking, TripConfig, TripOutcome};

/// Books trips for qualifying sales and notifies the customer.
pub struct TripOrchestrator {
    transport: Arc<dyn Transport>,
    endpoint: ServiceEndpoint,
    config: TripConfig,
    notifier: NotificationSender,
}

impl TripOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: ServiceEndpoint,
        config: TripConfig,
        notifier: NotificationSender,
    ) -> Self {
        Self {
            transport,
            endpoint,
            config,
            notifier,
        }
    }

    /// Applies the threshold rule, then books and notifies.
    ///
    /// The notification is sent after every booking attempt, including
    /// failed ones.
    pub async fn handle(&self, sale: &SaleRecord) -> TripOutcome {
        if sale.total <= self.config.threshold {
            info!(
                total = sale.total,
                threshold = self.config.threshold,
                "Total sale value at or below threshold, no trip scheduled"
            );
            return TripOutcome::BelowThreshold { total: sale.total };
        }

        let booking = TripBooking::new(sale, &self.config, Local::now());
        let outcome = self.book(&booking).await;

        let notification = self
            .notifier
            .send(&sale.phone, &self.config.confirmation_message)
            .await;

        TripOutcome::Scheduled {
            booking,
            outcome,
            notification,
        }
    }

    async fn book(&self, booking: &TripBooking) -> BookingOutcome {
        let request = match HttpRequest::post_json(&self.endpoint, booking) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to encode booking: {}", e);
                return BookingOutcome::Failed(e.to_string());
            }
        };

        info!(
            destination = %booking.destination,
            amount = booking.amount,
            starts_at = %booking.starts_at,
            "Scheduling trip"
        );

        match self
            .transport
            .exchange(&self.endpoint, &request, ReadMode::UntilClose)
            .await
        {
            Ok(raw) => {
                let response = String::from_utf8_lossy(&raw).into_owned();
                info!("Response from travel service: {}", response);
                BookingOutcome::Submitted { response }
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, "Booking request failed: {}", e);
                BookingOutcome::Failed(e.to_string())
            }
        }
    }
}
