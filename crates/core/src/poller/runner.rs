//! Sale poller implementation.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::attestation::{AttestationValidator, AttestationVerdict};
use crate::config::Config;
use crate::extract::{RecordExtractor, TextScanExtractor};
use crate::notify::NotificationSender;
use crate::transport::{HttpRequest, ReadMode, ServiceEndpoint, Transport};
use crate::trip::TripOrchestrator;

use super::config::PollerConfig;
use super::types::CycleOutcome;

/// Drives polling cycles and remembers the last processed record.
///
/// The remembered record lives only in this instance; a new poller (e.g.
/// after a restart) treats the first record it sees as new.
pub struct SalePoller {
    transport: Arc<dyn Transport>,
    endpoint: ServiceEndpoint,
    attestation: AttestationValidator,
    extractor: Box<dyn RecordExtractor>,
    trips: TripOrchestrator,
    config: PollerConfig,
    last_record: Option<Vec<u8>>,
}

impl SalePoller {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: ServiceEndpoint,
        attestation: AttestationValidator,
        trips: TripOrchestrator,
        config: PollerConfig,
    ) -> Self {
        Self {
            transport,
            endpoint,
            attestation,
            extractor: Box::new(TextScanExtractor),
            trips,
            config,
            last_record: None,
        }
    }

    /// Wires the attestation gate, trip chain and notifier from configuration.
    pub fn from_config(transport: Arc<dyn Transport>, config: &Config) -> Self {
        let sales = &config.services.sales;

        let attestation = AttestationValidator::new(
            Arc::clone(&transport),
            sales.attestation_endpoint(),
            config.attestation.clone(),
            config.poller.attestation_read_limit,
        );
        let notifier = NotificationSender::new(
            Arc::clone(&transport),
            config.services.messaging.clone(),
        );
        let trips = TripOrchestrator::new(
            Arc::clone(&transport),
            config.services.booking.clone(),
            config.trip.clone(),
            notifier,
        );

        Self::new(
            transport,
            sales.latest_sale_endpoint(),
            attestation,
            trips,
            config.poller.clone(),
        )
    }

    /// Replaces the record extraction strategy.
    pub fn with_extractor(mut self, extractor: Box<dyn RecordExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// The raw bytes of the last record handed to field extraction, if any.
    pub fn last_record(&self) -> Option<&[u8]> {
        self.last_record.as_deref()
    }

    /// Runs one polling cycle.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        info!("Checking last sale");

        if let AttestationVerdict::Rejected(reason) = self.attestation.validate().await {
            warn!("Invalid system information ({}), skipping cycle", reason);
            return CycleOutcome::AttestationRejected(reason);
        }

        let request = HttpRequest::get(&self.endpoint);
        let raw = match self
            .transport
            .exchange(&self.endpoint, &request, ReadMode::UntilClose)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                if e.is_connect_failure() {
                    warn!(endpoint = %self.endpoint, "Sales service unreachable: {}", e);
                } else {
                    warn!(endpoint = %self.endpoint, "Sales response interrupted: {}", e);
                }
                return CycleOutcome::FetchFailed(e.to_string());
            }
        };

        let Some(record) = self.extractor.latest_record(&raw) else {
            debug!(bytes = raw.len(), "No sale record in payload");
            return CycleOutcome::NoRecord;
        };

        if self.last_record.as_deref() == Some(record) {
            info!("Last sale previously shown");
            return CycleOutcome::AlreadyShown;
        }

        self.last_record = Some(record.to_vec());
        let text = String::from_utf8_lossy(record);
        info!("Last sale data: {}", text);

        let sale = match self.extractor.sale_fields(&text).complete() {
            Ok(sale) => sale,
            Err(missing) => {
                warn!(field = %missing, "Failed to extract {} from last sale data", missing);
                return CycleOutcome::Rejected(missing);
            }
        };

        CycleOutcome::Processed(self.trips.handle(&sale).await)
    }

    /// Polls at a fixed interval until `shutdown` resolves.
    ///
    /// Shutdown is observed between cycles only; a cycle in progress always
    /// finishes its chain first.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            interval_ms = self.config.interval_ms,
            "Sale poller started"
        );

        loop {
            let outcome = self.poll_once().await;
            debug!(outcome = outcome.label(), "Poll cycle finished");

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Sale poller received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.config.interval()) => {}
            }
        }

        info!("Sale poller stopped");
    }
}
