pub mod attestation;
pub mod bootstrap;
pub mod config;
pub mod extract;
pub mod notify;
pub mod poller;
pub mod testing;
pub mod transport;
pub mod trip;

pub use attestation::{
    AttestationConfig, AttestationValidator, AttestationVerdict, RejectionReason, SystemDescriptor,
};
pub use bootstrap::{spawn_bootstrap, BootstrapConfig, BootstrapError, BootstrapSignal};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SalesServiceConfig,
    ServicesConfig, TlsConfig,
};
pub use extract::{MissingField, RecordExtractor, SaleFields, SaleRecord, TextScanExtractor};
pub use notify::{Notification, NotificationOutcome, NotificationSender};
pub use poller::{CycleOutcome, PollerConfig, SalePoller};
pub use transport::{
    CredentialBundle, CredentialError, ReadMode, ServerTrust, ServiceEndpoint, SessionStats,
    TlsContext, TlsTransport, Transport, TransportError,
};
pub use trip::{BookingOutcome, TripBooking, TripConfig, TripOrchestrator, TripOutcome};
