//! Sale polling and change detection.
//!
//! One cycle: attestation gate, fetch the latest-sale payload, isolate the
//! newest record, compare it with the last processed one, and hand genuinely
//! new records to the trip chain. Cycles run strictly one after another.

mod config;
mod runner;
mod types;

pub use config::PollerConfig;
pub use runner::SalePoller;
pub use types::CycleOutcome;
