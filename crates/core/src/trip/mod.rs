//! Trip booking for qualifying sales.
//!
//! A sale whose total exceeds the threshold is turned into a booking request
//! for the travel service, followed by a confirmation message to the
//! customer. The two calls are deliberately not transactional: the
//! confirmation is sent after every booking attempt, whatever its outcome.

mod config;
mod orchestrator;
mod types;

pub use config::TripConfig;
pub use orchestrator::TripOrchestrator;
pub use types::{BookingOutcome, TripBooking, TripOutcome, START_TIME_FORMAT};
