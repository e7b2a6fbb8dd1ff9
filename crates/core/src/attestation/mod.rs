//! Attestation gate.
//!
//! Before any sale data is requested, the poller posts a fixed system
//! descriptor to the sales service and continues only if the reply carries
//! the acceptance marker.

mod config;
mod validator;

pub use config::{AttestationConfig, SystemDescriptor};
pub use validator::{AttestationValidator, AttestationVerdict, RejectionReason};
