//! Types for the sale poller.

use crate::attestation::RejectionReason;
use crate::extract::MissingField;
use crate::trip::TripOutcome;

/// How one polling cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The attestation gate rejected this cycle; nothing else was requested.
    AttestationRejected(RejectionReason),
    /// The latest-sale exchange failed.
    FetchFailed(String),
    /// The payload contained no record.
    NoRecord,
    /// The newest record is byte-identical to the last processed one.
    AlreadyShown,
    /// The record is new but lacks a required field.
    Rejected(MissingField),
    /// The record is new and went through the trip chain.
    Processed(TripOutcome),
}

impl CycleOutcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AttestationRejected(_) => "attestation_rejected",
            Self::FetchFailed(_) => "fetch_failed",
            Self::NoRecord => "no_record",
            Self::AlreadyShown => "already_shown",
            Self::Rejected(_) => "rejected",
            Self::Processed(TripOutcome::BelowThreshold { .. }) => "below_threshold",
            Self::Processed(TripOutcome::Scheduled { .. }) => "trip_scheduled",
        }
    }

    /// Whether this cycle detected a record it had not processed before.
    pub fn is_new_record(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Processed(_))
    }
}
