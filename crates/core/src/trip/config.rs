//! Trip booking configuration.

use serde::{Deserialize, Serialize};

/// Fixed parts of every booking, plus the threshold rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    /// Sales with a total strictly above this value get a trip.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Pick-up location for every trip.
    #[serde(default = "default_origin")]
    pub origin: String,

    #[serde(default = "default_id")]
    pub driver_id: u32,

    #[serde(default = "default_id")]
    pub vehicle_id: u32,

    #[serde(default = "default_id")]
    pub passenger_id: u32,

    /// Text sent to the customer after the booking attempt.
    #[serde(default = "default_confirmation_message")]
    pub confirmation_message: String,
}

fn default_threshold() -> f64 {
    150.0
}

fn default_origin() -> String {
    "Loja Centro - Ijui/RS".to_string()
}

fn default_id() -> u32 {
    1
}

fn default_confirmation_message() -> String {
    "Sua viagem foi agendada com sucesso! Em breve um motorista entrara em contato.".to_string()
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            origin: default_origin(),
            driver_id: default_id(),
            vehicle_id: default_id(),
            passenger_id: default_id(),
            confirmation_message: default_confirmation_message(),
        }
    }
}
