//! Types for trip booking.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::extract::SaleRecord;
use crate::notify::NotificationOutcome;

use super::TripConfig;

/// Local start time format expected by the travel service.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Booking request sent to the travel service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripBooking {
    #[serde(rename = "local_origem")]
    pub origin: String,
    #[serde(rename = "local_destino")]
    pub destination: String,
    #[serde(rename = "telefone_cliente")]
    pub customer_phone: String,
    #[serde(rename = "id_motorista")]
    pub driver_id: u32,
    #[serde(rename = "id_veiculo")]
    pub vehicle_id: u32,
    #[serde(rename = "id_passageiro")]
    pub passenger_id: u32,
    #[serde(rename = "data_hora_inicio")]
    pub starts_at: String,
    #[serde(rename = "valor")]
    pub amount: f64,
}

impl TripBooking {
    /// Builds the booking for `sale`, starting at `now`.
    pub fn new<Tz>(sale: &SaleRecord, config: &TripConfig, now: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            origin: config.origin.clone(),
            destination: sale.address.clone(),
            customer_phone: sale.phone.clone(),
            driver_id: config.driver_id,
            vehicle_id: config.vehicle_id,
            passenger_id: config.passenger_id,
            starts_at: now.format(START_TIME_FORMAT).to_string(),
            amount: sale.total,
        }
    }
}

/// What happened to the booking request. The reply is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Submitted { response: String },
    Failed(String),
}

/// Result of handing one sale to the trip orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum TripOutcome {
    /// Total at or below the threshold; nothing was sent.
    BelowThreshold { total: f64 },
    /// A booking was attempted and the customer was notified.
    Scheduled {
        booking: TripBooking,
        outcome: BookingOutcome,
        notification: NotificationOutcome,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn sale() -> SaleRecord {
        SaleRecord {
            total: 200.0,
            address: "Rua X, 10".to_string(),
            phone: "5599999999".to_string(),
        }
    }

    #[test]
    fn test_booking_from_sale() {
        let now = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 10, 14, 5, 59)
            .unwrap();
        let booking = TripBooking::new(&sale(), &TripConfig::default(), now);

        assert_eq!(booking.destination, "Rua X, 10");
        assert_eq!(booking.customer_phone, "5599999999");
        assert_eq!(booking.amount, 200.0);
        assert_eq!(booking.starts_at, "2024-06-10 14:05");
        assert_eq!(booking.origin, TripConfig::default().origin);
    }

    #[test]
    fn test_booking_wire_names() {
        let booking = TripBooking::new(&sale(), &TripConfig::default(), Utc::now());
        let json = serde_json::to_value(&booking).unwrap();

        for key in [
            "local_origem",
            "local_destino",
            "telefone_cliente",
            "id_motorista",
            "id_veiculo",
            "id_passageiro",
            "data_hora_inicio",
            "valor",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["valor"], 200.0);
    }
}
