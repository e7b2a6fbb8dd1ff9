//! Types for extracted sale data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields found in a sale record. Each is present or absent on its own;
/// an absent total is never read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleFields {
    pub total: Option<f64>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// A required field that was not found in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Total,
    Address,
    Phone,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Total => "total",
            Self::Address => "address",
            Self::Phone => "phone",
        };
        f.write_str(name)
    }
}

/// A sale with every field the trip chain needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub total: f64,
    pub address: String,
    pub phone: String,
}

impl SaleFields {
    /// Requires all three fields, reporting the first one missing
    /// (checked in the order total, address, phone).
    pub fn complete(self) -> Result<SaleRecord, MissingField> {
        let total = self.total.ok_or(MissingField::Total)?;
        let address = self.address.ok_or(MissingField::Address)?;
        let phone = self.phone.ok_or(MissingField::Phone)?;
        Ok(SaleRecord {
            total,
            address,
            phone,
        })
    }
}
