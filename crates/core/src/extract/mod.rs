//! Sale record isolation and field extraction.
//!
//! The sales service returns loosely structured text. Instead of decoding it,
//! the newest record is taken to be the bytes from the last `{` onward, and
//! fields are located by searching for their literal `"Key":` marker. The
//! [`RecordExtractor`] trait keeps that heuristic behind one seam so a real
//! decoder can replace it without touching the poller or the trip chain.

mod text_scan;
mod types;

pub use text_scan::{
    extract_decimal, extract_quoted_string, latest_record, TextScanExtractor, ADDRESS_KEY,
    PHONE_KEY, TOTAL_KEY,
};
pub use types::{MissingField, SaleFields, SaleRecord};

/// Locates the newest record in a payload and pulls sale fields out of it.
pub trait RecordExtractor: Send + Sync {
    /// Returns the newest record, or `None` when the payload holds none.
    ///
    /// Works on raw bytes so change detection is an exact byte comparison.
    fn latest_record<'a>(&self, payload: &'a [u8]) -> Option<&'a [u8]>;

    /// Extracts the sale fields from one record.
    fn sale_fields(&self, record: &str) -> SaleFields;
}
