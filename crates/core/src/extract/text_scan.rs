//! Substring-based extraction.

use super::{RecordExtractor, SaleFields};

/// Key of the sale total.
pub const TOTAL_KEY: &str = "Total";
/// Key of the customer address.
pub const ADDRESS_KEY: &str = "Endereco";
/// Key of the customer phone number.
pub const PHONE_KEY: &str = "Telefone";

/// The bytes from the last `{` to the end of the payload.
pub fn latest_record(payload: &[u8]) -> Option<&[u8]> {
    payload
        .iter()
        .rposition(|&b| b == b'{')
        .map(|start| &payload[start..])
}

/// Parses the number following `"key":`.
///
/// Returns `None` when the marker is absent or no finite number follows it.
pub fn extract_decimal(record: &str, key: &str) -> Option<f64> {
    let rest = value_after_key(record, key)?;
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(rest.len());
    rest[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Captures the quoted value following `"key":` up to the next `"`.
///
/// Backslash escapes are not interpreted: an escaped quote ends the value.
pub fn extract_quoted_string(record: &str, key: &str) -> Option<String> {
    let rest = value_after_key(record, key)?.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn value_after_key<'a>(record: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("\"{}\":", key);
    let start = record.find(&marker)? + marker.len();
    Some(record[start..].trim_start())
}

/// [`RecordExtractor`] built on the substring scanners above.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextScanExtractor;

impl RecordExtractor for TextScanExtractor {
    fn latest_record<'a>(&self, payload: &'a [u8]) -> Option<&'a [u8]> {
        latest_record(payload)
    }

    fn sale_fields(&self, record: &str) -> SaleFields {
        SaleFields {
            total: extract_decimal(record, TOTAL_KEY),
            address: extract_quoted_string(record, ADDRESS_KEY),
            phone: extract_quoted_string(record, PHONE_KEY),
        }
    }
}
