//! Classification of metrics table columns
//!
//! The table has three fixed columns and any number of label columns that are
//! recognised by [`LABEL_COLUMN_PREFIX`]. Column names coming back from the
//! store are classified once, here.

use crate::escape::LABEL_COLUMN_PREFIX;

pub const VALUE_COLUMN: &str = "value";
pub const VALUE_RAW_COLUMN: &str = "valueRaw";
pub const TIMESTAMP_COLUMN: &str = "timestamp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Dynamic column holding the value of the named label
    Label(String),
    /// Sample value as text
    Value,
    /// Sample value as IEEE-754 bits
    ValueRaw,
    /// Sample timestamp in milliseconds
    Timestamp,
    /// Anything else the store returns; ignored
    Other(String),
}

impl Column {
    pub fn parse(name: &str) -> Self {
        match name {
            VALUE_COLUMN => Self::Value,
            VALUE_RAW_COLUMN => Self::ValueRaw,
            TIMESTAMP_COLUMN => Self::Timestamp,
            _ => match name.strip_prefix(LABEL_COLUMN_PREFIX) {
                Some(label) => Self::Label(label.to_string()),
                None => Self::Other(name.to_string()),
            },
        }
    }

    /// Quoted identifier to use in statements
    pub fn sql_identifier(&self) -> String {
        match self {
            Self::Label(name) => crate::escape::escape_label_name(name),
            Self::Value => format!("\"{VALUE_COLUMN}\""),
            Self::ValueRaw => format!("\"{VALUE_RAW_COLUMN}\""),
            Self::Timestamp => format!("\"{TIMESTAMP_COLUMN}\""),
            Self::Other(name) => format!("\"{name}\""),
        }
    }
}

/// Encode a sample value for the `valueRaw` column
///
/// CrateDB's double columns cannot hold every NaN payload Prometheus uses
/// (stale markers among them), so the bit pattern is stored as a signed long.
pub fn encode_value_raw(value: f64) -> i64 {
    value.to_bits() as i64
}

/// Decode a `valueRaw` cell back into the exact sample value
pub fn decode_value_raw(raw: i64) -> f64 {
    f64::from_bits(raw as u64)
}
