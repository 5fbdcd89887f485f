//! Request and response bodies of the CrateDB `/_sql` HTTP endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scalar bound to a statement placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Text(String),
    Integer(i64),
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// Statement sent to the store, either single or bulk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlRequest {
    pub stmt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<SqlValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_args: Option<Vec<Vec<SqlValue>>>,
}

impl SqlRequest {
    /// Statement without bound parameters
    pub fn statement(stmt: impl Into<String>) -> Self {
        Self {
            stmt: stmt.into(),
            args: Vec::new(),
            bulk_args: None,
        }
    }

    /// Statement executed once per argument row
    pub fn bulk(stmt: impl Into<String>, bulk_args: Vec<Vec<SqlValue>>) -> Self {
        Self {
            stmt: stmt.into(),
            args: Vec::new(),
            bulk_args: Some(bulk_args),
        }
    }

    pub fn is_bulk(&self) -> bool {
        self.bulk_args.is_some()
    }

    /// Number of argument rows of a bulk statement
    pub fn row_count(&self) -> usize {
        self.bulk_args.as_ref().map_or(0, Vec::len)
    }
}

/// Column names and rows returned for a `SELECT`
///
/// Cells stay as raw JSON values; integers are kept exactly as the store
/// printed them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultTable {
    #[serde(default)]
    pub cols: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// Per-row outcome of a bulk statement
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkResult {
    pub rowcount: i64,
}

/// Response to a bulk statement
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub results: Vec<BulkResult>,
}

impl BulkResponse {
    /// Row count CrateDB reports for a bulk row that failed
    pub const FAILED_ROWCOUNT: i64 = -2;

    pub fn failed_rows(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.rowcount == Self::FAILED_ROWCOUNT)
            .count()
    }
}
