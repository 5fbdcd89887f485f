//! Prometheus remote storage ↔ CrateDB SQL translation
//!
//! This crate holds the translation logic of the adapter and nothing else:
//! it performs no I/O and keeps no state between calls.
//!
//! ## Read path
//!
//! A remote-read [`Query`] (label matchers plus a time range) is turned into a
//! single `SELECT` over the flat metrics table. The rows the store returns are
//! grouped back into [`TimeSeries`] by their label set.
//!
//! ## Write path
//!
//! A batch of [`TimeSeries`] becomes one bulk `INSERT` with a column per label
//! name used anywhere in the batch, and one argument row per sample.
//!
//! ## Table layout
//!
//! | column      | content                                                  |
//! |-------------|----------------------------------------------------------|
//! | `l<name>`   | one column per label name, `NULL` when absent or empty   |
//! | `value`     | the sample value as text, for humans                     |
//! | `valueRaw`  | the IEEE-754 bits of the sample value as a signed 64-bit |
//! | `timestamp` | sample timestamp in milliseconds                         |

pub mod assembler;
pub mod column;
pub mod error;
pub mod escape;
pub mod matcher;
pub mod model;
pub mod observer;
pub mod query;
pub mod statement;
pub mod write;

use std::sync::Arc;

pub use assembler::assemble_time_series;
pub use column::Column;
pub use error::{Result, TranslateError};
pub use model::{Label, LabelMatcher, LabelSet, MatchType, Query, Sample, SeriesKey, TimeSeries};
pub use observer::{NoopObserver, StoreOperation, TranslationObserver};
pub use query::query_to_sql;
pub use statement::{ResultTable, SqlRequest, SqlValue};
pub use write::write_to_sql;

/// Table used when none is configured
pub const DEFAULT_TABLE: &str = "metrics";

/// Entry point bundling the translation functions with a target table and an
/// observer.
///
/// The observer is the only way instrumentation reaches the translation
/// code; there is no process-wide metrics state in this crate.
#[derive(Clone)]
pub struct Translator {
    table: String,
    observer: Arc<dyn TranslationObserver>,
}

impl Translator {
    pub fn new(table: impl Into<String>, observer: Arc<dyn TranslationObserver>) -> Self {
        Self {
            table: table.into(),
            observer,
        }
    }

    /// Translator without instrumentation
    pub fn without_observer(table: impl Into<String>) -> Self {
        Self::new(table, Arc::new(NoopObserver))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn observer(&self) -> &Arc<dyn TranslationObserver> {
        &self.observer
    }

    /// Translate a remote-read query into a `SELECT` statement
    pub fn translate_query(&self, query: &Query) -> Result<SqlRequest> {
        let request = query_to_sql(&self.table, query)?;
        self.observer.on_query_translated(query);
        Ok(request)
    }

    /// Rebuild time series from the rows returned for a translated query
    pub fn assemble(&self, table: &ResultTable) -> Result<Vec<TimeSeries>> {
        let series = assemble_time_series(table)?;
        self.observer.on_assembly_completed(&series);
        Ok(series)
    }

    /// Translate a write batch into a bulk `INSERT` statement
    pub fn translate_write(&self, series: &[TimeSeries]) -> SqlRequest {
        let request = write_to_sql(&self.table, series);
        self.observer.on_write_translated(series);
        request
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
