//! Instrumentation hooks for the translation pipeline
//!
//! Implementations are injected into [`crate::Translator`] and into the
//! adapter that talks to the store. All hooks default to doing nothing.

use std::time::Duration;

use crate::model::{Query, TimeSeries};

/// Kind of statement sent to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Select,
    Insert,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
        }
    }
}

pub trait TranslationObserver: Send + Sync {
    /// A read query was turned into SQL
    fn on_query_translated(&self, _query: &Query) {}

    /// A statement came back from the store, successfully or not
    fn on_store_call_completed(
        &self,
        _operation: StoreOperation,
        _elapsed: Duration,
        _success: bool,
    ) {
    }

    /// Result rows were grouped into series
    fn on_assembly_completed(&self, _series: &[TimeSeries]) {}

    /// A write batch was turned into SQL
    fn on_write_translated(&self, _series: &[TimeSeries]) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TranslationObserver for NoopObserver {}
