//! Read and write pipelines between remote storage requests and the store

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use translator::{Query, StoreOperation, TimeSeries, Translator};

use crate::error::Result;
use crate::store::{SqlStore, StoreError};

/// Runs translated statements against a [`SqlStore`]
pub struct CrateAdapter {
    store: Arc<dyn SqlStore>,
    translator: Translator,
}

impl CrateAdapter {
    pub fn new(store: Arc<dyn SqlStore>, translator: Translator) -> Self {
        Self { store, translator }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Answer one remote-read query
    pub async fn read(&self, query: &Query) -> Result<Vec<TimeSeries>> {
        let request = self.translator.translate_query(query)?;
        tracing::debug!(stmt = %request.stmt, "Querying CrateDB");

        let table = self
            .timed(StoreOperation::Select, self.store.query(&request))
            .await?;

        let series = self.translator.assemble(&table)?;
        tracing::debug!(
            rows = table.rows.len(),
            series = series.len(),
            "Assembled remote_read result"
        );
        Ok(series)
    }

    /// Store a remote-write batch, returning the number of rows written
    pub async fn write(&self, series: &[TimeSeries]) -> Result<usize> {
        if series.iter().all(|ts| ts.samples.is_empty()) {
            tracing::debug!("Empty remote_write request, skipping");
            return Ok(0);
        }

        let request = self.translator.translate_write(series);
        let rows = request.row_count();
        tracing::debug!(stmt = %request.stmt, rows, "Inserting into CrateDB");

        self.timed(StoreOperation::Insert, self.store.execute(&request))
            .await?;
        Ok(rows)
    }

    async fn timed<T>(
        &self,
        operation: StoreOperation,
        call: impl Future<Output = std::result::Result<T, StoreError>>,
    ) -> std::result::Result<T, StoreError> {
        let started = Instant::now();
        let result = call.await;
        let elapsed = started.elapsed();

        let observer = self.translator.observer();
        observer.on_store_call_completed(operation, elapsed, result.is_ok());

        if let Err(e) = &result {
            tracing::error!(operation = operation.as_str(), error = %e, "CrateDB request failed");
        }
        result
    }
}
