//! `POST /write`: Prometheus remote_write

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use common::prometheus::{HEADER_REMOTE_WRITE_VERSION, decode_write_request};

use super::HttpState;
use crate::convert::series_from_proto;
use crate::error::{AdapterError, Result};

pub async fn remote_write_handler(
    State(state): State<HttpState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let timer = state.metrics.write.latency.start_timer();
    let result = handle_remote_write(&state, &headers, &body).await;
    timer.observe_duration();

    if let Err(e) = &result {
        state.metrics.write.failed.inc();
        tracing::error!(error = %e, "Failed to handle remote_write request");
    }

    result?;
    // Prometheus expects 204 No Content on success
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_remote_write(state: &HttpState, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let version = headers
        .get(HEADER_REMOTE_WRITE_VERSION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("0.1.0");

    tracing::debug!(
        version = %version,
        body_size = body.len(),
        "Handling remote_write request"
    );

    let request = decode_write_request(body).map_err(AdapterError::Decode)?;
    let series: Vec<_> = request
        .timeseries
        .into_iter()
        .map(series_from_proto)
        .collect();

    let rows = state.adapter.write(&series).await?;
    tracing::debug!(series = series.len(), rows, "Stored remote_write batch");
    Ok(())
}
