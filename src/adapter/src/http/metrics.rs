use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use prometheus::{Encoder, TextEncoder};

use super::HttpState;

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, StatusCode> {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics_registry.gather();

    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let response = String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        response,
    ))
}
