//! `POST /read`: Prometheus remote_read with sample responses

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use common::prometheus::{
    HEADER_REMOTE_READ_VERSION, PROMETHEUS_CONTENT_ENCODING, PROMETHEUS_CONTENT_TYPE,
    decode_read_request, encode_read_response,
    proto::{QueryResult, ReadResponse},
};

use super::HttpState;
use crate::convert::{query_from_proto, series_to_proto};
use crate::error::{AdapterError, Result};

pub async fn remote_read_handler(
    State(state): State<HttpState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let timer = state.metrics.read.latency.start_timer();
    let result = handle_remote_read(&state, &headers, &body).await;
    timer.observe_duration();

    let encoded = result.inspect_err(|e| {
        state.metrics.read.failed.inc();
        tracing::error!(error = %e, "Failed to handle remote_read request");
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CONTENT_ENCODING, PROMETHEUS_CONTENT_ENCODING),
        ],
        encoded,
    )
        .into_response())
}

async fn handle_remote_read(
    state: &HttpState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Vec<u8>> {
    let version = headers
        .get(HEADER_REMOTE_READ_VERSION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("0.1.0");

    let request = decode_read_request(body).map_err(AdapterError::Decode)?;
    tracing::debug!(
        version = %version,
        queries = request.queries.len(),
        "Handling remote_read request"
    );

    let [query] = request.queries.as_slice() else {
        return Err(AdapterError::QueryCount(request.queries.len()));
    };

    let query = query_from_proto(query)?;
    let series = state.adapter.read(&query).await?;

    let response = ReadResponse {
        results: vec![QueryResult {
            timeseries: series.into_iter().map(series_to_proto).collect(),
        }],
    };
    encode_read_response(&response).map_err(AdapterError::Encode)
}

#[cfg(test)]
mod tests {
    use super::super::{create_router, test_support};
    use crate::store::MockSqlStore;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use common::prometheus::{
        codec::{decode_read_response, encode_read_request},
        proto::{LabelMatcher, Query, ReadRequest, label_matcher},
    };
    use serde_json::json;
    use tower::ServiceExt;
    use translator::ResultTable;

    fn query(matcher_type: i32, value: &str) -> Query {
        Query {
            start_timestamp_ms: 1000,
            end_timestamp_ms: 2000,
            matchers: vec![LabelMatcher {
                r#type: matcher_type,
                name: "__name__".to_string(),
                value: value.to_string(),
            }],
        }
    }

    fn post(queries: Vec<Query>) -> Request<Body> {
        let request = ReadRequest {
            queries,
            accepted_response_types: vec![],
        };
        let body = encode_read_request(&request).unwrap();
        Request::builder()
            .method("POST")
            .uri("/read")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_read_returns_snappy_protobuf() {
        let stale = f64::from_bits(0x7ff0_0000_0000_0002);
        let table = ResultTable {
            cols: vec![
                "l__name__".to_string(),
                "value".to_string(),
                "valueRaw".to_string(),
                "timestamp".to_string(),
            ],
            rows: vec![vec![
                json!("up"),
                json!("NaN"),
                json!(stale.to_bits() as i64),
                json!(1500),
            ]],
        };

        let mut store = MockSqlStore::new();
        store
            .expect_query()
            .times(1)
            .returning(move |_| Ok(table.clone()));
        let state = test_support::state(store);
        let metrics = state.metrics.clone();

        let response = create_router(state)
            .oneshot(post(vec![query(label_matcher::Type::Eq as i32, "up")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "application/x-protobuf");
        assert_eq!(headers["content-encoding"], "snappy");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let decoded = decode_read_response(&body).unwrap();
        assert_eq!(decoded.results.len(), 1);
        let series = &decoded.results[0].timeseries;
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].labels[0].value, "up");
        assert_eq!(series[0].samples[0].timestamp, 1500);
        assert_eq!(series[0].samples[0].value.to_bits(), stale.to_bits());

        assert_eq!(metrics.read.timeseries_samples.get_sample_sum(), 1.0);
        assert_eq!(metrics.read.latency.get_sample_count(), 1);
    }

    #[tokio::test]
    async fn test_more_than_one_query_is_bad_request() {
        let mut store = MockSqlStore::new();
        store.expect_query().never();

        let response = create_router(test_support::state(store))
            .oneshot(post(vec![
                query(label_matcher::Type::Eq as i32, "up"),
                query(label_matcher::Type::Eq as i32, "down"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Can only handle one query.");
    }

    #[tokio::test]
    async fn test_zero_queries_is_bad_request() {
        let mut store = MockSqlStore::new();
        store.expect_query().never();

        let response = create_router(test_support::state(store))
            .oneshot(post(vec![]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_matcher_type_is_bad_request() {
        let mut store = MockSqlStore::new();
        store.expect_query().never();
        let state = test_support::state(store);
        let metrics = state.metrics.clone();

        let response = create_router(state)
            .oneshot(post(vec![query(42, "up")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(metrics.read.failed.get(), 1);
    }

    #[tokio::test]
    async fn test_invalid_regex_is_bad_request() {
        let mut store = MockSqlStore::new();
        store.expect_query().never();

        let response = create_router(test_support::state(store))
            .oneshot(post(vec![query(label_matcher::Type::Re as i32, "(")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_result_is_internal_error() {
        let mut store = MockSqlStore::new();
        store.expect_query().returning(|_| {
            Ok(ResultTable {
                cols: vec!["l__name__".to_string()],
                rows: vec![vec![json!("up")]],
            })
        });

        let response = create_router(test_support::state(store))
            .oneshot(post(vec![query(label_matcher::Type::Eq as i32, "up")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
