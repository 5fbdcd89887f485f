//! Client for the CrateDB `/_sql` HTTP endpoint
//!
//! Statements are POSTed as JSON (`{"stmt": ..., "args": ...}` or
//! `{"stmt": ..., "bulk_args": ...}`). Non-2xx responses carry an
//! `{"error": {"message": ..., "code": ...}}` body which is turned into a
//! [`StoreError::Status`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use translator::{ResultTable, SqlRequest, statement::BulkResponse};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CrateDB responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("{failed} of {total} bulk rows failed")]
    BulkRows { failed: usize, total: usize },
}

/// Executes SQL against the store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlStore: Send + Sync {
    /// Run a `SELECT` and return its result table
    async fn query(&self, request: &SqlRequest) -> Result<ResultTable, StoreError>;

    /// Run a statement whose rows are not needed, typically a bulk `INSERT`
    async fn execute(&self, request: &SqlRequest) -> Result<(), StoreError>;
}

/// [`SqlStore`] talking to CrateDB over HTTP
#[derive(Debug, Clone)]
pub struct HttpSqlStore {
    client: reqwest::Client,
    url: String,
}

impl HttpSqlStore {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, request: &SqlRequest) -> Result<reqwest::Response, StoreError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.text().await {
            Ok(body) => status_message(status, &body),
            Err(e) => format!("failed to read response body: {e}"),
        };
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SqlStore for HttpSqlStore {
    async fn query(&self, request: &SqlRequest) -> Result<ResultTable, StoreError> {
        let response = self.post(request).await?;
        response.json().await.map_err(StoreError::Body)
    }

    async fn execute(&self, request: &SqlRequest) -> Result<(), StoreError> {
        let response = self.post(request).await?;
        let body: BulkResponse = response.json().await.map_err(StoreError::Body)?;

        let failed = body.failed_rows();
        if failed > 0 {
            let total = body.results.len();
            tracing::warn!(failed, total, "Bulk insert rows failed");
            return Err(StoreError::BulkRows { failed, total });
        }
        Ok(())
    }
}

/// Extract the message of a CrateDB error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Message for a non-2xx response, using the status reason when the body is empty
fn status_message(status: StatusCode, body: &str) -> String {
    let message = error_message(body);
    if !message.is_empty() {
        return message;
    }
    status
        .canonical_reason()
        .unwrap_or("no response body")
        .to_string()
}
