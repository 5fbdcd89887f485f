use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::prometheus::CodecError;
use thiserror::Error;
use translator::TranslateError;

use crate::store::StoreError;

/// Errors surfaced by the remote read/write endpoints
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The body was not snappy-compressed protobuf of the expected message
    #[error("failed to decode request: {0}")]
    Decode(#[source] CodecError),

    /// Read requests must carry exactly one query
    #[error("Can only handle one query.")]
    QueryCount(usize),

    #[error("unknown label matcher type {0}")]
    UnknownMatcherType(i32),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("CrateDB request failed: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode response: {0}")]
    Encode(#[source] CodecError),
}

impl AdapterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::QueryCount(_) | Self::UnknownMatcherType(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Translate(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Translate(_) | Self::Store(_) | Self::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
