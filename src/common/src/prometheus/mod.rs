//! Prometheus remote read/write protocol
//!
//! ## Protocol Details
//!
//! - Content-Type: `application/x-protobuf`
//! - Content-Encoding: `snappy` (block format, not framed)
//! - Write endpoint receives a `WriteRequest`, answers with an empty 2xx
//! - Read endpoint receives a `ReadRequest`, answers with a `ReadResponse`

pub mod codec;
pub mod proto;

pub use codec::{
    CodecError, decode_read_request, decode_write_request, encode_read_response, snappy_compress,
    snappy_decompress,
};

/// Content type for remote read/write bodies
pub const PROMETHEUS_CONTENT_TYPE: &str = "application/x-protobuf";

/// Content encoding for remote read/write bodies
pub const PROMETHEUS_CONTENT_ENCODING: &str = "snappy";

/// Header carrying the remote write protocol version
pub const HEADER_REMOTE_WRITE_VERSION: &str = "X-Prometheus-Remote-Write-Version";

/// Header carrying the remote read protocol version
pub const HEADER_REMOTE_READ_VERSION: &str = "X-Prometheus-Remote-Read-Version";
