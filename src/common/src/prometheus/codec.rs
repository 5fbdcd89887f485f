//! Snappy + protobuf envelope of remote read/write bodies
//!
//! Bodies use the snappy block format, not the framed one.

use prost::Message;
use thiserror::Error;

use super::proto::{ReadRequest, ReadResponse, WriteRequest};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("snappy decompression failed: {0}")]
    Decompress(#[source] snap::Error),
    #[error("snappy compression failed: {0}")]
    Compress(#[source] snap::Error),
    #[error("protobuf decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
}

pub fn snappy_decompress(buf: &[u8]) -> Result<Vec<u8>, CodecError> {
    snap::raw::Decoder::new()
        .decompress_vec(buf)
        .map_err(CodecError::Decompress)
}

pub fn snappy_compress(buf: &[u8]) -> Result<Vec<u8>, CodecError> {
    snap::raw::Encoder::new()
        .compress_vec(buf)
        .map_err(CodecError::Compress)
}

fn decode<M: Message + Default>(body: &[u8]) -> Result<M, CodecError> {
    let decompressed = snappy_decompress(body)?;
    Ok(M::decode(decompressed.as_slice())?)
}

fn encode<M: Message>(message: &M) -> Result<Vec<u8>, CodecError> {
    snappy_compress(&message.encode_to_vec())
}

/// Decode a remote_write body
pub fn decode_write_request(body: &[u8]) -> Result<WriteRequest, CodecError> {
    decode(body)
}

/// Decode a remote_read body
pub fn decode_read_request(body: &[u8]) -> Result<ReadRequest, CodecError> {
    decode(body)
}

/// Encode a remote_read response body
pub fn encode_read_response(response: &ReadResponse) -> Result<Vec<u8>, CodecError> {
    encode(response)
}

/// Encode a remote_write body, as Prometheus would send it
pub fn encode_write_request(request: &WriteRequest) -> Result<Vec<u8>, CodecError> {
    encode(request)
}

/// Encode a remote_read body, as Prometheus would send it
pub fn encode_read_request(request: &ReadRequest) -> Result<Vec<u8>, CodecError> {
    encode(request)
}

/// Decode a remote_read response body
pub fn decode_read_response(body: &[u8]) -> Result<ReadResponse, CodecError> {
    decode(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prometheus::proto::{
        Label, LabelMatcher, Query, QueryResult, Sample, TimeSeries, label_matcher,
    };

    #[test]
    fn test_write_request_survives_envelope() {
        let request = WriteRequest {
            timeseries: vec![TimeSeries {
                labels: vec![Label {
                    name: "__name__".to_string(),
                    value: "up".to_string(),
                }],
                samples: vec![Sample {
                    value: f64::from_bits(0x7ff0_0000_0000_0002),
                    timestamp: 1_700_000_000_000,
                }],
            }],
        };

        let body = encode_write_request(&request).unwrap();
        let decoded = decode_write_request(&body).unwrap();
        assert_eq!(decoded.timeseries[0].labels, request.timeseries[0].labels);
        assert_eq!(
            decoded.timeseries[0].samples[0].value.to_bits(),
            0x7ff0_0000_0000_0002
        );
    }

    #[test]
    fn test_read_request_matcher_type() {
        let request = ReadRequest {
            queries: vec![Query {
                start_timestamp_ms: 1,
                end_timestamp_ms: 2,
                matchers: vec![LabelMatcher {
                    r#type: label_matcher::Type::Nre as i32,
                    name: "job".to_string(),
                    value: "a.*".to_string(),
                }],
            }],
            accepted_response_types: vec![],
        };

        let decoded = decode_read_request(&encode_read_request(&request).unwrap()).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(
            decoded.queries[0].matchers[0].r#type(),
            label_matcher::Type::Nre
        );
    }

    #[test]
    fn test_read_response_envelope() {
        let response = ReadResponse {
            results: vec![QueryResult { timeseries: vec![] }],
        };
        let body = encode_read_response(&response).unwrap();
        assert_eq!(decode_read_response(&body).unwrap(), response);
    }

    #[test]
    fn test_uncompressed_body_is_rejected() {
        let raw = WriteRequest::default().encode_to_vec();
        let garbage = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert!(matches!(
            decode_write_request(&garbage),
            Err(CodecError::Decompress(_))
        ));
        // An empty message encodes to nothing, which is still valid snappy input
        let empty = snappy_compress(&raw).unwrap();
        assert!(decode_write_request(&empty).is_ok());
    }

    #[test]
    fn test_compressed_garbage_is_a_decode_error() {
        let body = snappy_compress(&[0x0a, 0xff, 0xff]).unwrap();
        assert!(matches!(
            decode_write_request(&body),
            Err(CodecError::Decode(_))
        ));
    }
}
