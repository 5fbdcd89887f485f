//! Prometheus remote storage adapter for CrateDB
//!
//! Wires the pure translation in the `translator` crate to a CrateDB
//! `/_sql` endpoint ([`store`]) and exposes it as the remote read/write
//! HTTP endpoints Prometheus talks to ([`http`]).

pub mod convert;
pub mod error;
pub mod http;
pub mod metrics;
pub mod remote;
pub mod store;

pub use error::{AdapterError, Result};
pub use http::{HttpState, create_router, serve};
pub use metrics::{AdapterMetrics, create_metrics_registry};
pub use remote::CrateAdapter;
pub use store::{HttpSqlStore, SqlStore, StoreError};
