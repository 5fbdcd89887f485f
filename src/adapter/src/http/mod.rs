pub mod index;
pub mod metrics;
pub mod remote_read;
pub mod remote_write;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use prometheus::Registry;
use tokio::net::TcpListener;
use tracing::info;

use crate::metrics::AdapterMetrics;
use crate::remote::CrateAdapter;

/// HTTP server state shared across all handlers
#[derive(Clone)]
pub struct HttpState {
    pub adapter: Arc<CrateAdapter>,
    pub metrics: Arc<AdapterMetrics>,
    pub metrics_registry: Arc<Registry>,
}

impl HttpState {
    pub fn new(
        adapter: Arc<CrateAdapter>,
        metrics: Arc<AdapterMetrics>,
        metrics_registry: Arc<Registry>,
    ) -> Self {
        Self {
            adapter,
            metrics,
            metrics_registry,
        }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/write", post(remote_write::remote_write_handler))
        .route("/read", post(remote_read::remote_read_handler))
        .route("/metrics", get(metrics::metrics_handler))
        // Remote write batches are not size-limited
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: HttpState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!("Starting HTTP server on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
