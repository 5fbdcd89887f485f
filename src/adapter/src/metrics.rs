use std::sync::Arc;
use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry, exponential_buckets};
use translator::{StoreOperation, TimeSeries, TranslationObserver};

/// Namespace of every metric the adapter exports
pub const METRICS_NAMESPACE: &str = "crate_adapter";

/// Request and store-call metrics for one direction (read or write)
pub struct PathMetrics {
    /// Latency of the whole remote read/write request
    pub latency: Histogram,
    /// Remote read/write requests that failed
    pub failed: IntCounter,
    /// Samples per series
    pub timeseries_samples: Histogram,
    /// Latency of the call to CrateDB
    pub crate_latency: Histogram,
    /// Calls to CrateDB that failed
    pub crate_failed: IntCounter,
}

/// Help text of the metrics of one direction
struct PathHelp {
    latency: &'static str,
    failed: &'static str,
    timeseries_samples: &'static str,
    crate_latency: &'static str,
    crate_failed: &'static str,
}

const WRITE_HELP: PathHelp = PathHelp {
    latency: "How long it took us to respond to write requests.",
    failed: "How many write request we returned errors for.",
    timeseries_samples: "How many samples each written timeseries has.",
    crate_latency: "Latency for inserts to Crate.",
    crate_failed: "How many inserts to Crate failed.",
};

const READ_HELP: PathHelp = PathHelp {
    latency: "How long it took us to respond to read requests.",
    failed: "How many read requests we returned errors for.",
    timeseries_samples: "How many samples each returned timeseries has.",
    crate_latency: "Latency for selects from Crate.",
    crate_failed: "How many selects from Crate failed.",
};

impl PathMetrics {
    fn new(registry: &Registry, path: &str, help: &PathHelp) -> prometheus::Result<Self> {
        Ok(Self {
            latency: histogram(
                registry,
                &format!("{path}_latency_seconds"),
                help.latency,
                prometheus::DEFAULT_BUCKETS.to_vec(),
            )?,
            failed: counter(registry, &format!("{path}_failed_total"), help.failed)?,
            timeseries_samples: histogram(
                registry,
                &format!("{path}_timeseries_samples"),
                help.timeseries_samples,
                exponential_buckets(1.0, 4.0, 10)?,
            )?,
            crate_latency: histogram(
                registry,
                &format!("{path}_crate_latency_seconds"),
                help.crate_latency,
                prometheus::DEFAULT_BUCKETS.to_vec(),
            )?,
            crate_failed: counter(
                registry,
                &format!("{path}_crate_failed_total"),
                help.crate_failed,
            )?,
        })
    }

    fn observe_series(&self, series: &[TimeSeries]) {
        for ts in series {
            self.timeseries_samples.observe(ts.samples.len() as f64);
        }
    }
}

/// All metrics of the adapter
pub struct AdapterMetrics {
    pub write: PathMetrics,
    pub read: PathMetrics,
}

impl AdapterMetrics {
    /// Create and register all metrics
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        Ok(Self {
            write: PathMetrics::new(registry, "write", &WRITE_HELP)?,
            read: PathMetrics::new(registry, "read", &READ_HELP)?,
        })
    }
}

impl TranslationObserver for AdapterMetrics {
    fn on_store_call_completed(&self, operation: StoreOperation, elapsed: Duration, success: bool) {
        let path = match operation {
            StoreOperation::Select => &self.read,
            StoreOperation::Insert => &self.write,
        };
        path.crate_latency.observe(elapsed.as_secs_f64());
        if !success {
            path.crate_failed.inc();
        }
    }

    fn on_assembly_completed(&self, series: &[TimeSeries]) {
        self.read.observe_series(series);
    }

    fn on_write_translated(&self, series: &[TimeSeries]) {
        self.write.observe_series(series);
    }
}

/// Create a new metrics registry with the adapter metrics registered
pub fn create_metrics_registry() -> prometheus::Result<(Arc<Registry>, Arc<AdapterMetrics>)> {
    let registry = Registry::new();

    // Register default process metrics (only on Linux)
    #[cfg(target_os = "linux")]
    {
        let process_collector = prometheus::process_collector::ProcessCollector::for_self();
        registry.register(Box::new(process_collector))?;
    }

    let metrics = Arc::new(AdapterMetrics::new(&registry)?);

    Ok((Arc::new(registry), metrics))
}

fn histogram(
    registry: &Registry,
    name: &str,
    help: &str,
    buckets: Vec<f64>,
) -> prometheus::Result<Histogram> {
    let histogram = Histogram::with_opts(
        HistogramOpts::new(name, help)
            .namespace(METRICS_NAMESPACE)
            .buckets(buckets),
    )?;
    registry.register(Box::new(histogram.clone()))?;
    Ok(histogram)
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let counter = IntCounter::with_opts(Opts::new(name, help).namespace(METRICS_NAMESPACE))?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}
