//! Prometheus metrics for the governance registry.
//!
//! All metrics follow the naming convention: `governance_registry_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: calls and events, labelled by operation/outcome/event
//! - **Gauge**: current size of the authorized set and parameter map
//! - **Histogram**: mutation latency, including snapshot persistence

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CALL METRICS
    // =========================================================================

    /// Mutating calls by operation and outcome
    pub static ref REGISTRY_CALLS: CounterVec = CounterVec::new(
        Opts::new("governance_registry_calls_total", "Mutating registry calls"),
        &["operation", "outcome"]  // outcome: committed/not_owner/not_authorized/...
    ).expect("metric creation failed");

    /// Mutation latency
    pub static ref REGISTRY_CALL_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "governance_registry_call_duration_seconds",
            "Time from lock acquisition to commit or rejection"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT METRICS
    // =========================================================================

    /// Journaled events by name
    pub static ref REGISTRY_EVENTS: CounterVec = CounterVec::new(
        Opts::new("governance_registry_events_total", "Events appended to the journal"),
        &["event"]
    ).expect("metric creation failed");

    // =========================================================================
    // STATE METRICS
    // =========================================================================

    /// Entities whose authorization flag is true
    pub static ref AUTHORIZED_ENTITIES: Gauge = Gauge::new(
        "governance_registry_authorized_entities",
        "Entities currently authorized to write parameters"
    ).expect("metric creation failed");

    /// Parameters stored
    pub static ref PARAMETERS_STORED: Gauge = Gauge::new(
        "governance_registry_parameters",
        "Parameters currently stored"
    ).expect("metric creation failed");

    // =========================================================================
    // KEY METRICS
    // =========================================================================

    /// Principal key pairs generated
    pub static ref KEYS_GENERATED: Counter = Counter::new(
        "governance_registry_keys_generated_total",
        "Principal key pairs generated"
    ).expect("metric creation failed");
}

/// Handle proving the metrics are registered.
#[derive(Debug)]
pub struct MetricsHandle {
    registered: usize,
}

impl MetricsHandle {
    /// Number of collectors in the registry.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registered
    }
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REGISTRY_CALLS.clone()),
        Box::new(REGISTRY_CALL_DURATION.clone()),
        Box::new(REGISTRY_EVENTS.clone()),
        Box::new(AUTHORIZED_ENTITIES.clone()),
        Box::new(PARAMETERS_STORED.clone()),
        Box::new(KEYS_GENERATED.clone()),
    ];
    let registered = metrics.len();

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { registered })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    #[must_use]
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
