//! # Registry Telemetry
//!
//! Logging and metrics for the governance registry and its tooling.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with an `EnvFilter`, JSON or pretty output
//! - **Metrics**: Prometheus counters, gauges and histograms in a private registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Spans, logs and metrics are now collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REGISTRY_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `REGISTRY_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `REGISTRY_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `REGISTRY_SERVICE_NAME` | `governance-registry` | Service name |
//! | `REGISTRY_NETWORK` | `devnet` | Network identifier |

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, AUTHORIZED_ENTITIES,
    KEYS_GENERATED, PARAMETERS_STORED, REGISTRY, REGISTRY_CALLS, REGISTRY_CALL_DURATION,
    REGISTRY_EVENTS,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration cannot be applied.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so early calls are counted
    let metrics = register_metrics()?;
    tracing_setup::init_tracing(&config)?;

    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Convenience macro for recording a metric with a value.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}
