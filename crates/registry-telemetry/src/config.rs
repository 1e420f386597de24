//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to write log lines to stderr at all
    pub console_output: bool,

    /// Whether to emit JSON instead of human-readable lines
    pub json_logs: bool,

    /// Network identifier (devnet, testnet, mainnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "governance-registry".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "devnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGISTRY_SERVICE_NAME`: Service name (default: governance-registry)
    /// - `REGISTRY_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `REGISTRY_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `REGISTRY_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `REGISTRY_NETWORK`: Network name (default: devnet)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`TelemetryConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("REGISTRY_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("REGISTRY_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("REGISTRY_CONSOLE_OUTPUT")
                .map_or(defaults.console_output, |v| {
                    v.to_lowercase() != "false" && v != "0"
                }),

            json_logs: lookup("REGISTRY_JSON_LOGS")
                .map_or(is_container, |v| v.to_lowercase() == "true" || v == "1"),

            network: lookup("REGISTRY_NETWORK").unwrap_or(defaults.network),
        }
    }

    /// Override the log level, e.g. from a `--verbose` flag.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
