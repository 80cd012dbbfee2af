//! Telemetry configuration from environment variables.

use std::env;

/// Default service name attached to log lines.
pub const DEFAULT_SERVICE_NAME: &str = "keystone-chaincode";

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name for logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Print the Prometheus text exposition on shutdown
    pub dump_metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            dump_metrics: false,
        }
    }
}

fn flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(default)
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KC_SERVICE_NAME`: Service name (default: keystone-chaincode)
    /// - `KC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `KC_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `KC_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `KC_DUMP_METRICS`: Print metrics on shutdown (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("KC_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),

            log_level: lookup("KC_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            console_output: lookup("KC_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: flag(lookup("KC_JSON_LOGS"), is_container),

            dump_metrics: flag(lookup("KC_DUMP_METRICS"), false),
        }
    }
}
