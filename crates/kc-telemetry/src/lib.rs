//! # Keystone Telemetry
//!
//! Structured logging and Prometheus metrics for the chaincode runtime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Invocations are now logged and counted
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `KC_JSON_LOGS` | `false` | JSON formatted logs |
//! | `KC_SERVICE_NAME` | `keystone-chaincode` | Service name attached to logs |
//! | `KC_DUMP_METRICS` | `false` | Print metrics on shutdown |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, record_failure, record_invocation, record_signature_failure,
    register_metrics, MetricsHandle, FAILURES, INVOCATIONS, INVOCATION_DURATION,
    SIGNATURE_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so that nothing logged during start-up is missed by counters
    let metrics = register_metrics()?;
    logging::init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        dump_metrics: config.dump_metrics,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active. Dropping it logs shutdown and
/// optionally dumps the metrics.
pub struct TelemetryGuard {
    dump_metrics: bool,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
        if self.dump_metrics {
            match encode_metrics() {
                Ok(text) => eprintln!("{text}"),
                Err(e) => tracing::warn!(error = %e, "Failed to encode metrics"),
            }
        }
    }
}
