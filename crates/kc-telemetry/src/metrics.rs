//! Prometheus metrics for Keystone chaincode.
//!
//! All metrics follow the naming convention: `kc_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // DISPATCHER METRICS
    // =========================================================================

    /// Invocations by method and final status
    pub static ref INVOCATIONS: CounterVec = CounterVec::new(
        Opts::new("kc_dispatcher_invocations_total", "Invocations by method and status"),
        &["method", "status"]  // status: Success/Error
    ).expect("metric creation failed");

    /// Failed invocations by error key
    pub static ref FAILURES: CounterVec = CounterVec::new(
        Opts::new("kc_dispatcher_failures_total", "Failed invocations by error key"),
        &["error_key"]
    ).expect("metric creation failed");

    /// Invocation duration by method
    pub static ref INVOCATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "kc_dispatcher_invocation_duration_seconds",
            "Time spent in the invocation pipeline"
        ).buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["method"]
    ).expect("metric creation failed");

    // =========================================================================
    // SIGNATURE METRICS
    // =========================================================================

    /// Signature verification failures by scheme
    pub static ref SIGNATURE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("kc_signature_failures_total", "Signature verification failures"),
        &["scheme"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INVOCATIONS.clone()),
        Box::new(FAILURES.clone()),
        Box::new(INVOCATION_DURATION.clone()),
        Box::new(SIGNATURE_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
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

/// Count one finished invocation and observe its duration.
pub fn record_invocation(method: &str, status: &str, elapsed_secs: f64) {
    INVOCATIONS.with_label_values(&[method, status]).inc();
    INVOCATION_DURATION
        .with_label_values(&[method])
        .observe(elapsed_secs);
}

/// Count one failed invocation.
pub fn record_failure(error_key: &str) {
    FAILURES.with_label_values(&[error_key]).inc();
}

/// Count one rejected signature.
pub fn record_signature_failure(scheme: &str) {
    SIGNATURE_FAILURES.with_label_values(&[scheme]).inc();
}
