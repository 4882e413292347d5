//! Prometheus metrics backend for Hyperscale.
//!
//! Implements [`hyperscale_metrics::MetricsRecorder`] using native Prometheus
//! counters, gauges, and histograms.
//!
//! # Usage
//!
//! Call [`install()`] once at startup before any metrics are recorded:
//! ```ignore
//! hyperscale_metrics_prometheus::install();
//! ```

use hyperscale_metrics::MetricsRecorder;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_gauge_vec,
    register_histogram, register_histogram_vec, Counter, CounterVec, Gauge, GaugeVec, Histogram,
    HistogramVec,
};

/// Domain-specific Prometheus metrics for replica role monitoring.
pub struct Metrics {
    pub build_info: GaugeVec,

    // === Replica state ===
    pub is_replica: Gauge,
    pub schedule_enabled: Gauge,
    pub role_transitions: CounterVec,
    pub state_persisted: Counter,
    pub state_persist_failures: Counter,

    // === Storage ===
    pub rocksdb_read_latency: Histogram,
    pub rocksdb_write_latency: Histogram,
    pub storage_operation_latency: HistogramVec,
}

impl Metrics {
    fn new() -> Self {
        // Replica state writes are fsynced, so the interesting range starts higher
        // than an in-memory read.
        let storage_buckets = vec![
            0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
        ];

        let build_info = register_gauge_vec!(
            "hyperscale_replica_build_info",
            "Replica state build information",
            &["version"]
        )
        .unwrap();

        let version = option_env!("HYPERSCALE_VERSION").unwrap_or("localdev");
        build_info.with_label_values(&[version]).set(1.0);

        Self {
            build_info,

            // Replica state
            is_replica: register_gauge!(
                "hyperscale_replica_is_replica",
                "1 if this node is currently a replica, 0 if primary"
            )
            .unwrap(),

            schedule_enabled: register_gauge!(
                "hyperscale_replica_schedule_enabled",
                "1 if a start/stop block schedule governs the role"
            )
            .unwrap(),

            role_transitions: register_counter_vec!(
                "hyperscale_replica_role_transitions_total",
                "Role transitions by kind",
                &["kind"]
            )
            .unwrap(),

            state_persisted: register_counter!(
                "hyperscale_replica_state_persisted_total",
                "Replica state records written to storage"
            )
            .unwrap(),

            state_persist_failures: register_counter!(
                "hyperscale_replica_state_persist_failures_total",
                "Replica state writes that failed after the in-memory update"
            )
            .unwrap(),

            // Storage
            rocksdb_read_latency: register_histogram!(
                "hyperscale_replica_rocksdb_read_latency_seconds",
                "RocksDB read latency",
                storage_buckets.clone()
            )
            .unwrap(),

            rocksdb_write_latency: register_histogram!(
                "hyperscale_replica_rocksdb_write_latency_seconds",
                "RocksDB write latency",
                storage_buckets.clone()
            )
            .unwrap(),

            storage_operation_latency: register_histogram_vec!(
                "hyperscale_replica_storage_operation_latency_seconds",
                "Storage operation latency by operation",
                &["operation"],
                storage_buckets
            )
            .unwrap(),
        }
    }
}

/// Prometheus-backed metrics recorder.
pub struct PrometheusRecorder {
    metrics: Metrics,
}

impl PrometheusRecorder {
    fn new() -> Self {
        Self {
            metrics: Metrics::new(),
        }
    }
}

impl MetricsRecorder for PrometheusRecorder {
    // ── Storage ──────────────────────────────────────────────────────

    fn record_storage_read(&self, latency_secs: f64) {
        self.metrics.rocksdb_read_latency.observe(latency_secs);
    }

    fn record_storage_write(&self, latency_secs: f64) {
        self.metrics.rocksdb_write_latency.observe(latency_secs);
    }

    fn record_storage_operation(&self, operation: &str, latency_secs: f64) {
        self.metrics
            .storage_operation_latency
            .with_label_values(&[operation])
            .observe(latency_secs);
    }

    // ── Replica state ────────────────────────────────────────────────

    fn record_replica_state_persisted(&self) {
        self.metrics.state_persisted.inc();
    }

    fn record_replica_state_persist_failure(&self) {
        self.metrics.state_persist_failures.inc();
    }

    fn record_role_transition(&self, kind: &str) {
        self.metrics
            .role_transitions
            .with_label_values(&[kind])
            .inc();
    }

    fn set_replica_role(&self, is_replica: bool, schedule_enabled: bool) {
        self.metrics
            .is_replica
            .set(if is_replica { 1.0 } else { 0.0 });
        self.metrics
            .schedule_enabled
            .set(if schedule_enabled { 1.0 } else { 0.0 });
    }
}

/// Install the Prometheus metrics recorder as the global backend.
///
/// Idempotent, safe to call multiple times (e.g., in tests). Only the
/// first call creates and registers the Prometheus metrics.
pub fn install() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        hyperscale_metrics::set_global_recorder(Box::new(PrometheusRecorder::new()));
    });
}

/// Gather and encode all registered Prometheus metrics as text format.
///
/// Returns `(content_type, encoded_body)` suitable for an HTTP response.
pub fn encode_metrics() -> Result<(String, Vec<u8>), String> {
    use prometheus::{Encoder, TextEncoder};
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let content_type = encoder.format_type().to_string();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("{e}"))?;
    Ok((content_type, buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_and_encode() {
        install();
        install();

        hyperscale_metrics::set_replica_role(true, false);
        hyperscale_metrics::record_role_transition("make_replica");
        hyperscale_metrics::record_replica_state_persisted();

        let (content_type, body) = encode_metrics().unwrap();
        assert!(content_type.starts_with("text/plain"));

        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("hyperscale_replica_is_replica 1"));
        assert!(text.contains("hyperscale_replica_role_transitions_total{kind=\"make_replica\"}"));
        assert!(text.contains("hyperscale_replica_state_persisted_total"));
    }
}
