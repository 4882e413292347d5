//! Metrics facade for Hyperscale.
//!
//! Provides a [`MetricsRecorder`] trait with domain-specific methods and default
//! no-op implementations. A global singleton recorder is accessed via [`recorder()`],
//! and convenience free functions delegate to it.
//!
//! # Usage
//!
//! Callers record metrics via free functions:
//! ```ignore
//! hyperscale_metrics::record_storage_write(latency_secs);
//! hyperscale_metrics::record_role_transition("start_core");
//! ```
//!
//! At startup, install a backend:
//! ```ignore
//! hyperscale_metrics_prometheus::install();
//! ```
//!
//! Without a backend every call is a no-op.

use std::sync::OnceLock;

// ═══════════════════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════════════════

/// Domain-specific metrics recording trait.
///
/// All methods have default no-op implementations so backends only need
/// to override the metrics they care about.
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync + 'static {
    // ── Storage ──────────────────────────────────────────────────────

    /// Record a storage read latency.
    fn record_storage_read(&self, latency_secs: f64) {}

    /// Record a storage write latency.
    fn record_storage_write(&self, latency_secs: f64) {}

    /// Record a named storage operation latency.
    fn record_storage_operation(&self, operation: &str, latency_secs: f64) {}

    // ── Replica state ────────────────────────────────────────────────

    /// Record a replica state record persisted to storage.
    fn record_replica_state_persisted(&self) {}

    /// Record a failed replica state persist (memory and disk now diverge).
    fn record_replica_state_persist_failure(&self) {}

    /// Record a role transition (`start_core`, `stop_core`, `make_primary`, `make_replica`).
    fn record_role_transition(&self, kind: &str) {}

    /// Set the current role gauges.
    fn set_replica_role(&self, is_replica: bool, schedule_enabled: bool) {}
}

// ═══════════════════════════════════════════════════════════════════════
// Global singleton
// ═══════════════════════════════════════════════════════════════════════

struct NoopRecorder;
impl MetricsRecorder for NoopRecorder {}

static RECORDER: OnceLock<Box<dyn MetricsRecorder>> = OnceLock::new();

/// Install a global metrics recorder.
///
/// Can only be called once. Subsequent calls are silently ignored.
pub fn set_global_recorder(recorder: Box<dyn MetricsRecorder>) {
    let _ = RECORDER.set(recorder);
}

/// Get the global metrics recorder.
///
/// Returns a no-op recorder if none has been installed.
#[inline]
fn recorder() -> &'static dyn MetricsRecorder {
    RECORDER.get().map(|r| r.as_ref()).unwrap_or(&NoopRecorder)
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience free functions
// ═══════════════════════════════════════════════════════════════════════

// ── Storage ──────────────────────────────────────────────────────────

/// Record a storage read latency.
#[inline]
pub fn record_storage_read(latency_secs: f64) {
    recorder().record_storage_read(latency_secs);
}

/// Record a storage write latency.
#[inline]
pub fn record_storage_write(latency_secs: f64) {
    recorder().record_storage_write(latency_secs);
}

/// Record a named storage operation latency.
#[inline]
pub fn record_storage_operation(operation: &str, latency_secs: f64) {
    recorder().record_storage_operation(operation, latency_secs);
}

// ── Replica state ────────────────────────────────────────────────────

/// Record a replica state record persisted to storage.
#[inline]
pub fn record_replica_state_persisted() {
    recorder().record_replica_state_persisted();
}

/// Record a failed replica state persist.
#[inline]
pub fn record_replica_state_persist_failure() {
    recorder().record_replica_state_persist_failure();
}

/// Record a role transition.
#[inline]
pub fn record_role_transition(kind: &str) {
    recorder().record_role_transition(kind);
}

/// Set the current role gauges.
#[inline]
pub fn set_replica_role(is_replica: bool, schedule_enabled: bool) {
    recorder().set_replica_role(is_replica, schedule_enabled);
}
