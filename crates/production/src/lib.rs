//! Production wiring for the replica state.
//!
//! Glue between the role state machine and a real deployment:
//!
//! - [`ReplicaConfig`]: TOML configuration (data directory, default role,
//!   RocksDB tuning, metrics, log file)
//! - [`open_replica_state`]: open the RocksDB-backed [`ReplicaState`]
//! - [`init_logging`]: `tracing` subscriber setup shared by binaries
//!
//! The `hyperscale-replica-ctl` binary uses these to inspect and change the
//! persisted role of a stopped validator.

mod config;
mod storage;
mod telemetry;

pub use config::{
    DefaultRole, MetricsConfig, NodeConfig, ReplicaConfig, TelemetryConfig,
};
pub use hyperscale_replica::ReplicaState;
pub use hyperscale_storage_rocksdb::{CompressionType, RocksDbConfig, RocksDbStateStore};
pub use storage::{open_replica_state, RocksDbReplicaState};
pub use telemetry::init_logging;
