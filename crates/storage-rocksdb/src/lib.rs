//! # RocksDB Storage
//!
//! Production [`StateStore`](hyperscale_storage::StateStore) implementation
//! using RocksDB.
//!
//! All operations are synchronous blocking I/O. Callers in async contexts
//! should use `spawn_blocking` if needed to avoid blocking the runtime.
//!
//! Every write is issued with `sync = true`: the replica state decides whether
//! this process may sign as primary, so a write that was acknowledged must
//! survive a crash.

mod storage;

pub use storage::{CompressionType, RocksDbConfig, RocksDbStateStore};
