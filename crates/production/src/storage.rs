//! Opening the RocksDB-backed replica state.

use crate::ReplicaConfig;
use anyhow::{Context, Result};
use hyperscale_replica::{ReplicaState, Role};
use hyperscale_storage_rocksdb::RocksDbStateStore;
use tracing::info;

/// Replica state persisted in RocksDB.
pub type RocksDbReplicaState = ReplicaState<RocksDbStateStore>;

/// Open the replica state database named by `config` and load the role.
///
/// `role_override` replaces the configured default role; it only matters when
/// the database holds no record yet.
pub fn open_replica_state(
    config: &ReplicaConfig,
    role_override: Option<Role>,
) -> Result<RocksDbReplicaState> {
    let data_dir = &config.node.data_dir;
    let default_role = role_override.unwrap_or_else(|| config.node.default_role.into());

    info!(data_dir = %data_dir.display(), ?default_role, "Opening replica state");

    let store = RocksDbStateStore::open_with_config(data_dir, config.storage.clone())
        .with_context(|| format!("Can't open replica state db at {}", data_dir.display()))?;

    ReplicaState::open(store, default_role)
        .with_context(|| format!("Can't load replica state from {}", data_dir.display()))
}
