//! Restart and handover tests against a real RocksDB replica state database.

use hyperscale_production::{open_replica_state, ReplicaConfig};
use hyperscale_replica::{ReplicaStateError, ReplicaStateKind, Role};
use hyperscale_types::BlockNumber;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> ReplicaConfig {
    let mut config = ReplicaConfig::default();
    config.node.data_dir = dir.path().join("replica");
    config
}

fn n(v: u64) -> BlockNumber {
    BlockNumber::from(v)
}

#[test]
fn test_fresh_database_uses_configured_default() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&temp_dir);
    config.node.default_role = hyperscale_production::DefaultRole::Primary;

    let state = open_replica_state(&config, None).unwrap();
    assert_eq!(state.summary().state, ReplicaStateKind::Primary);
    state.close().unwrap();

    // The default only applies to an empty database.
    let state = open_replica_state(&config, Some(Role::Replica)).unwrap();
    assert_eq!(state.summary().state, ReplicaStateKind::Primary);
}

#[test]
fn test_role_override_applies_to_fresh_database() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let state = open_replica_state(&config, Some(Role::Primary)).unwrap();
    assert!(state.is_primary_for_seq(&n(0)));
}

#[test]
fn test_scheduled_handover_survives_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    // Operator schedules the handover window while the node is a replica.
    {
        let state = open_replica_state(&config, Some(Role::Replica)).unwrap();
        state.set_start_block(Some(n(1_000))).unwrap();
        state.set_stop_block(Some(n(2_000))).unwrap();
        state.close().unwrap();
    }

    // Node runs, reaches the start block and promotes itself.
    {
        let state = open_replica_state(&config, Some(Role::Replica)).unwrap();
        assert_eq!(
            state.summary().state,
            ReplicaStateKind::ReplicaWaitingToStart
        );
        assert!(!state.should_start_core(&n(999)).unwrap());
        assert!(state.should_start_core(&n(1_000)).unwrap());
        state.close().unwrap();
    }

    // Crash/restart mid-range: still primary, no second start.
    {
        let state = open_replica_state(&config, Some(Role::Replica)).unwrap();
        let summary = state.summary();
        assert_eq!(summary.state, ReplicaStateKind::PrimaryInRange);
        assert!(!summary.is_replica);
        assert_eq!(summary.start_validating_block, Some(n(1_000)));
        assert_eq!(summary.stop_validating_block, Some(n(2_000)));
        assert!(!state.should_start_core(&n(1_500)).unwrap());

        assert!(state.should_stop_core(&n(2_000)).unwrap());
        state.close().unwrap();
    }

    // After the window: a plain replica with no schedule.
    {
        let state = open_replica_state(&config, Some(Role::Primary)).unwrap();
        let summary = state.summary();
        assert_eq!(summary.state, ReplicaStateKind::Replica);
        assert!(!summary.enabled);
        assert_eq!(summary.start_validating_block, None);
        assert_eq!(summary.stop_validating_block, None);
    }
}

#[test]
fn test_invalid_range_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    {
        let state = open_replica_state(&config, Some(Role::Replica)).unwrap();
        state.set_stop_block(Some(n(200))).unwrap();
        assert!(matches!(
            state.set_start_block(Some(n(250))),
            Err(ReplicaStateError::InvalidRange(_))
        ));
        state.close().unwrap();
    }

    let state = open_replica_state(&config, Some(Role::Replica)).unwrap();
    let summary = state.summary();
    assert_eq!(summary.start_validating_block, None);
    assert_eq!(summary.stop_validating_block, Some(n(200)));
}

#[test]
fn test_second_instance_cannot_open_same_database() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let _primary = open_replica_state(&config, Some(Role::Primary)).unwrap();
    assert!(open_replica_state(&config, Some(Role::Primary)).is_err());
}

#[test]
fn test_no_create_refuses_missing_database() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&temp_dir);
    config.storage.create_if_missing = false;

    assert!(open_replica_state(&config, None).is_err());
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("from-file");
    let config_path = temp_dir.path().join("replica.toml");
    std::fs::write(
        &config_path,
        format!(
            "[node]\ndata_dir = {:?}\ndefault_role = \"primary\"\n\n[storage]\ncompression = \"snappy\"\n",
            data_dir.display().to_string()
        ),
    )
    .unwrap();

    let config = ReplicaConfig::load(&config_path).unwrap();
    assert_eq!(config.node.data_dir, data_dir);

    let state = open_replica_state(&config, None).unwrap();
    assert!(state.is_primary_for_seq(&n(42)));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ReplicaConfig::load(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
