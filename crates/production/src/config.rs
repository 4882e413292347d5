//! Replica tooling configuration.

use anyhow::{Context, Result};
use hyperscale_replica::Role;
use hyperscale_storage_rocksdb::RocksDbConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every section is optional. Example TOML:
///
/// ```toml
/// [node]
/// data_dir = "./data/replica"
/// default_role = "replica"
///
/// [storage]
/// compression = "lz4"
///
/// [metrics]
/// enabled = false
///
/// [telemetry]
/// log_file = "/var/log/hyperscale/replica.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplicaConfig {
    /// Node identity and role configuration
    #[serde(default)]
    pub node: NodeConfig,

    /// RocksDB tuning for the replica state database
    #[serde(default)]
    pub storage: RocksDbConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Role a node assumes when its database holds no record yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultRole {
    /// Start as primary.
    Primary,
    /// Start as hot standby; a fresh node does not sign until told to.
    #[default]
    Replica,
}

impl From<DefaultRole> for Role {
    fn from(role: DefaultRole) -> Self {
        match role {
            DefaultRole::Primary => Role::Primary,
            DefaultRole::Replica => Role::Replica,
        }
    }
}

/// Node configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the replica state database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Role used when no record has been persisted
    #[serde(default)]
    pub default_role: DefaultRole,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_role: DefaultRole::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/replica")
}

/// Metrics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder
    #[serde(default)]
    pub enabled: bool,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryConfig {
    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl ReplicaConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperscale_storage_rocksdb::CompressionType;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ReplicaConfig::from_toml("").unwrap();
        assert_eq!(config.node.data_dir, PathBuf::from("./data/replica"));
        assert_eq!(config.node.default_role, DefaultRole::Replica);
        assert_eq!(config.storage.compression, CompressionType::Lz4);
        assert!(config.storage.create_if_missing);
        assert!(!config.metrics.enabled);
        assert!(config.telemetry.log_file.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = ReplicaConfig::from_toml(
            r#"
            [node]
            data_dir = "/var/lib/hyperscale/replica"
            default_role = "primary"

            [storage]
            compression = "zstd"
            max_background_jobs = 1

            [metrics]
            enabled = true

            [telemetry]
            log_file = "/tmp/replica.log"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.node.data_dir,
            PathBuf::from("/var/lib/hyperscale/replica")
        );
        assert_eq!(Role::from(config.node.default_role), Role::Primary);
        assert_eq!(config.storage.compression, CompressionType::Zstd);
        assert_eq!(config.storage.max_background_jobs, 1);
        // Unspecified storage fields keep their defaults.
        assert_eq!(config.storage.keep_log_file_num, 5);
        assert!(config.metrics.enabled);
        assert_eq!(
            config.telemetry.log_file,
            Some(PathBuf::from("/tmp/replica.log"))
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = ReplicaConfig::from_toml("[node]\ndefault_role = \"leader\"\n");
        assert!(result.is_err());
    }
}
