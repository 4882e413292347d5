//! # RocksDB Storage

use hyperscale_metrics as metrics;
use hyperscale_storage::{StateStore, StoreError, StoreRead};
use rocksdb::{Options, WriteOptions, DB};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{instrument, Level};

/// RocksDB-based state store for production use.
///
/// Holds the whole replica state database. The record lives in the default
/// column family; the volume is a single small value, so the tuning here is
/// about durability and a small footprint rather than throughput.
pub struct RocksDbStateStore {
    db: DB,
    path: PathBuf,
}

impl RocksDbStateStore {
    /// Open or create a RocksDB database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with_config(path, RocksDbConfig::default())
    }

    /// Open with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: RocksDbConfig,
    ) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);

        opts.set_max_background_jobs(config.max_background_jobs);
        opts.set_keep_log_file_num(config.keep_log_file_num);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(config.compression.to_rocksdb());

        let db = DB::open(&opts, path.as_ref()).map_err(|e| {
            StoreError::Database(format!(
                "failed to open replica state db at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.as_ref().display(), "Opened replica state database");

        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Filesystem path of the database.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for RocksDbStateStore {
    #[instrument(level = Level::DEBUG, skip(self, key), fields(
        latency_us = tracing::field::Empty,
        found = tracing::field::Empty,
    ))]
    fn get(&self, key: &[u8]) -> Result<StoreRead, StoreError> {
        let start = Instant::now();
        let value = self
            .db
            .get(key)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let elapsed = start.elapsed();
        metrics::record_storage_read(elapsed.as_secs_f64());
        metrics::record_storage_operation("get_replica_state", elapsed.as_secs_f64());

        let span = tracing::Span::current();
        span.record("latency_us", elapsed.as_micros() as u64);
        span.record("found", value.is_some());

        Ok(match value {
            Some(bytes) => StoreRead::Found(bytes),
            None => StoreRead::NotFound,
        })
    }

    #[instrument(level = Level::DEBUG, skip(self, key, value), fields(
        bytes = value.len(),
        latency_us = tracing::field::Empty,
    ))]
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let start = Instant::now();

        // Sync write: an acknowledged role change must survive a crash.
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(true);

        self.db
            .put_opt(key, value, &write_opts)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let elapsed = start.elapsed();
        metrics::record_storage_write(elapsed.as_secs_f64());
        metrics::record_storage_operation("put_replica_state", elapsed.as_secs_f64());

        tracing::Span::current().record("latency_us", elapsed.as_micros() as u64);
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Database(format!("flush on close failed: {}", e)))?;
        tracing::debug!(path = %self.path.display(), "Closed replica state database");
        // Dropping the DB releases the file lock.
        drop(self.db);
        Ok(())
    }
}

/// Compression type for RocksDB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    None,
    Snappy,
    Zlib,
    #[default]
    Lz4,
    Lz4hc,
    Zstd,
}

impl CompressionType {
    fn to_rocksdb(self) -> rocksdb::DBCompressionType {
        match self {
            CompressionType::None => rocksdb::DBCompressionType::None,
            CompressionType::Snappy => rocksdb::DBCompressionType::Snappy,
            CompressionType::Zlib => rocksdb::DBCompressionType::Zlib,
            CompressionType::Lz4 => rocksdb::DBCompressionType::Lz4,
            CompressionType::Lz4hc => rocksdb::DBCompressionType::Lz4hc,
            CompressionType::Zstd => rocksdb::DBCompressionType::Zstd,
        }
    }
}

/// Configuration for the replica state database.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RocksDbConfig {
    /// Maximum number of background jobs
    pub max_background_jobs: i32,
    /// Write buffer size in bytes
    pub write_buffer_size: usize,
    /// Number of log files to keep
    pub keep_log_file_num: usize,
    /// Compression type
    pub compression: CompressionType,
    /// Create the database if it does not exist.
    ///
    /// Operator tooling disables this so a typo in the data directory fails
    /// loudly instead of silently starting from the default role.
    pub create_if_missing: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            max_background_jobs: 2,
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            keep_log_file_num: 5,
            compression: CompressionType::Lz4,
            create_if_missing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperscale_storage::keys::REPLICA_STATE_KEY;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksDbStateStore::open(temp_dir.path()).unwrap();

        assert_eq!(store.get(REPLICA_STATE_KEY).unwrap(), StoreRead::NotFound);
    }

    #[test]
    fn test_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksDbStateStore::open(temp_dir.path()).unwrap();

        store.put(REPLICA_STATE_KEY, &[1, 2, 3]).unwrap();
        assert_eq!(
            store.get(REPLICA_STATE_KEY).unwrap(),
            StoreRead::Found(vec![1, 2, 3])
        );

        // Overwrite replaces the record.
        store.put(REPLICA_STATE_KEY, &[9]).unwrap();
        assert_eq!(
            store.get(REPLICA_STATE_KEY).unwrap(),
            StoreRead::Found(vec![9])
        );
    }

    #[test]
    fn test_value_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = RocksDbStateStore::open(temp_dir.path()).unwrap();
            store.put(REPLICA_STATE_KEY, b"primary").unwrap();
            store.close().unwrap();
        }

        {
            let store = RocksDbStateStore::open(temp_dir.path()).unwrap();
            assert_eq!(
                store.get(REPLICA_STATE_KEY).unwrap(),
                StoreRead::Found(b"primary".to_vec())
            );
        }
    }

    #[test]
    fn test_second_open_fails_while_locked() {
        let temp_dir = TempDir::new().unwrap();
        let _store = RocksDbStateStore::open(temp_dir.path()).unwrap();

        // Only one process may own the replica state at a time.
        assert!(matches!(
            RocksDbStateStore::open(temp_dir.path()),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn test_open_without_create_fails_on_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = RocksDbConfig {
            create_if_missing: false,
            ..RocksDbConfig::default()
        };

        let result = RocksDbStateStore::open_with_config(temp_dir.path().join("absent"), config);
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
