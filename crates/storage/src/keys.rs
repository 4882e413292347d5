//! Well-known storage keys.

/// Prefix for all replica role data in storage.
///
/// Keeps replica records separable from other data that may share the
/// same backend.
pub const REPLICA_PREFIX: &[u8] = b"replica:";

/// Key of the single role state record, one per node instance.
pub const REPLICA_STATE_KEY: &[u8] = b"replica:state";
