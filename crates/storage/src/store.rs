//! State store trait.
//!
//! Abstracts the durable key-value store the replica state is persisted to.
//! All methods take `&self`; implementations use interior mutability and
//! serialize their own I/O.

/// Outcome of a point read.
///
/// A missing key is a distinguished outcome rather than an error: on startup
/// it selects the default role instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRead {
    /// The key exists and holds these bytes.
    Found(Vec<u8>),
    /// No value has ever been written at the key.
    NotFound,
}

impl StoreRead {
    /// Converts into an `Option`, mapping `NotFound` to `None`.
    pub fn into_option(self) -> Option<Vec<u8>> {
        match self {
            StoreRead::Found(bytes) => Some(bytes),
            StoreRead::NotFound => None,
        }
    }
}

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// The store has been closed.
    #[error("Store is closed")]
    Closed,
}

/// A durable single-key-value store.
///
/// Writes must be durable when `put` returns `Ok`: the replica state relies on
/// a successful write surviving a process crash.
pub trait StateStore: Send + Sync {
    /// Read the value at `key`.
    fn get(&self, key: &[u8]) -> Result<StoreRead, StoreError>;

    /// Durably write `value` at `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Release the underlying handle, flushing anything buffered.
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_read_into_option() {
        assert_eq!(StoreRead::Found(vec![1]).into_option(), Some(vec![1]));
        assert_eq!(StoreRead::NotFound.into_option(), None);
    }
}
