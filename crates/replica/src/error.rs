//! Replica state errors.

use crate::CodecError;
use hyperscale_storage::StoreError;
use hyperscale_types::BlockNumber;
use thiserror::Error;

/// A requested schedule bound would violate `start < stop`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRange {
    #[error("start block number should be less than the stop block number (start {start}, stop {stop})")]
    StartNotBeforeStop {
        start: BlockNumber,
        stop: BlockNumber,
    },

    #[error("stop block number should be greater than the start block number (start {start}, stop {stop})")]
    StopNotAfterStart {
        start: BlockNumber,
        stop: BlockNumber,
    },
}

/// Errors returned by [`ReplicaState`](crate::ReplicaState) operations.
#[derive(Debug, Error)]
pub enum ReplicaStateError {
    /// Range validation failed. State is unchanged.
    #[error(transparent)]
    InvalidRange(#[from] InvalidRange),

    /// The store failed. For mutations the in-memory change has already been
    /// applied and memory and disk now diverge until the next successful write.
    #[error("replica state store failure: {0}")]
    Store(#[from] StoreError),

    /// The record could not be encoded or decoded.
    #[error("replica state codec failure: {0}")]
    Codec(#[from] CodecError),

    /// The state has been closed; no further mutations are accepted.
    #[error("replica state is closed")]
    Closed,
}

impl ReplicaStateError {
    /// Whether in-memory and persisted state may now disagree.
    ///
    /// Operators should treat this as a warning: the current role may not
    /// survive a restart.
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, ReplicaStateError::Store(_) | ReplicaStateError::Codec(_))
    }
}
