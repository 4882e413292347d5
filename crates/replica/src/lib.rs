//! Primary/replica role state for a consensus validator.
//!
//! Decides whether this node is the active (primary) validator or a hot
//! standby (replica) for a given sequence number, and durably records every
//! change to that decision so a restart never produces two processes that both
//! believe they are primary.
//!
//! # Structure
//!
//! - [`RoleState`]: the plain role record and its pure transition rules
//! - [`ReplicaState`]: the authoritative instance, guarded by a single
//!   reader/writer lock, persisting through a [`StateStore`] after every
//!   mutation while still holding the write lock
//! - [`StateCodec`]: record encoding, independent of the role type
//! - [`ReplicaStateSummary`]: the status projection for operator tooling
//!
//! # Safety
//!
//! Persist-under-lock is load-bearing: records reach the store in exactly the
//! order mutations are applied. Do not split the lock or move the write after
//! the guard is released.
//!
//! [`StateStore`]: hyperscale_storage::StateStore

mod codec;
mod error;
mod role;
mod state;
mod summary;

pub use codec::{CodecError, SborStateCodec, StateCodec};
pub use error::{InvalidRange, ReplicaStateError};
pub use role::{Role, RoleState};
pub use state::ReplicaState;
pub use summary::{ReplicaStateKind, ReplicaStateSummary};
