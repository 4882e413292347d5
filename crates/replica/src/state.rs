//! Authoritative replica state with persist-under-lock.

use crate::{
    ReplicaStateError, ReplicaStateSummary, Role, RoleState, SborStateCodec, StateCodec,
};
use hyperscale_metrics as metrics;
use hyperscale_storage::keys::REPLICA_STATE_KEY;
use hyperscale_storage::{StateStore, StoreRead};
use hyperscale_types::BlockNumber;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Role record plus the store handle, guarded together.
///
/// `store` is `None` once closed.
struct Inner<S> {
    role: RoleState,
    store: Option<S>,
}

/// The node's primary/replica role, persisted on every change.
///
/// A single reader/writer lock guards the whole record and the store handle.
/// Mutations take the write lock for their full duration, including the store
/// write, so persisted records land in the same order mutations are applied.
/// Queries take the read lock and never write.
///
/// All calls block the calling thread; there are no timeouts at this layer.
///
/// # Store failures
///
/// A failed write is returned to the caller, but the in-memory mutation has
/// already happened. Memory and disk disagree until the next successful write
/// or a restart (which reloads the older record).
pub struct ReplicaState<S, C = SborStateCodec> {
    inner: RwLock<Inner<S>>,
    codec: C,
}

impl<S: StateStore> ReplicaState<S, SborStateCodec> {
    /// Load the role from `store`, or start as `default_role` if nothing has
    /// been persisted yet.
    ///
    /// Any error here is fatal for the node: it must not run with an unknown role.
    pub fn open(store: S, default_role: Role) -> Result<Self, ReplicaStateError> {
        Self::open_with_codec(store, SborStateCodec, default_role)
    }
}

impl<S: StateStore, C: StateCodec> ReplicaState<S, C> {
    /// Like [`ReplicaState::open`] with a custom record codec.
    ///
    /// The loaded (or default) state is written back before returning, so a
    /// successfully opened store always holds a record.
    pub fn open_with_codec(
        store: S,
        codec: C,
        default_role: Role,
    ) -> Result<Self, ReplicaStateError> {
        let role = match store.get(REPLICA_STATE_KEY)? {
            StoreRead::Found(bytes) => {
                let role = codec.decode(&bytes)?;
                debug!(state = %role.kind(), "Restored replica state from storage");
                role
            }
            StoreRead::NotFound => {
                debug!(?default_role, "No persisted replica state, using default role");
                RoleState::new(default_role)
            }
        };

        let bytes = codec.encode(&role)?;
        store.put(REPLICA_STATE_KEY, &bytes)?;
        metrics::record_replica_state_persisted();
        metrics::set_replica_role(role.is_replica(), role.enabled());

        info!(
            state = %role.kind(),
            start = ?role.start_block().map(ToString::to_string),
            stop = ?role.stop_block().map(ToString::to_string),
            "Replica state opened"
        );

        Ok(Self {
            inner: RwLock::new(Inner {
                role,
                store: Some(store),
            }),
            codec,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutations
    // ═══════════════════════════════════════════════════════════════════════

    /// Set the inclusive start of the primary range, or clear it with `None`.
    ///
    /// Fails with [`ReplicaStateError::InvalidRange`] if a stop bound exists
    /// and `block` is not below it; the state is then unchanged.
    pub fn set_start_block(&self, block: Option<BlockNumber>) -> Result<(), ReplicaStateError> {
        let mut inner = self.write_open()?;
        inner.role.set_start_block(block)?;
        info!(
            start = ?inner.role.start_block().map(ToString::to_string),
            state = %inner.role.kind(),
            "Start validating block updated"
        );
        self.persist(&inner)
    }

    /// Set the exclusive end of the primary range, or clear it with `None`.
    ///
    /// Fails with [`ReplicaStateError::InvalidRange`] if a start bound exists
    /// and `block` is not above it; the state is then unchanged.
    pub fn set_stop_block(&self, block: Option<BlockNumber>) -> Result<(), ReplicaStateError> {
        let mut inner = self.write_open()?;
        inner.role.set_stop_block(block)?;
        info!(
            stop = ?inner.role.stop_block().map(ToString::to_string),
            state = %inner.role.kind(),
            "Stop validating block updated"
        );
        self.persist(&inner)
    }

    /// Become a replica unconditionally and drop any schedule.
    pub fn make_replica(&self) -> Result<(), ReplicaStateError> {
        self.force_role(Role::Replica)
    }

    /// Become primary unconditionally and drop any schedule.
    pub fn make_primary(&self) -> Result<(), ReplicaStateError> {
        self.force_role(Role::Primary)
    }

    /// Returns `true` if the consensus core should start at `seq`, recording
    /// the switch to primary before returning.
    ///
    /// Only a replica that is scheduled to be primary at `seq` switches. A
    /// reached start-only schedule is consumed, leaving a permanent primary.
    /// `Ok(false)` means nothing changed and nothing was written.
    pub fn should_start_core(&self, seq: &BlockNumber) -> Result<bool, ReplicaStateError> {
        let mut inner = self.write_open()?;
        let was_enabled = inner.role.enabled();
        if !inner.role.start_core(seq) {
            return Ok(false);
        }

        metrics::record_role_transition("start_core");
        info!(
            seq = %seq,
            schedule_cleared = was_enabled && !inner.role.enabled(),
            state = %inner.role.kind(),
            "Switching to primary, starting consensus core"
        );
        self.persist(&inner)?;
        Ok(true)
    }

    /// Returns `true` if the consensus core should stop at `seq`, recording
    /// the switch to replica before returning.
    ///
    /// Only a primary that is not scheduled to be primary at `seq` switches.
    /// A reached stop bound consumes the schedule.
    /// `Ok(false)` means nothing changed and nothing was written.
    pub fn should_stop_core(&self, seq: &BlockNumber) -> Result<bool, ReplicaStateError> {
        let mut inner = self.write_open()?;
        let was_enabled = inner.role.enabled();
        if !inner.role.stop_core(seq) {
            return Ok(false);
        }

        metrics::record_role_transition("stop_core");
        info!(
            seq = %seq,
            schedule_cleared = was_enabled && !inner.role.enabled(),
            state = %inner.role.kind(),
            "Switching to replica, stopping consensus core"
        );
        self.persist(&inner)?;
        Ok(true)
    }

    /// Release the store. Later mutations fail with
    /// [`ReplicaStateError::Closed`]; queries keep answering from memory.
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) -> Result<(), ReplicaStateError> {
        let mut inner = self.write_lock();
        let Some(store) = inner.store.take() else {
            return Ok(());
        };
        store.close()?;
        info!(state = %inner.role.kind(), "Replica state closed");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Whether this node is primary for `seq`. Never writes.
    pub fn is_primary_for_seq(&self, seq: &BlockNumber) -> bool {
        self.read_lock().role.is_primary_for_seq(seq)
    }

    /// Status projection of the current state.
    pub fn summary(&self) -> ReplicaStateSummary {
        let inner = self.read_lock();
        let role = &inner.role;
        ReplicaStateSummary {
            state: role.kind(),
            enabled: role.enabled(),
            is_replica: role.is_replica(),
            start_validating_block: role.start_block().cloned(),
            stop_validating_block: role.stop_block().cloned(),
        }
    }

    /// Copy of the current role record.
    pub fn snapshot(&self) -> RoleState {
        self.read_lock().role.clone()
    }

    /// Whether [`ReplicaState::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.read_lock().store.is_none()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════

    fn force_role(&self, role: Role) -> Result<(), ReplicaStateError> {
        let mut inner = self.write_open()?;
        inner.role.force_role(role);

        metrics::record_role_transition(if role.is_replica() {
            "make_replica"
        } else {
            "make_primary"
        });
        info!(?role, "Forced role change, schedule cleared");
        self.persist(&inner)
    }

    /// Write the current record. Must be called with the write lock held.
    fn persist(&self, inner: &Inner<S>) -> Result<(), ReplicaStateError> {
        let store = inner.store.as_ref().ok_or(ReplicaStateError::Closed)?;

        let result = self
            .codec
            .encode(&inner.role)
            .map_err(ReplicaStateError::from)
            .and_then(|bytes| {
                store
                    .put(REPLICA_STATE_KEY, &bytes)
                    .map_err(ReplicaStateError::from)
            });

        match result {
            Ok(()) => {
                metrics::record_replica_state_persisted();
                metrics::set_replica_role(inner.role.is_replica(), inner.role.enabled());
                Ok(())
            }
            Err(e) => {
                metrics::record_replica_state_persist_failure();
                warn!(
                    error = %e,
                    state = %inner.role.kind(),
                    "Failed to persist replica state; in-memory role may not survive a restart"
                );
                Err(e)
            }
        }
    }

    fn write_open(&self) -> Result<RwLockWriteGuard<'_, Inner<S>>, ReplicaStateError> {
        let inner = self.write_lock();
        if inner.store.is_none() {
            return Err(ReplicaStateError::Closed);
        }
        Ok(inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Inner<S>> {
        self.inner
            .write()
            .expect("replica state lock poisoned - role is undefined")
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Inner<S>> {
        self.inner
            .read()
            .expect("replica state lock poisoned - role is undefined")
    }
}
