//! Role record and its transition rules.
//!
//! Everything here is pure: no locking, no I/O. [`ReplicaState`](crate::ReplicaState)
//! applies these rules to the authoritative instance under its write lock and
//! persists the result.

use crate::{InvalidRange, ReplicaStateKind};
use hyperscale_types::BlockNumber;

/// Static role a node starts in when no record has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Actively participates in signing consensus output.
    Primary,
    /// Hot standby; does not sign.
    Replica,
}

impl Role {
    /// Returns `true` for [`Role::Replica`].
    pub fn is_replica(self) -> bool {
        matches!(self, Role::Replica)
    }
}

/// The primary/replica role record.
///
/// When `enabled` is false the role is the static `is_replica` flag. When
/// `enabled` is true a schedule governs the role: the node is primary for
/// sequence numbers in `[start_block, stop_block)`, with a missing start
/// treated as negative infinity and a missing stop as positive infinity.
///
/// Invariant: if both bounds are set, `start_block < stop_block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleState {
    is_replica: bool,
    enabled: bool,
    start_block: Option<BlockNumber>,
    stop_block: Option<BlockNumber>,
}

impl RoleState {
    /// A static role with no schedule.
    pub fn new(role: Role) -> Self {
        Self {
            is_replica: role.is_replica(),
            enabled: false,
            start_block: None,
            stop_block: None,
        }
    }

    /// Rebuild a record from its raw fields, checking the range invariant.
    ///
    /// Used by codecs when decoding a persisted record.
    pub fn from_parts(
        is_replica: bool,
        enabled: bool,
        start_block: Option<BlockNumber>,
        stop_block: Option<BlockNumber>,
    ) -> Result<Self, InvalidRange> {
        if let (Some(start), Some(stop)) = (&start_block, &stop_block) {
            if start >= stop {
                return Err(InvalidRange::StartNotBeforeStop {
                    start: start.clone(),
                    stop: stop.clone(),
                });
            }
        }
        Ok(Self {
            is_replica,
            enabled,
            start_block,
            stop_block,
        })
    }

    pub fn is_replica(&self) -> bool {
        self.is_replica
    }

    /// Whether a start/stop schedule currently governs the role.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Inclusive lower bound of the primary range.
    pub fn start_block(&self) -> Option<&BlockNumber> {
        self.start_block.as_ref()
    }

    /// Exclusive upper bound of the primary range.
    pub fn stop_block(&self) -> Option<&BlockNumber> {
        self.stop_block.as_ref()
    }

    /// The four-way state label derived from `(is_replica, enabled)`.
    pub fn kind(&self) -> ReplicaStateKind {
        ReplicaStateKind::from_flags(self.is_replica, self.enabled)
    }

    /// Whether this node should act as primary for `seq`.
    pub fn is_primary_for_seq(&self, seq: &BlockNumber) -> bool {
        if !self.enabled {
            return !self.is_replica;
        }
        if matches!(&self.start_block, Some(start) if seq < start) {
            return false;
        }
        if matches!(&self.stop_block, Some(stop) if seq >= stop) {
            return false;
        }
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Transitions
    // ═══════════════════════════════════════════════════════════════════════

    /// Set or clear the inclusive start bound.
    ///
    /// Setting a bound enables the schedule. Clearing leaves `enabled` as is.
    pub(crate) fn set_start_block(&mut self, block: Option<BlockNumber>) -> Result<(), InvalidRange> {
        let Some(start) = block else {
            self.start_block = None;
            return Ok(());
        };

        if let Some(stop) = &self.stop_block {
            if start >= *stop {
                return Err(InvalidRange::StartNotBeforeStop {
                    start,
                    stop: stop.clone(),
                });
            }
        }

        self.enabled = true;
        self.start_block = Some(start);
        Ok(())
    }

    /// Set or clear the exclusive stop bound.
    ///
    /// Setting a bound enables the schedule. Clearing leaves `enabled` as is.
    pub(crate) fn set_stop_block(&mut self, block: Option<BlockNumber>) -> Result<(), InvalidRange> {
        let Some(stop) = block else {
            self.stop_block = None;
            return Ok(());
        };

        if let Some(start) = &self.start_block {
            if stop <= *start {
                return Err(InvalidRange::StopNotAfterStart {
                    start: start.clone(),
                    stop,
                });
            }
        }

        self.enabled = true;
        self.stop_block = Some(stop);
        Ok(())
    }

    /// Force a static role and drop any schedule.
    pub(crate) fn force_role(&mut self, role: Role) {
        self.is_replica = role.is_replica();
        self.clear_schedule();
    }

    /// Promote to primary if we are a replica that is scheduled to be primary
    /// at `seq`. Returns whether the transition happened.
    ///
    /// A start-only schedule that has been reached is consumed: the node
    /// becomes permanently primary. If a stop bound exists the schedule stays
    /// enabled so the stop can still fire.
    pub(crate) fn start_core(&mut self, seq: &BlockNumber) -> bool {
        if !(self.is_replica && self.is_primary_for_seq(seq)) {
            return false;
        }
        if self.start_only_schedule_reached(seq) {
            self.clear_schedule();
        }
        self.is_replica = false;
        true
    }

    /// Demote to replica if we are primary but should not be at `seq`.
    /// Returns whether the transition happened.
    ///
    /// Once the stop bound has been reached the schedule is consumed, whether
    /// or not a start bound is also set.
    pub(crate) fn stop_core(&mut self, seq: &BlockNumber) -> bool {
        if self.is_replica || self.is_primary_for_seq(seq) {
            return false;
        }
        if self.stop_reached(seq) {
            self.clear_schedule();
        }
        self.is_replica = true;
        true
    }

    fn start_only_schedule_reached(&self, seq: &BlockNumber) -> bool {
        self.enabled
            && self.stop_block.is_none()
            && matches!(&self.start_block, Some(start) if start <= seq)
    }

    fn stop_reached(&self, seq: &BlockNumber) -> bool {
        self.enabled && matches!(&self.stop_block, Some(stop) if stop <= seq)
    }

    fn clear_schedule(&mut self) {
        self.enabled = false;
        self.start_block = None;
        self.stop_block = None;
    }
}
