//! Status projection of the replica state.

use hyperscale_types::BlockNumber;
use serde::Serialize;
use std::fmt;

/// Human-facing label for the `(is_replica, enabled)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplicaStateKind {
    /// Replica with no schedule.
    #[serde(rename = "Replica")]
    Replica,
    /// Replica with a schedule that has not promoted it yet.
    #[serde(rename = "Replica waiting to start")]
    ReplicaWaitingToStart,
    /// Primary with no schedule.
    #[serde(rename = "Primary")]
    Primary,
    /// Primary inside a scheduled range.
    #[serde(rename = "Primary in given range")]
    PrimaryInRange,
}

impl ReplicaStateKind {
    /// Exhaustive mapping from the role flags.
    pub fn from_flags(is_replica: bool, enabled: bool) -> Self {
        match (is_replica, enabled) {
            (true, false) => ReplicaStateKind::Replica,
            (true, true) => ReplicaStateKind::ReplicaWaitingToStart,
            (false, false) => ReplicaStateKind::Primary,
            (false, true) => ReplicaStateKind::PrimaryInRange,
        }
    }

    /// Returns the label used in status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicaStateKind::Replica => "Replica",
            ReplicaStateKind::ReplicaWaitingToStart => "Replica waiting to start",
            ReplicaStateKind::Primary => "Primary",
            ReplicaStateKind::PrimaryInRange => "Primary in given range",
        }
    }
}

impl fmt::Display for ReplicaStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replica state snapshot for external APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaStateSummary {
    /// Derived state label.
    pub state: ReplicaStateKind,
    /// Whether a start/stop schedule governs the role.
    pub enabled: bool,
    /// Current static role flag.
    pub is_replica: bool,
    /// Inclusive start of the primary range, if set.
    pub start_validating_block: Option<BlockNumber>,
    /// Exclusive end of the primary range, if set.
    pub stop_validating_block: Option<BlockNumber>,
}

impl fmt::Display for ReplicaStateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        if self.enabled {
            let start = self
                .start_validating_block
                .as_ref()
                .map_or_else(|| "-inf".to_string(), ToString::to_string);
            let stop = self
                .stop_validating_block
                .as_ref()
                .map_or_else(|| "+inf".to_string(), ToString::to_string);
            write!(f, " [{start}, {stop})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping_is_exhaustive() {
        let cases = [
            (true, false, "Replica"),
            (true, true, "Replica waiting to start"),
            (false, false, "Primary"),
            (false, true, "Primary in given range"),
        ];
        for (is_replica, enabled, label) in cases {
            let kind = ReplicaStateKind::from_flags(is_replica, enabled);
            assert_eq!(kind.as_str(), label);
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{label}\"")
            );
        }
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = ReplicaStateSummary {
            state: ReplicaStateKind::PrimaryInRange,
            enabled: true,
            is_replica: false,
            start_validating_block: Some(BlockNumber::from(100)),
            stop_validating_block: None,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": "Primary in given range",
                "enabled": true,
                "isReplica": false,
                "startValidatingBlock": 100,
                "stopValidatingBlock": null,
            })
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = ReplicaStateSummary {
            state: ReplicaStateKind::ReplicaWaitingToStart,
            enabled: true,
            is_replica: true,
            start_validating_block: Some(BlockNumber::from(100)),
            stop_validating_block: None,
        };
        assert_eq!(summary.to_string(), "Replica waiting to start [100, +inf)");

        let summary = ReplicaStateSummary {
            state: ReplicaStateKind::Primary,
            enabled: false,
            is_replica: false,
            start_validating_block: None,
            stop_validating_block: None,
        };
        assert_eq!(summary.to_string(), "Primary");
    }
}
