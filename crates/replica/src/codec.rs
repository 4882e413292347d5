//! Replica state record encoding.
//!
//! # Record Format
//!
//! The default codec SBOR-encodes a four-field record, in this order:
//!
//! ```text
//! is_replica: bool
//! enabled:    bool
//! start_block: Option<Vec<u8>>   // big-endian magnitude
//! stop_block:  Option<Vec<u8>>   // big-endian magnitude
//! ```
//!
//! The codec lives apart from [`RoleState`] so the role type carries no
//! serialization concerns; any format works as long as it round-trips.

use crate::RoleState;
use hyperscale_types::BlockNumber;
use sbor::prelude::*;
use thiserror::Error;

/// Errors that can occur during record encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("SBOR encode error: {0}")]
    Encode(String),

    #[error("SBOR decode error: {0}")]
    Decode(String),

    /// The bytes decoded but describe an impossible state.
    #[error("invalid replica state record: {0}")]
    InvalidRecord(String),
}

/// Encodes and decodes the persisted role record.
pub trait StateCodec: Send + Sync {
    /// Encode a role record to bytes.
    fn encode(&self, state: &RoleState) -> Result<Vec<u8>, CodecError>;

    /// Decode bytes produced by [`StateCodec::encode`].
    fn decode(&self, bytes: &[u8]) -> Result<RoleState, CodecError>;
}

/// On-disk shape of the role record.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
struct ReplicaStateRecord {
    is_replica: bool,
    enabled: bool,
    start_block: Option<Vec<u8>>,
    stop_block: Option<Vec<u8>>,
}

/// SBOR codec for the role record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SborStateCodec;

impl StateCodec for SborStateCodec {
    fn encode(&self, state: &RoleState) -> Result<Vec<u8>, CodecError> {
        let record = ReplicaStateRecord {
            is_replica: state.is_replica(),
            enabled: state.enabled(),
            start_block: state.start_block().map(BlockNumber::to_be_bytes),
            stop_block: state.stop_block().map(BlockNumber::to_be_bytes),
        };
        sbor::basic_encode(&record).map_err(|e| CodecError::Encode(format!("{:?}", e)))
    }

    fn decode(&self, bytes: &[u8]) -> Result<RoleState, CodecError> {
        let record: ReplicaStateRecord =
            sbor::basic_decode(bytes).map_err(|e| CodecError::Decode(format!("{:?}", e)))?;

        RoleState::from_parts(
            record.is_replica,
            record.enabled,
            record.start_block.as_deref().map(BlockNumber::from_be_bytes),
            record.stop_block.as_deref().map(BlockNumber::from_be_bytes),
        )
        .map_err(|e| CodecError::InvalidRecord(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let codec = SborStateCodec;
        let big: BlockNumber = "1267650600228229401496703205376".parse().unwrap();
        let states = [
            RoleState::new(Role::Replica),
            RoleState::new(Role::Primary),
            RoleState::from_parts(true, true, Some(BlockNumber::from(100)), None).unwrap(),
            RoleState::from_parts(false, true, Some(BlockNumber::from(0)), Some(big)).unwrap(),
            RoleState::from_parts(true, true, None, None).unwrap(),
        ];

        for state in states {
            let bytes = codec.encode(&state).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), state);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = SborStateCodec;
        assert!(matches!(
            codec.decode(&[0xde, 0xad, 0xbe, 0xef]),
            Err(CodecError::Decode(_))
        ));
        assert!(matches!(codec.decode(&[]), Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_inverted_range() {
        let record = ReplicaStateRecord {
            is_replica: true,
            enabled: true,
            start_block: Some(vec![200]),
            stop_block: Some(vec![100]),
        };
        let bytes = sbor::basic_encode(&record).unwrap();

        assert!(matches!(
            SborStateCodec.decode(&bytes),
            Err(CodecError::InvalidRecord(_))
        ));
    }
}
