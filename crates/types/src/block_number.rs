//! Arbitrary-precision block numbers.

use num_bigint::{BigUint, ParseBigIntError};
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A consensus sequence number (block height).
///
/// Backed by an unbounded unsigned integer so that range bounds and sequence
/// numbers compare exactly regardless of magnitude. This is plain value data:
/// clone it freely, there is no shared ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(BigUint);

/// Error returned when parsing a [`BlockNumber`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBlockNumberError(ParseBigIntError);

impl fmt::Display for ParseBlockNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid block number: {}", self.0)
    }
}

impl std::error::Error for ParseBlockNumberError {}

impl BlockNumber {
    /// Block number zero.
    pub fn zero() -> Self {
        Self(BigUint::default())
    }

    /// Big-endian magnitude bytes. Zero encodes as a single `0x00` byte.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// Inverse of [`BlockNumber::to_be_bytes`]. An empty slice decodes as zero.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Access the underlying big integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for BlockNumber {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for BlockNumber {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl FromStr for BlockNumber {
    type Err = ParseBlockNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigUint::from_str(s.trim())
            .map(Self)
            .map_err(ParseBlockNumberError)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Serializes as a JSON number when the value fits in a `u64`, otherwise as a
/// decimal string.
impl Serialize for BlockNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_u64() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.collect_str(&self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_beyond_u64() {
        let small = BlockNumber::from(u64::MAX);
        let big: BlockNumber = "18446744073709551616".parse().unwrap();
        assert!(small < big);
        assert_eq!(big.to_u64(), None);
    }

    #[test]
    fn test_be_bytes() {
        let n = BlockNumber::from(0x0102_0304u64);
        assert_eq!(n.to_be_bytes(), vec![1, 2, 3, 4]);
        assert_eq!(BlockNumber::from_be_bytes(&[1, 2, 3, 4]), n);
        assert_eq!(BlockNumber::from_be_bytes(&[]), BlockNumber::zero());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("12a".parse::<BlockNumber>().is_err());
        assert!("-5".parse::<BlockNumber>().is_err());
        assert_eq!(" 42 ".parse::<BlockNumber>().unwrap(), BlockNumber::from(42));
    }

    #[test]
    fn test_json_serialization() {
        assert_eq!(
            serde_json::to_string(&BlockNumber::from(200)).unwrap(),
            "200"
        );
        let big: BlockNumber = "340282366920938463463374607431768211456".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&big).unwrap(),
            "\"340282366920938463463374607431768211456\""
        );
    }
}
