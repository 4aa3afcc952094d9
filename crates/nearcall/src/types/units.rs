//! NEAR token amount and gas unit types.

use std::fmt::{self, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

/// One NEAR in yoctoNEAR (10^24).
const YOCTO_PER_NEAR: u128 = 1_000_000_000_000_000_000_000_000;
/// One teragas (10^12).
const GAS_PER_TGAS: u64 = 1_000_000_000_000;

/// A NEAR token amount with yoctoNEAR precision (10^-24 NEAR).
///
/// The canonical encoding is a 128-bit little-endian unsigned integer.
/// Amounts arriving as arbitrary-precision decimal strings (e.g. a CLI
/// `--deposit`) go through [`NearToken::from_yocto_str`], which refuses
/// anything wider than 128 bits instead of truncating it.
///
/// ```
/// use nearcall::NearToken;
///
/// let deposit = NearToken::from_yocto_str("1000000000000000000000000").unwrap();
/// assert_eq!(deposit, NearToken::from_near(1));
///
/// // 2^128 does not fit
/// assert!(NearToken::from_yocto_str("340282366920938463463374607431768211456").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NearToken(u128);

impl NearToken {
    /// Zero NEAR.
    pub const ZERO: Self = Self(0);
    /// One yoctoNEAR.
    pub const ONE_YOCTO: Self = Self(1);

    /// Create from yoctoNEAR.
    pub const fn from_yoctonear(yocto: u128) -> Self {
        Self(yocto)
    }

    /// Create from whole NEAR.
    pub const fn from_near(near: u128) -> Self {
        Self(near * YOCTO_PER_NEAR)
    }

    /// Parse a non-negative decimal yoctoNEAR amount of any length.
    ///
    /// Leading zeros and surrounding whitespace are accepted.
    pub fn from_yocto_str(s: &str) -> Result<Self, EncodingError> {
        let digits = s.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::InvalidInteger(s.to_string()));
        }

        let mut value: u128 = 0;
        for b in digits.bytes() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u128::from(b - b'0')))
                .ok_or_else(|| EncodingError::WidthOverflow {
                    value: digits.to_string(),
                    bits: 128,
                })?;
        }
        Ok(Self(value))
    }

    /// Get the amount in yoctoNEAR.
    pub const fn as_yoctonear(&self) -> u128 {
        self.0
    }

    /// Check if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for NearToken {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yocto_str(s)
    }
}

impl Display for NearToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} yocto", self.0)
    }
}

// NEAR RPC renders u128 amounts as decimal strings.
impl Serialize for NearToken {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for NearToken {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        Self::from_yocto_str(&s).map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for NearToken {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for NearToken {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self(u128::deserialize_reader(reader)?))
    }
}

// ============================================================================
// Gas
// ============================================================================

/// Gas units attached to a function call.
///
/// ```
/// use nearcall::Gas;
///
/// let gas = Gas::from_tgas(30);
/// assert_eq!(gas.as_gas(), 30_000_000_000_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Gas(u64);

impl Gas {
    /// Zero gas. Passing it to a function call selects [`Gas::MAX`].
    pub const ZERO: Self = Self(0);

    /// Protocol maximum prepaid gas for a function call (300 Tgas).
    pub const MAX: Self = Self::from_tgas(300);

    /// Create from raw gas units.
    pub const fn from_gas(gas: u64) -> Self {
        Self(gas)
    }

    /// Create from teragas (10^12).
    pub const fn from_tgas(tgas: u64) -> Self {
        Self(tgas * GAS_PER_TGAS)
    }

    /// Get raw gas value.
    pub const fn as_gas(&self) -> u64 {
        self.0
    }

    /// Get value in teragas (truncated).
    pub const fn as_tgas(&self) -> u64 {
        self.0 / GAS_PER_TGAS
    }

    /// Check if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % GAS_PER_TGAS == 0 && self.0 != 0 {
            write!(f, "{} Tgas", self.as_tgas())
        } else {
            write!(f, "{} gas", self.0)
        }
    }
}

impl Serialize for Gas {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Gas {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Self(<u64 as Deserialize>::deserialize(d)?))
    }
}

impl BorshSerialize for Gas {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for Gas {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self(u64::deserialize_reader(reader)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yocto_str() {
        assert_eq!(NearToken::from_yocto_str("0").unwrap(), NearToken::ZERO);
        assert_eq!(
            NearToken::from_yocto_str(" 000042\n").unwrap(),
            NearToken::from_yoctonear(42)
        );
        assert_eq!(
            NearToken::from_yocto_str("340282366920938463463374607431768211455").unwrap(),
            NearToken::from_yoctonear(u128::MAX)
        );
    }

    #[test]
    fn test_from_yocto_str_overflow() {
        let err = NearToken::from_yocto_str("340282366920938463463374607431768211456").unwrap_err();
        assert_eq!(
            err,
            EncodingError::WidthOverflow {
                value: "340282366920938463463374607431768211456".to_string(),
                bits: 128
            }
        );
    }

    #[test]
    fn test_from_yocto_str_rejects_non_digits() {
        for bad in ["", "-1", "1.5", "5 NEAR", "0x10"] {
            assert_eq!(
                NearToken::from_yocto_str(bad),
                Err(EncodingError::InvalidInteger(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_near_token_borsh_is_u128_le() {
        let bytes = borsh::to_vec(&NearToken::from_yoctonear(1)).unwrap();
        let mut expected = vec![0u8; 16];
        expected[0] = 1;
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_near_token_serde_as_string() {
        let amount = NearToken::from_near(2);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"2000000000000000000000000\"");
        assert_eq!(serde_json::from_str::<NearToken>(&json).unwrap(), amount);
    }

    #[test]
    fn test_gas_max() {
        assert_eq!(Gas::MAX.as_gas(), 300_000_000_000_000);
        assert_eq!(Gas::MAX.to_string(), "300 Tgas");
        assert_eq!(Gas::from_gas(5).to_string(), "5 gas");
        assert!(Gas::ZERO.is_zero());
    }

    #[test]
    fn test_gas_borsh_is_u64_le() {
        let bytes = borsh::to_vec(&Gas::MAX).unwrap();
        assert_eq!(bytes, 300_000_000_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_gas_serde_as_number() {
        let json = serde_json::to_string(&Gas::from_tgas(30)).unwrap();
        assert_eq!(json, "30000000000000");
        assert_eq!(serde_json::from_str::<Gas>(&json).unwrap(), Gas::from_tgas(30));
        assert!(serde_json::from_str::<Gas>("-1").is_err());
    }
}
