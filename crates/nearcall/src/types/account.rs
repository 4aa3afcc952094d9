//! NEAR account ID type with validation.

use std::fmt::{self, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::ParseAccountIdError;

/// A NEAR account identifier.
///
/// Valid account IDs:
/// - Named: "alice.near", "aurora", "sub.account.near"
/// - Implicit (64 hex chars): "0123456789abcdef..."
///
/// On the wire an account ID is a plain length-prefixed string.
///
/// ```
/// use nearcall::AccountId;
///
/// let named: AccountId = "alice.near".parse().unwrap();
/// assert!(!named.is_implicit());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Parse and validate an account ID.
    pub fn new(s: impl Into<String>) -> Result<Self, ParseAccountIdError> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), ParseAccountIdError> {
        if s.is_empty() {
            return Err(ParseAccountIdError::Empty);
        }

        if s.len() > 64 {
            return Err(ParseAccountIdError::TooLong(s.to_string()));
        }

        if s.len() < 2 {
            return Err(ParseAccountIdError::TooShort(s.to_string()));
        }

        for c in s.chars() {
            if !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.') {
                return Err(ParseAccountIdError::InvalidChar(s.to_string(), c));
            }
        }

        // Separators may not lead or trail a segment, nor sit next to each other.
        let is_separator = |b: &u8| matches!(b, b'-' | b'_');
        for part in s.split('.') {
            let bytes = part.as_bytes();
            if bytes.first().is_none_or(is_separator)
                || bytes.last().is_some_and(is_separator)
                || bytes.windows(2).any(|w| is_separator(&w[0]) && is_separator(&w[1]))
            {
                return Err(ParseAccountIdError::InvalidFormat(s.to_string()));
            }
        }

        Ok(())
    }

    /// Check if this is an implicit account (64 hex chars).
    pub fn is_implicit(&self) -> bool {
        self.0.len() == 64 && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = ParseAccountIdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ParseAccountIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccountId> for String {
    fn from(account_id: AccountId) -> Self {
        account_id.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl BorshSerialize for AccountId {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for AccountId {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let s = String::deserialize_reader(reader)?;
        Self::new(s).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
