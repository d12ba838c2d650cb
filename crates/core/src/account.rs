//! AccountId - Type-safe account identifier
//!
//! Account ids are normalized to uppercase so `alice` and `ALICE` name the
//! same account, matching how ledger keys are written everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing account ids
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Empty account id")]
    Empty,

    #[error("Account id too long (max {max} chars): {id}")]
    TooLong { id: String, max: usize },

    #[error("Invalid account id format: {0}")]
    InvalidFormat(String),
}

/// Identifier of a ledger participant.
///
/// # Examples
/// ```
/// use relaycredit_core::AccountId;
///
/// let alice: AccountId = "alice".parse().unwrap();
/// assert_eq!(alice.as_str(), "ALICE");
///
/// assert!("".parse::<AccountId>().is_err());
/// assert!("bad id".parse::<AccountId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub const MAX_LEN: usize = 64;

    /// Create an id from a trusted string (uppercased, not validated).
    /// Use `parse` for untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_uppercase())
    }

    fn parse_str(s: &str) -> Result<Self, AccountIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AccountIdError::Empty);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(AccountIdError::TooLong {
                id: trimmed.to_string(),
                max: Self::MAX_LEN,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(AccountIdError::InvalidFormat(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_str(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let id: AccountId = "relay_1".parse().unwrap();
        assert_eq!(id.to_string(), "RELAY_1");
        assert_eq!(id, AccountId::new("RELAY_1"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!("  ".parse::<AccountId>(), Err(AccountIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "A".repeat(AccountId::MAX_LEN + 1);
        assert!(matches!(
            long.parse::<AccountId>(),
            Err(AccountIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_separator() {
        assert!(matches!(
            "alice:bob".parse::<AccountId>(),
            Err(AccountIdError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = AccountId::new("carol");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CAROL\"");
        let parsed: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
