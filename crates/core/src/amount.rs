//! Amount - Non-negative 256-bit token amount
//!
//! Amounts are raw token units. One whole token is 10^18 units, the same
//! scale used for rates, so `Amount::from_tokens(10)` is `10·10^18`.
//! Non-negativity is enforced by the unsigned representation.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::math::{self, MathError, SCALE};

/// A non-negative token amount in raw units.
///
/// # Example
/// ```
/// use relaycredit_core::Amount;
///
/// let a = Amount::from_tokens(100);
/// let b = Amount::from_tokens(30);
/// assert_eq!(a.checked_sub(b).unwrap(), Amount::from_tokens(70));
///
/// // Underflow is an error, never a wrap
/// assert!(b.checked_sub(a).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(U256);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw 256-bit value
    #[inline]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Raw units from a primitive
    pub fn from_raw(units: u128) -> Self {
        Self(U256::from(units))
    }

    /// Whole tokens (`tokens · 10^18` raw units)
    pub fn from_tokens(tokens: u64) -> Self {
        Self(U256::from(tokens) * SCALE)
    }

    /// Convert a human decimal amount (`12.5` tokens) to raw units
    pub fn from_decimal(value: Decimal) -> Result<Self, MathError> {
        math::decimal_to_scaled(value).map(Self)
    }

    /// Human decimal view, if it fits in a `Decimal`
    pub fn to_decimal(&self) -> Option<Decimal> {
        math::scaled_to_decimal(self.0)
    }

    /// Get the inner value
    #[inline]
    pub const fn value(&self) -> U256 {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: Amount) -> Result<Amount, MathError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(MathError::Overflow)
    }

    /// Subtraction that refuses to go below zero
    pub fn checked_sub(&self, other: Amount) -> Result<Amount, MathError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(MathError::Underflow)
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        math::parse_u256(s).map(Amount)
    }
}

impl TryFrom<String> for Amount {
    type Error = MathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}
