//! Rate - Fixed-point interest rate per unit time
//!
//! A rate is scaled by `D = 10^18`: `Rate::ONE` accrues 100% of principal
//! per unit of time.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amount::Amount;
use crate::math::{self, MathError, SCALE};

/// Interest accrued per unit principal per unit time, scaled by 10^18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rate(U256);

impl Rate {
    pub const ZERO: Self = Self(U256::ZERO);

    /// 100% per unit time
    pub const ONE: Self = Self(SCALE);

    #[inline]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn from_raw(units: u128) -> Self {
        Self(U256::from(units))
    }

    /// Convert a human fraction (`0.05` for 5%) to its scaled form
    pub fn from_decimal(value: Decimal) -> Result<Self, MathError> {
        math::decimal_to_scaled(value).map(Self)
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        math::scaled_to_decimal(self.0)
    }

    #[inline]
    pub const fn value(&self) -> U256 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `amount × rate / D`: the accrual per unit time on `amount`
    pub fn per_unit_time(&self, amount: Amount) -> Result<Amount, MathError> {
        math::mul_div(amount.value(), self.0, SCALE).map(Amount::new)
    }

    /// `amount × rate × elapsed / D`: interest over `elapsed` time units
    pub fn interest(&self, amount: Amount, elapsed: u64) -> Result<Amount, MathError> {
        math::mul_mul_div(amount.value(), self.0, U256::from(elapsed), SCALE).map(Amount::new)
    }

    /// Spread `self − other`, `None` when `other` exceeds `self`
    pub fn margin_over(&self, other: Rate) -> Option<Rate> {
        self.0.checked_sub(other.0).map(Rate)
    }

    /// Principal-weighted average of two tranches:
    /// `(a·ra + b·rb) / (a + b)`.
    ///
    /// When both tranches are empty the new rate `rb` is returned.
    pub fn weighted_average(
        a: Amount,
        ra: Rate,
        b: Amount,
        rb: Rate,
    ) -> Result<Rate, MathError> {
        let total = a.checked_add(b)?;
        if total.is_zero() {
            return Ok(rb);
        }
        let left = a.value().checked_mul(ra.0).ok_or(MathError::Overflow)?;
        let right = b.value().checked_mul(rb.0).ok_or(MathError::Overflow)?;
        let sum = left.checked_add(right).ok_or(MathError::Overflow)?;
        Ok(Rate(sum / total.value()))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rate {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        math::parse_u256(s).map(Rate)
    }
}

impl TryFrom<String> for Rate {
    type Error = MathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rate> for String {
    fn from(rate: Rate) -> Self {
        rate.to_string()
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_interest_ten_units_at_ten_percent() {
        // 100 tokens at 0.1 per unit time for 10 units = 100 tokens
        let rate = Rate::from_decimal(dec!(0.1)).unwrap();
        let interest = rate.interest(Amount::from_tokens(100), 10).unwrap();
        assert_eq!(interest, Amount::from_tokens(100));
    }

    #[test]
    fn test_interest_zero_elapsed() {
        let rate = Rate::ONE;
        assert_eq!(rate.interest(Amount::from_tokens(5), 0).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_per_unit_time() {
        let rate = Rate::from_decimal(dec!(0.25)).unwrap();
        let accrual = rate.per_unit_time(Amount::from_tokens(8)).unwrap();
        assert_eq!(accrual, Amount::from_tokens(2));
    }

    #[test]
    fn test_weighted_average() {
        // 10 @ 1.0 merged with 30 @ 2.0 -> (10 + 60) / 40 = 1.75
        let merged = Rate::weighted_average(
            Amount::from_tokens(10),
            Rate::ONE,
            Amount::from_tokens(30),
            Rate::from_decimal(dec!(2)).unwrap(),
        )
        .unwrap();
        assert_eq!(merged, Rate::from_decimal(dec!(1.75)).unwrap());
    }

    #[test]
    fn test_weighted_average_of_empty_tranches() {
        let r = Rate::from_decimal(dec!(0.3)).unwrap();
        let merged = Rate::weighted_average(Amount::ZERO, Rate::ONE, Amount::ZERO, r).unwrap();
        assert_eq!(merged, r);
    }

    #[test]
    fn test_margin_over() {
        let low = Rate::from_decimal(dec!(0.1)).unwrap();
        let high = Rate::from_decimal(dec!(0.3)).unwrap();
        assert_eq!(high.margin_over(low), Rate::from_decimal(dec!(0.2)).ok());
        assert_eq!(low.margin_over(high), None);
    }
}
