//! Checked 256-bit fixed-point arithmetic
//!
//! Every ledger quantity is an unsigned 256-bit integer. Products such as
//! `amount × rate × elapsed` are computed at full width and then scaled
//! down, so intermediates never lose precision. Overflow is an error,
//! never a wrap.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

/// Fixed-point denominator `D` (10^18)
pub const SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Number of decimal places represented by [`SCALE`]
pub const SCALE_DECIMALS: u32 = 18;

/// Arithmetic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Arithmetic underflow")]
    Underflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Negative value not allowed: {0}")]
    Negative(Decimal),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// `a * b / d`, full-width, rounding toward zero
pub fn mul_div(a: U256, b: U256, d: U256) -> Result<U256, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    Ok(product / d)
}

/// `a * b * c / d`, full-width, rounding toward zero
pub fn mul_mul_div(a: U256, b: U256, c: U256, d: U256) -> Result<U256, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = a
        .checked_mul(b)
        .and_then(|ab| ab.checked_mul(c))
        .ok_or(MathError::Overflow)?;
    Ok(product / d)
}

/// 10^exp
pub fn pow10(exp: u32) -> Result<U256, MathError> {
    let ten = U256::from(10u64);
    let mut result = U256::from(1u64);
    for _ in 0..exp {
        result = result.checked_mul(ten).ok_or(MathError::Overflow)?;
    }
    Ok(result)
}

/// Convert a human decimal (e.g. `2.5`) into its 10^18-scaled integer.
///
/// Digits beyond the 18th decimal place are truncated.
pub fn decimal_to_scaled(value: Decimal) -> Result<U256, MathError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::Negative(value));
    }
    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let scale = value.scale();

    if scale <= SCALE_DECIMALS {
        mantissa
            .checked_mul(pow10(SCALE_DECIMALS - scale)?)
            .ok_or(MathError::Overflow)
    } else {
        Ok(mantissa / pow10(scale - SCALE_DECIMALS)?)
    }
}

/// Convert a 10^18-scaled integer back to a human decimal.
///
/// Returns `None` when the value does not fit the 96-bit decimal mantissa.
pub fn scaled_to_decimal(value: U256) -> Option<Decimal> {
    if value.bit_len() > 96 {
        return None;
    }
    let raw = value.to::<u128>();
    let mut decimal = Decimal::from_i128_with_scale(raw as i128, SCALE_DECIMALS);
    decimal.normalize_assign();
    Some(decimal)
}

/// Parse a base-10 integer string into a U256
pub fn parse_u256(s: &str) -> Result<U256, MathError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MathError::InvalidNumber(s.to_string()));
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| MathError::InvalidNumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scale_is_ten_pow_eighteen() {
        assert_eq!(SCALE, pow10(18).unwrap());
    }

    #[test]
    fn test_mul_div_truncates() {
        let r = mul_div(U256::from(10u64), U256::from(3u64), U256::from(4u64)).unwrap();
        assert_eq!(r, U256::from(7u64));
    }

    #[test]
    fn test_mul_div_rejects_zero_divisor() {
        let r = mul_div(U256::from(1u64), U256::from(1u64), U256::ZERO);
        assert_eq!(r, Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_mul_mul_div_overflow() {
        let r = mul_mul_div(U256::MAX, U256::from(2u64), U256::from(1u64), SCALE);
        assert_eq!(r, Err(MathError::Overflow));
    }

    #[test]
    fn test_decimal_to_scaled() {
        assert_eq!(decimal_to_scaled(dec!(1)).unwrap(), SCALE);
        assert_eq!(
            decimal_to_scaled(dec!(0.5)).unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
        assert!(matches!(
            decimal_to_scaled(dec!(-1)),
            Err(MathError::Negative(_))
        ));
    }

    #[test]
    fn test_scaled_to_decimal() {
        let v = U256::from(2_500_000_000_000_000_000u64);
        assert_eq!(scaled_to_decimal(v), Some(dec!(2.5)));
        assert_eq!(scaled_to_decimal(U256::MAX), None);
    }

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("42").unwrap(), U256::from(42u64));
        assert!(parse_u256("0x2a").is_err());
        assert!(parse_u256("").is_err());
    }
}
