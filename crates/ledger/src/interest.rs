//! Interest Accrual
//!
//! Continuous simple interest, settled into the principal whenever a loan
//! is touched:
//!
//! ```text
//! interest   = amount × rate × elapsed / D
//! amount    += interest
//! rate_delta = interest × rate / D
//! ```
//!
//! `rate_delta` is added to both parties' per-second aggregates. It is
//! derived from the interest just capitalized, not recomputed from the new
//! amount.

use relaycredit_core::{Amount, MathError, Timestamp};

use crate::account::Loan;

/// Result of settling interest on one loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accrual {
    /// Interest added to the loan amount
    pub interest: Amount,
    /// Increase of the per-second aggregates (`interest × rate / D`)
    pub rate_delta: Amount,
    /// Time units the interest covers
    pub elapsed: u64,
}

impl Accrual {
    pub const NONE: Self = Self {
        interest: Amount::ZERO,
        rate_delta: Amount::ZERO,
        elapsed: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.interest.is_zero()
    }
}

/// Settle interest on `loan` up to `now`.
///
/// An empty loan only has its timestamp advanced. A `now` earlier than the
/// loan's timestamp accrues nothing and leaves the timestamp in place.
pub fn accrue_loan(loan: &mut Loan, now: Timestamp) -> Result<Accrual, MathError> {
    if loan.amount.is_zero() {
        loan.timestamp = loan.timestamp.max(now);
        return Ok(Accrual::NONE);
    }

    let elapsed = now.saturating_sub(loan.timestamp);
    let interest = loan.rate.interest(loan.amount, elapsed)?;
    let rate_delta = loan.rate.per_unit_time(interest)?;

    loan.amount = loan.amount.checked_add(interest)?;
    loan.timestamp = loan.timestamp.max(now);

    Ok(Accrual {
        interest,
        rate_delta,
        elapsed,
    })
}
