//! Ledger records - Loans, per-account aggregates and policy limits
//!
//! Three keyed records make up the ledger:
//! - `Loan` per ordered `(lender, borrower)` pair
//! - `UserBalance` per account, maintained incrementally from loan deltas
//! - `UserLimits` per account, replaced wholesale by its owner

use relaycredit_core::{AccountId, Amount, MathError, Rate, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered pair identifying a loan. `(A, B)` and `(B, A)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoanKey {
    pub lender: AccountId,
    pub borrower: AccountId,
}

impl LoanKey {
    pub fn new(lender: AccountId, borrower: AccountId) -> Self {
        Self { lender, borrower }
    }
}

impl fmt::Display for LoanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.lender, self.borrower)
    }
}

/// A pairwise loan.
///
/// # Invariant
/// `rate` is only meaningful while `amount > 0`. A fully repaid loan is
/// kept with `amount = 0` and its last rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loan {
    /// Outstanding principal plus accrued interest
    pub amount: Amount,
    /// Current rate (weighted average of all tranches)
    pub rate: Rate,
    /// Last accrual or mutation time
    pub timestamp: Timestamp,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        !self.amount.is_zero()
    }
}

/// Per-account running totals.
///
/// `lent`/`borrowed` equal the sum of the account's loan amounts in each
/// role. `owed_per_second`/`owes_per_second` are running totals of
/// `amount × rate / D`, updated by delta on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserBalance {
    pub lent: Amount,
    pub borrowed: Amount,
    pub owed_per_second: Amount,
    pub owes_per_second: Amount,
    pub timestamp: Timestamp,
}

impl UserBalance {
    /// Accrued interest lands on the lender side
    pub(crate) fn credit_lender(
        &mut self,
        amount: Amount,
        rate_delta: Amount,
    ) -> Result<(), MathError> {
        self.lent = self.lent.checked_add(amount)?;
        self.owed_per_second = self.owed_per_second.checked_add(rate_delta)?;
        Ok(())
    }

    pub(crate) fn credit_borrower(
        &mut self,
        amount: Amount,
        rate_delta: Amount,
    ) -> Result<(), MathError> {
        self.borrowed = self.borrowed.checked_add(amount)?;
        self.owes_per_second = self.owes_per_second.checked_add(rate_delta)?;
        Ok(())
    }

    /// Advance the touch time, never moving it backwards
    pub(crate) fn touch(&mut self, now: Timestamp) {
        self.timestamp = self.timestamp.max(now);
    }
}

/// Lending/borrowing policy of one account. Absent limits read as all
/// zero, which refuses every loan that needs a non-zero cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserLimits {
    /// Max aggregate `lent`
    pub lending_cap: Amount,
    /// Minimum rate accepted when lending
    pub min_lend_ir: Rate,
    /// Max aggregate `borrowed` while relaying (zero = will not relay)
    pub borrow_cap: Amount,
    /// Maximum rate paid when borrowing as a relayer
    pub max_borrow_ir: Rate,
    /// Minimum spread between downstream and upstream rate when relaying
    pub min_ir_margin: Rate,
}
