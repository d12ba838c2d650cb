//! Staged ledger transaction
//!
//! Writes go to an overlay keyed like the base maps; reads see the overlay
//! first. `commit` folds the overlay into the base state. Dropping the
//! transaction instead leaves the base state exactly as it was, which is
//! how a failing multi-hop operation is rolled back.

use relaycredit_core::{AccountId, Amount, Rate, Timestamp};
use std::collections::HashMap;

use crate::account::{Loan, LoanKey, UserBalance, UserLimits};
use crate::error::LedgerError;
use crate::interest::{accrue_loan, Accrual};
use crate::state::LedgerState;

/// Outcome of reducing one loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repayment {
    /// Portion of the offer absorbed by the loan
    pub repaid: Amount,
    /// Loan amount left afterwards
    pub remaining: Amount,
    /// Loan rate used for the per-second reduction
    pub rate: Rate,
}

#[must_use = "a ledger transaction is discarded unless committed"]
pub struct LedgerTx<'a> {
    state: &'a mut LedgerState,
    loans: HashMap<LoanKey, Loan>,
    balances: HashMap<AccountId, UserBalance>,
}

impl<'a> LedgerTx<'a> {
    pub(crate) fn new(state: &'a mut LedgerState) -> Self {
        Self {
            state,
            loans: HashMap::new(),
            balances: HashMap::new(),
        }
    }

    pub fn loan(&self, lender: &AccountId, borrower: &AccountId) -> Loan {
        let key = LoanKey::new(lender.clone(), borrower.clone());
        match self.loans.get(&key) {
            Some(loan) => *loan,
            None => self.state.loan(lender, borrower),
        }
    }

    pub fn balance(&self, account: &AccountId) -> UserBalance {
        match self.balances.get(account) {
            Some(balance) => *balance,
            None => self.state.balance(account),
        }
    }

    /// Limits are never staged; they change only through `set_limits`
    pub fn limits(&self, account: &AccountId) -> UserLimits {
        self.state.limits(account)
    }

    fn loan_mut(&mut self, key: LoanKey) -> &mut Loan {
        let base = &self.state.loans;
        self.loans
            .entry(key)
            .or_insert_with_key(|key| base.get(key).copied().unwrap_or_default())
    }

    fn balance_mut(&mut self, account: &AccountId) -> &mut UserBalance {
        let base = &self.state.balances;
        self.balances
            .entry(account.clone())
            .or_insert_with_key(|account| base.get(account).copied().unwrap_or_default())
    }

    /// Settle interest on `(lender, borrower)` up to `now` and fold it into
    /// both parties' aggregates.
    pub fn accrue(
        &mut self,
        lender: &AccountId,
        borrower: &AccountId,
        now: Timestamp,
    ) -> Result<Accrual, LedgerError> {
        let key = LoanKey::new(lender.clone(), borrower.clone());
        let accrual = accrue_loan(self.loan_mut(key), now)?;

        let lender_balance = self.balance_mut(lender);
        lender_balance.credit_lender(accrual.interest, accrual.rate_delta)?;
        lender_balance.touch(now);

        let borrower_balance = self.balance_mut(borrower);
        borrower_balance.credit_borrower(accrual.interest, accrual.rate_delta)?;
        borrower_balance.touch(now);

        if !accrual.is_empty() {
            tracing::debug!(
                lender = %lender,
                borrower = %borrower,
                interest = %accrual.interest,
                elapsed = accrual.elapsed,
                "Interest accrued"
            );
        }

        Ok(accrual)
    }

    /// Merge `amount` at `rate` into the loan (weighted-average rate) and
    /// raise both parties' aggregates. Returns the loan after the merge.
    pub fn extend(
        &mut self,
        lender: &AccountId,
        borrower: &AccountId,
        amount: Amount,
        rate: Rate,
    ) -> Result<Loan, LedgerError> {
        let key = LoanKey::new(lender.clone(), borrower.clone());
        let loan = self.loan_mut(key);
        loan.rate = Rate::weighted_average(loan.amount, loan.rate, amount, rate)?;
        loan.amount = loan.amount.checked_add(amount)?;
        let merged = *loan;

        let delta = rate.per_unit_time(amount)?;
        self.balance_mut(lender).credit_lender(amount, delta)?;
        self.balance_mut(borrower).credit_borrower(amount, delta)?;

        Ok(merged)
    }

    /// Reduce the loan by `min(offered, amount)` and lower both parties'
    /// aggregates accordingly.
    pub fn reduce(
        &mut self,
        lender: &AccountId,
        borrower: &AccountId,
        offered: Amount,
    ) -> Result<Repayment, LedgerError> {
        let key = LoanKey::new(lender.clone(), borrower.clone());
        let loan = self.loan_mut(key);
        let repaid = offered.min(loan.amount);
        loan.amount = loan.amount.checked_sub(repaid)?;
        let rate = loan.rate;
        let remaining = loan.amount;

        let delta = rate.per_unit_time(repaid)?;

        let lender_balance = self.balance_mut(lender);
        lender_balance.lent = lender_balance.lent.checked_sub(repaid).map_err(|_| {
            LedgerError::AggregateUnderflow {
                account: lender.clone(),
                field: "lent",
            }
        })?;
        // Per-second totals carry rounding from weighted-average merges
        lender_balance.owed_per_second = lender_balance.owed_per_second.saturating_sub(delta);

        let borrower_balance = self.balance_mut(borrower);
        borrower_balance.borrowed =
            borrower_balance.borrowed.checked_sub(repaid).map_err(|_| {
                LedgerError::AggregateUnderflow {
                    account: borrower.clone(),
                    field: "borrowed",
                }
            })?;
        borrower_balance.owes_per_second = borrower_balance.owes_per_second.saturating_sub(delta);

        Ok(Repayment {
            repaid,
            remaining,
            rate,
        })
    }

    /// Apply every staged write to the base state
    pub fn commit(self) {
        let LedgerTx {
            state,
            loans,
            balances,
        } = self;
        state.loans.extend(loans);
        state.balances.extend(balances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn rate(d: rust_decimal::Decimal) -> Rate {
        Rate::from_decimal(d).unwrap()
    }

    #[test]
    fn test_dropped_tx_leaves_state_untouched() {
        let mut state = LedgerState::new();
        let before = state.clone();

        {
            let mut tx = state.begin();
            tx.extend(&id("B"), &id("A"), Amount::from_tokens(10), Rate::ONE)
                .unwrap();
            assert_eq!(tx.loan(&id("B"), &id("A")).amount, Amount::from_tokens(10));
        }

        assert_eq!(state, before);
    }

    #[test]
    fn test_commit_applies_writes() {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(10), rate(dec!(0.5)))
            .unwrap();
        tx.commit();

        let loan = state.loan(&id("B"), &id("A"));
        assert_eq!(loan.amount, Amount::from_tokens(10));
        assert_eq!(loan.rate, rate(dec!(0.5)));

        let lender = state.balance(&id("B"));
        assert_eq!(lender.lent, Amount::from_tokens(10));
        assert_eq!(lender.owed_per_second, Amount::from_tokens(5));

        let borrower = state.balance(&id("A"));
        assert_eq!(borrower.borrowed, Amount::from_tokens(10));
        assert_eq!(borrower.owes_per_second, Amount::from_tokens(5));
    }

    #[test]
    fn test_extend_merges_weighted_rate() {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(10), Rate::ONE)
            .unwrap();
        let merged = tx
            .extend(&id("B"), &id("A"), Amount::from_tokens(30), rate(dec!(2)))
            .unwrap();

        assert_eq!(merged.amount, Amount::from_tokens(40));
        assert_eq!(merged.rate, rate(dec!(1.75)));
    }

    #[test]
    fn test_split_borrow_matches_single_borrow() {
        let mut split = LedgerState::new();
        let mut tx = split.begin();
        for _ in 0..4 {
            tx.extend(&id("B"), &id("A"), Amount::from_tokens(5), rate(dec!(0.2)))
                .unwrap();
        }
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(20), rate(dec!(0.6)))
            .unwrap();
        tx.commit();

        let mut whole = LedgerState::new();
        let mut tx = whole.begin();
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(20), rate(dec!(0.2)))
            .unwrap();
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(20), rate(dec!(0.6)))
            .unwrap();
        tx.commit();

        assert_eq!(split.loan(&id("B"), &id("A")), whole.loan(&id("B"), &id("A")));
        assert_eq!(split.loan(&id("B"), &id("A")).rate, rate(dec!(0.4)));
    }

    #[test]
    fn test_accrue_updates_both_aggregates() {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(100), rate(dec!(0.1)))
            .unwrap();
        let accrual = tx.accrue(&id("B"), &id("A"), 10).unwrap();
        tx.commit();

        assert_eq!(accrual.interest, Amount::from_tokens(100));
        assert_eq!(state.loan(&id("B"), &id("A")).amount, Amount::from_tokens(200));

        let lender = state.balance(&id("B"));
        assert_eq!(lender.lent, Amount::from_tokens(200));
        // 10 from the origination + 10 from the accrual delta
        assert_eq!(lender.owed_per_second, Amount::from_tokens(20));
        assert_eq!(lender.timestamp, 10);
        assert_eq!(state.balance(&id("A")).borrowed, Amount::from_tokens(200));
    }

    #[test]
    fn test_accrue_on_empty_pair_touches_timestamps() {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        let accrual = tx.accrue(&id("B"), &id("A"), 42).unwrap();
        tx.commit();

        assert!(accrual.is_empty());
        assert_eq!(state.loan(&id("B"), &id("A")).timestamp, 42);
        assert_eq!(state.balance(&id("A")).timestamp, 42);
        assert_eq!(state.balance(&id("B")).timestamp, 42);
    }

    #[test]
    fn test_reduce_caps_at_outstanding() {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("B"), &id("A"), Amount::from_tokens(20), rate(dec!(0.5)))
            .unwrap();
        let repayment = tx.reduce(&id("B"), &id("A"), Amount::from_tokens(30)).unwrap();
        tx.commit();

        assert_eq!(repayment.repaid, Amount::from_tokens(20));
        assert!(repayment.remaining.is_zero());

        let loan = state.loan(&id("B"), &id("A"));
        assert!(loan.amount.is_zero());
        assert_eq!(loan.rate, rate(dec!(0.5)), "rate is retained after full repay");
        assert!(state.balance(&id("B")).lent.is_zero());
        assert!(state.balance(&id("B")).owed_per_second.is_zero());
        assert!(state.balance(&id("A")).owes_per_second.is_zero());
    }

    #[test]
    fn test_self_loan_updates_single_aggregate() {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("A"), &id("A"), Amount::from_tokens(3), Rate::ONE)
            .unwrap();
        tx.commit();

        let balance = state.balance(&id("A"));
        assert_eq!(balance.lent, Amount::from_tokens(3));
        assert_eq!(balance.borrowed, Amount::from_tokens(3));
    }
}
