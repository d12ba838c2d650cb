//! In-memory ledger state
//!
//! Owns the three keyed maps (loans, balances, limits). Reads of absent
//! keys return the zero record. Loan and balance mutations go through a
//! [`LedgerTx`], which stages writes and applies them on commit.

use relaycredit_core::{AccountId, Timestamp};
use std::collections::HashMap;

use crate::account::{Loan, LoanKey, UserBalance, UserLimits};
use crate::error::LedgerError;
use crate::interest::accrue_loan;
use crate::tx::LedgerTx;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerState {
    pub(crate) loans: HashMap<LoanKey, Loan>,
    pub(crate) balances: HashMap<AccountId, UserBalance>,
    pub(crate) limits: HashMap<AccountId, UserLimits>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loan for the ordered pair (zero loan if never opened)
    pub fn loan(&self, lender: &AccountId, borrower: &AccountId) -> Loan {
        self.loans
            .get(&LoanKey::new(lender.clone(), borrower.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// The loan as it would read after accruing to `now`, without mutating
    pub fn loan_at(
        &self,
        lender: &AccountId,
        borrower: &AccountId,
        now: Timestamp,
    ) -> Result<Loan, LedgerError> {
        let mut loan = self.loan(lender, borrower);
        accrue_loan(&mut loan, now)?;
        Ok(loan)
    }

    pub fn balance(&self, account: &AccountId) -> UserBalance {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn limits(&self, account: &AccountId) -> UserLimits {
        self.limits.get(account).copied().unwrap_or_default()
    }

    /// Replace an account's limits wholesale (last write wins)
    pub fn set_limits(&mut self, account: AccountId, limits: UserLimits) {
        self.limits.insert(account, limits);
    }

    /// Active loans where `account` is the lender, sorted by borrower
    pub fn credit_of(&self, account: &AccountId) -> Vec<(AccountId, Loan)> {
        let mut loans: Vec<_> = self
            .loans
            .iter()
            .filter(|(key, loan)| &key.lender == account && loan.is_active())
            .map(|(key, loan)| (key.borrower.clone(), *loan))
            .collect();
        loans.sort_by(|a, b| a.0.cmp(&b.0));
        loans
    }

    /// Active loans where `account` is the borrower, sorted by lender
    pub fn debt_of(&self, account: &AccountId) -> Vec<(AccountId, Loan)> {
        let mut loans: Vec<_> = self
            .loans
            .iter()
            .filter(|(key, loan)| &key.borrower == account && loan.is_active())
            .map(|(key, loan)| (key.lender.clone(), *loan))
            .collect();
        loans.sort_by(|a, b| a.0.cmp(&b.0));
        loans
    }

    /// All loans, including fully repaid ones
    pub fn all_loans(&self) -> &HashMap<LoanKey, Loan> {
        &self.loans
    }

    /// Every account that appears in any map, sorted
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<AccountId> = self
            .balances
            .keys()
            .chain(self.limits.keys())
            .cloned()
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// Start a staged transaction. Dropping it without `commit` discards
    /// every write.
    pub fn begin(&mut self) -> LedgerTx<'_> {
        LedgerTx::new(self)
    }
}
