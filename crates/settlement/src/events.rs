//! Ledger events
//!
//! Appended by the engine only when an operation commits, so the log
//! never mentions writes that were rolled back.

use relaycredit_core::{AccountId, Amount, Rate, Timestamp};
use relaycredit_ledger::UserLimits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// An account replaced its limits
    LimitsUpdated {
        account: AccountId,
        limits: UserLimits,
        timestamp: Timestamp,
    },

    /// Interest was capitalized into a loan
    InterestAccrued {
        lender: AccountId,
        borrower: AccountId,
        interest: Amount,
        timestamp: Timestamp,
    },

    /// New principal was merged into a loan
    LoanExtended {
        lender: AccountId,
        borrower: AccountId,
        amount: Amount,
        rate: Rate,
        /// Loan amount after the merge
        outstanding: Amount,
        /// Loan rate after the merge
        merged_rate: Rate,
        timestamp: Timestamp,
    },

    /// A loan was reduced by a repay
    LoanRepaid {
        lender: AccountId,
        borrower: AccountId,
        amount: Amount,
        outstanding: Amount,
        timestamp: Timestamp,
    },

    /// Cash moved from a repaying caller
    CashSettled {
        payer: AccountId,
        payee: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    },
}

impl LedgerEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            LedgerEvent::LimitsUpdated { timestamp, .. }
            | LedgerEvent::InterestAccrued { timestamp, .. }
            | LedgerEvent::LoanExtended { timestamp, .. }
            | LedgerEvent::LoanRepaid { timestamp, .. }
            | LedgerEvent::CashSettled { timestamp, .. } => *timestamp,
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::LimitsUpdated { .. } => "limits_updated",
            LedgerEvent::InterestAccrued { .. } => "interest_accrued",
            LedgerEvent::LoanExtended { .. } => "loan_extended",
            LedgerEvent::LoanRepaid { .. } => "loan_repaid",
            LedgerEvent::CashSettled { .. } => "cash_settled",
        }
    }
}
