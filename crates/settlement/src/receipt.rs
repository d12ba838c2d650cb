//! Operation receipts returned on success

use relaycredit_core::{AccountId, Amount, MathError, Rate, Timestamp};
use relaycredit_ledger::Loan;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// One originated hop of a borrow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopOutcome {
    pub lender: AccountId,
    pub borrower: AccountId,
    pub rate: Rate,
    /// Interest capitalized before the merge
    pub accrued: Amount,
    /// Loan after the merge
    pub loan: Loan,
    /// Borrower acted as a relayer (not the caller)
    pub relayed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowReceipt {
    pub caller: AccountId,
    pub amount: Amount,
    /// Account the funds were pulled from
    pub source: AccountId,
    pub hops: Vec<HopOutcome>,
    pub timestamp: Timestamp,
}

/// One reduced link of a repay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayHop {
    pub borrower: AccountId,
    pub lender: AccountId,
    /// Amount carried into this link
    pub offered: Amount,
    pub repaid: Amount,
    pub remaining: Amount,
    pub accrued: Amount,
}

/// Why a cash leg exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    /// Shortfall returned to a relayer whose own debt absorbed less
    Refund,
    /// Whatever reached the end of the chain, paid to the final lender
    Root,
}

/// A cash leg paid by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSettlement {
    pub payee: AccountId,
    pub amount: Amount,
    pub kind: SettlementKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayReceipt {
    pub caller: AccountId,
    pub offered: Amount,
    pub hops: Vec<RepayHop>,
    pub settlements: Vec<CashSettlement>,
    pub timestamp: Timestamp,
}

impl BorrowReceipt {
    pub fn relayers(&self) -> impl Iterator<Item = &AccountId> {
        self.hops.iter().filter(|h| h.relayed).map(|h| &h.borrower)
    }
}

impl RepayReceipt {
    /// Total cash that left the caller
    pub fn cash_paid(&self) -> Result<Amount, MathError> {
        self.settlements
            .iter()
            .try_fold(Amount::ZERO, |acc, s| acc.checked_add(s.amount))
    }

    /// Total debt removed across every link
    pub fn debt_reduced(&self) -> Result<Amount, MathError> {
        self.hops
            .iter()
            .try_fold(Amount::ZERO, |acc, h| acc.checked_add(h.repaid))
    }

    /// Cash received by `payee`
    pub fn cash_to(&self, payee: &AccountId) -> Result<Amount, MathError> {
        self.settlements
            .iter()
            .filter(|s| &s.payee == payee)
            .try_fold(Amount::ZERO, |acc, s| acc.checked_add(s.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_totals() {
        let receipt = RepayReceipt {
            caller: AccountId::new("X"),
            offered: Amount::from_tokens(30),
            hops: vec![],
            settlements: vec![
                CashSettlement {
                    payee: AccountId::new("B"),
                    amount: Amount::from_tokens(15),
                    kind: SettlementKind::Refund,
                },
                CashSettlement {
                    payee: AccountId::new("C"),
                    amount: Amount::from_tokens(5),
                    kind: SettlementKind::Root,
                },
            ],
            timestamp: 0,
        };

        assert_eq!(receipt.cash_paid().unwrap(), Amount::from_tokens(20));
        assert_eq!(receipt.cash_to(&AccountId::new("B")).unwrap(), Amount::from_tokens(15));
        assert!(receipt.cash_to(&AccountId::new("X")).unwrap().is_zero());
        assert_eq!(SettlementKind::Refund.to_string(), "refund");
    }
}
