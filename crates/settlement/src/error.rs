//! Settlement errors
//!
//! Every variant aborts the whole operation. Nothing is retried.

use relaycredit_core::{AccountId, Amount, MathError, Rate};
use relaycredit_ledger::LedgerError;
use relaycredit_transfer::TransferError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    // === Structural ===
    #[error("Path is empty")]
    EmptyPath,

    #[error("Path has {0} accounts but {1} rates were given")]
    PathRatesLengthMismatch(usize, usize),

    #[error("Path has {0} accounts, at most {1} allowed")]
    PathTooLong(usize, usize),

    // === Lender-side policy ===
    #[error("{0} would exceed its lending cap with {1} lent")]
    OverLendingCap(AccountId, Amount),

    #[error("{0} does not lend at rate {1}")]
    UnderLenderMinIR(AccountId, Rate),

    // === Relayer-side policy ===
    #[error("{0} would exceed its borrowing cap with {1} borrowed")]
    OverBorrowingCap(AccountId, Amount),

    #[error("{0} does not borrow at rate {1}")]
    OverBorrowerMaxIR(AccountId, Rate),

    #[error("{0} relay margin {1} is below its minimum")]
    UnderRelayerMargin(AccountId, Rate),

    // === Trust ===
    #[error("{0} does not trust {1}")]
    LenderDoesNotTrustBorrower(AccountId, AccountId),

    // === Settlement ===
    #[error("Transfer failed: {0}")]
    TransferFailed(#[source] TransferError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Arithmetic error: {0}")]
    Math(#[from] MathError),
}

impl SettlementError {
    /// Policy and trust rejections, as opposed to structural or
    /// arithmetic failures
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            SettlementError::OverLendingCap(..)
                | SettlementError::UnderLenderMinIR(..)
                | SettlementError::OverBorrowingCap(..)
                | SettlementError::OverBorrowerMaxIR(..)
                | SettlementError::UnderRelayerMargin(..)
                | SettlementError::LenderDoesNotTrustBorrower(..)
        )
    }

    /// Arithmetic overflow anywhere in the operation
    pub fn is_overflow(&self) -> bool {
        matches!(
            self,
            SettlementError::Math(MathError::Overflow)
                | SettlementError::Ledger(LedgerError::Math(MathError::Overflow))
        )
    }
}
