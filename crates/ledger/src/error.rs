//! Ledger errors

use relaycredit_core::{AccountId, MathError};
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Arithmetic error: {0}")]
    Math(#[from] MathError),

    #[error("Aggregate for {account} out of sync: {field} would go negative")]
    AggregateUnderflow {
        account: AccountId,
        field: &'static str,
    },
}
