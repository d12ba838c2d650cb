//! Transfer errors

use relaycredit_core::{AccountId, Amount, MathError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: AccountId,
        available: Amount,
        required: Amount,
    },

    #[error("Account {0} refused to execute the instruction")]
    ExecutionRefused(AccountId),

    #[error("Invalid transfer instruction: {0}")]
    InvalidInstruction(String),

    #[error("Arithmetic error: {0}")]
    Math(#[from] MathError),
}

impl From<serde_json::Error> for TransferError {
    fn from(e: serde_json::Error) -> Self {
        TransferError::InvalidInstruction(e.to_string())
    }
}
