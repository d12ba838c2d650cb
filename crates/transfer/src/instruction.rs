//! Encoded transfer instruction
//!
//! The payload handed to `AccountExecutor::execute`. Encoded as JSON so
//! the executing account can decode it without sharing Rust types.

use relaycredit_core::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::error::TransferError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransferInstruction {
    /// Push `amount` from the executing account to `to`
    Transfer { to: AccountId, amount: Amount },
}

impl TransferInstruction {
    pub fn transfer(to: AccountId, amount: Amount) -> Self {
        Self::Transfer { to, amount }
    }

    pub fn encode(&self) -> Result<Vec<u8>, TransferError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TransferError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_shape() {
        let instruction = TransferInstruction::transfer(AccountId::new("alice"), Amount::from_raw(7));
        let bytes = instruction.encode().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"op":"transfer","to":"ALICE","amount":"7"}"#
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = TransferInstruction::decode(b"not json");
        assert!(matches!(result, Err(TransferError::InvalidInstruction(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_op() {
        let result = TransferInstruction::decode(br#"{"op":"mint","to":"A","amount":"1"}"#);
        assert!(matches!(result, Err(TransferError::InvalidInstruction(_))));
    }
}
