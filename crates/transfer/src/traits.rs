//! Collaborator interfaces consumed by the settlement engine

use relaycredit_core::{AccountId, Amount};

use crate::error::TransferError;

/// Fungible value transfer.
///
/// A failed call must leave every balance unchanged.
pub trait ValueTransfer {
    /// Move `amount` from `payer` to `payee` under the engine's spending
    /// authority.
    fn transfer_from(
        &mut self,
        payer: &AccountId,
        payee: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Move every `(payee, amount)` leg from `payer`, or none of them.
    fn transfer_batch(
        &mut self,
        payer: &AccountId,
        legs: &[(AccountId, Amount)],
    ) -> Result<(), TransferError>;

    /// Move `amount` out of the engine's own holdings to `payee`.
    fn transfer(&mut self, payee: &AccountId, amount: Amount) -> Result<(), TransferError>;
}

/// Account execution: `account` runs an encoded instruction as if it had
/// initiated it itself.
pub trait AccountExecutor {
    fn execute(&mut self, account: &AccountId, instruction: &[u8]) -> Result<(), TransferError>;
}
