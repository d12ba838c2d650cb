//! In-memory fungible token
//!
//! Balances keyed by account, the way a single ERC-20 style token tracks
//! holders. The engine's own holdings live under `engine_account`.
//! Accounts can be marked as refusing execution to exercise failure paths.

use relaycredit_core::{AccountId, Amount, MathError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use strum_macros::Display;

use crate::error::TransferError;
use crate::instruction::TransferInstruction;
use crate::traits::{AccountExecutor, ValueTransfer};

/// How a transfer was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// `transfer_from` under the engine's spending authority
    Delegated,
    /// `transfer` out of the engine's holdings
    Direct,
    /// Instruction executed by the paying account
    Executed,
}

/// One completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub kind: TransferKind,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

#[derive(Debug, Clone)]
pub struct TokenLedger {
    engine_account: AccountId,
    balances: HashMap<AccountId, Amount>,
    refusing: HashSet<AccountId>,
    history: Vec<TransferRecord>,
}

impl TokenLedger {
    pub const DEFAULT_ENGINE_ACCOUNT: &'static str = "ENGINE";

    pub fn new() -> Self {
        Self::with_engine_account(AccountId::new(Self::DEFAULT_ENGINE_ACCOUNT))
    }

    pub fn with_engine_account(engine_account: AccountId) -> Self {
        Self {
            engine_account,
            balances: HashMap::new(),
            refusing: HashSet::new(),
            history: Vec::new(),
        }
    }

    pub fn engine_account(&self) -> &AccountId {
        &self.engine_account
    }

    /// Create `amount` out of thin air for `account`
    pub fn mint(&mut self, account: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let balance = self.balances.entry(account.clone()).or_default();
        *balance = balance.checked_add(amount)?;
        Ok(())
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Sum of every balance
    pub fn total_supply(&self) -> Result<Amount, MathError> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }

    /// All non-zero balances, sorted by account
    pub fn holders(&self) -> Vec<(AccountId, Amount)> {
        let mut holders: Vec<_> = self
            .balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(account, amount)| (account.clone(), *amount))
            .collect();
        holders.sort_by(|a, b| a.0.cmp(&b.0));
        holders
    }

    /// Make `account` refuse every executed instruction
    pub fn refuse_execution(&mut self, account: AccountId) {
        self.refusing.insert(account);
    }

    pub fn allow_execution(&mut self, account: &AccountId) {
        self.refusing.remove(account);
    }

    pub fn history(&self) -> &[TransferRecord] {
        &self.history
    }

    fn move_value(
        &mut self,
        kind: TransferKind,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.move_all(kind, from, &[(to.clone(), amount)])
    }

    /// Stage every leg against a scratch copy of the touched balances and
    /// write them back only once all legs fit.
    fn move_all(
        &mut self,
        kind: TransferKind,
        from: &AccountId,
        legs: &[(AccountId, Amount)],
    ) -> Result<(), TransferError> {
        let mut staged: HashMap<AccountId, Amount> = HashMap::new();
        for (to, amount) in legs {
            let available = staged
                .get(from)
                .copied()
                .unwrap_or_else(|| self.balance_of(from));
            let debited = available
                .checked_sub(*amount)
                .map_err(|_| TransferError::InsufficientBalance {
                    account: from.clone(),
                    available,
                    required: *amount,
                })?;
            staged.insert(from.clone(), debited);

            let current = staged.get(to).copied().unwrap_or_else(|| self.balance_of(to));
            staged.insert(to.clone(), current.checked_add(*amount)?);
        }

        self.balances.extend(staged);
        for (to, amount) in legs {
            tracing::debug!(kind = %kind, from = %from, to = %to, amount = %amount, "Token transfer");
            self.history.push(TransferRecord {
                kind,
                from: from.clone(),
                to: to.clone(),
                amount: *amount,
            });
        }
        Ok(())
    }
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTransfer for TokenLedger {
    fn transfer_from(
        &mut self,
        payer: &AccountId,
        payee: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.move_value(TransferKind::Delegated, payer, payee, amount)
    }

    fn transfer_batch(
        &mut self,
        payer: &AccountId,
        legs: &[(AccountId, Amount)],
    ) -> Result<(), TransferError> {
        self.move_all(TransferKind::Delegated, payer, legs)
    }

    fn transfer(&mut self, payee: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let engine = self.engine_account.clone();
        self.move_value(TransferKind::Direct, &engine, payee, amount)
    }
}

impl AccountExecutor for TokenLedger {
    fn execute(&mut self, account: &AccountId, instruction: &[u8]) -> Result<(), TransferError> {
        if self.refusing.contains(account) {
            return Err(TransferError::ExecutionRefused(account.clone()));
        }
        match TransferInstruction::decode(instruction)? {
            TransferInstruction::Transfer { to, amount } => {
                self.move_value(TransferKind::Executed, account, &to, amount)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn funded(account: &str, tokens: u64) -> TokenLedger {
        let mut token = TokenLedger::new();
        token.mint(&id(account), Amount::from_tokens(tokens)).unwrap();
        token
    }

    #[test]
    fn test_transfer_from_moves_balance() {
        let mut token = funded("A", 10);
        token
            .transfer_from(&id("A"), &id("B"), Amount::from_tokens(4))
            .unwrap();

        assert_eq!(token.balance_of(&id("A")), Amount::from_tokens(6));
        assert_eq!(token.balance_of(&id("B")), Amount::from_tokens(4));
        assert_eq!(token.history()[0].kind, TransferKind::Delegated);
    }

    #[test]
    fn test_insufficient_balance_changes_nothing() {
        let mut token = funded("A", 1);
        let result = token.transfer_from(&id("A"), &id("B"), Amount::from_tokens(2));

        assert!(matches!(
            result,
            Err(TransferError::InsufficientBalance { ref account, .. }) if account == &id("A")
        ));
        assert_eq!(token.balance_of(&id("A")), Amount::from_tokens(1));
        assert!(token.balance_of(&id("B")).is_zero());
        assert!(token.history().is_empty());
    }

    #[test]
    fn test_direct_transfer_spends_engine_holdings() {
        let mut token = funded(TokenLedger::DEFAULT_ENGINE_ACCOUNT, 5);
        token.transfer(&id("C"), Amount::from_tokens(5)).unwrap();

        assert!(token.balance_of(token.engine_account()).is_zero());
        assert_eq!(token.balance_of(&id("C")), Amount::from_tokens(5));
    }

    #[test]
    fn test_execute_decodes_instruction() {
        let mut token = funded("B", 8);
        let bytes = TransferInstruction::transfer(id("A"), Amount::from_tokens(8))
            .encode()
            .unwrap();

        token.execute(&id("B"), &bytes).unwrap();

        assert_eq!(token.balance_of(&id("A")), Amount::from_tokens(8));
        assert_eq!(token.history()[0].kind, TransferKind::Executed);
        assert_eq!(token.history()[0].kind.to_string(), "executed");
    }

    #[test]
    fn test_refusing_account() {
        let mut token = funded("B", 8);
        token.refuse_execution(id("B"));
        let bytes = TransferInstruction::transfer(id("A"), Amount::from_tokens(1))
            .encode()
            .unwrap();

        assert_eq!(
            token.execute(&id("B"), &bytes),
            Err(TransferError::ExecutionRefused(id("B")))
        );

        token.allow_execution(&id("B"));
        assert!(token.execute(&id("B"), &bytes).is_ok());
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut token = funded("A", 3);
        token
            .transfer_from(&id("A"), &id("A"), Amount::from_tokens(3))
            .unwrap();
        assert_eq!(token.balance_of(&id("A")), Amount::from_tokens(3));
    }

    #[test]
    fn test_batch_moves_every_leg() {
        let mut token = funded("X", 10);
        token
            .transfer_batch(
                &id("X"),
                &[(id("B"), Amount::from_tokens(4)), (id("C"), Amount::from_tokens(6))],
            )
            .unwrap();

        assert!(token.balance_of(&id("X")).is_zero());
        assert_eq!(token.balance_of(&id("B")), Amount::from_tokens(4));
        assert_eq!(token.balance_of(&id("C")), Amount::from_tokens(6));
        assert_eq!(token.history().len(), 2);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut token = funded("X", 10);
        let result = token.transfer_batch(
            &id("X"),
            &[(id("B"), Amount::from_tokens(6)), (id("C"), Amount::from_tokens(6))],
        );

        assert_eq!(
            result,
            Err(TransferError::InsufficientBalance {
                account: id("X"),
                available: Amount::from_tokens(4),
                required: Amount::from_tokens(6),
            })
        );
        assert_eq!(token.balance_of(&id("X")), Amount::from_tokens(10));
        assert!(token.balance_of(&id("B")).is_zero());
        assert!(token.history().is_empty());
    }

    #[test]
    fn test_total_supply_and_holders() {
        let mut token = funded("B", 2);
        token.mint(&id("A"), Amount::from_tokens(3)).unwrap();

        assert_eq!(token.total_supply().unwrap(), Amount::from_tokens(5));
        assert_eq!(token.holders()[0].0, id("A"));
    }
}
