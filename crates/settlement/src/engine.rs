//! Credit engine implementation

use relaycredit_core::{AccountId, Amount, Rate, Timestamp};
use relaycredit_ledger::{Accrual, LedgerState, Loan, UserBalance, UserLimits};
use relaycredit_oracle::TrustOracle;
use relaycredit_transfer::{AccountExecutor, TransferInstruction, ValueTransfer};

use crate::borrow::walk_borrow;
use crate::config::EngineConfig;
use crate::error::SettlementError;
use crate::events::LedgerEvent;
use crate::path::{BorrowPath, CallContext, RepayPath};
use crate::receipt::{BorrowReceipt, RepayReceipt};
use crate::repay::walk_repay;

/// Credit Engine - Sole writer of the ledger
///
/// Owns the ledger state and drives the external collaborators. Every
/// public mutation is all-or-nothing: ledger writes are staged, the
/// external transfer runs last, and the staged writes are committed only
/// if it succeeded.
pub struct CreditEngine<O, S> {
    state: LedgerState,
    oracle: O,
    settlement: S,
    config: EngineConfig,
    events: Vec<LedgerEvent>,
}

impl<O, S> CreditEngine<O, S>
where
    O: TrustOracle,
    S: ValueTransfer + AccountExecutor,
{
    /// Create an engine with an empty ledger
    pub fn new(oracle: O, settlement: S) -> Self {
        Self::with_config(oracle, settlement, EngineConfig::default())
    }

    pub fn with_config(oracle: O, settlement: S, config: EngineConfig) -> Self {
        Self {
            state: LedgerState::new(),
            oracle,
            settlement,
            config,
            events: Vec::new(),
        }
    }

    /// Get reference to ledger state
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn settlement(&self) -> &S {
        &self.settlement
    }

    pub fn settlement_mut(&mut self) -> &mut S {
        &mut self.settlement
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Read accessors ===

    pub fn limits(&self, account: &AccountId) -> UserLimits {
        self.state.limits(account)
    }

    pub fn balance(&self, account: &AccountId) -> UserBalance {
        self.state.balance(account)
    }

    pub fn loan(&self, lender: &AccountId, borrower: &AccountId) -> Loan {
        self.state.loan(lender, borrower)
    }

    /// Loan as it would read after accruing to `now`
    pub fn loan_at(
        &self,
        lender: &AccountId,
        borrower: &AccountId,
        now: Timestamp,
    ) -> Result<Loan, SettlementError> {
        Ok(self.state.loan_at(lender, borrower, now)?)
    }

    pub fn debt_of(&self, account: &AccountId) -> Vec<(AccountId, Loan)> {
        self.state.debt_of(account)
    }

    pub fn credit_of(&self, account: &AccountId) -> Vec<(AccountId, Loan)> {
        self.state.credit_of(account)
    }

    /// SHA-256 digest of the whole ledger
    pub fn digest(&self) -> String {
        self.state.digest()
    }

    /// Events committed so far
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every committed event, leaving the log empty
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // === Mutations ===

    /// Replace the caller's limits wholesale. No cross-field validation.
    pub fn set_limits(&mut self, ctx: &CallContext, limits: UserLimits) {
        self.state.set_limits(ctx.caller.clone(), limits);
        tracing::info!(account = %ctx.caller, "Limits updated");
        self.events.push(LedgerEvent::LimitsUpdated {
            account: ctx.caller.clone(),
            limits,
            timestamp: ctx.now,
        });
    }

    /// Settle interest on one loan up to `ctx.now` without touching
    /// principal otherwise
    pub fn accrue(
        &mut self,
        ctx: &CallContext,
        lender: &AccountId,
        borrower: &AccountId,
    ) -> Result<Accrual, SettlementError> {
        let mut tx = self.state.begin();
        let accrual = tx.accrue(lender, borrower, ctx.now)?;
        tx.commit();

        if !accrual.is_empty() {
            self.events.push(LedgerEvent::InterestAccrued {
                lender: lender.clone(),
                borrower: borrower.clone(),
                interest: accrual.interest,
                timestamp: ctx.now,
            });
        }
        Ok(accrual)
    }

    /// Originate `amount` along `path` to the caller.
    ///
    /// `rates[i]` is the rate of hop `i`. On success `path[0]` is asked to
    /// push `amount` to the caller.
    pub fn borrow(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        path: &BorrowPath,
        rates: &[Rate],
    ) -> Result<BorrowReceipt, SettlementError> {
        let result = self.execute_borrow(ctx, amount, path, rates);
        match &result {
            Ok(receipt) => tracing::info!(
                caller = %ctx.caller,
                source = %receipt.source,
                amount = %amount,
                hops = receipt.hops.len(),
                "Borrow committed"
            ),
            Err(e) => tracing::warn!(
                caller = %ctx.caller,
                amount = %amount,
                path_len = path.len(),
                error = %e,
                "Borrow aborted"
            ),
        }
        result
    }

    /// Repay up to `amount` along `path`, netting debt along the chain
    /// and paying cash only for what cannot be netted.
    pub fn repay(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        path: &RepayPath,
    ) -> Result<RepayReceipt, SettlementError> {
        let result = self.execute_repay(ctx, amount, path);
        match &result {
            Ok(receipt) => tracing::info!(
                caller = %ctx.caller,
                offered = %amount,
                links = receipt.hops.len(),
                legs = receipt.settlements.len(),
                "Repay committed"
            ),
            Err(e) => tracing::warn!(
                caller = %ctx.caller,
                offered = %amount,
                path_len = path.len(),
                error = %e,
                "Repay aborted"
            ),
        }
        result
    }

    fn check_path_len(&self, len: usize) -> Result<(), SettlementError> {
        if len == 0 {
            return Err(SettlementError::EmptyPath);
        }
        if len > self.config.max_path_len {
            return Err(SettlementError::PathTooLong(len, self.config.max_path_len));
        }
        Ok(())
    }

    fn execute_borrow(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        path: &BorrowPath,
        rates: &[Rate],
    ) -> Result<BorrowReceipt, SettlementError> {
        let source = path.source().ok_or(SettlementError::EmptyPath)?.clone();
        if path.len() != rates.len() {
            return Err(SettlementError::PathRatesLengthMismatch(path.len(), rates.len()));
        }
        self.check_path_len(path.len())?;

        let mut events = Vec::new();
        let mut tx = self.state.begin();
        let hops = walk_borrow(&mut tx, &self.oracle, ctx, amount, path, rates, &mut events)?;

        // Bookkeeping is complete; the external transfer goes last
        let instruction = TransferInstruction::transfer(ctx.caller.clone(), amount)
            .encode()
            .map_err(SettlementError::TransferFailed)?;
        self.settlement
            .execute(&source, &instruction)
            .map_err(SettlementError::TransferFailed)?;

        tx.commit();
        self.events.append(&mut events);

        Ok(BorrowReceipt {
            caller: ctx.caller.clone(),
            amount,
            source,
            hops,
            timestamp: ctx.now,
        })
    }

    fn execute_repay(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        path: &RepayPath,
    ) -> Result<RepayReceipt, SettlementError> {
        self.check_path_len(path.len())?;

        let mut events = Vec::new();
        let mut tx = self.state.begin();
        let plan = walk_repay(&mut tx, ctx, amount, path, &mut events)?;

        // Every cash leg is paid or none is
        let legs: Vec<_> = plan
            .settlements
            .iter()
            .map(|leg| (leg.payee.clone(), leg.amount))
            .collect();
        self.settlement
            .transfer_batch(&ctx.caller, &legs)
            .map_err(SettlementError::TransferFailed)?;

        tx.commit();
        self.events.append(&mut events);
        self.events
            .extend(plan.settlements.iter().map(|leg| LedgerEvent::CashSettled {
                payer: ctx.caller.clone(),
                payee: leg.payee.clone(),
                amount: leg.amount,
                timestamp: ctx.now,
            }));

        Ok(RepayReceipt {
            caller: ctx.caller.clone(),
            offered: amount,
            hops: plan.hops,
            settlements: plan.settlements,
            timestamp: ctx.now,
        })
    }
}
