//! Serialized engine service
//!
//! The engine is a strictly serial state machine. `SharedEngine` puts it
//! behind one async mutex so concurrent callers queue up and each borrow
//! or repay runs to completion (or rollback) before the next starts.

use relaycredit_core::{AccountId, Amount, Rate};
use relaycredit_ledger::{Accrual, UserLimits};
use relaycredit_oracle::TrustGraph;
use relaycredit_settlement::{
    BorrowPath, BorrowReceipt, CallContext, CreditEngine, RepayPath, RepayReceipt,
    SettlementError,
};
use relaycredit_transfer::TokenLedger;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::clock::Clock;

/// Engine wired to the in-memory trust graph and token
pub type Engine = CreditEngine<Arc<TrustGraph>, TokenLedger>;

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
    clock: Arc<dyn Clock>,
}

impl SharedEngine {
    pub fn new(engine: Engine, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
            clock,
        }
    }

    /// Exclusive access for reads or test setup
    pub async fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock().await
    }

    pub async fn set_limits(&self, caller: AccountId, limits: UserLimits) -> Uuid {
        let correlation_id = Uuid::new_v4();
        let mut engine = self.inner.lock().await;
        let _span = tracing::info_span!("set_limits", correlation_id = %correlation_id).entered();

        engine.set_limits(&CallContext::new(caller, self.clock.now()), limits);
        correlation_id
    }

    pub async fn borrow(
        &self,
        caller: AccountId,
        amount: Amount,
        path: BorrowPath,
        rates: Vec<Rate>,
    ) -> (Uuid, Result<BorrowReceipt, SettlementError>) {
        let correlation_id = Uuid::new_v4();
        let mut engine = self.inner.lock().await;
        let _span = tracing::info_span!("borrow", correlation_id = %correlation_id).entered();

        let ctx = CallContext::new(caller, self.clock.now());
        (correlation_id, engine.borrow(&ctx, amount, &path, &rates))
    }

    pub async fn repay(
        &self,
        caller: AccountId,
        amount: Amount,
        path: RepayPath,
    ) -> (Uuid, Result<RepayReceipt, SettlementError>) {
        let correlation_id = Uuid::new_v4();
        let mut engine = self.inner.lock().await;
        let _span = tracing::info_span!("repay", correlation_id = %correlation_id).entered();

        let ctx = CallContext::new(caller, self.clock.now());
        (correlation_id, engine.repay(&ctx, amount, &path))
    }

    pub async fn accrue(
        &self,
        caller: AccountId,
        lender: AccountId,
        borrower: AccountId,
    ) -> (Uuid, Result<Accrual, SettlementError>) {
        let correlation_id = Uuid::new_v4();
        let mut engine = self.inner.lock().await;
        let _span = tracing::info_span!("accrue", correlation_id = %correlation_id).entered();

        let ctx = CallContext::new(caller, self.clock.now());
        (correlation_id, engine.accrue(&ctx, &lender, &borrower))
    }

    pub async fn digest(&self) -> String {
        self.inner.lock().await.digest()
    }
}
