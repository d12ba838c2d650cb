//! Application context - wires everything together
//!
//! Builds the trust graph, token and engine from a `ScenarioConfig` and
//! replays its operations through the serialized service, moving a
//! manual clock to each operation's timestamp.

use relaycredit_core::Timestamp;
use relaycredit_oracle::TrustGraph;
use relaycredit_settlement::SettlementError;
use relaycredit_transfer::TokenLedger;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::ManualClock;
use crate::config::{self, ConfigError, Operation, ScenarioConfig};
use crate::service::{Engine, SharedEngine};

/// Result of one scenario operation. Engine rejections are recorded here
/// rather than stopping the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub index: usize,
    pub kind: &'static str,
    pub at: Timestamp,
    pub correlation_id: Uuid,
    pub error: Option<SettlementError>,
}

impl OperationOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Application context - wires together all components
pub struct AppContext {
    service: SharedEngine,
    clock: Arc<ManualClock>,
    trust: Arc<TrustGraph>,
    outcomes: Vec<OperationOutcome>,
}

impl AppContext {
    /// Build the starting world: balances, trust edges and limits at time 0
    pub async fn new(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        let trust = Arc::new(TrustGraph::with_edges(config.trust.iter().cloned()));

        let mut token = TokenLedger::new();
        for (account, amount) in config.token_balances()? {
            token.mint(&account, amount)?;
        }

        let clock = Arc::new(ManualClock::default());
        let engine = Engine::with_config(trust.clone(), token, config.engine.clone());
        let service = SharedEngine::new(engine, clock.clone());

        for (account, limits) in &config.limits {
            service.set_limits(account.clone(), limits.to_limits()?).await;
        }

        tracing::debug!(
            accounts = config.balances.len(),
            trust_edges = trust.edge_count(),
            "Scenario world built"
        );

        Ok(Self {
            service,
            clock,
            trust,
            outcomes: Vec::new(),
        })
    }

    /// Build the world and apply every operation in order
    pub async fn run(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        let mut ctx = Self::new(config).await?;
        for op in &config.operations {
            ctx.apply(op).await?;
        }
        Ok(ctx)
    }

    /// Apply one operation at its timestamp.
    ///
    /// Returns `Err` only for malformed operation values; engine errors
    /// are part of the outcome.
    pub async fn apply(&mut self, op: &Operation) -> Result<OperationOutcome, ConfigError> {
        self.clock.set(op.at());

        let (correlation_id, error) = match op {
            Operation::SetLimits {
                account, limits, ..
            } => {
                let limits = limits.to_limits()?;
                (self.service.set_limits(account.clone(), limits).await, None)
            }
            Operation::Borrow {
                caller,
                amount,
                path,
                rates,
                ..
            } => {
                let (id, result) = self
                    .service
                    .borrow(
                        caller.clone(),
                        config::to_amount(*amount)?,
                        path.iter().cloned().collect(),
                        config::rates(rates)?,
                    )
                    .await;
                (id, result.err())
            }
            Operation::Repay {
                caller,
                amount,
                path,
                ..
            } => {
                let (id, result) = self
                    .service
                    .repay(
                        caller.clone(),
                        config::to_amount(*amount)?,
                        path.iter().cloned().collect(),
                    )
                    .await;
                (id, result.err())
            }
            Operation::Accrue {
                caller,
                lender,
                borrower,
                ..
            } => {
                let (id, result) = self
                    .service
                    .accrue(caller.clone(), lender.clone(), borrower.clone())
                    .await;
                (id, result.err())
            }
        };

        let outcome = OperationOutcome {
            index: self.outcomes.len(),
            kind: op.kind(),
            at: op.at(),
            correlation_id,
            error,
        };
        self.outcomes.push(outcome.clone());
        Ok(outcome)
    }

    pub fn service(&self) -> &SharedEngine {
        &self.service
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn trust(&self) -> &TrustGraph {
        &self.trust
    }

    pub fn outcomes(&self) -> &[OperationOutcome] {
        &self.outcomes
    }

    /// Number of operations the engine rejected
    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    pub async fn digest(&self) -> String {
        self.service.digest().await
    }
}
