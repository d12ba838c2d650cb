//! Scenario configuration
//!
//! A scenario is a JSON file describing the starting world (token
//! balances, trust edges, limits) and an ordered list of timestamped
//! operations. Amounts and rates are human decimals (`"2.5"`), scaled to
//! 10^18 fixed point on load.
//!
//! ```json
//! {
//!   "balances": { "B": "100" },
//!   "trust": [{ "truster": "B", "trustee": "A" }],
//!   "limits": { "B": { "lending_cap": "100", "min_lend_ir": "1" } },
//!   "operations": [
//!     { "op": "borrow", "at": 0, "caller": "A", "amount": "10", "path": ["B"], "rates": ["2"] }
//!   ]
//! }
//! ```

use relaycredit_core::{AccountId, Amount, MathError, Rate, Timestamp};
use relaycredit_ledger::UserLimits;
use relaycredit_oracle::TrustEdge;
use relaycredit_settlement::EngineConfig;
use relaycredit_transfer::TransferError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {source}")]
    Value {
        field: String,
        #[source]
        source: MathError,
    },

    #[error("Cannot fund starting balances: {0}")]
    Funding(#[from] TransferError),
}

fn amount(field: &str, value: Decimal) -> Result<Amount, ConfigError> {
    Amount::from_decimal(value).map_err(|source| ConfigError::Value {
        field: field.to_string(),
        source,
    })
}

fn rate(field: &str, value: Decimal) -> Result<Rate, ConfigError> {
    Rate::from_decimal(value).map_err(|source| ConfigError::Value {
        field: field.to_string(),
        source,
    })
}

/// `UserLimits` in human decimals. Missing fields are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub lending_cap: Decimal,
    #[serde(default)]
    pub min_lend_ir: Decimal,
    #[serde(default)]
    pub borrow_cap: Decimal,
    #[serde(default)]
    pub max_borrow_ir: Decimal,
    #[serde(default)]
    pub min_ir_margin: Decimal,
}

impl LimitsConfig {
    pub fn to_limits(&self) -> Result<UserLimits, ConfigError> {
        Ok(UserLimits {
            lending_cap: amount("lending_cap", self.lending_cap)?,
            min_lend_ir: rate("min_lend_ir", self.min_lend_ir)?,
            borrow_cap: amount("borrow_cap", self.borrow_cap)?,
            max_borrow_ir: rate("max_borrow_ir", self.max_borrow_ir)?,
            min_ir_margin: rate("min_ir_margin", self.min_ir_margin)?,
        })
    }
}

/// One timestamped engine call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    SetLimits {
        at: Timestamp,
        account: AccountId,
        limits: LimitsConfig,
    },
    Borrow {
        at: Timestamp,
        caller: AccountId,
        amount: Decimal,
        /// Lenders from source to last relayer
        path: Vec<AccountId>,
        rates: Vec<Decimal>,
    },
    Repay {
        at: Timestamp,
        caller: AccountId,
        amount: Decimal,
        /// Caller first, final lender last
        path: Vec<AccountId>,
    },
    Accrue {
        at: Timestamp,
        caller: AccountId,
        lender: AccountId,
        borrower: AccountId,
    },
}

impl Operation {
    pub fn at(&self) -> Timestamp {
        match self {
            Operation::SetLimits { at, .. }
            | Operation::Borrow { at, .. }
            | Operation::Repay { at, .. }
            | Operation::Accrue { at, .. } => *at,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Operation::SetLimits { .. } => "set_limits",
            Operation::Borrow { .. } => "borrow",
            Operation::Repay { .. } => "repay",
            Operation::Accrue { .. } => "accrue",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    /// Starting token balances
    #[serde(default)]
    pub balances: BTreeMap<AccountId, Decimal>,

    #[serde(default)]
    pub trust: Vec<TrustEdge>,

    /// Limits in force before the first operation
    #[serde(default)]
    pub limits: BTreeMap<AccountId, LimitsConfig>,

    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl ScenarioConfig {
    /// Load a scenario from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Starting balances converted to token units
    pub fn token_balances(&self) -> Result<Vec<(AccountId, Amount)>, ConfigError> {
        self.balances
            .iter()
            .map(|(account, value)| Ok((account.clone(), amount("balances", *value)?)))
            .collect()
    }
}

/// Scale a list of decimal rates
pub fn rates(values: &[Decimal]) -> Result<Vec<Rate>, ConfigError> {
    values.iter().map(|v| rate("rates", *v)).collect()
}

/// Scale a decimal amount
pub fn to_amount(value: Decimal) -> Result<Amount, ConfigError> {
    amount("amount", value)
}
