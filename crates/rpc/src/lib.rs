//! RelayCredit RPC - Scenario runner and CLI orchestrator
//!
//! This crate provides the serialized engine service, scenario loading
//! and the `relaycredit` CLI binary.

pub mod clock;
pub mod commands;
pub mod config;
pub mod context;
pub mod service;

pub use clock::{Clock, ManualClock};
pub use config::{ConfigError, LimitsConfig, Operation, ScenarioConfig};
pub use context::{AppContext, OperationOutcome};
pub use service::{Engine, SharedEngine};
