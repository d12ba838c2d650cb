//! RelayCredit Settlement - Borrow and repay path executors
//!
//! The `CreditEngine` is the only writer of the ledger. Each borrow or
//! repay runs as a single staged transaction:
//!
//! 1. walk the path hop by hop (accrue, mutate, check policy and trust)
//! 2. issue the external transfer(s)
//! 3. commit the staged ledger writes
//!
//! Any failure before step 3 drops the transaction, so no partial effect
//! is ever observable.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod path;
pub mod receipt;

mod borrow;
mod repay;

pub use config::EngineConfig;
pub use engine::CreditEngine;
pub use error::SettlementError;
pub use events::LedgerEvent;
pub use path::{BorrowPath, CallContext, RepayPath};
pub use receipt::{BorrowReceipt, CashSettlement, HopOutcome, RepayHop, RepayReceipt, SettlementKind};
