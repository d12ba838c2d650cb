//! RelayCredit Ledger - Pairwise loans and account aggregates
//!
//! This is the HEART of RelayCredit. Every change to a loan goes through
//! this crate.
//!
//! # Key Types
//! - `Loan`: Outstanding amount and rate of one `(lender, borrower)` pair
//! - `UserBalance`: Per-account running totals kept in step with loans
//! - `UserLimits`: Per-account lending/relaying policy
//! - `LedgerState`: The owned store of all three
//! - `LedgerTx`: Staged writes, committed or discarded as a unit

pub mod account;
pub mod digest;
pub mod error;
pub mod interest;
pub mod state;
pub mod tx;

pub use account::{Loan, LoanKey, UserBalance, UserLimits};
pub use error::LedgerError;
pub use interest::{accrue_loan, Accrual};
pub use state::LedgerState;
pub use tx::{LedgerTx, Repayment};
