//! RelayCredit Core - Domain types
//!
//! This crate contains the fundamental types used across RelayCredit:
//! - `AccountId`: Normalized participant identifier
//! - `Amount`: Non-negative 256-bit token amount
//! - `Rate`: Fixed-point interest rate scaled by 10^18
//! - `Timestamp`: Monotonic time supplied by the environment

pub mod account;
pub mod amount;
pub mod math;
pub mod rate;

pub use account::{AccountId, AccountIdError};
pub use amount::Amount;
pub use math::{MathError, SCALE};
pub use rate::Rate;

pub use alloy_primitives::U256;

/// Environment-supplied time in whole units (seconds in production).
///
/// Assumed monotonic non-decreasing across calls.
pub type Timestamp = u64;
