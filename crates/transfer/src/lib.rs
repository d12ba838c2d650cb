//! RelayCredit Transfer - Value movement collaborators
//!
//! The settlement engine never moves tokens itself. It consumes two
//! narrow interfaces:
//! - `ValueTransfer`: debit/credit of a fungible balance
//! - `AccountExecutor`: ask an account (a contract wallet) to execute an
//!   encoded `TransferInstruction` as if it initiated it
//!
//! `TokenLedger` implements both in memory.

pub mod error;
pub mod instruction;
pub mod token;
pub mod traits;

pub use error::TransferError;
pub use instruction::TransferInstruction;
pub use token::{TokenLedger, TransferKind, TransferRecord};
pub use traits::{AccountExecutor, ValueTransfer};
