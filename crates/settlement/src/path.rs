//! Borrow and repay path shapes
//!
//! The two shapes are deliberately distinct types:
//!
//! ```text
//! BorrowPath  [source, relay_1, ..., relay_n]      caller is implicit last receiver
//! RepayPath   [caller, lender_1, ..., source]      caller is explicit first element
//! ```

use relaycredit_core::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// Who invokes an operation and at what time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: AccountId,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: AccountId, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// Lenders of a borrow, from the original source to the last relayer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorrowPath(Vec<AccountId>);

impl BorrowPath {
    pub fn new(accounts: Vec<AccountId>) -> Self {
        Self(accounts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accounts(&self) -> &[AccountId] {
        &self.0
    }

    /// The account whose funds leave on success
    pub fn source(&self) -> Option<&AccountId> {
        self.0.first()
    }

    /// `(sender, receiver)` per hop. The last receiver is `caller`.
    pub fn hops<'a>(
        &'a self,
        caller: &'a AccountId,
    ) -> impl Iterator<Item = (&'a AccountId, &'a AccountId)> + 'a {
        self.0
            .iter()
            .zip(self.0.iter().skip(1).chain(std::iter::once(caller)))
    }
}

impl From<Vec<AccountId>> for BorrowPath {
    fn from(accounts: Vec<AccountId>) -> Self {
        Self(accounts)
    }
}

impl FromIterator<AccountId> for BorrowPath {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Debt chain of a repay, from the repaying borrower up to the source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepayPath(Vec<AccountId>);

impl RepayPath {
    pub fn new(accounts: Vec<AccountId>) -> Self {
        Self(accounts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accounts(&self) -> &[AccountId] {
        &self.0
    }

    /// Final lender of the chain
    pub fn root(&self) -> Option<&AccountId> {
        self.0.last()
    }

    /// `(borrower, lender)` per link
    pub fn links(&self) -> impl Iterator<Item = (&AccountId, &AccountId)> {
        self.0.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

impl From<Vec<AccountId>> for RepayPath {
    fn from(accounts: Vec<AccountId>) -> Self {
        Self(accounts)
    }
}

impl FromIterator<AccountId> for RepayPath {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
