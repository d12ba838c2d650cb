//! Core oracle types

use relaycredit_core::AccountId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A directed trust relation: `truster` accepts `trustee` as a borrower
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrustEdge {
    pub truster: AccountId,
    pub trustee: AccountId,
}

impl TrustEdge {
    pub fn new(truster: AccountId, trustee: AccountId) -> Self {
        Self { truster, trustee }
    }
}

impl std::fmt::Display for TrustEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} trusts {}", self.truster, self.trustee)
    }
}

/// Trust oracle interface
///
/// A pure read with no side effects. Implementations must answer
/// consistently for the duration of one borrow call.
pub trait TrustOracle: Send + Sync {
    /// Does `truster` trust `trustee`?
    fn is_trusted(&self, truster: &AccountId, trustee: &AccountId) -> bool;
}

impl<T: TrustOracle + ?Sized> TrustOracle for &T {
    fn is_trusted(&self, truster: &AccountId, trustee: &AccountId) -> bool {
        (**self).is_trusted(truster, trustee)
    }
}

impl<T: TrustOracle + ?Sized> TrustOracle for Arc<T> {
    fn is_trusted(&self, truster: &AccountId, trustee: &AccountId) -> bool {
        (**self).is_trusted(truster, trustee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_edge_display() {
        let edge = TrustEdge::new(AccountId::new("bob"), AccountId::new("alice"));
        assert_eq!(edge.to_string(), "BOB trusts ALICE");
    }

    #[test]
    fn test_trust_edge_serde() {
        let edge: TrustEdge =
            serde_json::from_str(r#"{ "truster": "bob", "trustee": "alice" }"#).unwrap();
        assert_eq!(edge.truster, AccountId::new("BOB"));
        assert_eq!(edge.trustee, AccountId::new("ALICE"));
    }
}
