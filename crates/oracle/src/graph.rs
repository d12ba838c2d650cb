//! In-memory trust graph
//!
//! Stores directed trust edges that can be updated programmatically.
//! Useful for unit tests, integration tests and scenario runs.

use relaycredit_core::AccountId;
use std::collections::HashSet;
use std::sync::RwLock;

use crate::types::{TrustEdge, TrustOracle};

/// In-memory trust oracle
#[derive(Debug, Default)]
pub struct TrustGraph {
    /// Directed edges (truster, trustee)
    edges: RwLock<HashSet<TrustEdge>>,
}

impl TrustGraph {
    /// Create an empty graph (nobody trusts anybody)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from a list of edges
    pub fn with_edges(edges: impl IntoIterator<Item = TrustEdge>) -> Self {
        Self {
            edges: RwLock::new(edges.into_iter().collect()),
        }
    }

    /// `truster` starts trusting `trustee`
    pub fn trust(&self, truster: AccountId, trustee: AccountId) {
        let mut edges = self.edges.write().unwrap_or_else(|e| e.into_inner());
        edges.insert(TrustEdge::new(truster, trustee));
    }

    /// `truster` stops trusting `trustee`
    pub fn revoke(&self, truster: &AccountId, trustee: &AccountId) {
        let mut edges = self.edges.write().unwrap_or_else(|e| e.into_inner());
        edges.remove(&TrustEdge::new(truster.clone(), trustee.clone()));
    }

    /// Every account `truster` trusts, sorted
    pub fn trusted_by(&self, truster: &AccountId) -> Vec<AccountId> {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        let mut trustees: Vec<_> = edges
            .iter()
            .filter(|e| &e.truster == truster)
            .map(|e| e.trustee.clone())
            .collect();
        trustees.sort();
        trustees
    }

    /// Get number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl TrustOracle for TrustGraph {
    fn is_trusted(&self, truster: &AccountId, trustee: &AccountId) -> bool {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        edges.contains(&TrustEdge::new(truster.clone(), trustee.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    #[test]
    fn test_empty_graph_trusts_nobody() {
        let graph = TrustGraph::new();
        assert!(!graph.is_trusted(&id("A"), &id("B")));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_trust_is_directional() {
        let graph = TrustGraph::new();
        graph.trust(id("B"), id("A"));

        assert!(graph.is_trusted(&id("B"), &id("A")));
        assert!(!graph.is_trusted(&id("A"), &id("B")));
    }

    #[test]
    fn test_revoke() {
        let graph = TrustGraph::with_edges([TrustEdge::new(id("B"), id("A"))]);
        graph.revoke(&id("B"), &id("A"));
        assert!(!graph.is_trusted(&id("B"), &id("A")));
    }

    #[test]
    fn test_trusted_by_sorted() {
        let graph = TrustGraph::new();
        graph.trust(id("S"), id("Z"));
        graph.trust(id("S"), id("M"));
        graph.trust(id("X"), id("A"));

        assert_eq!(graph.trusted_by(&id("S")), vec![id("M"), id("Z")]);
    }

    #[test]
    fn test_oracle_through_reference() {
        fn check(oracle: impl TrustOracle) -> bool {
            oracle.is_trusted(&AccountId::new("B"), &AccountId::new("A"))
        }
        let graph = TrustGraph::new();
        graph.trust(id("B"), id("A"));
        assert!(check(&graph));
    }
}
