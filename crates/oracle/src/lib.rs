//! RelayCredit Trust Oracle
//!
//! Answers "does A trust B" for the borrow path executor. Trust is
//! directional: a lender extends credit only to borrowers it trusts.
//! `TrustGraph` is an in-memory implementation for tests and scenarios.

mod graph;
mod types;

pub use graph::TrustGraph;
pub use types::{TrustEdge, TrustOracle};
