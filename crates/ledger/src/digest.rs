//! Deterministic state digest
//!
//! The ledger is a pure function of its inputs, so two replays of the
//! same operations must produce byte-identical state. The digest is a
//! SHA-256 over a canonical, key-sorted rendering of every record.

use sha2::{Digest, Sha256};

use crate::state::LedgerState;

/// Calculate the SHA-256 (hex) of the full ledger state
pub fn state_digest(state: &LedgerState) -> String {
    let mut hasher = Sha256::new();

    // Loans sorted by (lender, borrower)
    let mut loans: Vec<_> = state.loans.iter().collect();
    loans.sort_by(|a, b| a.0.cmp(b.0));
    for (key, loan) in loans {
        hasher.update(b"L");
        hasher.update(key.lender.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(key.borrower.as_str().as_bytes());
        hasher.update(loan.amount.value().to_be_bytes::<32>());
        hasher.update(loan.rate.value().to_be_bytes::<32>());
        hasher.update(loan.timestamp.to_be_bytes());
    }

    let mut balances: Vec<_> = state.balances.iter().collect();
    balances.sort_by(|a, b| a.0.cmp(b.0));
    for (account, balance) in balances {
        hasher.update(b"B");
        hasher.update(account.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(balance.lent.value().to_be_bytes::<32>());
        hasher.update(balance.borrowed.value().to_be_bytes::<32>());
        hasher.update(balance.owed_per_second.value().to_be_bytes::<32>());
        hasher.update(balance.owes_per_second.value().to_be_bytes::<32>());
        hasher.update(balance.timestamp.to_be_bytes());
    }

    let mut limits: Vec<_> = state.limits.iter().collect();
    limits.sort_by(|a, b| a.0.cmp(b.0));
    for (account, limits) in limits {
        hasher.update(b"P");
        hasher.update(account.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(limits.lending_cap.value().to_be_bytes::<32>());
        hasher.update(limits.min_lend_ir.value().to_be_bytes::<32>());
        hasher.update(limits.borrow_cap.value().to_be_bytes::<32>());
        hasher.update(limits.max_borrow_ir.value().to_be_bytes::<32>());
        hasher.update(limits.min_ir_margin.value().to_be_bytes::<32>());
    }

    hex::encode(hasher.finalize())
}

impl LedgerState {
    /// SHA-256 (hex) of the canonical state rendering
    pub fn digest(&self) -> String {
        state_digest(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::UserLimits;
    use relaycredit_core::{AccountId, Amount, Rate};

    fn build(order_swapped: bool) -> LedgerState {
        let mut state = LedgerState::new();
        let (first, second) = if order_swapped { ("C", "B") } else { ("B", "C") };

        let mut tx = state.begin();
        tx.extend(&AccountId::new(first), &AccountId::new("A"), Amount::from_tokens(1), Rate::ONE)
            .unwrap();
        tx.extend(&AccountId::new(second), &AccountId::new("A"), Amount::from_tokens(1), Rate::ONE)
            .unwrap();
        tx.commit();
        state
    }

    #[test]
    fn test_digest_independent_of_insertion_order() {
        assert_eq!(build(false).digest(), build(true).digest());
    }

    #[test]
    fn test_digest_changes_with_limits() {
        let mut state = build(false);
        let before = state.digest();
        state.set_limits(
            AccountId::new("A"),
            UserLimits {
                lending_cap: Amount::from_tokens(1),
                ..Default::default()
            },
        );
        assert_ne!(before, state.digest());
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = LedgerState::new().digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
