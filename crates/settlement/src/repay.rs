//! Repay path walk
//!
//! Each link absorbs at most what it is owed; only the absorbed part
//! travels further up the chain. Cash moves only for what the chain could
//! not net away:
//!
//! ```text
//! offered 30    X --20--> A --60--> B --5--> C
//! link X->A     repaid 20, carry 20
//! link A->B     repaid 20, carry 20
//! link B->C     repaid  5, refund 15 to B, carry 5
//! root          pay 5 to C
//! ```
//!
//! The excess over the first link is never charged.

use relaycredit_core::{AccountId, Amount};
use relaycredit_ledger::LedgerTx;

use crate::error::SettlementError;
use crate::events::LedgerEvent;
use crate::path::{CallContext, RepayPath};
use crate::receipt::{CashSettlement, RepayHop, SettlementKind};

pub(crate) struct RepayPlan {
    pub hops: Vec<RepayHop>,
    pub settlements: Vec<CashSettlement>,
}

/// Reduce every link of `path` inside `tx` and work out the cash legs.
/// No cash moves here.
pub(crate) fn walk_repay(
    tx: &mut LedgerTx<'_>,
    ctx: &CallContext,
    amount: Amount,
    path: &RepayPath,
    events: &mut Vec<LedgerEvent>,
) -> Result<RepayPlan, SettlementError> {
    let mut carried = amount;
    let mut hops = Vec::with_capacity(path.len().saturating_sub(1));
    let mut settlements = Vec::new();

    for (i, (borrower, lender)) in path.links().enumerate() {
        let accrual = tx.accrue(lender, borrower, ctx.now)?;
        if !accrual.is_empty() {
            events.push(LedgerEvent::InterestAccrued {
                lender: lender.clone(),
                borrower: borrower.clone(),
                interest: accrual.interest,
                timestamp: ctx.now,
            });
        }

        let repayment = tx.reduce(lender, borrower, carried)?;

        if i > 0 && carried > repayment.repaid {
            let shortfall = carried.checked_sub(repayment.repaid)?;
            push_leg(&mut settlements, &ctx.caller, borrower, shortfall, SettlementKind::Refund);
        }

        tracing::debug!(
            link = i,
            borrower = %borrower,
            lender = %lender,
            offered = %carried,
            repaid = %repayment.repaid,
            remaining = %repayment.remaining,
            "Link reduced"
        );

        if !repayment.repaid.is_zero() {
            events.push(LedgerEvent::LoanRepaid {
                lender: lender.clone(),
                borrower: borrower.clone(),
                amount: repayment.repaid,
                outstanding: repayment.remaining,
                timestamp: ctx.now,
            });
        }
        hops.push(RepayHop {
            borrower: borrower.clone(),
            lender: lender.clone(),
            offered: carried,
            repaid: repayment.repaid,
            remaining: repayment.remaining,
            accrued: accrual.interest,
        });

        carried = repayment.repaid;
    }

    if let Some(root) = path.root() {
        if !carried.is_zero() {
            push_leg(&mut settlements, &ctx.caller, root, carried, SettlementKind::Root);
        }
    }

    Ok(RepayPlan { hops, settlements })
}

/// Paying oneself is a no-op and is left out of the plan
fn push_leg(
    settlements: &mut Vec<CashSettlement>,
    caller: &AccountId,
    payee: &AccountId,
    amount: Amount,
    kind: SettlementKind,
) {
    if payee == caller {
        return;
    }
    settlements.push(CashSettlement {
        payee: payee.clone(),
        amount,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaycredit_core::Rate;
    use relaycredit_ledger::LedgerState;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    fn path(names: &[&str]) -> RepayPath {
        names.iter().map(|n| id(n)).collect()
    }

    /// X owes A 20, A owes B 60, B owes C 5, all at zero rate
    fn chain() -> LedgerState {
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("A"), &id("X"), tokens(20), Rate::ZERO).unwrap();
        tx.extend(&id("B"), &id("A"), tokens(60), Rate::ZERO).unwrap();
        tx.extend(&id("C"), &id("B"), tokens(5), Rate::ZERO).unwrap();
        tx.commit();
        state
    }

    #[test]
    fn test_chain_nets_and_refunds() {
        let mut state = chain();
        let ctx = CallContext::new(id("X"), 0);
        let mut events = Vec::new();
        let mut tx = state.begin();

        let plan = walk_repay(&mut tx, &ctx, tokens(30), &path(&["X", "A", "B", "C"]), &mut events)
            .unwrap();
        tx.commit();

        assert!(state.loan(&id("A"), &id("X")).amount.is_zero());
        assert_eq!(state.loan(&id("B"), &id("A")).amount, tokens(40));
        assert!(state.loan(&id("C"), &id("B")).amount.is_zero());

        assert_eq!(
            plan.settlements,
            vec![
                CashSettlement {
                    payee: id("B"),
                    amount: tokens(15),
                    kind: SettlementKind::Refund
                },
                CashSettlement {
                    payee: id("C"),
                    amount: tokens(5),
                    kind: SettlementKind::Root
                },
            ]
        );
        assert_eq!(plan.hops[1].offered, tokens(20));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_first_link_excess_is_not_charged() {
        let mut state = chain();
        let ctx = CallContext::new(id("X"), 0);
        let mut tx = state.begin();

        let plan = walk_repay(&mut tx, &ctx, tokens(500), &path(&["X", "A"]), &mut Vec::new())
            .unwrap();

        assert_eq!(plan.hops[0].repaid, tokens(20));
        assert_eq!(plan.settlements.len(), 1);
        assert_eq!(plan.settlements[0].amount, tokens(20));
        assert_eq!(plan.settlements[0].kind, SettlementKind::Root);
    }

    #[test]
    fn test_single_element_path_is_no_op() {
        let mut state = chain();
        let before = state.clone();
        let ctx = CallContext::new(id("X"), 0);
        let mut tx = state.begin();

        let plan = walk_repay(&mut tx, &ctx, tokens(7), &path(&["X"]), &mut Vec::new()).unwrap();
        tx.commit();

        assert!(plan.hops.is_empty());
        assert!(plan.settlements.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_unowed_link_refunds_everything_carried() {
        // A owes B nothing, so the 20 absorbed by X->A goes back to A
        let mut state = LedgerState::new();
        let mut tx = state.begin();
        tx.extend(&id("A"), &id("X"), tokens(20), Rate::ZERO).unwrap();
        tx.commit();

        let ctx = CallContext::new(id("X"), 0);
        let mut tx = state.begin();
        let plan = walk_repay(&mut tx, &ctx, tokens(20), &path(&["X", "A", "B"]), &mut Vec::new())
            .unwrap();

        assert_eq!(plan.settlements.len(), 1);
        assert_eq!(plan.settlements[0].payee, id("A"));
        assert_eq!(plan.settlements[0].amount, tokens(20));
        assert_eq!(plan.settlements[0].kind, SettlementKind::Refund);
    }
}
