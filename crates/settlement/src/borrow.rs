//! Borrow path walk
//!
//! Per hop, in this order:
//!
//! ```text
//! accrue -> extend -> lender checks -> relayer checks -> trust
//! ```
//!
//! Checks read the aggregates *after* the merge, so caps bound the new
//! totals. The source never gets borrower-side checks and neither does the
//! caller; only intermediate relayers do.

use relaycredit_core::{AccountId, Amount, Rate};
use relaycredit_ledger::LedgerTx;
use relaycredit_oracle::TrustOracle;

use crate::error::SettlementError;
use crate::events::LedgerEvent;
use crate::path::{BorrowPath, CallContext};
use crate::receipt::HopOutcome;

/// Walk every hop of `path` inside `tx`, stopping at the first violation.
///
/// `path` must be non-empty and `rates` the same length; the engine checks
/// both before calling.
pub(crate) fn walk_borrow<O: TrustOracle>(
    tx: &mut LedgerTx<'_>,
    oracle: &O,
    ctx: &CallContext,
    amount: Amount,
    path: &BorrowPath,
    rates: &[Rate],
    events: &mut Vec<LedgerEvent>,
) -> Result<Vec<HopOutcome>, SettlementError> {
    let last = path.len().saturating_sub(1);
    let mut hops = Vec::with_capacity(path.len());

    for (i, (sender, receiver)) in path.hops(&ctx.caller).enumerate() {
        let rate = rates[i];
        let relayed = i < last;

        let accrual = tx.accrue(sender, receiver, ctx.now)?;
        if !accrual.is_empty() {
            events.push(LedgerEvent::InterestAccrued {
                lender: sender.clone(),
                borrower: receiver.clone(),
                interest: accrual.interest,
                timestamp: ctx.now,
            });
        }

        let loan = tx.extend(sender, receiver, amount, rate)?;

        check_lender(tx, sender, rate)?;
        if relayed {
            check_relayer(tx, receiver, rate, rates[i + 1])?;
        }
        if !oracle.is_trusted(sender, receiver) {
            return Err(SettlementError::LenderDoesNotTrustBorrower(
                sender.clone(),
                receiver.clone(),
            ));
        }

        tracing::debug!(
            hop = i,
            lender = %sender,
            borrower = %receiver,
            rate = %rate,
            outstanding = %loan.amount,
            relayed,
            "Hop originated"
        );

        events.push(LedgerEvent::LoanExtended {
            lender: sender.clone(),
            borrower: receiver.clone(),
            amount,
            rate,
            outstanding: loan.amount,
            merged_rate: loan.rate,
            timestamp: ctx.now,
        });
        hops.push(HopOutcome {
            lender: sender.clone(),
            borrower: receiver.clone(),
            rate,
            accrued: accrual.interest,
            loan,
            relayed,
        });
    }

    Ok(hops)
}

fn check_lender(tx: &LedgerTx<'_>, lender: &AccountId, rate: Rate) -> Result<(), SettlementError> {
    let limits = tx.limits(lender);
    let lent = tx.balance(lender).lent;

    if lent > limits.lending_cap {
        return Err(SettlementError::OverLendingCap(lender.clone(), lent));
    }
    if rate < limits.min_lend_ir {
        return Err(SettlementError::UnderLenderMinIR(lender.clone(), rate));
    }
    Ok(())
}

/// `upstream` is what the relayer pays, `downstream` what it charges
fn check_relayer(
    tx: &LedgerTx<'_>,
    relayer: &AccountId,
    upstream: Rate,
    downstream: Rate,
) -> Result<(), SettlementError> {
    let limits = tx.limits(relayer);
    let borrowed = tx.balance(relayer).borrowed;

    if borrowed > limits.borrow_cap {
        return Err(SettlementError::OverBorrowingCap(relayer.clone(), borrowed));
    }
    if upstream > limits.max_borrow_ir {
        return Err(SettlementError::OverBorrowerMaxIR(relayer.clone(), upstream));
    }
    match downstream.margin_over(upstream) {
        Some(margin) if margin >= limits.min_ir_margin => Ok(()),
        Some(margin) => Err(SettlementError::UnderRelayerMargin(relayer.clone(), margin)),
        // Negative spread is reported as zero
        None => Err(SettlementError::UnderRelayerMargin(relayer.clone(), Rate::ZERO)),
    }
}
