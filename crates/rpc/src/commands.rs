//! CLI commands

use relaycredit_core::{AccountId, Amount, Rate};

use crate::config::ScenarioConfig;
use crate::context::AppContext;

/// Human rendering of a token amount
fn tokens(amount: Amount) -> String {
    amount
        .to_decimal()
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{amount} units"))
}

fn rate(rate: Rate) -> String {
    rate.to_decimal()
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{rate} units"))
}

fn print_outcomes(ctx: &AppContext) {
    for outcome in ctx.outcomes() {
        match &outcome.error {
            None => println!(
                "✅ [{}] {} @{} ({})",
                outcome.index, outcome.kind, outcome.at, outcome.correlation_id
            ),
            Some(e) => println!(
                "❌ [{}] {} @{} ({}): {}",
                outcome.index, outcome.kind, outcome.at, outcome.correlation_id, e
            ),
        }
    }
}

/// Run a scenario and print the final ledger
pub async fn run(config: &ScenarioConfig, show_events: bool) -> Result<(), anyhow::Error> {
    let ctx = AppContext::run(config).await?;
    print_outcomes(&ctx);

    let mut engine = ctx.service().lock().await;

    let mut loans: Vec<_> = engine.state().all_loans().iter().collect();
    loans.sort_by(|a, b| a.0.cmp(b.0));
    println!();
    println!("📒 Loans");
    for (key, loan) in loans {
        println!(
            "   {}: {} @ {} (t={})",
            key,
            tokens(loan.amount),
            rate(loan.rate),
            loan.timestamp
        );
    }

    println!("📊 Balances");
    for account in engine.state().accounts() {
        let balance = engine.balance(&account);
        println!(
            "   {}: lent {}, borrowed {}, owed/s {}, owes/s {}, tokens {}",
            account,
            tokens(balance.lent),
            tokens(balance.borrowed),
            tokens(balance.owed_per_second),
            tokens(balance.owes_per_second),
            tokens(engine.settlement().balance_of(&account)),
        );
    }

    if show_events {
        println!("📜 Events");
        for event in engine.drain_events() {
            println!("   {}", serde_json::to_string(&event)?);
        }
    }

    println!();
    println!("Digest: {}", engine.digest());
    if ctx.rejected() > 0 {
        println!("⚠️  {} operation(s) rejected", ctx.rejected());
    }
    Ok(())
}

/// Run a scenario and print one account
pub async fn inspect(config: &ScenarioConfig, account: &AccountId) -> Result<(), anyhow::Error> {
    let ctx = AppContext::run(config).await?;
    let engine = ctx.service().lock().await;

    let limits = engine.limits(account);
    let balance = engine.balance(account);

    println!("👤 {}", account);
    println!("   Tokens:   {}", tokens(engine.settlement().balance_of(account)));
    println!("   Lent:     {} (owed/s {})", tokens(balance.lent), tokens(balance.owed_per_second));
    println!("   Borrowed: {} (owes/s {})", tokens(balance.borrowed), tokens(balance.owes_per_second));
    println!("   Touched:  t={}", balance.timestamp);
    println!(
        "   Limits:   lending cap {}, min lend IR {}, borrow cap {}, max borrow IR {}, min margin {}",
        tokens(limits.lending_cap),
        rate(limits.min_lend_ir),
        tokens(limits.borrow_cap),
        rate(limits.max_borrow_ir),
        rate(limits.min_ir_margin),
    );

    let trusted = ctx.trust().trusted_by(account);
    if !trusted.is_empty() {
        let names: Vec<_> = trusted.iter().map(|a| a.to_string()).collect();
        println!("   Trusts:   {}", names.join(", "));
    }

    let debt = engine.debt_of(account);
    if !debt.is_empty() {
        println!("   Owes:");
        for (lender, loan) in debt {
            println!("      {} to {} @ {}", tokens(loan.amount), lender, rate(loan.rate));
        }
    }

    let credit = engine.credit_of(account);
    if !credit.is_empty() {
        println!("   Owed:");
        for (borrower, loan) in credit {
            println!("      {} by {} @ {}", tokens(loan.amount), borrower, rate(loan.rate));
        }
    }

    Ok(())
}

/// Replay a scenario twice and compare the ledger digests
pub async fn verify(config: &ScenarioConfig) -> Result<(), anyhow::Error> {
    let first = AppContext::run(config).await?;
    let second = AppContext::run(config).await?;

    let (a, b) = (first.digest().await, second.digest().await);
    if a != b {
        anyhow::bail!("Replay diverged: {} != {}", a, b);
    }

    println!(
        "✅ Deterministic replay ({} operations, {} rejected)",
        first.outcomes().len(),
        first.rejected()
    );
    println!("   Digest: {}", a);
    Ok(())
}
