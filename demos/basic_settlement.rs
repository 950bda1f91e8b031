//! Settling raw balance vectors.
//!
//! Shows how the engine pairs exact matches first and then clears the
//! largest balances against each other.

use debt_settle::core::balance::BalanceSheet;
use debt_settle::output::report::format_amount;
use debt_settle::settlement::engine::SettlementEngine;

fn show(title: &str, balances: &[i64]) {
    println!("━━━ {} ━━━\n", title);
    println!("Balances: {:?}", balances);

    match SettlementEngine::settle(balances) {
        Ok(txs) => {
            for tx in &txs {
                println!("  {} -> {}  {:>10}", tx.from(), tx.to(), format_amount(tx.amount()));
            }
            let naive = balances.iter().filter(|b| **b < 0).count()
                * balances.iter().filter(|b| **b > 0).count();
            println!("Transfers: {} (pairwise worst case: {})", txs.len(), naive);

            let reproduces = BalanceSheet::from_transactions(balances.len(), &txs)
                .map(|replayed| replayed.balances() == balances)
                .unwrap_or(false);
            println!("Reproduces input: {}", reproduces);
        }
        Err(e) => println!("Rejected: {}", e),
    }
    println!();
}

fn main() {
    println!("╔═══════════════════════════════════════════╗");
    println!("║  debt-settle: Basic Settlement Example    ║");
    println!("╚═══════════════════════════════════════════╝\n");

    show("Scenario 1: Simple pair", &[10_000, -10_000]);
    show("Scenario 2: Exact matches", &[5_000, -5_000, 3_000, -3_000]);
    show("Scenario 3: Greedy with leftover", &[7_000, -5_000, -2_000]);
    show(
        "Scenario 4: Larger group",
        &[12_500, -4_000, -4_000, 2_750, -6_000, 1_500, -2_750],
    );
    show("Scenario 5: Unbalanced input", &[500, -300]);
}
