//! From ledger text to a printed settlement.
//!
//! Parses a small trip ledger, prints each member's net balance and then
//! the transfers that settle it.

use debt_settle::core::participant::ParticipantId;
use debt_settle::input::ledger::LedgerBook;
use debt_settle::output::report::{format_amount, SettlementReport};
use rand::rngs::StdRng;
use rand::SeedableRng;

const LEDGER: &str = "\
# Lisbon, four nights
ana bea caio duda -> ana 840.00     # apartment
ana bea caio duda -> bea 126.35     # groceries
caio duda -> caio 48                # museum tickets
bea -> duda 20                      # taxi
ana bea caio duda -> duda 93.10     # dinner
";

fn main() {
    println!("╔═══════════════════════════════════════════╗");
    println!("║  debt-settle: Trip Ledger Example         ║");
    println!("╚═══════════════════════════════════════════╝\n");

    let mut rng = StdRng::seed_from_u64(7);
    let book = LedgerBook::parse(LEDGER, &mut rng);

    println!("━━━ Net Balances ━━━\n");
    for (index, name) in book.registry().names().iter().enumerate() {
        let balance = book.sheet().balance(ParticipantId::new(index));
        let status = if balance > 0 {
            "OWED"
        } else if balance < 0 {
            "OWES"
        } else {
            "EVEN"
        };
        println!("  {:<8} {:>10}  [{}]", name, format_amount(balance), status);
    }
    println!();

    println!("━━━ Transfers ━━━\n");
    match book.settle() {
        Ok(settlement) => {
            let report = SettlementReport::new(book.registry(), settlement.transactions());
            print!("{}", report);
            println!("\nTotal moved: {}", format_amount(settlement.total_transferred()));

            if let Some(ana) = book.registry().id("ana") {
                let paid: i64 = settlement
                    .transactions()
                    .iter()
                    .filter(|tx| tx.to() == ana)
                    .map(|tx| tx.amount())
                    .sum();
                println!("ana receives {}", format_amount(paid));
            }
        }
        Err(e) => println!("Could not settle: {}", e),
    }
}
