//! # debt-settle
//!
//! Settle a group's shared expenses in as few transfers as practical.
//!
//! Given every participant's net balance (positive if they are owed money,
//! negative if they owe it), the settlement engine produces point-to-point
//! transfers that zero all balances, preferring fewer and larger transfers
//! over naive pairwise repayment.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, balances, transactions
//! - **settlement** — The greedy settlement engine
//! - **input** — Ledger line parsing and even splitting of shared charges
//! - **output** — Column-aligned and JSON rendering of a settlement
//! - **simulation** — Random group generation for stress testing

pub mod core;
pub mod input;
pub mod output;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::participant::{ParticipantId, ParticipantRegistry};
    pub use crate::core::transaction::Transaction;
    pub use crate::input::ledger::LedgerBook;
    pub use crate::output::report::SettlementReport;
    pub use crate::settlement::engine::{Settlement, SettlementEngine, SettlementError};
}
