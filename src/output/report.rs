use crate::core::participant::{ParticipantId, ParticipantRegistry};
use crate::core::transaction::Transaction;
use serde::Serialize;
use std::fmt;

/// Format minor units as major units with two decimals, e.g. `1234` as
/// `"12.34"`.
///
/// Integer arithmetic only; amounts are never routed through floats.
/// Accepts both single amounts (`i64`) and totals (`i128`).
pub fn format_amount(amount: impl Into<i128>) -> String {
    let amount: i128 = amount.into();
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// A transaction with participant names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub from: String,
    pub to: String,
    pub amount: i64,
}

/// Human-facing view of a settlement.
///
/// The text form prints one transfer per line with the columns aligned:
///
/// ```text
///   bob -> alice : 12.50
/// carol -> dave  :  3.00
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementReport {
    lines: Vec<ReportLine>,
}

#[derive(Serialize)]
struct JsonTransaction<'a> {
    from: &'a str,
    to: &'a str,
    amount: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    transactions: Vec<JsonTransaction<'a>>,
    count: usize,
    total: String,
}

impl SettlementReport {
    /// Resolve the names of every transaction. Ids missing from `registry`
    /// are shown by number.
    pub fn new(registry: &ParticipantRegistry, transactions: &[Transaction]) -> Self {
        let name_of = |id: ParticipantId| {
            registry
                .name(id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        };
        let lines = transactions
            .iter()
            .map(|tx| ReportLine {
                from: name_of(tx.from()),
                to: name_of(tx.to()),
                amount: tx.amount(),
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> i128 {
        self.lines.iter().map(|l| i128::from(l.amount)).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            transactions: self
                .lines
                .iter()
                .map(|l| JsonTransaction {
                    from: &l.from,
                    to: &l.to,
                    amount: format_amount(l.amount),
                })
                .collect(),
            count: self.lines.len(),
            total: format_amount(self.total()),
        };
        serde_json::to_string_pretty(&report)
    }
}

impl fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amounts: Vec<String> = self.lines.iter().map(|l| format_amount(l.amount)).collect();
        let from_width = self.lines.iter().map(|l| l.from.chars().count()).max().unwrap_or(0);
        let to_width = self.lines.iter().map(|l| l.to.chars().count()).max().unwrap_or(0);
        let amount_width = amounts.iter().map(String::len).max().unwrap_or(0);

        for (line, amount) in self.lines.iter().zip(&amounts) {
            writeln!(
                f,
                "{:>fw$} -> {:<tw$} : {:>aw$}",
                line.from,
                line.to,
                amount,
                fw = from_width,
                tw = to_width,
                aw = amount_width
            )?;
        }
        Ok(())
    }
}
