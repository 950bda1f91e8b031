use crate::core::balance::{BalanceError, BalanceSheet};
use crate::core::participant::ParticipantRegistry;
use crate::input::split::apply_charge;
use crate::input::statement::{Statement, StatementError};
use crate::settlement::engine::{Settlement, SettlementEngine, SettlementError};
use log::{debug, warn};
use rand::Rng;

/// A ledger line that could not be parsed and was left out of the books.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub error: StatementError,
}

/// Running books of a group: who is in it and what each member is owed.
///
/// Names are interned in the order they first appear, so the balance of
/// participant `i` in [`LedgerBook::sheet`] belongs to the `i`-th name in
/// [`LedgerBook::registry`].
///
/// # Examples
///
/// ```
/// use debt_settle::input::ledger::LedgerBook;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let book = LedgerBook::parse("alice bob -> bob 20\n", &mut rng);
/// assert_eq!(book.sheet().balances(), &[-1_000, 1_000]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LedgerBook {
    registry: ParticipantRegistry,
    sheet: BalanceSheet,
    skipped: Vec<SkippedLine>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every line of `text` into a fresh book.
    ///
    /// Malformed lines are skipped and reported through
    /// [`LedgerBook::skipped`]; they never abort the parse.
    pub fn parse<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Self {
        let mut book = Self::new();
        for (index, line) in text.lines().enumerate() {
            book.read_line(index + 1, line, rng);
        }
        debug!(
            "read {} participants, skipped {} lines",
            book.registry.len(),
            book.skipped.len()
        );
        book
    }

    /// Parse and record one line. Returns whether it contributed to the books.
    ///
    /// A line whose charge would push someone's balance out of range is
    /// skipped like a malformed one.
    pub fn read_line<R: Rng + ?Sized>(&mut self, line_no: usize, line: &str, rng: &mut R) -> bool {
        let outcome = Statement::parse_line(line).and_then(|parsed| match parsed {
            Some(statement) => self
                .record(&statement, rng)
                .map(|()| true)
                .map_err(StatementError::from),
            None => Ok(false),
        });
        match outcome {
            Ok(booked) => booked,
            Err(error) => {
                warn!("skipping line {}: {}", line_no, error);
                self.skipped.push(SkippedLine {
                    line: line_no,
                    error,
                });
                false
            }
        }
    }

    /// Book a statement, registering any names seen for the first time.
    ///
    /// If the charge does not fit, the balances are left untouched; the
    /// names stay registered.
    pub fn record<R: Rng + ?Sized>(
        &mut self,
        statement: &Statement,
        rng: &mut R,
    ) -> Result<(), BalanceError> {
        let payers: Vec<_> = statement
            .payers
            .iter()
            .map(|name| self.registry.register(name))
            .collect();
        let recipient = self.registry.register(&statement.recipient);
        for &id in payers.iter().chain(std::iter::once(&recipient)) {
            self.sheet.ensure(id);
        }
        apply_charge(&mut self.sheet, &payers, recipient, statement.amount, rng)
    }

    /// Settle the current balances.
    pub fn settle(&self) -> Result<Settlement, SettlementError> {
        SettlementEngine::settle_sheet(&self.sheet)
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn sheet(&self) -> &BalanceSheet {
        &self.sheet
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }
}
