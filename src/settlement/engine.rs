use crate::core::balance::BalanceSheet;
use crate::core::participant::ParticipantId;
use crate::core::transaction::Transaction;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors arising from settling a balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The input balances do not cancel out, so no set of transfers can
    /// reproduce them.
    #[error("balances must sum to zero, got {sum}")]
    PreconditionViolation { sum: i128 },
    /// The matching loop left the books in an impossible state.
    #[error("settlement invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

/// Participants grouped by the magnitude of their balance.
///
/// Each magnitude maps to a stack of participants currently holding exactly
/// that amount on one side of the books. The ordered map gives the largest
/// magnitude in `O(log n)`.
#[derive(Debug, Default)]
struct Buckets(BTreeMap<u64, Vec<ParticipantId>>);

impl Buckets {
    fn push(&mut self, magnitude: u64, id: ParticipantId) {
        self.0.entry(magnitude).or_default().push(id);
    }

    fn largest(&self) -> Option<u64> {
        self.0.last_key_value().map(|(&magnitude, _)| magnitude)
    }

    fn take(&mut self, magnitude: u64) -> Vec<ParticipantId> {
        self.0.remove(&magnitude).unwrap_or_default()
    }

    /// Put back what is left of a stack removed with [`Buckets::take`].
    fn restore(&mut self, magnitude: u64, ids: Vec<ParticipantId>) {
        if !ids.is_empty() {
            self.0.entry(magnitude).or_default().extend(ids);
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn participant_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// The outcome of settling a balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    transactions: Vec<Transaction>,
}

impl Settlement {
    /// Transfers in the order they were produced.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of all transfer amounts, in minor units.
    pub fn total_transferred(&self) -> i128 {
        self.transactions
            .iter()
            .map(|tx| i128::from(tx.amount()))
            .sum()
    }
}

/// The settlement engine.
///
/// Turns net balances into a short list of point-to-point transfers.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Compute transfers that settle `balances`.
    ///
    /// `balances[i]` is the net balance of participant `i` in minor units:
    /// positive if they are owed money, negative if they owe it. The
    /// balances must sum to zero. Zero balances are ignored and never
    /// appear in the result.
    ///
    /// # Algorithm
    ///
    /// 1. Bucket creditors and debtors by the magnitude of their balance.
    /// 2. Pair every debtor and creditor holding the same magnitude.
    /// 3. Repeatedly pair the largest debtor magnitude with the largest
    ///    creditor magnitude. Whoever had the larger magnitude goes back
    ///    into the buckets with the difference, and that leftover is
    ///    immediately checked for an exact match.
    ///
    /// The result is not guaranteed to have the fewest possible transfers
    /// (that problem is NP-hard), but large balances clear first and exact
    /// matches never get split.
    ///
    /// # Examples
    ///
    /// ```
    /// use debt_settle::settlement::engine::SettlementEngine;
    ///
    /// let txs = SettlementEngine::settle(&[100, -100]).unwrap();
    /// assert_eq!(txs.len(), 1);
    /// assert_eq!(txs[0].from().index(), 1);
    /// assert_eq!(txs[0].to().index(), 0);
    /// assert_eq!(txs[0].amount(), 100);
    /// ```
    pub fn settle(balances: &[i64]) -> Result<Vec<Transaction>, SettlementError> {
        let sum: i128 = balances.iter().map(|&b| i128::from(b)).sum();
        if sum != 0 {
            return Err(SettlementError::PreconditionViolation { sum });
        }

        let mut creditors = Buckets::default();
        let mut debtors = Buckets::default();
        for (index, &balance) in balances.iter().enumerate() {
            let id = ParticipantId::new(index);
            match balance {
                0 => {}
                b if b > 0 => creditors.push(b.unsigned_abs(), id),
                b => debtors.push(b.unsigned_abs(), id),
            }
        }
        debug!(
            "settling {} creditors against {} debtors",
            creditors.participant_count(),
            debtors.participant_count()
        );

        let mut result = Vec::new();

        for &balance in balances.iter().filter(|b| **b > 0) {
            match_exact(balance.unsigned_abs(), &mut debtors, &mut creditors, &mut result)?;
        }
        debug!("{} exact matches settled up front", result.len());

        while let (Some(debtor_mag), Some(creditor_mag)) = (debtors.largest(), creditors.largest())
        {
            let mut debtor_ids = debtors.take(debtor_mag);
            let mut creditor_ids = creditors.take(creditor_mag);
            let amount = to_amount(debtor_mag.min(creditor_mag))?;
            let pair_count = debtor_ids.len().min(creditor_ids.len());
            trace!(
                "pairing {} debtors at {} with creditors at {}",
                pair_count,
                debtor_mag,
                creditor_mag
            );

            for _ in 0..pair_count {
                let (Some(from), Some(to)) = (debtor_ids.pop(), creditor_ids.pop()) else {
                    break;
                };
                result.push(Transaction::new(from, to, amount));
                if debtor_mag < creditor_mag {
                    creditors.push(creditor_mag - debtor_mag, to);
                } else if creditor_mag < debtor_mag {
                    debtors.push(debtor_mag - creditor_mag, from);
                }
            }

            debtors.restore(debtor_mag, debtor_ids);
            creditors.restore(creditor_mag, creditor_ids);

            match_exact(
                debtor_mag.abs_diff(creditor_mag),
                &mut debtors,
                &mut creditors,
                &mut result,
            )?;
        }

        if !debtors.is_empty() || !creditors.is_empty() {
            return Err(invariant_violation(format!(
                "{} debtors and {} creditors left unmatched",
                debtors.participant_count(),
                creditors.participant_count()
            )));
        }

        let replayed = BalanceSheet::from_transactions(balances.len(), &result)
            .map_err(|e| invariant_violation(format!("replaying transactions failed: {}", e)))?;
        if replayed.balances() != balances {
            return Err(invariant_violation(
                "transactions do not reproduce the input balances".to_string(),
            ));
        }

        debug!("settled with {} transactions", result.len());
        Ok(result)
    }

    /// Settle a [`BalanceSheet`], wrapping the transfers in a [`Settlement`].
    pub fn settle_sheet(sheet: &BalanceSheet) -> Result<Settlement, SettlementError> {
        let transactions = Self::settle(sheet.balances())?;
        Ok(Settlement { transactions })
    }
}

/// Pair off every debtor and creditor holding exactly `magnitude`.
fn match_exact(
    magnitude: u64,
    debtors: &mut Buckets,
    creditors: &mut Buckets,
    result: &mut Vec<Transaction>,
) -> Result<(), SettlementError> {
    let (Some(debtor_ids), Some(creditor_ids)) =
        (debtors.0.get_mut(&magnitude), creditors.0.get_mut(&magnitude))
    else {
        return Ok(());
    };

    let amount = to_amount(magnitude)?;
    while let (Some(&from), Some(&to)) = (debtor_ids.last(), creditor_ids.last()) {
        debtor_ids.pop();
        creditor_ids.pop();
        result.push(Transaction::new(from, to, amount));
    }

    let debtors_done = debtor_ids.is_empty();
    let creditors_done = creditor_ids.is_empty();
    if debtors_done {
        debtors.0.remove(&magnitude);
    }
    if creditors_done {
        creditors.0.remove(&magnitude);
    }
    Ok(())
}

/// Every paired amount is bounded by some creditor's positive `i64` balance.
fn to_amount(magnitude: u64) -> Result<i64, SettlementError> {
    i64::try_from(magnitude).map_err(|_| {
        invariant_violation(format!("transfer of {} does not fit in i64", magnitude))
    })
}

fn invariant_violation(reason: String) -> SettlementError {
    error!("settlement invariant violated: {}", reason);
    if cfg!(debug_assertions) {
        panic!("settlement invariant violated: {}", reason);
    }
    SettlementError::InvariantViolation { reason }
}
