use crate::core::participant::ParticipantId;
use crate::core::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors arising from booking amounts on a [`BalanceSheet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("balance of participant {id} would overflow")]
    Overflow { id: ParticipantId },
}

/// Net balance of each participant, in minor currency units.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// The sheet is indexed by [`ParticipantId`] and grows on demand, so it can
/// be filled in step with a
/// [`ParticipantRegistry`](crate::core::participant::ParticipantRegistry).
/// Individual balances stay within `i64`; bookings that would leave that
/// range are refused. Totals are summed in `i128`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    balances: Vec<i64>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the balances implied by a list of transactions.
    ///
    /// Starts every participant at zero; each transaction adds its amount
    /// to the receiver and subtracts it from the payer. Settling a sheet
    /// and replaying the result must give the sheet back.
    pub fn from_transactions(
        len: usize,
        transactions: &[Transaction],
    ) -> Result<Self, BalanceError> {
        let mut sheet = Self {
            balances: vec![0; len],
        };
        for tx in transactions {
            sheet.credit(tx.to(), tx.amount())?;
            sheet.debit(tx.from(), tx.amount())?;
        }
        Ok(sheet)
    }

    /// Make sure `id` has a slot, starting at zero.
    pub fn ensure(&mut self, id: ParticipantId) {
        if self.balances.len() <= id.index() {
            self.balances.resize(id.index() + 1, 0);
        }
    }

    /// The participant is owed `amount` more.
    pub fn credit(&mut self, id: ParticipantId, amount: i64) -> Result<(), BalanceError> {
        self.ensure(id);
        let slot = &mut self.balances[id.index()];
        *slot = slot
            .checked_add(amount)
            .ok_or(BalanceError::Overflow { id })?;
        Ok(())
    }

    /// The participant owes `amount` more.
    pub fn debit(&mut self, id: ParticipantId, amount: i64) -> Result<(), BalanceError> {
        self.ensure(id);
        let slot = &mut self.balances[id.index()];
        *slot = slot
            .checked_sub(amount)
            .ok_or(BalanceError::Overflow { id })?;
        Ok(())
    }

    /// Book several signed changes at once.
    ///
    /// Either every change is applied or, if any participant's balance
    /// would leave the `i64` range, none is. A participant may appear more
    /// than once; only their final balance has to fit.
    pub fn apply_all(&mut self, changes: &[(ParticipantId, i64)]) -> Result<(), BalanceError> {
        let mut net: BTreeMap<ParticipantId, i128> = BTreeMap::new();
        for &(id, delta) in changes {
            *net.entry(id).or_insert(0) += i128::from(delta);
        }

        let mut updated = Vec::with_capacity(net.len());
        for (id, delta) in net {
            let value = i64::try_from(i128::from(self.balance(id)) + delta)
                .map_err(|_| BalanceError::Overflow { id })?;
            updated.push((id, value));
        }

        for (id, value) in updated {
            self.ensure(id);
            self.balances[id.index()] = value;
        }
        Ok(())
    }

    pub fn balance(&self, id: ParticipantId) -> i64 {
        self.balances.get(id.index()).copied().unwrap_or(0)
    }

    pub fn balances(&self) -> &[i64] {
        &self.balances
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances. Zero for any consistent sheet.
    pub fn total(&self) -> i128 {
        self.balances.iter().map(|&b| i128::from(b)).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == 0
    }

    /// Total that has to change hands to settle the sheet
    /// (sum of positive balances, equal to the sum of |negative| ones).
    pub fn total_outstanding(&self) -> i128 {
        self.balances
            .iter()
            .filter(|b| **b > 0)
            .map(|&b| i128::from(b))
            .sum()
    }
}

impl From<Vec<i64>> for BalanceSheet {
    fn from(balances: Vec<i64>) -> Self {
        Self { balances }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_credit_debit() {
        let mut sheet = BalanceSheet::new();
        sheet.credit(ParticipantId::new(2), 300).unwrap();
        sheet.debit(ParticipantId::new(0), 100).unwrap();
        sheet.debit(ParticipantId::new(1), 200).unwrap();

        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.balances(), &[-100, -200, 300]);
        assert!(sheet.is_balanced());
        assert_eq!(sheet.total_outstanding(), 300);
    }

    #[test]
    fn test_sheet_unknown_participant_is_zero() {
        let sheet = BalanceSheet::from(vec![5, -5]);
        assert_eq!(sheet.balance(ParticipantId::new(9)), 0);
    }

    #[test]
    fn test_sheet_unbalanced() {
        let sheet = BalanceSheet::from(vec![5, -3]);
        assert_eq!(sheet.total(), 2);
        assert!(!sheet.is_balanced());
    }

    #[test]
    fn test_sheet_from_transactions() {
        let txs = vec![
            Transaction::new(ParticipantId::new(1), ParticipantId::new(0), 50),
            Transaction::new(ParticipantId::new(2), ParticipantId::new(0), 20),
        ];
        let sheet = BalanceSheet::from_transactions(4, &txs).unwrap();
        assert_eq!(sheet.balances(), &[70, -50, -20, 0]);
    }

    #[test]
    fn test_sheet_refuses_overflow() {
        let mut sheet = BalanceSheet::from(vec![i64::MAX, i64::MIN]);
        let a = ParticipantId::new(0);
        let b = ParticipantId::new(1);
        assert_eq!(sheet.credit(a, 1), Err(BalanceError::Overflow { id: a }));
        assert_eq!(sheet.debit(b, 1), Err(BalanceError::Overflow { id: b }));
        assert_eq!(sheet.balances(), &[i64::MAX, i64::MIN]);
    }

    #[test]
    fn test_totals_near_limits() {
        let sheet = BalanceSheet::from(vec![i64::MAX, 1, -i64::MAX, -1]);
        assert_eq!(sheet.total(), 0);
        assert!(sheet.is_balanced());
        assert_eq!(sheet.total_outstanding(), i128::from(i64::MAX) + 1);
    }

    #[test]
    fn test_apply_all_is_atomic() {
        let mut sheet = BalanceSheet::from(vec![0, i64::MAX - 10]);
        let a = ParticipantId::new(0);
        let b = ParticipantId::new(1);
        assert_eq!(
            sheet.apply_all(&[(a, -20), (b, 20)]),
            Err(BalanceError::Overflow { id: b })
        );
        assert_eq!(sheet.balances(), &[0, i64::MAX - 10]);

        sheet.apply_all(&[(a, -20), (b, 20), (b, -15), (a, 15)]).unwrap();
        assert_eq!(sheet.balances(), &[-5, i64::MAX - 5]);
    }
}
