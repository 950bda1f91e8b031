use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single settlement transfer: `from` pays `to` the given `amount`.
///
/// Amounts are in minor currency units (cents). Transactions are produced
/// by the settlement engine and are immutable once created; `from` is
/// always a debtor and `to` a creditor at the time they were paired.
///
/// # Examples
///
/// ```
/// use debt_settle::core::participant::ParticipantId;
/// use debt_settle::core::transaction::Transaction;
///
/// let tx = Transaction::new(ParticipantId::new(1), ParticipantId::new(0), 2_500);
/// assert_eq!(tx.amount(), 2_500);
/// assert_eq!(tx.to_string(), "#1 -> #0: 2500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// The participant paying.
    from: ParticipantId,
    /// The participant being paid.
    to: ParticipantId,
    /// Amount in minor units. Always positive.
    amount: i64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if `from == to`.
    pub fn new(from: ParticipantId, to: ParticipantId, amount: i64) -> Self {
        assert!(amount > 0, "Transaction amount must be positive, got {}", amount);
        assert_ne!(from, to, "Transaction must not pay oneself");
        Self { from, to, amount }
    }

    pub fn from(&self) -> ParticipantId {
        self.from
    }

    pub fn to(&self) -> ParticipantId {
        self.to
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}
