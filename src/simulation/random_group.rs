//! Random group generation for stress testing the settlement engine.
//!
//! Builds zero-sum balance vectors the same way real ledgers do: by booking
//! random shared charges against a sheet.

use crate::core::balance::{BalanceError, BalanceSheet};
use crate::core::participant::ParticipantId;
use crate::input::split::apply_charge;
use rand::seq::index::sample;
use rand::Rng;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of participants in the group.
    pub participant_count: usize,
    /// Number of shared charges booked.
    pub statement_count: usize,
    /// Minimum charge, in minor units.
    pub min_amount: i64,
    /// Maximum charge, in minor units.
    pub max_amount: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 10,
            statement_count: 30,
            min_amount: 1,
            max_amount: 100_000,
        }
    }
}

/// Generate the net balances of a random group.
///
/// Each charge picks a random recipient and a random non-empty subset of
/// payers. The result always sums to zero. Fails if the configured
/// amounts drive a balance out of the `i64` range.
pub fn generate_random_balances<R: Rng + ?Sized>(
    config: &GroupConfig,
    rng: &mut R,
) -> Result<Vec<i64>, BalanceError> {
    let mut sheet = BalanceSheet::new();
    let n = config.participant_count;
    if n == 0 {
        return Ok(Vec::new());
    }
    sheet.ensure(ParticipantId::new(n - 1));

    for _ in 0..config.statement_count {
        let recipient = ParticipantId::new(rng.gen_range(0..n));
        let payer_count = rng.gen_range(1..=n);
        let payers: Vec<ParticipantId> = sample(rng, n, payer_count)
            .into_iter()
            .map(ParticipantId::new)
            .collect();
        let amount = rng.gen_range(config.min_amount..=config.max_amount);
        apply_charge(&mut sheet, &payers, recipient, amount, rng)?;
    }

    Ok(sheet.balances().to_vec())
}
