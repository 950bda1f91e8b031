use crate::core::balance::{BalanceError, BalanceSheet};
use crate::core::participant::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Split `amount` into `parts` shares that differ by at most one cent.
///
/// Every share is `amount / parts`; the `amount % parts` leftover cents go
/// one each to randomly chosen shares, so nobody is systematically the one
/// who pays the odd cent. The shares always sum to `amount`.
///
/// # Examples
///
/// ```
/// use debt_settle::input::split::split_evenly;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let shares = split_evenly(1_000, 3, &mut rng);
/// assert_eq!(shares.iter().sum::<i64>(), 1_000);
/// assert_eq!(shares.iter().filter(|s| **s == 334).count(), 1);
/// ```
pub fn split_evenly<R: Rng + ?Sized>(amount: i64, parts: usize, rng: &mut R) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let count = parts as i64;
    let base = amount.div_euclid(count);
    let remainder = amount.rem_euclid(count) as usize;

    let mut order: Vec<usize> = (0..parts).collect();
    order.shuffle(rng);

    let mut shares = vec![base; parts];
    for &i in order.iter().take(remainder) {
        shares[i] += 1;
    }
    shares
}

/// Book a shared charge: `recipient` paid `amount` for `payers`.
///
/// The recipient is credited the full amount and each payer is debited
/// their share, so the sheet stays balanced. The charge is booked as a
/// whole or not at all.
pub fn apply_charge<R: Rng + ?Sized>(
    sheet: &mut BalanceSheet,
    payers: &[ParticipantId],
    recipient: ParticipantId,
    amount: i64,
    rng: &mut R,
) -> Result<(), BalanceError> {
    if payers.is_empty() {
        return Ok(());
    }
    let mut changes = Vec::with_capacity(payers.len() + 1);
    changes.push((recipient, amount));
    for (&payer, share) in payers.iter().zip(split_evenly(amount, payers.len(), rng)) {
        changes.push((payer, -share));
    }
    sheet.apply_all(&changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(split_evenly(900, 3, &mut rng), vec![300, 300, 300]);
    }

    #[test]
    fn test_split_remainder_cents() {
        let mut rng = StdRng::seed_from_u64(2);
        let shares = split_evenly(1_001, 4, &mut rng);
        assert_eq!(shares.iter().sum::<i64>(), 1_001);
        assert_eq!(shares.iter().filter(|s| **s == 251).count(), 1);
        assert_eq!(shares.iter().filter(|s| **s == 250).count(), 3);
    }

    #[test]
    fn test_split_smaller_than_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        let shares = split_evenly(2, 5, &mut rng);
        assert_eq!(shares.iter().sum::<i64>(), 2);
        assert!(shares.iter().all(|s| *s == 0 || *s == 1));
    }

    #[test]
    fn test_split_is_reproducible_with_seed() {
        let a = split_evenly(1_003, 7, &mut StdRng::seed_from_u64(42));
        let b = split_evenly(1_003, 7, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_no_parts() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(split_evenly(100, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_apply_charge_keeps_sheet_balanced() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sheet = BalanceSheet::new();
        let payers = [ParticipantId::new(0), ParticipantId::new(1), ParticipantId::new(2)];
        apply_charge(&mut sheet, &payers, ParticipantId::new(0), 1_000, &mut rng).unwrap();

        assert!(sheet.is_balanced());
        // Recipient paid 1000 and owes a third of it back to themselves.
        let own = sheet.balance(ParticipantId::new(0));
        assert!(own == 666 || own == 667);
    }

    #[test]
    fn test_apply_charge_duplicate_payer_counts_twice() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut sheet = BalanceSheet::new();
        let a = ParticipantId::new(0);
        let b = ParticipantId::new(1);
        apply_charge(&mut sheet, &[a, a], b, 400, &mut rng).unwrap();
        assert_eq!(sheet.balances(), &[-400, 400]);
    }

    #[test]
    fn test_apply_charge_refuses_overflow() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sheet = BalanceSheet::from(vec![0, i64::MAX - 5]);
        let a = ParticipantId::new(0);
        let b = ParticipantId::new(1);
        assert_eq!(
            apply_charge(&mut sheet, &[a], b, 10, &mut rng),
            Err(BalanceError::Overflow { id: b })
        );
        assert_eq!(sheet.balances(), &[0, i64::MAX - 5]);
    }
}
