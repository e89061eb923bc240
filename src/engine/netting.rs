//! Per-pair netting of outstanding settlements
//!
//! Several saved plans (whole-ledger and per-expense) can leave transfers in
//! both directions between the same two people. Netting folds them into one
//! figure per pair.

use serde::Serialize;

use crate::models::{Money, PersonId, Settlement};

/// What one person still owes another once opposing transfers cancel out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairNet {
    pub from: PersonId,
    pub to: PersonId,
    pub amount: Money,
    /// Outstanding settlements folded into this figure
    pub settlements: usize,
}

/// Net the outstanding settlements per unordered pair of people
///
/// Pairs are reported in the order they first appear. Paid settlements are
/// ignored and pairs that cancel out exactly are dropped.
pub fn net_outstanding(settlements: &[Settlement]) -> Vec<PairNet> {
    // (first, second) as first seen; amount is what `first` owes `second`
    let mut pairs: Vec<(PersonId, PersonId, Money, usize)> = Vec::new();

    for settlement in settlements.iter().filter(|s| s.is_outstanding()) {
        let existing = pairs.iter_mut().find(|(a, b, _, _)| {
            let pair = (*a, *b);
            pair == (settlement.from, settlement.to) || pair == (settlement.to, settlement.from)
        });

        match existing {
            Some((a, _, amount, count)) => {
                if *a == settlement.from {
                    *amount += settlement.amount;
                } else {
                    *amount -= settlement.amount;
                }
                *count += 1;
            }
            None => pairs.push((settlement.from, settlement.to, settlement.amount, 1)),
        }
    }

    pairs
        .into_iter()
        .filter(|(_, _, amount, _)| !amount.is_zero())
        .map(|(a, b, amount, settlements)| {
            if amount.is_negative() {
                PairNet { from: b, to: a, amount: -amount, settlements }
            } else {
                PairNet { from: a, to: b, amount, settlements }
            }
        })
        .collect()
}
