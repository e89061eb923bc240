//! Greedy debt simplification
//!
//! Matches debtors against creditors largest-first. This is not guaranteed to
//! find the global minimum number of transfers (that problem is NP-hard), but
//! it never needs more than `debtors + creditors - 1` and is deterministic.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::{Money, PersonId, Settlement};

use super::{is_settled, Balances, SETTLEMENT_EPSILON};

/// Produce outstanding settlements that bring every balance to zero
///
/// People are considered in `persons` order, followed by anyone else present
/// in `balances` sorted by id. Ties in the debtor/creditor sort keep that
/// order, so the same input always yields the same plan.
pub fn plan_settlements(persons: &[PersonId], balances: &Balances) -> Vec<Settlement> {
    let mut working: Vec<(PersonId, Money)> = universe(persons, balances)
        .into_iter()
        .map(|p| (p, balances.get(&p).copied().unwrap_or_default()))
        .collect();

    let mut debtors: Vec<usize> = (0..working.len())
        .filter(|&i| working[i].1 < -SETTLEMENT_EPSILON)
        .collect();
    let mut creditors: Vec<usize> = (0..working.len())
        .filter(|&i| working[i].1 > SETTLEMENT_EPSILON)
        .collect();

    // Most negative debtor first, most positive creditor first
    debtors.sort_by_key(|&i| working[i].1);
    creditors.sort_by_key(|&i| std::cmp::Reverse(working[i].1));

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let (debtor, creditor) = (debtors[i], creditors[j]);
        let debt = -working[debtor].1;
        let credit = working[creditor].1;
        let settle = debt.min(credit);

        if settle > SETTLEMENT_EPSILON {
            settlements.push(Settlement::new(working[debtor].0, working[creditor].0, settle));
        }

        working[debtor].1 += settle;
        working[creditor].1 -= settle;

        if is_settled(working[debtor].1) {
            i += 1;
        }
        if is_settled(working[creditor].1) {
            j += 1;
        }
    }

    let unresolved: Vec<_> = working.iter().filter(|(_, b)| !is_settled(*b)).collect();
    if !unresolved.is_empty() {
        warn!(
            count = unresolved.len(),
            "balances left unresolved after planning; ledger is not zero-sum"
        );
    }

    debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        transfers = settlements.len(),
        "planned settlements"
    );

    settlements
}

fn universe(persons: &[PersonId], balances: &Balances) -> Vec<PersonId> {
    let mut seen: HashSet<PersonId> = HashSet::with_capacity(persons.len());
    let mut order: Vec<PersonId> = persons.iter().copied().filter(|p| seen.insert(*p)).collect();

    let mut extra: Vec<PersonId> = balances
        .keys()
        .copied()
        .filter(|p| !seen.contains(p))
        .collect();
    extra.sort();
    order.extend(extra);
    order
}
