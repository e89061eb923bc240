//! Net balance computation

use crate::models::{Expense, PersonId, Settlement};

use super::Balances;

/// Fold expenses and paid settlements into per-person balances
///
/// Payers are credited what they paid, participants are debited their share,
/// and every paid settlement moves `amount` from the creditor back to the
/// debtor. Unpaid settlements are suggestions and don't count.
///
/// Every person in `persons` gets an entry, even if zero. People referenced
/// by the ledger but missing from `persons` get an implicit entry.
pub fn compute_balances(
    persons: &[PersonId],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Balances {
    let mut balances: Balances = persons.iter().map(|p| (*p, Default::default())).collect();

    for expense in expenses {
        for (payer, amount) in &expense.payers {
            *balances.entry(*payer).or_default() += *amount;
        }
        for (participant, share) in expense.shares() {
            *balances.entry(participant).or_default() -= share;
        }
    }

    for settlement in settlements.iter().filter(|s| s.paid) {
        *balances.entry(settlement.from).or_default() += settlement.amount;
        *balances.entry(settlement.to).or_default() -= settlement.amount;
    }

    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::balance_total;
    use crate::models::Money;
    use chrono::{NaiveDate, Utc};
    use std::collections::HashMap;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_two_people_one_payer() {
        let (a, b) = (PersonId::new(), PersonId::new());
        let expense = Expense::paid_by("Dinner", cents(10000), a, vec![a, b], date());

        let balances = compute_balances(&[a, b], &[expense], &[]);

        assert_eq!(balances[&a], cents(5000));
        assert_eq!(balances[&b], cents(-5000));
    }

    #[test]
    fn test_three_people_one_payer() {
        let (a, b, c) = (PersonId::new(), PersonId::new(), PersonId::new());
        let expense = Expense::paid_by("Groceries", cents(9000), a, vec![a, b, c], date());

        let balances = compute_balances(&[a, b, c], &[expense], &[]);

        assert_eq!(balances[&a], cents(6000));
        assert_eq!(balances[&b], cents(-3000));
        assert_eq!(balances[&c], cents(-3000));
    }

    #[test]
    fn test_every_person_gets_an_entry() {
        let (a, b, idle) = (PersonId::new(), PersonId::new(), PersonId::new());
        let expense = Expense::paid_by("Movie", cents(2000), a, vec![a, b], date());

        let balances = compute_balances(&[a, b, idle], &[expense], &[]);

        assert_eq!(balances.len(), 3);
        assert_eq!(balances[&idle], Money::zero());
    }

    #[test]
    fn test_multiple_payers() {
        let (a, b, c) = (PersonId::new(), PersonId::new(), PersonId::new());
        let payers = HashMap::from([(a, cents(7000)), (b, cents(2000))]);
        let expense = Expense::new("Cabin", cents(9000), payers, vec![a, b, c], date());

        let balances = compute_balances(&[a, b, c], &[expense], &[]);

        assert_eq!(balances[&a], cents(4000));
        assert_eq!(balances[&b], cents(-1000));
        assert_eq!(balances[&c], cents(-3000));
    }

    #[test]
    fn test_only_paid_settlements_count() {
        let (a, b) = (PersonId::new(), PersonId::new());
        let expense = Expense::paid_by("Dinner", cents(10000), a, vec![a, b], date());
        let paid = Settlement::completed(b, a, cents(2000), Utc::now());
        let outstanding = Settlement::new(b, a, cents(3000));

        let balances = compute_balances(&[a, b], &[expense], &[paid, outstanding]);

        assert_eq!(balances[&a], cents(3000));
        assert_eq!(balances[&b], cents(-3000));
    }

    #[test]
    fn test_full_payment_zeroes_balances() {
        let (a, b) = (PersonId::new(), PersonId::new());
        let expense = Expense::paid_by("Dinner", cents(10000), a, vec![a, b], date());
        let paid = Settlement::completed(b, a, cents(5000), Utc::now());

        let balances = compute_balances(&[a, b], &[expense], &[paid]);

        assert!(balances.values().all(|b| b.is_zero()));
    }

    #[test]
    fn test_unknown_people_are_tolerated() {
        let (a, stranger) = (PersonId::new(), PersonId::new());
        let expense = Expense::paid_by("Cab", cents(3000), stranger, vec![a, stranger], date());

        let balances = compute_balances(&[a], &[expense], &[]);

        assert_eq!(balances[&stranger], cents(1500));
        assert_eq!(balances[&a], cents(-1500));
    }

    #[test]
    fn test_zero_sum_over_many_expenses() {
        let people: Vec<_> = (0..5).map(|_| PersonId::new()).collect();
        let mut expenses = Vec::new();
        for (i, amount) in [1001, 333, 99999, 7, 4250, 12345].iter().enumerate() {
            let payer = people[i % people.len()];
            let participants: Vec<_> = people.iter().copied().skip(i % 3).collect();
            expenses.push(Expense::paid_by("Item", cents(*amount), payer, participants, date()));
        }
        let settlements = vec![
            Settlement::completed(people[1], people[0], cents(1234), Utc::now()),
            Settlement::completed(people[4], people[2], cents(50), Utc::now()),
        ];

        let balances = compute_balances(&people, &expenses, &settlements);
        assert_eq!(balance_total(&balances), Money::zero());

        // Removing an expense removes its contribution and keeps the sum at zero
        expenses.remove(2);
        let balances = compute_balances(&people, &expenses, &settlements);
        assert_eq!(balance_total(&balances), Money::zero());
    }
}
