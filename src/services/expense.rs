//! Expense service
//!
//! Records shared expenses. Every reference to a person is resolved and the
//! whole expense validated before anything is written.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::engine::validate_expense;
use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, Money, PersonId, Settlement};
use crate::storage::Storage;

use super::person::PersonService;

const DESCRIPTION_MIN: usize = 3;
const DESCRIPTION_MAX: usize = 50;

/// An expense as entered, with people referenced by name or id
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    /// `(person, amount paid)`; repeated people are summed
    pub payers: Vec<(String, Money)>,
    pub participants: Vec<String>,
    pub date: NaiveDate,
}

pub struct ExpenseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Validate and record an expense
    ///
    /// # Errors
    ///
    /// - `InvalidExpenseData` for a bad description, too few participants,
    ///   a non-positive amount or payers that don't add up to the amount
    /// - `NotFound` if a payer or participant isn't in the ledger
    pub fn create(&self, input: NewExpense) -> SplitResult<Expense> {
        let description = input.description.trim();
        let length = description.chars().count();
        if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&length) {
            return Err(SplitError::InvalidExpenseData(format!(
                "Description must be {}-{} characters, got {}",
                DESCRIPTION_MIN, DESCRIPTION_MAX, length
            )));
        }

        let people = PersonService::new(self.storage);

        let mut payers: HashMap<PersonId, Money> = HashMap::new();
        for (reference, amount) in &input.payers {
            let person = people.resolve(reference)?;
            *payers.entry(person.id).or_default() += *amount;
        }

        let participants = input
            .participants
            .iter()
            .map(|reference| people.resolve(reference).map(|p| p.id))
            .collect::<SplitResult<Vec<_>>>()?;

        if participants.len() < self.settings.min_participants {
            return Err(SplitError::InvalidExpenseData(format!(
                "An expense needs at least {} participants, got {}",
                self.settings.min_participants,
                participants.len()
            )));
        }

        let expense = Expense::new(description, input.amount, payers, participants, input.date);
        validate_expense(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        let stale = self.storage.settlements.remove_outstanding_untagged()?;

        self.storage.expenses.save()?;
        self.storage.settlements.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        self.log_dropped(&stale)?;

        info!(
            expense = %expense.id,
            amount = %expense.amount,
            participants = expense.participants.len(),
            dropped = stale.len(),
            "expense recorded"
        );
        Ok(expense)
    }

    /// Find an expense by id or id prefix
    pub fn find(&self, reference: &str) -> SplitResult<Option<Expense>> {
        self.storage.expenses.find(reference)
    }

    pub fn resolve(&self, reference: &str) -> SplitResult<Expense> {
        self.find(reference)?
            .ok_or_else(|| SplitError::expense_not_found(reference))
    }

    /// All expenses, oldest first, optionally only those involving a person
    pub fn list(&self, person: Option<&str>) -> SplitResult<Vec<Expense>> {
        match person {
            None => self.storage.expenses.get_all(),
            Some(reference) => {
                let person = PersonService::new(self.storage).resolve(reference)?;
                let mut expenses = self.storage.expenses.get_by_person(person.id)?;
                expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
                Ok(expenses)
            }
        }
    }

    /// Delete an expense along with the unpaid settlements it invalidates
    ///
    /// That is the unpaid settlements planned for this expense and any unpaid
    /// whole-ledger plan. Paid settlements stay: that money has already
    /// changed hands.
    pub fn delete(&self, reference: &str) -> SplitResult<Expense> {
        let expense = self.resolve(reference)?;

        self.storage.expenses.delete(expense.id)?;
        let mut stale = self
            .storage
            .settlements
            .remove_outstanding_for_expense(expense.id)?;
        stale.extend(self.storage.settlements.remove_outstanding_untagged()?);

        self.storage.expenses.save()?;
        self.storage.settlements.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        self.log_dropped(&stale)?;

        debug!(expense = %expense.id, dropped = stale.len(), "expense deleted");
        Ok(expense)
    }

    fn log_dropped(&self, stale: &[Settlement]) -> SplitResult<()> {
        for settlement in stale {
            self.storage.log_delete(
                EntityType::Settlement,
                settlement.id.to_string(),
                None,
                settlement,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitPaths;
    use crate::engine::{balance_total, compute_balances};
    use crate::services::SettlementService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let people = PersonService::new(&storage);
        for name in ["Alice", "Bob", "Carol"] {
            people.create(name).unwrap();
        }
        (temp_dir, storage)
    }

    fn dinner(amount: i64, payers: &[(&str, i64)], participants: &[&str]) -> NewExpense {
        NewExpense {
            description: "Dinner".into(),
            amount: Money::from_cents(amount),
            payers: payers
                .iter()
                .map(|(name, cents)| (name.to_string(), Money::from_cents(*cents)))
                .collect(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_create_expense() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let expense = service
            .create(dinner(9000, &[("Alice", 9000)], &["Alice", "Bob", "Carol"]))
            .unwrap();

        assert_eq!(expense.participants.len(), 3);
        assert_eq!(expense.split_amount(), Money::from_cents(3000));
        assert_eq!(service.list(None).unwrap().len(), 1);
        assert_eq!(service.list(Some("bob")).unwrap().len(), 1);
    }

    #[test]
    fn test_repeated_payer_amounts_are_summed() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let expense = service
            .create(dinner(5000, &[("Alice", 2000), ("alice", 3000)], &["Alice", "Bob"]))
            .unwrap();

        assert_eq!(expense.payers.len(), 1);
        assert_eq!(expense.total_paid(), Money::from_cents(5000));
    }

    #[test]
    fn test_payer_mismatch_rejected_without_mutation() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let err = service
            .create(dinner(10000, &[("Alice", 6000), ("Bob", 3000)], &["Alice", "Bob"]))
            .unwrap_err();

        assert!(matches!(err, SplitError::InvalidExpenseData(_)));
        assert!(service.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_person_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let err = service
            .create(dinner(2000, &[("Alice", 2000)], &["Alice", "Mallory"]))
            .unwrap_err();

        assert!(matches!(err, SplitError::NotFound { entity_type: "Person", .. }));
    }

    #[test]
    fn test_participant_and_description_rules() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let solo = service.create(dinner(2000, &[("Alice", 2000)], &["Alice"]));
        assert!(matches!(solo, Err(SplitError::InvalidExpenseData(_))));

        let mut short = dinner(2000, &[("Alice", 2000)], &["Alice", "Bob"]);
        short.description = "ab".into();
        assert!(matches!(service.create(short), Err(SplitError::InvalidExpenseData(_))));

        let mut long = dinner(2000, &[("Alice", 2000)], &["Alice", "Bob"]);
        long.description = "x".repeat(51);
        assert!(matches!(service.create(long), Err(SplitError::InvalidExpenseData(_))));

        let duplicate = service.create(dinner(2000, &[("Alice", 2000)], &["Alice", "alice"]));
        assert!(matches!(duplicate, Err(SplitError::InvalidExpenseData(_))));
    }

    #[test]
    fn test_min_participants_is_configurable() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings {
            min_participants: 1,
            ..Settings::default()
        };
        let service = ExpenseService::new(&storage, &settings);

        assert!(service.create(dinner(2000, &[("Alice", 2000)], &["Alice"])).is_ok());
    }

    #[test]
    fn test_delete_drops_unpaid_settlements_and_keeps_zero_sum() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let keep = service
            .create(dinner(3000, &[("Bob", 3000)], &["Alice", "Bob", "Carol"]))
            .unwrap();
        let doomed = service
            .create(dinner(1001, &[("Alice", 1001)], &["Alice", "Bob", "Carol"]))
            .unwrap();

        let (a, b) = (doomed.participants[0], doomed.participants[1]);
        storage
            .settlements
            .upsert(Settlement::new(b, a, Money::from_cents(334)).for_expense(doomed.id))
            .unwrap();

        service.delete(&doomed.id.to_string()).unwrap();

        assert!(storage.settlements.get_all().unwrap().is_empty());
        let snapshot = storage.snapshot().unwrap();
        assert_eq!(snapshot.expenses.len(), 1);
        assert_eq!(snapshot.expenses[0].id, keep.id);

        let balances = compute_balances(
            &snapshot.person_ids(),
            &snapshot.expenses,
            &snapshot.settlements,
        );
        assert_eq!(balance_total(&balances), Money::zero());
        assert_eq!(balances[&b], Money::from_cents(2000));
    }

    #[test]
    fn test_saved_plan_is_dropped_when_expenses_change() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        let settlements = SettlementService::new(&storage);

        let expense = service
            .create(dinner(9000, &[("Alice", 9000)], &["Alice", "Bob", "Carol"]))
            .unwrap();
        let saved = settlements.materialize().unwrap();
        assert_eq!(saved.len(), 2);

        service.delete(&expense.id.to_string()).unwrap();

        assert!(storage.settlements.get_outstanding().unwrap().is_empty());
        let err = settlements.pay(&saved[0].id.to_string(), None).unwrap_err();
        assert!(err.is_not_found());
        assert!(settlements.balances().unwrap().values().all(|b| b.is_zero()));

        service
            .create(dinner(3000, &[("Bob", 3000)], &["Alice", "Bob"]))
            .unwrap();
        settlements.materialize().unwrap();
        service
            .create(dinner(2000, &[("Alice", 2000)], &["Alice", "Bob"]))
            .unwrap();
        assert!(storage.settlements.get_outstanding().unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        assert!(service.delete("exp-00000000").unwrap_err().is_not_found());
    }
}
