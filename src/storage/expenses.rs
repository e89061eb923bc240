//! Expense repository, persisted to `expenses.json`

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Expense, ExpenseId, PersonId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expenses, indexed by everyone involved
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: person_id -> expenses they paid for or share
    by_person: RwLock<HashMap<PersonId, Vec<ExpenseId>>>,
}

fn involved(expense: &Expense) -> Vec<PersonId> {
    let mut people: Vec<PersonId> = expense.payers.keys().copied().collect();
    for participant in &expense.participants {
        if !people.contains(participant) {
            people.push(*participant);
        }
    }
    people
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_person: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the person index
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_person = self.by_person.write().map_err(lock_poisoned)?;

        data.clear();
        by_person.clear();

        for expense in file_data.expenses {
            for person in involved(&expense) {
                by_person.entry(person).or_default().push(expense.id);
            }
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// All expenses, oldest first
    pub fn get_all(&self) -> Result<Vec<Expense>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(expenses)
    }

    /// Expenses a person paid for or participates in
    pub fn get_by_person(&self, person: PersonId) -> Result<Vec<Expense>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        let by_person = self.by_person.read().map_err(lock_poisoned)?;

        Ok(by_person
            .get(&person)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    /// Resolve an id or id prefix; ambiguous prefixes are rejected
    pub fn find(&self, reference: &str) -> Result<Option<Expense>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        let mut matches = data.values().filter(|e| e.id.matches(reference));

        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(Some(expense.clone())),
            (Some(_), Some(_)) => Err(SplitError::Validation(format!(
                "'{}' matches more than one expense; use more of the id",
                reference
            ))),
            _ => Ok(None),
        }
    }

    pub fn upsert(&self, expense: Expense) -> Result<(), SplitError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_person = self.by_person.write().map_err(lock_poisoned)?;

        if let Some(old) = data.get(&expense.id) {
            for person in involved(old) {
                if let Some(ids) = by_person.get_mut(&person) {
                    ids.retain(|id| *id != expense.id);
                }
            }
        }

        for person in involved(&expense) {
            by_person.entry(person).or_default().push(expense.id);
        }

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, SplitError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_person = self.by_person.write().map_err(lock_poisoned)?;

        let removed = data.remove(&id);
        if let Some(expense) = &removed {
            for person in involved(expense) {
                if let Some(ids) = by_person.get_mut(&person) {
                    ids.retain(|eid| *eid != id);
                }
            }
        }

        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn dinner(payer: PersonId, participants: Vec<PersonId>, day: u32) -> Expense {
        Expense::paid_by(
            "Dinner",
            Money::from_cents(6000),
            payer,
            participants,
            NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        )
    }

    #[test]
    fn test_person_index() {
        let (_temp_dir, repo) = create_test_repo();
        let (a, b, c) = (PersonId::new(), PersonId::new(), PersonId::new());

        repo.upsert(dinner(a, vec![a, b], 1)).unwrap();
        repo.upsert(dinner(b, vec![b, c], 2)).unwrap();

        assert_eq!(repo.get_by_person(a).unwrap().len(), 1);
        assert_eq!(repo.get_by_person(b).unwrap().len(), 2);
        assert!(repo.get_by_person(PersonId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_get_all_sorted_by_date() {
        let (_temp_dir, repo) = create_test_repo();
        let a = PersonId::new();

        repo.upsert(dinner(a, vec![a], 20)).unwrap();
        repo.upsert(dinner(a, vec![a], 3)).unwrap();

        let days: Vec<_> = repo
            .get_all()
            .unwrap()
            .iter()
            .map(|e| e.date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["03", "20"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let (a, b) = (PersonId::new(), PersonId::new());
        let expense = dinner(a, vec![a, b], 1);
        let id = expense.id;

        repo.upsert(expense).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();

        let loaded = reloaded.get(id).unwrap().unwrap();
        assert_eq!(loaded.participants, vec![a, b]);
        assert_eq!(loaded.payers[&a], Money::from_cents(6000));
        assert_eq!(reloaded.get_by_person(b).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_clears_index() {
        let (_temp_dir, repo) = create_test_repo();
        let (a, b) = (PersonId::new(), PersonId::new());
        let expense = dinner(a, vec![a, b], 1);
        let id = expense.id;

        repo.upsert(expense).unwrap();
        assert!(repo.delete(id).unwrap().is_some());

        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_by_person(a).unwrap().is_empty());
        assert!(repo.delete(id).unwrap().is_none());
    }

    #[test]
    fn test_find_by_prefix() {
        let (_temp_dir, repo) = create_test_repo();
        let a = PersonId::new();
        let expense = dinner(a, vec![a], 1);
        let id = expense.id;
        repo.upsert(expense).unwrap();

        let full = id.as_uuid().to_string();
        assert_eq!(repo.find(&full).unwrap().unwrap().id, id);
        assert_eq!(repo.find(&id.to_string()).unwrap().unwrap().id, id);
    }
}
