//! Settlement repository, persisted to `settlements.json`
//!
//! Settlements keep their insertion order: a saved plan lists transfers in
//! the order the planner produced them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{ExpenseId, PersonId, Settlement, SettlementId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<Settlement>,
}

pub struct SettlementRepository {
    path: PathBuf,
    data: RwLock<Vec<Settlement>>,
    /// Index: expense_id -> settlements planned for that expense
    by_expense: RwLock<HashMap<ExpenseId, Vec<SettlementId>>>,
}

impl SettlementRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            by_expense: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: SettlementData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_expense = self.by_expense.write().map_err(lock_poisoned)?;

        *by_expense = index(&file_data.settlements);
        *data = file_data.settlements;

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let settlements = self.get_all()?;
        write_json_atomic(&self.path, &SettlementData { settlements })
    }

    pub fn get(&self, id: SettlementId) -> Result<Option<Settlement>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.iter().find(|s| s.id == id).cloned())
    }

    pub fn get_all(&self) -> Result<Vec<Settlement>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.clone())
    }

    /// Settlements not yet paid
    pub fn get_outstanding(&self) -> Result<Vec<Settlement>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.iter().filter(|s| s.is_outstanding()).cloned().collect())
    }

    pub fn get_by_expense(&self, expense_id: ExpenseId) -> Result<Vec<Settlement>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        let by_expense = self.by_expense.read().map_err(lock_poisoned)?;

        let ids = by_expense.get(&expense_id).cloned().unwrap_or_default();
        Ok(data.iter().filter(|s| ids.contains(&s.id)).cloned().collect())
    }

    /// Check whether any settlement names this person as payer or payee
    pub fn involves(&self, person: PersonId) -> Result<bool, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.iter().any(|s| s.from == person || s.to == person))
    }

    /// Resolve an id or id prefix; ambiguous prefixes are rejected
    pub fn find(&self, reference: &str) -> Result<Option<Settlement>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        let mut matches = data.iter().filter(|s| s.id.matches(reference));

        match (matches.next(), matches.next()) {
            (Some(settlement), None) => Ok(Some(settlement.clone())),
            (Some(_), Some(_)) => Err(SplitError::Validation(format!(
                "'{}' matches more than one settlement; use more of the id",
                reference
            ))),
            _ => Ok(None),
        }
    }

    /// Replace a settlement in place, or append it if new
    pub fn upsert(&self, settlement: Settlement) -> Result<(), SplitError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_expense = self.by_expense.write().map_err(lock_poisoned)?;

        if let Some(expense_id) = settlement.expense_id {
            let ids = by_expense.entry(expense_id).or_default();
            if !ids.contains(&settlement.id) {
                ids.push(settlement.id);
            }
        }

        match data.iter_mut().find(|s| s.id == settlement.id) {
            Some(existing) => *existing = settlement,
            None => data.push(settlement),
        }
        Ok(())
    }

    /// Drop every unpaid settlement, returning what was removed
    pub fn remove_outstanding(&self) -> Result<Vec<Settlement>, SplitError> {
        self.remove_where(Settlement::is_outstanding)
    }

    /// Drop the unpaid settlements planned for one expense
    pub fn remove_outstanding_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<Settlement>, SplitError> {
        self.remove_where(|s| s.is_outstanding() && s.expense_id == Some(expense_id))
    }

    /// Drop the unpaid settlements of a whole-ledger plan
    ///
    /// Such a plan was computed from every expense, so it goes stale as soon
    /// as any expense is added or removed.
    pub fn remove_outstanding_untagged(&self) -> Result<Vec<Settlement>, SplitError> {
        self.remove_where(|s| s.is_outstanding() && s.expense_id.is_none())
    }

    /// Drop the payment history
    pub fn remove_paid(&self) -> Result<Vec<Settlement>, SplitError> {
        self.remove_where(|s| s.paid)
    }

    fn remove_where<F>(&self, predicate: F) -> Result<Vec<Settlement>, SplitError>
    where
        F: Fn(&Settlement) -> bool,
    {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_expense = self.by_expense.write().map_err(lock_poisoned)?;

        let (removed, kept): (Vec<_>, Vec<_>) = data.drain(..).partition(|s| predicate(s));
        *by_expense = index(&kept);
        *data = kept;

        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.len())
    }
}

fn index(settlements: &[Settlement]) -> HashMap<ExpenseId, Vec<SettlementId>> {
    let mut by_expense: HashMap<ExpenseId, Vec<SettlementId>> = HashMap::new();
    for settlement in settlements {
        if let Some(expense_id) = settlement.expense_id {
            by_expense.entry(expense_id).or_default().push(settlement.id);
        }
    }
    by_expense
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, SettlementRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = SettlementRepository::new(temp_dir.path().join("settlements.json"));
        (temp_dir, repo)
    }

    fn transfer(cents: i64) -> Settlement {
        Settlement::new(PersonId::new(), PersonId::new(), Money::from_cents(cents))
    }

    #[test]
    fn test_insertion_order_survives_reload() {
        let (temp_dir, repo) = create_test_repo();
        for cents in [300, 100, 200] {
            repo.upsert(transfer(cents)).unwrap();
        }
        repo.save().unwrap();

        let reloaded = SettlementRepository::new(temp_dir.path().join("settlements.json"));
        reloaded.load().unwrap();

        let amounts: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .iter()
            .map(|s| s.amount.cents())
            .collect();
        assert_eq!(amounts, vec![300, 100, 200]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (_temp_dir, repo) = create_test_repo();
        let first = transfer(500);
        repo.upsert(first.clone()).unwrap();
        repo.upsert(transfer(700)).unwrap();

        let mut updated = first.clone();
        updated.amount = Money::from_cents(200);
        repo.upsert(updated).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].amount, Money::from_cents(200));
    }

    #[test]
    fn test_expense_index() {
        let (_temp_dir, repo) = create_test_repo();
        let expense_id = ExpenseId::new();

        repo.upsert(transfer(100).for_expense(expense_id)).unwrap();
        repo.upsert(transfer(200).for_expense(expense_id)).unwrap();
        repo.upsert(transfer(300)).unwrap();

        assert_eq!(repo.get_by_expense(expense_id).unwrap().len(), 2);
        assert!(repo.get_by_expense(ExpenseId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_outstanding_keeps_paid() {
        let (_temp_dir, repo) = create_test_repo();
        let expense_id = ExpenseId::new();
        let mut paid = transfer(100).for_expense(expense_id);
        paid.mark_paid(Utc::now());

        repo.upsert(paid.clone()).unwrap();
        repo.upsert(transfer(200).for_expense(expense_id)).unwrap();
        repo.upsert(transfer(300)).unwrap();

        let removed = repo.remove_outstanding().unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(repo.get_all().unwrap(), vec![paid.clone()]);
        assert_eq!(repo.get_by_expense(expense_id).unwrap(), vec![paid]);
        assert!(repo.get_outstanding().unwrap().is_empty());
    }

    #[test]
    fn test_remove_outstanding_for_expense() {
        let (_temp_dir, repo) = create_test_repo();
        let (dinner, taxi) = (ExpenseId::new(), ExpenseId::new());
        repo.upsert(transfer(100).for_expense(dinner)).unwrap();
        repo.upsert(transfer(200).for_expense(taxi)).unwrap();
        repo.upsert(transfer(300)).unwrap();

        let removed = repo.remove_outstanding_for_expense(dinner).unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(repo.count().unwrap(), 2);
        assert!(repo.get_by_expense(dinner).unwrap().is_empty());
        assert_eq!(repo.get_by_expense(taxi).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_untagged_and_paid() {
        let (_temp_dir, repo) = create_test_repo();
        let dinner = ExpenseId::new();
        let mut paid = transfer(100);
        paid.mark_paid(Utc::now());
        let tagged = transfer(200).for_expense(dinner);

        repo.upsert(paid.clone()).unwrap();
        repo.upsert(tagged.clone()).unwrap();
        repo.upsert(transfer(300)).unwrap();

        let untagged = repo.remove_outstanding_untagged().unwrap();
        assert_eq!(untagged.len(), 1);
        assert_eq!(untagged[0].amount, Money::from_cents(300));
        assert_eq!(repo.get_all().unwrap(), vec![paid.clone(), tagged.clone()]);

        assert_eq!(repo.remove_paid().unwrap(), vec![paid]);
        assert_eq!(repo.get_all().unwrap(), vec![tagged.clone()]);
        assert_eq!(repo.get_by_expense(dinner).unwrap(), vec![tagged]);
    }

    #[test]
    fn test_involves() {
        let (_temp_dir, repo) = create_test_repo();
        let settlement = transfer(100);
        repo.upsert(settlement.clone()).unwrap();

        assert!(repo.involves(settlement.from).unwrap());
        assert!(repo.involves(settlement.to).unwrap());
        assert!(!repo.involves(PersonId::new()).unwrap());
    }
}
