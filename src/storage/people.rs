//! Person repository, persisted to `people.json`

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Person, PersonId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PeopleData {
    people: Vec<Person>,
}

/// Repository for people with a case-insensitive name index
pub struct PersonRepository {
    path: PathBuf,
    data: RwLock<HashMap<PersonId, Person>>,
    /// Index: normalized name -> person_id
    by_name: RwLock<HashMap<String, PersonId>>,
}

impl PersonRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    /// Load people from disk and rebuild the name index
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: PeopleData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_name = self.by_name.write().map_err(lock_poisoned)?;

        data.clear();
        by_name.clear();

        for person in file_data.people {
            by_name.insert(Person::normalize_name(&person.name), person.id);
            data.insert(person.id, person);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let people = self.get_all()?;
        write_json_atomic(&self.path, &PeopleData { people })
    }

    pub fn get(&self, id: PersonId) -> Result<Option<Person>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// All people in the order they were added
    ///
    /// This order is the tie-break order for settlement planning.
    pub fn get_all(&self) -> Result<Vec<Person>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut people: Vec<_> = data.values().cloned().collect();
        people.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(people)
    }

    /// Exact name lookup (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Person>, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        let by_name = self.by_name.read().map_err(lock_poisoned)?;

        Ok(by_name
            .get(&Person::normalize_name(name))
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Resolve a user reference: a name first, then an id or id prefix
    ///
    /// An id prefix matching more than one person is ambiguous and rejected.
    pub fn find(&self, reference: &str) -> Result<Option<Person>, SplitError> {
        if let Some(person) = self.get_by_name(reference)? {
            return Ok(Some(person));
        }

        let data = self.data.read().map_err(lock_poisoned)?;
        let mut matches = data.values().filter(|p| p.id.matches(reference));

        match (matches.next(), matches.next()) {
            (Some(person), None) => Ok(Some(person.clone())),
            (Some(_), Some(_)) => Err(SplitError::Validation(format!(
                "'{}' matches more than one person; use more of the id",
                reference
            ))),
            _ => Ok(None),
        }
    }

    /// Insert or update a person, keeping the name index in sync
    pub fn upsert(&self, person: Person) -> Result<(), SplitError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_name = self.by_name.write().map_err(lock_poisoned)?;

        if let Some(old) = data.get(&person.id) {
            by_name.remove(&Person::normalize_name(&old.name));
        }

        by_name.insert(Person::normalize_name(&person.name), person.id);
        data.insert(person.id, person);
        Ok(())
    }

    pub fn delete(&self, id: PersonId) -> Result<bool, SplitError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_name = self.by_name.write().map_err(lock_poisoned)?;

        match data.remove(&id) {
            Some(person) => {
                by_name.remove(&Person::normalize_name(&person.name));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PersonRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PersonRepository::new(temp_dir.path().join("people.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Person::new("Alice")).unwrap();

        let found = repo.get_by_name("  ALICE ").unwrap();
        assert_eq!(found.unwrap().name, "Alice");
        assert!(repo.get_by_name("Bob").unwrap().is_none());
    }

    #[test]
    fn test_find_by_id_prefix() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = Person::new("Alice");
        repo.upsert(alice.clone()).unwrap();

        let found = repo.find(&alice.id.to_string()).unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(repo.find("nobody").unwrap().is_none());
    }

    #[test]
    fn test_rename_updates_index() {
        let (_temp_dir, repo) = create_test_repo();
        let mut person = Person::new("Rob");
        repo.upsert(person.clone()).unwrap();

        person.name = "Bob".into();
        repo.upsert(person).unwrap();

        assert!(repo.get_by_name("Rob").unwrap().is_none());
        assert!(repo.get_by_name("Bob").unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload_keeps_order() {
        let (temp_dir, repo) = create_test_repo();
        let names = ["Carol", "Alice", "Bob"];
        for (i, name) in names.iter().enumerate() {
            let mut person = Person::new(*name);
            person.created_at += chrono::Duration::seconds(i as i64);
            repo.upsert(person).unwrap();
        }
        repo.save().unwrap();

        let reloaded = PersonRepository::new(temp_dir.path().join("people.json"));
        reloaded.load().unwrap();

        let loaded: Vec<_> = reloaded.get_all().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(loaded, names);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let person = Person::new("Alice");
        let id = person.id;
        repo.upsert(person).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.get_by_name("Alice").unwrap().is_none());
    }
}
