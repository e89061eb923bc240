//! Person service
//!
//! Adding, renaming and removing group members.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{SplitError, SplitResult};
use crate::models::Person;
use crate::storage::Storage;

pub struct PersonService<'a> {
    storage: &'a Storage,
}

impl<'a> PersonService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a person; names are unique case-insensitively
    pub fn create(&self, name: &str) -> SplitResult<Person> {
        let name = name.trim();

        if self.storage.people.get_by_name(name)?.is_some() {
            return Err(SplitError::Duplicate {
                entity_type: "Person",
                identifier: name.to_string(),
            });
        }

        let person = Person::new(name);
        person
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.people.upsert(person.clone())?;
        self.storage.people.save()?;

        self.storage.log_create(
            EntityType::Person,
            person.id.to_string(),
            Some(person.name.clone()),
            &person,
        )?;

        info!(person = %person.id, name = %person.name, "person added");
        Ok(person)
    }

    /// Find a person by name or id prefix
    pub fn find(&self, reference: &str) -> SplitResult<Option<Person>> {
        self.storage.people.find(reference)
    }

    /// Like [`find`](Self::find), but a miss is a `NotFound` error
    pub fn resolve(&self, reference: &str) -> SplitResult<Person> {
        self.find(reference)?
            .ok_or_else(|| SplitError::person_not_found(reference))
    }

    pub fn list(&self) -> SplitResult<Vec<Person>> {
        self.storage.people.get_all()
    }

    pub fn rename(&self, reference: &str, new_name: &str) -> SplitResult<Person> {
        let before = self.resolve(reference)?;
        let new_name = new_name.trim();

        if let Some(existing) = self.storage.people.get_by_name(new_name)? {
            if existing.id != before.id {
                return Err(SplitError::Duplicate {
                    entity_type: "Person",
                    identifier: new_name.to_string(),
                });
            }
        }

        let mut person = before.clone();
        person.name = new_name.to_string();
        person.updated_at = chrono::Utc::now();
        person
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.people.upsert(person.clone())?;
        self.storage.people.save()?;

        self.storage.log_update(
            EntityType::Person,
            person.id.to_string(),
            Some(person.name.clone()),
            &before,
            &person,
            None,
        )?;

        Ok(person)
    }

    /// Remove a person who appears in no expense and no settlement
    ///
    /// Removing someone still in the ledger would change everyone else's
    /// balances, so it is rejected.
    pub fn remove(&self, reference: &str) -> SplitResult<Person> {
        let person = self.resolve(reference)?;

        let expenses = self.storage.expenses.get_by_person(person.id)?;
        if !expenses.is_empty() {
            return Err(SplitError::Validation(format!(
                "{} is part of {} expense(s); delete those first",
                person.name,
                expenses.len()
            )));
        }

        if self.storage.settlements.involves(person.id)? {
            return Err(SplitError::Validation(format!(
                "{} has settlement history and cannot be removed",
                person.name
            )));
        }

        self.storage.people.delete(person.id)?;
        self.storage.people.save()?;

        self.storage.log_delete(
            EntityType::Person,
            person.id.to_string(),
            Some(person.name.clone()),
            &person,
        )?;

        info!(person = %person.id, "person removed");
        Ok(person)
    }
}
