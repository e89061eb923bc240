//! Storage layer for SplitLedger
//!
//! JSON file storage with atomic writes, one file per collection, plus the
//! audit log every mutation is recorded in.

pub mod expenses;
pub mod file_io;
pub mod people;
pub mod settlements;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use people::PersonRepository;
pub use settlements::SettlementRepository;

use std::sync::PoisonError;

use serde::Serialize;
use tracing::debug;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::paths::SplitPaths;
use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, Person, PersonId, Settlement};

pub(crate) fn lock_poisoned<T>(e: PoisonError<T>) -> SplitError {
    SplitError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Everything the balance engine needs, read in one go
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub people: Vec<Person>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

impl LedgerSnapshot {
    /// Person ids in the order people were added
    pub fn person_ids(&self) -> Vec<PersonId> {
        self.people.iter().map(|p| p.id).collect()
    }

    /// Display name for an id, falling back to the short id
    pub fn name_of(&self, id: PersonId) -> String {
        self.people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SplitPaths,
    pub people: PersonRepository,
    pub expenses: ExpenseRepository,
    pub settlements: SettlementRepository,
    audit: AuditLogger,
    audit_enabled: bool,
    currency_symbol: String,
}

impl Storage {
    /// Create storage rooted at `paths`, creating directories as needed
    pub fn new(paths: SplitPaths) -> SplitResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            people: PersonRepository::new(paths.people_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            settlements: SettlementRepository::new(paths.settlements_file()),
            audit: AuditLogger::new(paths.audit_log()),
            audit_enabled: true,
            currency_symbol: "$".to_string(),
            paths,
        })
    }

    pub fn paths(&self) -> &SplitPaths {
        &self.paths
    }

    pub fn set_audit_enabled(&mut self, enabled: bool) {
        self.audit_enabled = enabled;
    }

    /// Symbol used for amounts in audit change summaries
    pub fn set_currency_symbol(&mut self, symbol: impl Into<String>) {
        self.currency_symbol = symbol.into();
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&mut self) -> SplitResult<()> {
        self.people.load()?;
        self.expenses.load()?;
        self.settlements.load()?;
        debug!(
            people = self.people.count()?,
            expenses = self.expenses.count()?,
            settlements = self.settlements.count()?,
            "ledger loaded"
        );
        Ok(())
    }

    pub fn save_all(&self) -> SplitResult<()> {
        self.people.save()?;
        self.expenses.save()?;
        self.settlements.save()?;
        Ok(())
    }

    /// Read the whole ledger
    pub fn snapshot(&self) -> SplitResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            people: self.people.get_all()?,
            expenses: self.expenses.get_all()?,
            settlements: self.settlements.get_all()?,
        })
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> SplitResult<()> {
        if !self.audit_enabled {
            return Ok(());
        }
        let entry = AuditEntry::new(Operation::Create, entity_type, entity_id, entity_name)
            .with_after(serde_json::to_value(entity)?);
        self.audit.append(&entry)
    }

    /// Record an update; with no explicit summary, one is derived from the
    /// serialized before/after values
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> SplitResult<()> {
        if !self.audit_enabled {
            return Ok(());
        }

        let (before, after) = (serde_json::to_value(before)?, serde_json::to_value(after)?);
        let diff_summary =
            diff_summary.or_else(|| generate_diff(&before, &after, &self.currency_symbol));

        let entry = AuditEntry::new(Operation::Update, entity_type, entity_id, entity_name)
            .with_diff(diff_summary)
            .with_before(before)
            .with_after(after);
        self.audit.append(&entry)
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> SplitResult<()> {
        if !self.audit_enabled {
            return Ok(());
        }
        let entry = AuditEntry::new(Operation::Delete, entity_type, entity_id, entity_name)
            .with_before(serde_json::to_value(entity)?);
        self.audit.append(&entry)
    }
}
