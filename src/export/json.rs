//! JSON export of the complete ledger

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{compute_balances, plan_settlements, Balances};
use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, Money, Person, PersonId, Settlement};
use crate::storage::{LedgerSnapshot, Storage};

pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything in the ledger, plus what the engine derives from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,

    pub people: Vec<Person>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,

    /// Net balance per person at export time, in ledger order
    pub balances: Vec<BalanceRow>,

    /// Transfers that would settle the balances above
    pub suggested: Vec<Settlement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub person_id: PersonId,
    pub name: String,
    pub balance: Money,
}

impl BalanceRow {
    /// One row per person, in the order people were added
    pub fn from_ledger(ledger: &LedgerSnapshot, balances: &Balances) -> Vec<Self> {
        ledger
            .people
            .iter()
            .map(|p| Self {
                person_id: p.id,
                name: p.name.clone(),
                balance: balances.get(&p.id).copied().unwrap_or_default(),
            })
            .collect()
    }
}

impl LedgerExport {
    pub fn from_storage(storage: &Storage) -> SplitResult<Self> {
        let snapshot = storage.snapshot()?;
        let persons = snapshot.person_ids();
        let balances = compute_balances(&persons, &snapshot.expenses, &snapshot.settlements);
        let suggested = plan_settlements(&persons, &balances);

        let balance_rows = BalanceRow::from_ledger(&snapshot, &balances);

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            people: snapshot.people,
            expenses: snapshot.expenses,
            settlements: snapshot.settlements,
            balances: balance_rows,
            suggested,
        })
    }

    /// Check the schema version and that every expense and settlement only
    /// refers to people in the export
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let known: HashSet<PersonId> = self.people.iter().map(|p| p.id).collect();

        for expense in &self.expenses {
            let referenced = expense.payers.keys().chain(expense.participants.iter());
            if let Some(unknown) = referenced.into_iter().find(|id| !known.contains(*id)) {
                return Err(format!(
                    "Expense {} references unknown person {}",
                    expense.id, unknown
                ));
            }
        }

        for settlement in self.settlements.iter().chain(&self.suggested) {
            for id in [settlement.from, settlement.to] {
                if !known.contains(&id) {
                    return Err(format!(
                        "Settlement {} references unknown person {}",
                        settlement.id, id
                    ));
                }
            }
        }

        Ok(())
    }
}

pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> SplitResult<()> {
    let export = LedgerExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SplitError::Export(e.to_string()))
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> SplitResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| SplitError::Export(e.to_string()))?;
    export.validate().map_err(SplitError::Export)?;
    Ok(export)
}
