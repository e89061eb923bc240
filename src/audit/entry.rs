//! Audit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::{Money, Settlement};
use crate::storage::LedgerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "created",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
        })
    }
}

/// The kind of ledger record an entry is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Expense,
    Settlement,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityType::Person => "person",
            EntityType::Expense => "expense",
            EntityType::Settlement => "settlement",
        })
    }
}

/// One change to the ledger, with the record as it was before and after
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    /// Short id of the record (`set-1a2b3c4d`)
    pub entity_id: String,

    /// Person name or expense description at the time of the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// An entry stamped now, with no snapshots attached yet
    pub fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }

    pub fn with_diff(mut self, diff_summary: Option<String>) -> Self {
        self.diff_summary = diff_summary;
        self
    }

    /// The latest known state of the record
    fn state(&self) -> Option<&Value> {
        self.after.as_ref().or(self.before.as_ref())
    }

    /// What the record is, in ledger terms: "Bob -> Alice $40.00",
    /// "Dinner $90.00" or a person's name
    pub fn subject(&self, ledger: &LedgerSnapshot, symbol: &str) -> String {
        match self.entity_type {
            EntityType::Settlement => self
                .state()
                .and_then(|state| Settlement::deserialize(state).ok())
                .map(|s| {
                    format!(
                        "{} -> {} {}",
                        ledger.name_of(s.from),
                        ledger.name_of(s.to),
                        s.amount.format_with_symbol(symbol)
                    )
                })
                .unwrap_or_default(),
            EntityType::Expense => {
                let amount = self
                    .state()
                    .and_then(|state| state.get("amount"))
                    .and_then(Value::as_i64)
                    .map(|cents| Money::from_cents(cents).format_with_symbol(symbol));
                [self.entity_name.clone(), amount]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            EntityType::Person => self
                .entity_name
                .clone()
                .or_else(|| {
                    self.state()
                        .and_then(|state| state.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_default(),
        }
    }

    /// A line for the `audit` command, plus an indented line of changes
    pub fn describe(&self, ledger: &LedgerSnapshot, symbol: &str) -> String {
        let mut output = format!(
            "{}  {} {}  {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.entity_type,
            self.operation,
            self.entity_id
        );

        let subject = self.subject(ledger, symbol);
        if !subject.is_empty() {
            output.push_str("  ");
            output.push_str(&subject);
        }
        if let Some(diff) = &self.diff_summary {
            output.push_str("\n    ");
            output.push_str(diff);
        }
        output
    }
}
