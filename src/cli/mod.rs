//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod balance;
pub mod expense;
pub mod export;
pub mod person;
pub mod settle;

pub use audit::handle_audit_command;
pub use balance::handle_balance_command;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, CsvTable, ExportArgs, ExportFormat};
pub use person::{handle_person_command, PersonCommands};
pub use settle::{handle_settle_command, SettleCommands};

use crate::models::Money;

/// clap value parser for amounts such as `90`, `42.5` or `$12.30`
pub(crate) fn parse_money(s: &str) -> Result<Money, String> {
    Money::parse(s).map_err(|e| e.to_string())
}
