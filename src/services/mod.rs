//! Service layer for SplitLedger
//!
//! Services sit between the CLI and storage: they resolve user references,
//! validate input before anything is written, run the engine, persist the
//! result and record it in the audit log.

pub mod expense;
pub mod person;
pub mod settlement;

pub use expense::{ExpenseService, NewExpense};
pub use person::PersonService;
pub use settlement::SettlementService;
