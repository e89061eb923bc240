//! Core data models for SplitLedger
//!
//! People, the expenses they share, and the settlements that pay debts off.

pub mod expense;
pub mod ids;
pub mod money;
pub mod person;
pub mod settlement;

pub use expense::{Expense, ExpenseValidationError};
pub use ids::{ExpenseId, PersonId, SettlementId};
pub use money::{Money, MoneyParseError};
pub use person::{Person, PersonValidationError};
pub use settlement::{Settlement, SettlementValidationError};
