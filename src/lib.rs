//! SplitLedger - shared expense tracking with settlement planning
//!
//! This library records expenses shared within a group, folds them into a
//! net balance per person and plans the transfers that settle everyone up.
//! Settlements can be paid in full or in part.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `engine`: Pure balance, settlement planning and partial payment logic
//! - `models`: Core data models (people, expenses, settlements, money)
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Plain-text formatting
//! - `export`: JSON, YAML and CSV export
//! - `cli`: Command handlers for the `splitledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use splitledger::config::paths::SplitPaths;
//! use splitledger::services::SettlementService;
//! use splitledger::storage::Storage;
//!
//! let mut storage = Storage::new(SplitPaths::new()?)?;
//! storage.load_all()?;
//! let plan = SettlementService::new(&storage).plan()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SplitError, SplitResult};
