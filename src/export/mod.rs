//! Ledger export
//!
//! - JSON and YAML: the complete ledger plus computed balances and the
//!   current suggested plan, with a schema version
//! - CSV: expenses or settlements, one row each, via the `csv` crate

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_expenses_csv, export_settlements_csv};
pub use json::{
    export_full_json, import_from_json, BalanceRow, LedgerExport, EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_full_yaml, import_from_yaml};
