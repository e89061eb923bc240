//! Audit logging for SplitLedger
//!
//! Every create, update and delete of a person, expense or settlement is
//! appended to `audit.log` as one JSON line, with the record before and
//! after the change. Updates also carry a readable summary of the fields
//! that changed, with amounts in the configured currency.
//!
//! ```rust,ignore
//! let entry = AuditEntry::new(Operation::Update, EntityType::Settlement, id, None)
//!     .with_before(serde_json::to_value(&before)?)
//!     .with_after(serde_json::to_value(&after)?)
//!     .with_diff(generate_diff(&old, &new, "$"));
//! AuditLogger::new(paths.audit_log()).append(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{field_changes, generate_diff, FieldChange};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
