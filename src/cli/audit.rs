//! `audit` command

use crate::config::settings::Settings;
use crate::error::SplitResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first, naming people as the
/// ledger knows them now
pub fn handle_audit_command(storage: &Storage, settings: &Settings, limit: usize) -> SplitResult<()> {
    let entries = storage.audit().tail(limit)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    let ledger = storage.snapshot()?;
    for entry in &entries {
        println!("{}", entry.describe(&ledger, &settings.currency_symbol));
    }
    Ok(())
}
