//! `balance` command

use crate::config::settings::Settings;
use crate::display::format_balances;
use crate::error::SplitResult;
use crate::export::BalanceRow;
use crate::services::SettlementService;
use crate::storage::Storage;

/// Print everyone's net balance, as a table or as JSON
pub fn handle_balance_command(storage: &Storage, settings: &Settings, json: bool) -> SplitResult<()> {
    let balances = SettlementService::new(storage).balances()?;
    let ledger = storage.snapshot()?;

    if json {
        let rows = BalanceRow::from_ledger(&ledger, &balances);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!(
            "{}",
            format_balances(&balances, &ledger, &settings.currency_symbol)
        );
    }

    Ok(())
}
