//! CSV export of expenses and settlements
//!
//! People are written by name; amounts as plain decimals ("12.50").

use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> SplitError {
    SplitError::Export(e.to_string())
}

/// One row per expense; payers as `Name:amount` pairs separated by `;`
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: W) -> SplitResult<()> {
    let ledger = storage.snapshot()?;
    let mut csv = ::csv::Writer::from_writer(writer);

    csv.write_record([
        "ID",
        "Date",
        "Description",
        "Amount",
        "Paid By",
        "Participants",
        "Split",
    ])
    .map_err(export_err)?;

    for expense in &ledger.expenses {
        let mut payers: Vec<_> = expense
            .payers
            .iter()
            .map(|(id, amount)| format!("{}:{}", ledger.name_of(*id), amount.to_decimal_string()))
            .collect();
        payers.sort();

        let participants: Vec<_> = expense
            .participants
            .iter()
            .map(|id| ledger.name_of(*id))
            .collect();

        csv.write_record([
            expense.id.as_uuid().to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description.clone(),
            expense.amount.to_decimal_string(),
            payers.join(";"),
            participants.join(";"),
            expense.split_amount().to_decimal_string(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)
}

/// One row per persisted settlement, paid and outstanding
pub fn export_settlements_csv<W: Write>(storage: &Storage, writer: W) -> SplitResult<()> {
    let ledger = storage.snapshot()?;
    let mut csv = ::csv::Writer::from_writer(writer);

    csv.write_record(["ID", "From", "To", "Amount", "Status", "Paid At", "Expense"])
        .map_err(export_err)?;

    for settlement in &ledger.settlements {
        csv.write_record([
            settlement.id.as_uuid().to_string(),
            ledger.name_of(settlement.from),
            ledger.name_of(settlement.to),
            settlement.amount.to_decimal_string(),
            if settlement.paid { "paid" } else { "outstanding" }.to_string(),
            settlement.date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            settlement
                .expense_id
                .map(|id| id.as_uuid().to_string())
                .unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)
}
