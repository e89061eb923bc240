//! Expense formatting

use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::models::Expense;
use crate::storage::LedgerSnapshot;

use super::{column_width, truncate};

/// Render a date with the configured format, falling back to ISO 8601 if
/// the format string is invalid
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => date.format("%Y-%m-%d").to_string(),
    }
}

fn payer_names(expense: &Expense, ledger: &LedgerSnapshot) -> String {
    let mut names: Vec<String> = expense.payers.keys().map(|id| ledger.name_of(*id)).collect();
    names.sort();
    names.join(", ")
}

/// Table of expenses: date, description, amount, payers and head count
pub fn format_expense_list(
    expenses: &[Expense],
    ledger: &LedgerSnapshot,
    settings: &Settings,
) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let symbol = &settings.currency_symbol;
    let rows: Vec<_> = expenses
        .iter()
        .map(|e| {
            (
                e.id.to_string(),
                format_date(e.date, &settings.date_format),
                truncate(&e.description, 30),
                e.amount.format_with_symbol(symbol),
                truncate(&payer_names(e, ledger), 24),
                e.participants.len(),
            )
        })
        .collect();

    let date_width = column_width(rows.iter().map(|r| r.1.as_str()), 4);
    let desc_width = column_width(rows.iter().map(|r| r.2.as_str()), 11);
    let payer_width = column_width(rows.iter().map(|r| r.4.as_str()), 7);

    let mut output = format!(
        "{:<12}  {:<date_width$}  {:<desc_width$}  {:>12}  {:<payer_width$}  {}\n",
        "ID", "Date", "Description", "Amount", "Paid by", "Split"
    );
    output.push_str(&format!(
        "{:-<12}  {:-<date_width$}  {:-<desc_width$}  {:->12}  {:-<payer_width$}  {:-<5}\n",
        "", "", "", "", "", ""
    ));

    for (id, date, description, amount, payers, count) in &rows {
        output.push_str(&format!(
            "{:<12}  {:<date_width$}  {:<desc_width$}  {:>12}  {:<payer_width$}  {}\n",
            id, date, description, amount, payers, count
        ));
    }

    output
}

/// Full breakdown of one expense, including every participant's share
pub fn format_expense_details(
    expense: &Expense,
    ledger: &LedgerSnapshot,
    settings: &Settings,
) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.description));
    output.push_str(&format!("  ID:     {}\n", expense.id));
    output.push_str(&format!(
        "  Date:   {}\n",
        format_date(expense.date, &settings.date_format)
    ));
    output.push_str(&format!(
        "  Amount: {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Split:  {} each\n",
        expense.split_amount().format_with_symbol(symbol)
    ));

    let mut payers: Vec<_> = expense
        .payers
        .iter()
        .map(|(id, amount)| (ledger.name_of(*id), *amount))
        .collect();
    payers.sort();

    output.push_str("\n  Paid by:\n");
    for (name, amount) in &payers {
        output.push_str(&format!("    {:<20} {:>12}\n", name, amount.format_with_symbol(symbol)));
    }

    output.push_str("\n  Shares:\n");
    for (id, share) in expense.shares() {
        output.push_str(&format!(
            "    {:<20} {:>12}\n",
            ledger.name_of(id),
            share.format_with_symbol(symbol)
        ));
    }

    output
}
