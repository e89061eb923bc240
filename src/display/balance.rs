//! Balance and settlement formatting

use crate::engine::{is_settled, Balances, PairNet};
use crate::models::{PersonId, Settlement};
use crate::storage::LedgerSnapshot;

use super::column_width;

fn status(amount: crate::models::Money) -> &'static str {
    if is_settled(amount) {
        "settled up"
    } else if amount.is_positive() {
        "is owed"
    } else {
        "owes"
    }
}

/// One row per person, in the order people were added
///
/// Anyone in `balances` who is no longer in the ledger is listed last by id.
pub fn format_balances(balances: &Balances, ledger: &LedgerSnapshot, symbol: &str) -> String {
    if balances.is_empty() {
        return "No balances to show.\n".to_string();
    }

    let mut order: Vec<PersonId> = ledger
        .person_ids()
        .into_iter()
        .filter(|id| balances.contains_key(id))
        .collect();
    let mut extra: Vec<PersonId> = balances
        .keys()
        .copied()
        .filter(|id| !order.contains(id))
        .collect();
    extra.sort();
    order.extend(extra);

    let rows: Vec<(String, String, &str)> = order
        .iter()
        .map(|id| {
            let amount = balances[id];
            (ledger.name_of(*id), amount.format_with_symbol(symbol), status(amount))
        })
        .collect();

    let name_width = column_width(rows.iter().map(|r| r.0.as_str()), 6);

    let mut output = format!("{:<name_width$}  {:>12}  {}\n", "Person", "Balance", "Status");
    output.push_str(&format!("{:-<name_width$}  {:->12}  {:-<10}\n", "", "", ""));
    for (name, amount, status) in &rows {
        output.push_str(&format!("{:<name_width$}  {:>12}  {}\n", name, amount, status));
    }

    output
}

/// Settlements as "who pays whom", with payment status
pub fn format_settlements(
    settlements: &[Settlement],
    ledger: &LedgerSnapshot,
    symbol: &str,
) -> String {
    if settlements.is_empty() {
        return "Everyone is settled up.\n".to_string();
    }

    let rows: Vec<_> = settlements
        .iter()
        .map(|s| {
            let state = match s.date {
                Some(date) if s.paid => format!("paid {}", date.format("%Y-%m-%d")),
                _ if s.paid => "paid".to_string(),
                _ => "outstanding".to_string(),
            };
            (
                s.id.to_string(),
                ledger.name_of(s.from),
                ledger.name_of(s.to),
                s.amount.format_with_symbol(symbol),
                state,
            )
        })
        .collect();

    let from_width = column_width(rows.iter().map(|r| r.1.as_str()), 4);
    let to_width = column_width(rows.iter().map(|r| r.2.as_str()), 2);

    let mut output = format!(
        "{:<12}  {:<from_width$}     {:<to_width$}  {:>12}  {}\n",
        "ID", "From", "To", "Amount", "Status"
    );
    output.push_str(&format!(
        "{:-<12}  {:-<from_width$}     {:-<to_width$}  {:->12}  {:-<11}\n",
        "", "", "", "", ""
    ));
    for (id, from, to, amount, state) in &rows {
        output.push_str(&format!(
            "{:<12}  {:<from_width$}  -> {:<to_width$}  {:>12}  {}\n",
            id, from, to, amount, state
        ));
    }

    output
}

/// Net debts per pair, one line each
pub fn format_pair_nets(nets: &[PairNet], ledger: &LedgerSnapshot, symbol: &str) -> String {
    if nets.is_empty() {
        return "Nothing outstanding.\n".to_string();
    }

    let names: Vec<(String, String)> = nets
        .iter()
        .map(|n| (ledger.name_of(n.from), ledger.name_of(n.to)))
        .collect();
    let from_width = column_width(names.iter().map(|n| n.0.as_str()), 4);
    let to_width = column_width(names.iter().map(|n| n.1.as_str()), 2);

    let mut output = String::new();
    for (net, (from, to)) in nets.iter().zip(&names) {
        output.push_str(&format!(
            "{:<from_width$}  pays {:<to_width$}  {:>12}  ({} settlement{})\n",
            from,
            to,
            net.amount.format_with_symbol(symbol),
            net.settlements,
            if net.settlements == 1 { "" } else { "s" }
        ));
    }
    output
}
