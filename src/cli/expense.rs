//! Expense CLI commands

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{SplitError, SplitResult};
use crate::models::Money;
use crate::services::{ExpenseService, NewExpense, PersonService};
use crate::storage::Storage;

use super::parse_money;

/// One `--payer NAME=AMOUNT` argument
#[derive(Debug, Clone)]
pub struct PayerArg {
    pub person: String,
    pub amount: Money,
}

fn parse_payer(s: &str) -> Result<PayerArg, String> {
    let (person, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{}'", s))?;
    if person.trim().is_empty() {
        return Err(format!("missing payer name in '{}'", s));
    }
    Ok(PayerArg {
        person: person.trim().to_string(),
        amount: parse_money(amount)?,
    })
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    Add {
        /// What the money was spent on
        description: String,
        /// Total amount, e.g. 90 or 42.50
        #[arg(value_parser = parse_money)]
        amount: Money,
        /// Who paid and how much, as NAME=AMOUNT (repeatable)
        #[arg(long = "payer", value_parser = parse_payer, conflicts_with = "paid_by")]
        payers: Vec<PayerArg>,
        /// Single person who paid the whole amount
        #[arg(long)]
        paid_by: Option<String>,
        /// Person sharing the cost (repeatable)
        #[arg(short, long = "participant", conflicts_with = "split_all")]
        participants: Vec<String>,
        /// Split between everyone in the ledger
        #[arg(long)]
        split_all: bool,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List expenses
    List {
        /// Only expenses this person paid for or shares
        #[arg(short, long)]
        person: Option<String>,
    },
    /// Show an expense with every participant's share
    Show {
        /// Expense ID
        expense: String,
    },
    /// Delete an expense and its unpaid settlements
    Delete {
        /// Expense ID
        expense: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SplitResult<()> {
    let service = ExpenseService::new(storage, settings);

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            payers,
            paid_by,
            participants,
            split_all,
            date,
        } => {
            let payers = match paid_by {
                Some(person) => vec![(person, amount)],
                None if payers.is_empty() => {
                    return Err(SplitError::Validation(
                        "Say who paid with --paid-by NAME or --payer NAME=AMOUNT".into(),
                    ));
                }
                None => payers.into_iter().map(|p| (p.person, p.amount)).collect(),
            };

            let participants = if split_all {
                PersonService::new(storage)
                    .list()?
                    .into_iter()
                    .map(|p| p.name)
                    .collect()
            } else if participants.is_empty() {
                return Err(SplitError::Validation(
                    "Name who shares the cost with --participant NAME or use --split-all".into(),
                ));
            } else {
                participants
            };

            let expense = service.create(NewExpense {
                description,
                amount,
                payers,
                participants,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
            })?;

            println!(
                "Recorded {} ({}) split {} ways: {} each",
                expense.description,
                expense.amount.format_with_symbol(&settings.currency_symbol),
                expense.participants.len(),
                expense
                    .split_amount()
                    .format_with_symbol(&settings.currency_symbol),
            );
            println!("ID: {}", expense.id);
        }

        ExpenseCommands::List { person } => {
            let expenses = service.list(person.as_deref())?;
            let ledger = storage.snapshot()?;
            print!("{}", format_expense_list(&expenses, &ledger, settings));
        }

        ExpenseCommands::Show { expense } => {
            let expense = service.resolve(&expense)?;
            let ledger = storage.snapshot()?;
            print!("{}", format_expense_details(&expense, &ledger, settings));
        }

        ExpenseCommands::Delete { expense } => {
            let deleted = service.delete(&expense)?;
            println!("Deleted {} ({})", deleted.description, deleted.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payer() {
        let payer = parse_payer("Alice=42.50").unwrap();
        assert_eq!(payer.person, "Alice");
        assert_eq!(payer.amount, Money::from_cents(4250));

        let spaced = parse_payer("Mary Ann = 10").unwrap();
        assert_eq!(spaced.person, "Mary Ann");
        assert_eq!(spaced.amount, Money::from_cents(1000));
    }

    #[test]
    fn test_parse_payer_rejects_bad_input() {
        assert!(parse_payer("Alice").is_err());
        assert!(parse_payer("=10").is_err());
        assert!(parse_payer("Alice=ten").is_err());
    }
}
