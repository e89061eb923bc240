//! Settlement CLI commands
//!
//! `plan` only prints suggestions; `save` persists them so they can be paid
//! off, fully or in part, with `pay`. `net` and `pay-pair` work on everything
//! outstanding between two people at once.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_pair_nets, format_settlements};
use crate::error::SplitResult;
use crate::models::Money;
use crate::services::SettlementService;
use crate::storage::Storage;

use super::parse_money;

/// Settlement subcommands
#[derive(Subcommand)]
pub enum SettleCommands {
    /// Suggest the transfers that would settle everyone up
    Plan {
        /// Only settle a single expense. Only settlements saved and paid
        /// for this expense count toward it
        #[arg(short, long)]
        expense: Option<String>,
        /// Print the suggestions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the current suggestions, replacing any unpaid ones
    Save {
        /// Save the plan for a single expense. Only settlements saved and
        /// paid for this expense count toward it
        #[arg(short, long)]
        expense: Option<String>,
    },
    /// List saved settlements
    List {
        /// Include paid settlements
        #[arg(short, long)]
        all: bool,
    },
    /// Pay a saved settlement, in full or in part
    Pay {
        /// Settlement ID
        settlement: String,
        /// Amount paid; the full amount when omitted
        #[arg(value_parser = parse_money)]
        amount: Option<Money>,
    },
    /// Show what each pair still owes once opposing settlements cancel out
    Net {
        /// Print the totals as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pay everything outstanding between two people, in both directions
    PayPair {
        /// First person (name or ID)
        first: String,
        /// Second person (name or ID)
        second: String,
    },
    /// Delete paid settlements, along with unpaid plans that depended on them
    Clear,
}

/// Handle a settle command
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SettleCommands,
) -> SplitResult<()> {
    let service = SettlementService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        SettleCommands::Plan { expense, json } => {
            let plan = match expense {
                Some(reference) => service.plan_for_expense(&reference)?,
                None => service.plan()?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", format_settlements(&plan, &storage.snapshot()?, symbol));
            }
        }

        SettleCommands::Save { expense } => {
            let plan = match expense {
                Some(reference) => service.materialize_for_expense(&reference)?,
                None => service.materialize()?,
            };
            print!("{}", format_settlements(&plan, &storage.snapshot()?, symbol));
            if !plan.is_empty() {
                println!(
                    "\nSaved {} settlement(s). Pay one with `splitledger settle pay <id> [amount]`.",
                    plan.len()
                );
            }
        }

        SettleCommands::List { all } => {
            let settlements = service.list(all)?;
            if settlements.is_empty() && !all {
                println!("No outstanding settlements.");
            } else {
                print!(
                    "{}",
                    format_settlements(&settlements, &storage.snapshot()?, symbol)
                );
            }
        }

        SettleCommands::Pay { settlement, amount } => {
            let payment = service.pay(&settlement, amount)?;
            let ledger = storage.snapshot()?;
            let paid = &payment.paid_record;

            println!(
                "{} paid {} {}",
                ledger.name_of(paid.from),
                ledger.name_of(paid.to),
                paid.amount.format_with_symbol(symbol)
            );
            if let Some(residual) = &payment.residual_record {
                println!(
                    "Still owed: {} ({})",
                    residual.amount.format_with_symbol(symbol),
                    residual.id
                );
            } else {
                println!("Settlement {} is fully paid.", paid.id);
            }
        }

        SettleCommands::Net { json } => {
            let nets = service.net()?;
            let ledger = storage.snapshot()?;

            if json {
                let rows: Vec<_> = nets
                    .iter()
                    .map(|n| {
                        serde_json::json!({
                            "from": ledger.name_of(n.from),
                            "to": ledger.name_of(n.to),
                            "amount": n.amount,
                            "settlements": n.settlements,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", format_pair_nets(&nets, &ledger, symbol));
            }
        }

        SettleCommands::PayPair { first, second } => {
            let paid = service.pay_pair(&first, &second)?;
            print!("{}", format_settlements(&paid, &storage.snapshot()?, symbol));
            println!("\nMarked {} settlement(s) as paid.", paid.len());
        }

        SettleCommands::Clear => {
            let removed = service.clear_history()?;
            if removed.is_empty() {
                println!("No paid settlements to clear.");
            } else {
                println!("Removed {} settlement(s).", removed.len());
            }
        }
    }

    Ok(())
}
