use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use splitledger::cli::{
    handle_audit_command, handle_balance_command, handle_expense_command, handle_export_command,
    handle_person_command, handle_settle_command,
};
use splitledger::config::{paths::SplitPaths, settings::Settings};
use splitledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitledger",
    version,
    about = "Track shared expenses and settle up with the fewest transfers",
    long_about = "SplitLedger records who paid for what in a group, computes everyone's \
                  net balance and suggests the fewest transfers that settle the group. \
                  Settlements can be paid in full or in part."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Manage the people sharing expenses
    #[command(subcommand)]
    Person(splitledger::cli::PersonCommands),

    /// Record and review shared expenses
    #[command(subcommand, alias = "exp")]
    Expense(splitledger::cli::ExpenseCommands),

    /// Show everyone's net balance
    Balance {
        /// Print balances as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan, save and pay settlements
    #[command(subcommand)]
    Settle(splitledger::cli::SettleCommands),

    /// Export the ledger as JSON, YAML or CSV
    Export(splitledger::cli::ExportArgs),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SPLITLEDGER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SplitPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.set_audit_enabled(settings.audit_enabled);
    storage.set_currency_symbol(settings.currency_symbol.clone());
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("SplitLedger is already initialized at {}", paths.base_dir().display());
                return Ok(());
            }
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialized SplitLedger at {}", paths.base_dir().display());
            println!();
            println!("Next steps:");
            println!("  splitledger person add <name>");
            println!("  splitledger expense add <description> <amount> --paid-by <name> --split-all");
            println!("  splitledger settle plan");
        }
        Some(Commands::Config) => {
            println!("SplitLedger Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Min participants: {}", settings.min_participants);
            println!("  Audit enabled:    {}", settings.audit_enabled);
        }
        Some(Commands::Person(cmd)) => handle_person_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Balance { json }) => handle_balance_command(&storage, &settings, json)?,
        Some(Commands::Settle(cmd)) => handle_settle_command(&storage, &settings, cmd)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, &settings, limit)?,
        None => {
            println!("SplitLedger - shared expenses, settled simply");
            println!();
            println!("Run 'splitledger --help' for usage information.");
            println!("Run 'splitledger init' to get started.");
        }
    }

    Ok(())
}
