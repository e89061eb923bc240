//! CLI command for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{SplitError, SplitResult};
use crate::export::{
    export_expenses_csv, export_full_json, export_full_yaml, export_settlements_csv,
};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON (full ledger)
    Json,
    /// YAML (full ledger, human-readable)
    Yaml,
    /// CSV (one table, see --table)
    Csv,
}

/// Which records a CSV export contains
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum CsvTable {
    #[default]
    Expenses,
    Settlements,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Table to export as CSV
    #[arg(short, long, value_enum, default_value_t = CsvTable::Expenses)]
    pub table: CsvTable,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle export
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> SplitResult<()> {
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                SplitError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        ExportFormat::Json => export_full_json(storage, &mut writer, args.pretty)?,
        ExportFormat::Yaml => export_full_yaml(storage, &mut writer)?,
        ExportFormat::Csv => match args.table {
            CsvTable::Expenses => export_expenses_csv(storage, &mut writer)?,
            CsvTable::Settlements => export_settlements_csv(storage, &mut writer)?,
        },
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Exported to {}", path.display());
    }
    Ok(())
}
