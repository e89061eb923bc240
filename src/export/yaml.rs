//! YAML export of the complete ledger

use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::export::json::LedgerExport;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> SplitError {
    SplitError::Export(e.to_string())
}

/// Write the ledger as YAML, preceded by a short comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> SplitResult<()> {
    let export = LedgerExport::from_storage(storage)?;

    writeln!(writer, "# SplitLedger export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> SplitResult<LedgerExport> {
    let export: LedgerExport = serde_yaml::from_str(yaml_str).map_err(export_err)?;
    export.validate().map_err(SplitError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::create_test_ledger;

    #[test]
    fn test_yaml_export() {
        let (_temp_dir, storage) = create_test_ledger();
        let mut buffer = Vec::new();

        export_full_yaml(&storage, &mut buffer).unwrap();
        let yaml = String::from_utf8(buffer).unwrap();

        assert!(yaml.starts_with("# SplitLedger export"));
        assert!(yaml.contains("schema_version"));
        assert!(yaml.contains("Groceries, market"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let (_temp_dir, storage) = create_test_ledger();
        let mut buffer = Vec::new();
        export_full_yaml(&storage, &mut buffer).unwrap();

        let imported = import_from_yaml(&String::from_utf8(buffer).unwrap()).unwrap();

        assert_eq!(imported.people.len(), 3);
        assert_eq!(imported.settlements.len(), 3);
        assert_eq!(imported.suggested.len(), 2);
    }

    #[test]
    fn test_invalid_yaml_is_export_error() {
        let err = import_from_yaml("people: [").unwrap_err();
        assert!(matches!(err, SplitError::Export(_)));
    }
}
