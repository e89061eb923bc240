//! Change summaries for audit entries
//!
//! Compares two serialized ledger records field by field. Values are
//! rendered the way the rest of the CLI shows them: cents as currency,
//! the `paid` flag as a status, participant lists by head count.

use serde_json::Value;

use crate::display::truncate;
use crate::models::Money;

/// Bookkeeping fields that change on every write
const IGNORED: &[&str] = &["created_at", "updated_at"];

const TEXT_MAX: usize = 50;

/// One top-level field that differs between two snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange<'a> {
    pub field: &'a str,
    /// `None` when the field was added
    pub before: Option<&'a Value>,
    /// `None` when the field was removed
    pub after: Option<&'a Value>,
}

impl FieldChange<'_> {
    pub fn render(&self, symbol: &str) -> String {
        let side = |value: Option<&Value>| match value {
            Some(value) => render_value(self.field, value, symbol),
            None => "(none)".to_string(),
        };
        format!("{}: {} -> {}", self.field, side(self.before), side(self.after))
    }
}

/// Fields that differ, in key order, followed by fields only `after` has
///
/// Anything other than a pair of objects yields no changes.
pub fn field_changes<'a>(before: &'a Value, after: &'a Value) -> Vec<FieldChange<'a>> {
    let (Value::Object(old), Value::Object(new)) = (before, after) else {
        return Vec::new();
    };

    let changed = old.iter().filter_map(|(field, value)| match new.get(field) {
        Some(other) if other == value => None,
        other => Some(FieldChange {
            field: field.as_str(),
            before: Some(value),
            after: other,
        }),
    });
    let added = new
        .iter()
        .filter(|(field, _)| !old.contains_key(*field))
        .map(|(field, value)| FieldChange {
            field: field.as_str(),
            before: None,
            after: Some(value),
        });

    changed
        .chain(added)
        .filter(|change| !IGNORED.contains(&change.field))
        .collect()
}

/// Summarize what changed between two serialized records, or `None` if
/// nothing did
pub fn generate_diff(before: &Value, after: &Value, symbol: &str) -> Option<String> {
    let changes = field_changes(before, after);
    if changes.is_empty() {
        return None;
    }
    Some(
        changes
            .iter()
            .map(|change| change.render(symbol))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn render_value(field: &str, value: &Value, symbol: &str) -> String {
    match (field, value) {
        ("amount", Value::Number(n)) => match n.as_i64() {
            Some(cents) => Money::from_cents(cents).format_with_symbol(symbol),
            None => n.to_string(),
        },
        ("payers", Value::Object(payers)) => {
            let total: Money = payers
                .values()
                .filter_map(Value::as_i64)
                .map(Money::from_cents)
                .sum();
            format!("{} from {} payer(s)", total.format_with_symbol(symbol), payers.len())
        }
        ("participants", Value::Array(people)) => format!("{} people", people.len()),
        ("paid", Value::Bool(true)) => "paid".to_string(),
        ("paid", Value::Bool(false)) => "outstanding".to_string(),
        (_, Value::Bool(true)) => "yes".to_string(),
        (_, Value::Bool(false)) => "no".to_string(),
        (_, Value::Null) => "(none)".to_string(),
        (_, Value::String(s)) => truncate(s, TEXT_MAX),
        (_, Value::Number(n)) => n.to_string(),
        (_, Value::Array(items)) => format!("[{} items]", items.len()),
        (_, Value::Object(fields)) => format!("{{{} fields}}", fields.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_renders_as_currency() {
        let before = json!({"from": "per-a", "to": "per-b", "amount": 5000, "paid": false});
        let after = json!({"from": "per-a", "to": "per-b", "amount": 3050, "paid": false});

        assert_eq!(
            generate_diff(&before, &after, "$").as_deref(),
            Some("amount: $50.00 -> $30.50")
        );
        assert_eq!(
            generate_diff(&before, &after, "€").as_deref(),
            Some("amount: €50.00 -> €30.50")
        );
    }

    #[test]
    fn test_payment_status_and_date() {
        let before = json!({"amount": 2000, "paid": false, "date": null});
        let after = json!({"amount": 2000, "paid": true, "date": "2025-06-01T12:00:00Z"});

        let diff = generate_diff(&before, &after, "$").unwrap();

        assert!(diff.contains("paid: outstanding -> paid"));
        assert!(diff.contains("date: (none) -> 2025-06-01T12:00:00Z"));
        assert!(!diff.contains("amount"));
    }

    #[test]
    fn test_timestamps_are_ignored() {
        let before = json!({"name": "Rob", "updated_at": "2025-06-01T00:00:00Z"});
        let after = json!({"name": "Bob", "updated_at": "2025-06-02T00:00:00Z"});

        assert_eq!(
            generate_diff(&before, &after, "$").as_deref(),
            Some("name: Rob -> Bob")
        );

        let touched = json!({"name": "Bob", "updated_at": "2025-06-03T00:00:00Z"});
        assert!(generate_diff(&after, &touched, "$").is_none());
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"amount": 100, "note": "cash"});
        let after = json!({"amount": 100, "expense_id": "exp-1"});

        let changes = field_changes(&before, &after);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].render("$"), "note: cash -> (none)");
        assert_eq!(changes[1].render("$"), "expense_id: (none) -> exp-1");
    }

    #[test]
    fn test_expense_fields() {
        let before = json!({
            "description": "Dinner",
            "payers": {"per-a": 6000, "per-b": 3000},
            "participants": ["per-a", "per-b", "per-c"],
        });
        let after = json!({
            "description": "é".repeat(80),
            "payers": {"per-a": 9000},
            "participants": ["per-a", "per-b"],
        });

        let diff = generate_diff(&before, &after, "$").unwrap();

        assert!(diff.contains("participants: 3 people -> 2 people"));
        assert!(diff.contains("payers: $90.00 from 2 payer(s) -> $90.00 from 1 payer(s)"));
        assert!(diff.contains("..."));
    }

    #[test]
    fn test_non_objects_have_no_fields() {
        assert!(field_changes(&json!(1), &json!(2)).is_empty());
        assert!(generate_diff(&json!({"a": 1}), &json!({"a": 1}), "$").is_none());
    }
}
