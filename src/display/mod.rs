//! Plain-text formatting for terminal output
//!
//! Formatters return strings; the CLI decides where they go. Amounts are
//! rendered with the configured currency symbol.

pub mod balance;
pub mod expense;
pub mod person;

pub use balance::{format_balances, format_pair_nets, format_settlements};
pub use expense::{format_expense_details, format_expense_list};
pub use person::format_person_list;

/// Shorten `s` to at most `max` characters, marking the cut with `...`
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Width of the widest entry, but never narrower than `min`
pub(crate) fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(min).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dinner", 10), "Dinner");
        assert_eq!(truncate("A very long description", 10), "A very ...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_column_width() {
        assert_eq!(column_width(["Al", "Bob"].into_iter(), 4), 4);
        assert_eq!(column_width(["Alexandra"].into_iter(), 4), 9);
        assert_eq!(column_width(std::iter::empty(), 4), 4);
    }
}
