//! Balance and settlement engine
//!
//! Pure functions over an in-memory ledger snapshot:
//!
//! - [`compute_balances`] folds expenses and paid settlements into each
//!   person's net position (positive = owed money, negative = owes money).
//! - [`plan_settlements`] turns balances into a short list of transfers by
//!   greedily matching the largest debtor with the largest creditor.
//! - [`resolve_partial_payment`] pays a settlement in full or in part,
//!   splitting off the residual that is still owed.
//! - [`net_outstanding`] folds outstanding settlements into one figure per
//!   pair of people.
//!
//! None of these touch storage; the service layer applies their results.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use splitledger::engine::{compute_balances, plan_settlements};
//! use splitledger::models::{Expense, Money, PersonId};
//!
//! let (a, b) = (PersonId::new(), PersonId::new());
//! let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let dinner = Expense::paid_by("Dinner", Money::from_cents(10000), a, vec![a, b], date);
//!
//! let balances = compute_balances(&[a, b], &[dinner], &[]);
//! let plan = plan_settlements(&[a, b], &balances);
//!
//! assert_eq!(plan.len(), 1);
//! assert_eq!((plan[0].from, plan[0].to, plan[0].amount), (b, a, Money::from_cents(5000)));
//! ```

pub mod balance;
pub mod netting;
pub mod partial;
pub mod planner;

use std::collections::HashMap;

use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, Money, PersonId};

pub use balance::compute_balances;
pub use netting::{net_outstanding, PairNet};
pub use partial::{resolve_partial_payment, PartialPayment};
pub use planner::plan_settlements;

/// Net position per person
pub type Balances = HashMap<PersonId, Money>;

/// Amounts at or below one cent count as settled
pub const SETTLEMENT_EPSILON: Money = Money::from_cents(1);

/// Check whether a balance (or residual) is close enough to zero to ignore
pub fn is_settled(amount: Money) -> bool {
    amount.abs() <= SETTLEMENT_EPSILON
}

/// Reject an expense whose payers don't cover its total or that has no
/// participants
///
/// Callers run this before an expense reaches the ledger so a bad expense
/// never contributes to balances.
pub fn validate_expense(expense: &Expense) -> SplitResult<()> {
    expense
        .validate()
        .map_err(|e| SplitError::InvalidExpenseData(e.to_string()))
}

/// Sum of every balance; zero for any consistent ledger
pub fn balance_total(balances: &Balances) -> Money {
    balances.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_is_settled_boundary() {
        assert!(is_settled(Money::zero()));
        assert!(is_settled(Money::from_cents(1)));
        assert!(is_settled(Money::from_cents(-1)));
        assert!(!is_settled(Money::from_cents(2)));
        assert!(!is_settled(Money::from_cents(-2)));
    }

    #[test]
    fn test_validate_expense_maps_error() {
        let a = PersonId::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let expense = Expense::paid_by("Coffee", Money::from_cents(500), a, vec![], date);

        let err = validate_expense(&expense).unwrap_err();
        assert!(matches!(err, SplitError::InvalidExpenseData(_)));
    }
}
