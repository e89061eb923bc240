//! Settlement model
//!
//! A transfer of money from a debtor to a creditor. Unpaid settlements are
//! suggestions (or materialized outstanding debts); paid ones are history and
//! count toward balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, PersonId, SettlementId};
use super::money::Money;

/// A suggested or completed payment between two people
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,

    /// The person paying off debt
    pub from: PersonId,

    /// The person being paid
    pub to: PersonId,

    /// Amount transferred, always positive
    pub amount: Money,

    /// Whether the payment has been made
    #[serde(default)]
    pub paid: bool,

    /// Completion time; `None` while outstanding
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// The expense this settlement was planned for, if planned per expense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<ExpenseId>,
}

impl Settlement {
    /// Create a new outstanding settlement
    pub fn new(from: PersonId, to: PersonId, amount: Money) -> Self {
        Self {
            id: SettlementId::new(),
            from,
            to,
            amount,
            paid: false,
            date: None,
            expense_id: None,
        }
    }

    /// Create a settlement already completed at `date`
    pub fn completed(from: PersonId, to: PersonId, amount: Money, date: DateTime<Utc>) -> Self {
        Self {
            paid: true,
            date: Some(date),
            ..Self::new(from, to, amount)
        }
    }

    /// Tag this settlement with the expense it settles
    pub fn for_expense(mut self, expense_id: ExpenseId) -> Self {
        self.expense_id = Some(expense_id);
        self
    }

    /// Check whether this settlement is still owed
    pub fn is_outstanding(&self) -> bool {
        !self.paid
    }

    /// Flip to paid at `date`
    pub fn mark_paid(&mut self, date: DateTime<Utc>) {
        self.paid = true;
        self.date = Some(date);
    }

    /// Check whether the transfer (ignoring id and status) is the same
    pub fn same_transfer(&self, other: &Settlement) -> bool {
        self.from == other.from && self.to == other.to && self.amount == other.amount
    }

    /// Validate the settlement
    pub fn validate(&self) -> Result<(), SettlementValidationError> {
        if !self.amount.is_positive() {
            return Err(SettlementValidationError::NonPositiveAmount(self.amount));
        }

        if self.from == self.to {
            return Err(SettlementValidationError::SelfPayment);
        }

        if self.paid != self.date.is_some() {
            return Err(SettlementValidationError::InconsistentPaidDate);
        }

        Ok(())
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)?;
        if self.paid {
            write!(f, " (paid)")?;
        }
        Ok(())
    }
}

/// Validation errors for settlements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementValidationError {
    NonPositiveAmount(Money),
    SelfPayment,
    InconsistentPaidDate,
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Settlement amount must be positive, got {}", amount)
            }
            Self::SelfPayment => write!(f, "A person cannot settle with themselves"),
            Self::InconsistentPaidDate => {
                write!(f, "A settlement has a date if and only if it is paid")
            }
        }
    }
}

impl std::error::Error for SettlementValidationError {}
