//! Expense model
//!
//! One shared cost: who paid how much, and who splits it. Expenses are
//! immutable once recorded; the only lifecycle transition is deletion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::ids::{ExpenseId, PersonId};
use super::money::Money;

/// A shared expense with one or more payers and participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// What the money was spent on
    pub description: String,

    /// Total cost
    pub amount: Money,

    /// How much each payer personally paid
    pub payers: HashMap<PersonId, Money>,

    /// People splitting the cost, in entry order
    pub participants: Vec<PersonId>,

    /// When the expense happened
    pub date: NaiveDate,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        payers: HashMap<PersonId, Money>,
        participants: Vec<PersonId>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into(),
            amount,
            payers,
            participants,
            date,
            created_at: Utc::now(),
        }
    }

    /// Create an expense paid in full by a single person
    pub fn paid_by(
        description: impl Into<String>,
        amount: Money,
        payer: PersonId,
        participants: Vec<PersonId>,
        date: NaiveDate,
    ) -> Self {
        let payers = HashMap::from([(payer, amount)]);
        Self::new(description, amount, payers, participants, date)
    }

    /// Per-participant share, `amount / |participants|` truncated to the cent
    ///
    /// Use [`Expense::shares`] for the exact amounts folded into balances.
    pub fn split_amount(&self) -> Money {
        if self.participants.is_empty() {
            return Money::zero();
        }
        Money::from_cents(self.amount.cents().div_euclid(self.participants.len() as i64))
    }

    /// Exact share owed by each participant
    ///
    /// Leftover cents from the division go to the first participants so the
    /// shares always add up to `amount`.
    pub fn shares(&self) -> Vec<(PersonId, Money)> {
        self.participants
            .iter()
            .copied()
            .zip(self.amount.split_even(self.participants.len()))
            .collect()
    }

    /// Sum of everything the payers put in
    pub fn total_paid(&self) -> Money {
        self.payers.values().sum()
    }

    /// Check whether a person paid for or shares this expense
    pub fn involves(&self, person: PersonId) -> bool {
        self.payers.contains_key(&person) || self.participants.contains(&person)
    }

    /// Validate the structural invariants of the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.participants.is_empty() {
            return Err(ExpenseValidationError::NoParticipants);
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !seen.insert(participant) {
                return Err(ExpenseValidationError::DuplicateParticipant(*participant));
            }
        }

        if self.payers.is_empty() {
            return Err(ExpenseValidationError::NoPayers);
        }

        if let Some((payer, amount)) = self.payers.iter().find(|(_, a)| a.is_negative()) {
            return Err(ExpenseValidationError::NegativePayerAmount(*payer, *amount));
        }

        let paid = self.total_paid();
        if paid != self.amount {
            return Err(ExpenseValidationError::PayerSumMismatch {
                paid,
                total: self.amount,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.amount)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    NoParticipants,
    DuplicateParticipant(PersonId),
    NoPayers,
    NegativePayerAmount(PersonId, Money),
    PayerSumMismatch { paid: Money, total: Money },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            Self::NoParticipants => write!(f, "Expense must have at least one participant"),
            Self::DuplicateParticipant(id) => {
                write!(f, "Participant {} is listed more than once", id)
            }
            Self::NoPayers => write!(f, "Expense must have at least one payer"),
            Self::NegativePayerAmount(id, amount) => {
                write!(f, "Payer {} has a negative amount {}", id, amount)
            }
            Self::PayerSumMismatch { paid, total } => write!(
                f,
                "Total paid amounts ({}) must equal the expense amount ({})",
                paid, total
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
