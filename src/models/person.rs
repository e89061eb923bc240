//! Person model
//!
//! A member of the shared-expense group. The engine only ever sees the
//! `PersonId`; the name is for display and lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PersonId;

/// A person taking part in shared expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Display name, unique case-insensitively
    pub name: String,

    /// When the person was added
    pub created_at: DateTime<Utc>,

    /// When the person was last modified
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a new person
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PersonId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the person
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(PersonValidationError::NameTooLong(self.name.len()));
        }

        if self.name.contains('=') {
            return Err(PersonValidationError::ReservedCharacter('='));
        }

        Ok(())
    }

    /// Normalize a name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check if this person matches a name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for people
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    NameTooLong(usize),
    /// `=` separates names from amounts in `--payer Name=12.50`
    ReservedCharacter(char),
}

impl fmt::Display for PersonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Person name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Person name too long ({} chars, max 50)", len)
            }
            Self::ReservedCharacter(c) => {
                write!(f, "Person name cannot contain '{}'", c)
            }
        }
    }
}

impl std::error::Error for PersonValidationError {}
