//! Full and partial settlement payments
//!
//! Paying less than the full amount splits a settlement in two: a new paid
//! record for what changed hands, and the original carrying the residual.
//! `paid_record.amount + residual.amount == original.amount` always holds.

use chrono::{DateTime, Utc};

use crate::error::{SplitError, SplitResult};
use crate::models::{Money, Settlement, SettlementId};

use super::is_settled;

/// Outcome of paying a settlement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialPayment {
    /// The completed payment
    pub paid_record: Settlement,
    /// What is still owed, if anything
    pub residual_record: Option<Settlement>,
}

impl PartialPayment {
    /// Check whether the payment cleared the whole settlement
    pub fn is_full(&self) -> bool {
        self.residual_record.is_none()
    }

    /// Amount still owed after the payment
    pub fn remaining(&self) -> Money {
        self.residual_record
            .as_ref()
            .map(|r| r.amount)
            .unwrap_or_default()
    }
}

/// Pay `paid_amount` of an outstanding settlement at time `now`
///
/// - Paying the exact amount (or leaving a residual of a cent or less) marks
///   the original paid; no residual is produced.
/// - Otherwise a new paid settlement for `paid_amount` is created with the
///   same parties and expense, and the original keeps its id with the
///   residual amount, still unpaid.
///
/// Returns [`SplitError::InvalidAmount`] unless `0 < paid_amount <= amount`.
/// The input is never modified.
pub fn resolve_partial_payment(
    settlement: &Settlement,
    paid_amount: Money,
    now: DateTime<Utc>,
) -> SplitResult<PartialPayment> {
    if settlement.paid {
        return Err(SplitError::Validation(format!(
            "Settlement {} is already paid",
            settlement.id
        )));
    }

    if !paid_amount.is_positive() || paid_amount > settlement.amount {
        return Err(SplitError::InvalidAmount {
            requested: paid_amount,
            outstanding: settlement.amount,
        });
    }

    let residual = settlement.amount - paid_amount;

    if residual.is_zero() || is_settled(residual) {
        let mut paid_record = settlement.clone();
        paid_record.mark_paid(now);
        return Ok(PartialPayment {
            paid_record,
            residual_record: None,
        });
    }

    let paid_record = Settlement {
        id: SettlementId::new(),
        amount: paid_amount,
        paid: true,
        date: Some(now),
        ..settlement.clone()
    };

    let residual_record = Settlement {
        amount: residual,
        ..settlement.clone()
    };

    Ok(PartialPayment {
        paid_record,
        residual_record: Some(residual_record),
    })
}
