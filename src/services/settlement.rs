//! Settlement service
//!
//! Connects the balance engine to the ledger: computes balances, plans
//! transfers (ephemerally or persisted) and records payments.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::audit::EntityType;
use crate::engine::{
    compute_balances, net_outstanding, plan_settlements, resolve_partial_payment, Balances,
    PairNet, PartialPayment,
};
use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, Money, Settlement};
use crate::storage::Storage;

use super::person::PersonService;

pub struct SettlementService<'a> {
    storage: &'a Storage,
}

impl<'a> SettlementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Net balance of every person across the whole ledger
    pub fn balances(&self) -> SplitResult<Balances> {
        let snapshot = self.storage.snapshot()?;
        Ok(compute_balances(
            &snapshot.person_ids(),
            &snapshot.expenses,
            &snapshot.settlements,
        ))
    }

    /// Suggested transfers that settle the whole ledger; nothing is saved
    pub fn plan(&self) -> SplitResult<Vec<Settlement>> {
        let snapshot = self.storage.snapshot()?;
        let persons = snapshot.person_ids();
        let balances = compute_balances(&persons, &snapshot.expenses, &snapshot.settlements);
        Ok(plan_settlements(&persons, &balances))
    }

    /// Suggested transfers for a single expense
    ///
    /// Only that expense and the paid settlements tagged with it count, and
    /// every suggestion is tagged with the expense id. Payments recorded
    /// against a whole-ledger plan are not attributed to any expense.
    pub fn plan_for_expense(&self, reference: &str) -> SplitResult<Vec<Settlement>> {
        let expense = self.resolve_expense(reference)?;
        self.plan_for(&expense)
    }

    fn resolve_expense(&self, reference: &str) -> SplitResult<Expense> {
        self.storage
            .expenses
            .find(reference)?
            .ok_or_else(|| SplitError::expense_not_found(reference))
    }

    fn plan_for(&self, expense: &Expense) -> SplitResult<Vec<Settlement>> {
        let persons: Vec<_> = self.storage.people.get_all()?.iter().map(|p| p.id).collect();
        let paid = self.storage.settlements.get_by_expense(expense.id)?;

        let balances = compute_balances(&persons, std::slice::from_ref(expense), &paid);
        Ok(plan_settlements(&persons, &balances)
            .into_iter()
            .map(|s| s.for_expense(expense.id))
            .collect())
    }

    /// Replace every outstanding settlement with a fresh plan
    ///
    /// Paid settlements are kept; they are already reflected in the balances
    /// the new plan is computed from.
    pub fn materialize(&self) -> SplitResult<Vec<Settlement>> {
        let plan = self.plan()?;
        for settlement in &plan {
            check(settlement)?;
        }
        let stale = self.storage.settlements.remove_outstanding()?;

        self.replace(&stale, &plan)?;
        info!(replaced = stale.len(), planned = plan.len(), "settlement plan saved");
        Ok(plan)
    }

    /// Save the plan for a single expense
    ///
    /// Replaces the unpaid settlements already planned for that expense and
    /// any unpaid whole-ledger plan, which covered this expense too.
    pub fn materialize_for_expense(&self, reference: &str) -> SplitResult<Vec<Settlement>> {
        let expense = self.resolve_expense(reference)?;
        let plan = self.plan_for(&expense)?;
        for settlement in &plan {
            check(settlement)?;
        }

        let mut stale = self
            .storage
            .settlements
            .remove_outstanding_for_expense(expense.id)?;
        stale.extend(self.storage.settlements.remove_outstanding_untagged()?);

        self.replace(&stale, &plan)?;
        info!(replaced = stale.len(), planned = plan.len(), "expense settlement plan saved");
        Ok(plan)
    }

    fn replace(&self, stale: &[Settlement], plan: &[Settlement]) -> SplitResult<()> {
        for settlement in plan {
            self.storage.settlements.upsert(settlement.clone())?;
        }
        self.storage.settlements.save()?;

        for settlement in stale {
            self.storage.log_delete(
                EntityType::Settlement,
                settlement.id.to_string(),
                None,
                settlement,
            )?;
        }
        for settlement in plan {
            self.storage.log_create(
                EntityType::Settlement,
                settlement.id.to_string(),
                None,
                settlement,
            )?;
        }
        Ok(())
    }

    /// Outstanding settlements netted per pair of people
    pub fn net(&self) -> SplitResult<Vec<PairNet>> {
        Ok(net_outstanding(&self.storage.settlements.get_all()?))
    }

    /// Pay in full every outstanding settlement between two people, in
    /// either direction
    ///
    /// # Errors
    ///
    /// - `NotFound` if either person is unknown
    /// - `Validation` if nothing is outstanding between them
    pub fn pay_pair(&self, first: &str, second: &str) -> SplitResult<Vec<Settlement>> {
        let people = PersonService::new(self.storage);
        let (a, b) = (people.resolve(first)?, people.resolve(second)?);

        let originals: Vec<Settlement> = self
            .storage
            .settlements
            .get_outstanding()?
            .into_iter()
            .filter(|s| (s.from, s.to) == (a.id, b.id) || (s.from, s.to) == (b.id, a.id))
            .collect();
        if originals.is_empty() {
            return Err(SplitError::Validation(format!(
                "Nothing is outstanding between {} and {}",
                a.name, b.name
            )));
        }

        let now = Utc::now();
        let paid: Vec<Settlement> = originals
            .iter()
            .map(|s| {
                let mut paid = s.clone();
                paid.mark_paid(now);
                paid
            })
            .collect();
        for settlement in &paid {
            check(settlement)?;
            self.storage.settlements.upsert(settlement.clone())?;
        }
        self.storage.settlements.save()?;

        for (original, settlement) in originals.iter().zip(&paid) {
            self.storage.log_update(
                EntityType::Settlement,
                settlement.id.to_string(),
                None,
                original,
                settlement,
                None,
            )?;
        }

        info!(from = %a.id, to = %b.id, count = paid.len(), "settled pair");
        Ok(paid)
    }

    /// Delete the payment history
    ///
    /// Without it balances fall back to what the expenses alone say, so the
    /// unpaid plans computed against that history are dropped too: any
    /// whole-ledger plan, and per-expense plans whose expense had payments.
    pub fn clear_history(&self) -> SplitResult<Vec<Settlement>> {
        let mut removed = self.storage.settlements.remove_paid()?;
        if removed.is_empty() {
            return Ok(removed);
        }

        let touched: HashSet<_> = removed.iter().filter_map(|s| s.expense_id).collect();
        removed.extend(self.storage.settlements.remove_outstanding_untagged()?);
        for expense_id in touched {
            removed.extend(
                self.storage
                    .settlements
                    .remove_outstanding_for_expense(expense_id)?,
            );
        }
        self.storage.settlements.save()?;

        for settlement in &removed {
            self.storage.log_delete(
                EntityType::Settlement,
                settlement.id.to_string(),
                None,
                settlement,
            )?;
        }

        warn!(removed = removed.len(), "settlement history cleared");
        Ok(removed)
    }

    /// Persisted settlements; outstanding only unless `include_paid`
    pub fn list(&self, include_paid: bool) -> SplitResult<Vec<Settlement>> {
        if include_paid {
            self.storage.settlements.get_all()
        } else {
            self.storage.settlements.get_outstanding()
        }
    }

    pub fn find(&self, reference: &str) -> SplitResult<Option<Settlement>> {
        self.storage.settlements.find(reference)
    }

    /// Pay a persisted settlement, in full when `amount` is `None`
    ///
    /// A partial payment appends a new paid settlement and leaves the
    /// original in place with the residual still owed.
    pub fn pay(&self, reference: &str, amount: Option<Money>) -> SplitResult<PartialPayment> {
        let original = self
            .find(reference)?
            .ok_or_else(|| SplitError::settlement_not_found(reference))?;

        for person in [original.from, original.to] {
            if self.storage.people.get(person)?.is_none() {
                return Err(SplitError::person_not_found(person.to_string()));
            }
        }

        let amount = amount.unwrap_or(original.amount);
        let payment = resolve_partial_payment(&original, amount, Utc::now())?;
        check(&payment.paid_record)?;
        if let Some(residual) = &payment.residual_record {
            check(residual)?;
        }

        if let Some(residual) = &payment.residual_record {
            self.storage.settlements.upsert(residual.clone())?;
        }
        self.storage.settlements.upsert(payment.paid_record.clone())?;
        self.storage.settlements.save()?;

        match &payment.residual_record {
            Some(residual) => {
                self.storage.log_update(
                    EntityType::Settlement,
                    residual.id.to_string(),
                    None,
                    &original,
                    residual,
                    None,
                )?;
                self.storage.log_create(
                    EntityType::Settlement,
                    payment.paid_record.id.to_string(),
                    None,
                    &payment.paid_record,
                )?;
            }
            None => {
                self.storage.log_update(
                    EntityType::Settlement,
                    original.id.to_string(),
                    None,
                    &original,
                    &payment.paid_record,
                    None,
                )?;
            }
        }

        debug!(
            settlement = %original.id,
            paid = %payment.paid_record.amount,
            remaining = %payment.remaining(),
            "settlement paid"
        );
        Ok(payment)
    }
}

fn check(settlement: &Settlement) -> SplitResult<()> {
    settlement
        .validate()
        .map_err(|e| SplitError::Validation(e.to_string()))
}
