//! Expense entry points that dispatch on the entry's origin.

use super::{
    ensure_amount, month_service::MonthService, recurring_service::RecurringService,
    ServiceResult,
};
use crate::ledger::{EntryId, ExpenseEntry, ExpenseOrigin, Ledger, MonthKey};

pub struct ExpenseService;

impl ExpenseService {
    /// Records a one-time expense in `month`, creating the month if needed.
    pub fn add_one_time(
        ledger: &mut Ledger,
        month: MonthKey,
        category: &str,
        description: &str,
        amount: f64,
    ) -> ServiceResult<EntryId> {
        let amount = ensure_amount(amount)?;
        let entry = ExpenseEntry::one_time(category, description, amount);
        let id = entry.id.clone();
        MonthService::get_or_create_month(ledger, month)
            .expenses
            .push(entry);
        tracing::info!(month = %month, expense = %id, "added expense");
        Ok(id)
    }

    /// Edits the expense `id` found in `month`.
    ///
    /// One-time expenses change in place; recurring instances rewrite their template and
    /// every sibling instance. Returns `Ok(false)` when nothing matched.
    pub fn edit(
        ledger: &mut Ledger,
        month: MonthKey,
        id: &EntryId,
        category: &str,
        description: &str,
        amount: f64,
    ) -> ServiceResult<bool> {
        let amount = ensure_amount(amount)?;
        let Some(origin) = Self::origin_of(ledger, month, id) else {
            return Ok(false);
        };
        match origin {
            ExpenseOrigin::OneTime => {
                let Some(entry) = ledger
                    .month_mut(month)
                    .and_then(|record| record.expense_mut(id))
                else {
                    return Ok(false);
                };
                entry.apply_values(category, description, amount);
                tracing::info!(month = %month, expense = %id, "edited expense");
                Ok(true)
            }
            ExpenseOrigin::Recurring { template_id } => RecurringService::edit_recurring_expense(
                ledger,
                &template_id,
                category,
                description,
                amount,
            ),
        }
    }

    /// Deletes the expense `id` found in `month`.
    ///
    /// Deleting a recurring instance deletes its template and all instances. Returns `false`
    /// when nothing matched.
    pub fn delete(ledger: &mut Ledger, month: MonthKey, id: &EntryId) -> bool {
        let Some(origin) = Self::origin_of(ledger, month, id) else {
            return false;
        };
        match origin {
            ExpenseOrigin::OneTime => {
                let Some(record) = ledger.month_mut(month) else {
                    return false;
                };
                record.expenses.retain(|entry| &entry.id != id);
                tracing::info!(month = %month, expense = %id, "deleted expense");
                true
            }
            ExpenseOrigin::Recurring { template_id } => {
                RecurringService::delete_recurring_expense(ledger, &template_id)
            }
        }
    }

    fn origin_of(ledger: &Ledger, month: MonthKey, id: &EntryId) -> Option<ExpenseOrigin> {
        ledger
            .month(month)
            .and_then(|record| record.expense(id))
            .map(|entry| entry.origin.clone())
    }
}
