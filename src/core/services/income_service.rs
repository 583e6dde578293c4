//! Business logic helpers for monthly income entries.

use super::{ensure_amount, month_service::MonthService, ServiceResult};
use crate::ledger::{EntryId, IncomeEntry, Ledger, MonthKey};

pub struct IncomeService;

impl IncomeService {
    /// Adds income to `month`, creating the month if needed.
    pub fn add(
        ledger: &mut Ledger,
        month: MonthKey,
        description: &str,
        amount: f64,
    ) -> ServiceResult<EntryId> {
        let amount = ensure_amount(amount)?;
        let entry = IncomeEntry::new(description, amount);
        let id = entry.id.clone();
        MonthService::get_or_create_month(ledger, month)
            .income
            .push(entry);
        tracing::info!(month = %month, income = %id, "added income");
        Ok(id)
    }

    /// Returns `Ok(false)` when `id` is not part of `month`.
    pub fn edit(
        ledger: &mut Ledger,
        month: MonthKey,
        id: &EntryId,
        description: &str,
        amount: f64,
    ) -> ServiceResult<bool> {
        let amount = ensure_amount(amount)?;
        let Some(entry) = ledger
            .month_mut(month)
            .and_then(|record| record.income_entry_mut(id))
        else {
            return Ok(false);
        };
        entry.description = description.to_string();
        entry.amount = amount;
        tracing::info!(month = %month, income = %id, "edited income");
        Ok(true)
    }

    pub fn delete(ledger: &mut Ledger, month: MonthKey, id: &EntryId) -> bool {
        let Some(record) = ledger.month_mut(month) else {
            return false;
        };
        let before = record.income.len();
        record.income.retain(|entry| &entry.id != id);
        let removed = record.income.len() != before;
        if removed {
            tracing::info!(month = %month, income = %id, "deleted income");
        }
        removed
    }
}
