//! Services that keep recurring templates and their per-month instances in sync.

use super::{ensure_amount, ServiceResult};
use crate::ledger::{EntryId, Ledger, MonthKey, RecurringTemplate};

/// Expands recurring templates into month records and propagates template changes.
pub struct RecurringService;

impl RecurringService {
    /// Adds an instance of every template the month does not reference yet.
    ///
    /// Returns the number of instances inserted; a missing month inserts nothing. Safe to
    /// call repeatedly.
    pub fn populate_month(ledger: &mut Ledger, key: MonthKey) -> usize {
        let Ledger {
            budgets,
            recurring_templates,
            ..
        } = ledger;
        let Some(record) = budgets.get_mut(&key) else {
            return 0;
        };
        let mut inserted = 0;
        for template in recurring_templates.iter() {
            if record.has_instance_of(&template.id) {
                continue;
            }
            record.expenses.push(template.instantiate());
            inserted += 1;
        }
        if inserted > 0 {
            tracing::debug!(month = %key, inserted, "populated recurring expenses");
        }
        inserted
    }

    /// Creates a template and inserts one instance of it into every month already present,
    /// past and future alike.
    pub fn add_recurring_expense(
        ledger: &mut Ledger,
        category: &str,
        description: &str,
        amount: f64,
    ) -> ServiceResult<EntryId> {
        let amount = ensure_amount(amount)?;
        let template = RecurringTemplate::new(category, description, amount);
        let id = template.id.clone();

        for record in ledger.budgets.values_mut() {
            record.expenses.push(template.instantiate());
        }
        tracing::info!(
            template = %id,
            months = ledger.budgets.len(),
            "added recurring expense"
        );
        ledger.recurring_templates.push(template);
        Ok(id)
    }

    /// Rewrites the template and every instance referencing it.
    ///
    /// Returns `Ok(false)` without touching the ledger when the template does not exist.
    pub fn edit_recurring_expense(
        ledger: &mut Ledger,
        template_id: &EntryId,
        category: &str,
        description: &str,
        amount: f64,
    ) -> ServiceResult<bool> {
        let amount = ensure_amount(amount)?;
        let Some(template) = ledger.template_mut(template_id) else {
            return Ok(false);
        };
        template.category = category.to_string();
        template.description = description.to_string();
        template.amount = amount;

        let mut updated = 0usize;
        for entry in ledger
            .budgets
            .values_mut()
            .flat_map(|record| record.expenses.iter_mut())
            .filter(|entry| entry.template_id() == Some(template_id))
        {
            entry.apply_values(category, description, amount);
            updated += 1;
        }
        tracing::info!(template = %template_id, instances = updated, "edited recurring expense");
        Ok(true)
    }

    /// Removes the template and cascades the removal to every month.
    ///
    /// Returns `false` when the template does not exist.
    pub fn delete_recurring_expense(ledger: &mut Ledger, template_id: &EntryId) -> bool {
        let before = ledger.recurring_templates.len();
        ledger
            .recurring_templates
            .retain(|template| &template.id != template_id);
        if ledger.recurring_templates.len() == before {
            return false;
        }

        let mut removed = 0usize;
        for record in ledger.budgets.values_mut() {
            let count = record.expenses.len();
            record
                .expenses
                .retain(|entry| entry.template_id() != Some(template_id));
            removed += count - record.expenses.len();
        }
        tracing::info!(template = %template_id, instances = removed, "deleted recurring expense");
        true
    }
}
