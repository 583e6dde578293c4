use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{
    expense::{ExpenseOrigin, RecurringTemplate},
    ids::EntryId,
    month::{MonthKey, MonthRecord},
    savings::SavingsGoal,
};
use crate::errors::LedgerError;

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The single persisted budgeting document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub budgets: BTreeMap<MonthKey, MonthRecord>,
    #[serde(default)]
    pub savings: Vec<SavingsGoal>,
    #[serde(default, rename = "recurringExpenses")]
    pub recurring_templates: Vec<RecurringTemplate>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            budgets: BTreeMap::new(),
            savings: Vec::new(),
            recurring_templates: Vec::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn month(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.budgets.get(&key)
    }

    pub fn month_mut(&mut self, key: MonthKey) -> Option<&mut MonthRecord> {
        self.budgets.get_mut(&key)
    }

    pub fn month_keys(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.budgets.keys().copied()
    }

    pub fn template(&self, id: &EntryId) -> Option<&RecurringTemplate> {
        self.recurring_templates.iter().find(|template| &template.id == id)
    }

    pub fn template_mut(&mut self, id: &EntryId) -> Option<&mut RecurringTemplate> {
        self.recurring_templates
            .iter_mut()
            .find(|template| &template.id == id)
    }

    pub fn savings_goal(&self, id: &EntryId) -> Option<&SavingsGoal> {
        self.savings.iter().find(|goal| goal.id() == id)
    }

    pub fn savings_goal_mut(&mut self, id: &EntryId) -> Option<&mut SavingsGoal> {
        self.savings.iter_mut().find(|goal| goal.id() == id)
    }

    /// Number of recurring instances referencing `template_id` across all months.
    pub fn instance_count(&self, template_id: &EntryId) -> usize {
        self.budgets
            .values()
            .flat_map(|record| record.expenses.iter())
            .filter(|entry| entry.template_id() == Some(template_id))
            .count()
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Checks the structural invariants a loaded document must satisfy.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::UnsupportedSchema(self.schema_version));
        }

        let mut template_ids = HashSet::new();
        for template in &self.recurring_templates {
            check_amount("recurring template", &template.id, template.amount)?;
            if !template_ids.insert(&template.id) {
                return Err(corrupt(format!(
                    "duplicate recurring template id {}",
                    template.id
                )));
            }
        }

        for (key, record) in &self.budgets {
            let mut income_ids = HashSet::new();
            for entry in &record.income {
                check_amount("income", &entry.id, entry.amount)?;
                if !income_ids.insert(&entry.id) {
                    return Err(corrupt(format!("duplicate income id {} in {key}", entry.id)));
                }
            }

            let mut expense_ids = HashSet::new();
            let mut seen_templates = HashSet::new();
            for entry in &record.expenses {
                check_amount("expense", &entry.id, entry.amount)?;
                if !expense_ids.insert(&entry.id) {
                    return Err(corrupt(format!("duplicate expense id {} in {key}", entry.id)));
                }
                match &entry.origin {
                    ExpenseOrigin::OneTime => {}
                    ExpenseOrigin::Recurring { template_id } => {
                        if !template_ids.contains(template_id) {
                            return Err(corrupt(format!(
                                "expense {} in {key} references unknown recurring template {template_id}",
                                entry.id
                            )));
                        }
                        if !seen_templates.insert(template_id) {
                            return Err(corrupt(format!(
                                "recurring template {template_id} has more than one instance in {key}"
                            )));
                        }
                    }
                }
            }
        }

        let mut goal_ids = HashSet::new();
        for goal in &self.savings {
            check_amount("savings target", goal.id(), goal.target())?;
            check_amount("savings balance", goal.id(), goal.current())?;
            if !goal_ids.insert(goal.id()) {
                return Err(corrupt(format!("duplicate savings goal id {}", goal.id())));
            }
        }

        Ok(())
    }
}

fn check_amount(kind: &str, id: &EntryId, amount: f64) -> Result<(), LedgerError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(corrupt(format!("{kind} {id} has invalid amount {amount}")))
    }
}

fn corrupt(message: String) -> LedgerError {
    LedgerError::CorruptData(message)
}
