use serde::{Deserialize, Serialize};

use super::ids::EntryId;

/// Canonical definition of a fixed expense that recurs every month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: EntryId,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

impl RecurringTemplate {
    pub fn new(category: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            id: EntryId::new(),
            category: category.into(),
            description: description.into(),
            amount,
        }
    }

    /// Materializes a fresh instance of this template for one month.
    pub fn instantiate(&self) -> ExpenseEntry {
        ExpenseEntry {
            id: EntryId::new(),
            category: self.category.clone(),
            description: self.description.clone(),
            amount: self.amount,
            origin: ExpenseOrigin::Recurring {
                template_id: self.id.clone(),
            },
        }
    }
}

/// Where an expense entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseOrigin {
    /// Standalone expense belonging to a single month.
    OneTime,
    /// One month's copy of a [`RecurringTemplate`].
    Recurring { template_id: EntryId },
}

/// Expense recorded in a month.
///
/// Value fields of recurring instances are copies of their template and are kept in sync by
/// the recurring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredExpense", into = "StoredExpense")]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub origin: ExpenseOrigin,
}

impl ExpenseEntry {
    pub fn one_time(
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: EntryId::new(),
            category: category.into(),
            description: description.into(),
            amount,
            origin: ExpenseOrigin::OneTime,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.origin, ExpenseOrigin::Recurring { .. })
    }

    pub fn template_id(&self) -> Option<&EntryId> {
        match &self.origin {
            ExpenseOrigin::OneTime => None,
            ExpenseOrigin::Recurring { template_id } => Some(template_id),
        }
    }

    pub(crate) fn apply_values(&mut self, category: &str, description: &str, amount: f64) {
        self.category = category.to_string();
        self.description = description.to_string();
        self.amount = amount;
    }
}

/// On-disk shape of an expense: a flat record with an `isRecurring` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExpense {
    id: EntryId,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    amount: f64,
    #[serde(default)]
    is_recurring: bool,
    #[serde(
        default,
        alias = "recurringTemplateId",
        skip_serializing_if = "Option::is_none"
    )]
    recurring_id: Option<EntryId>,
}

impl TryFrom<StoredExpense> for ExpenseEntry {
    type Error = String;

    fn try_from(stored: StoredExpense) -> Result<Self, Self::Error> {
        let origin = match (stored.is_recurring, stored.recurring_id) {
            (true, Some(template_id)) => ExpenseOrigin::Recurring { template_id },
            (true, None) => {
                return Err(format!(
                    "recurring expense {} has no template reference",
                    stored.id
                ))
            }
            (false, Some(_)) => {
                return Err(format!(
                    "one-time expense {} references a recurring template",
                    stored.id
                ))
            }
            (false, None) => ExpenseOrigin::OneTime,
        };
        Ok(Self {
            id: stored.id,
            category: stored.category,
            description: stored.description,
            amount: stored.amount,
            origin,
        })
    }
}

impl From<ExpenseEntry> for StoredExpense {
    fn from(entry: ExpenseEntry) -> Self {
        let (is_recurring, recurring_id) = match entry.origin {
            ExpenseOrigin::OneTime => (false, None),
            ExpenseOrigin::Recurring { template_id } => (true, Some(template_id)),
        };
        Self {
            id: entry.id,
            category: entry.category,
            description: entry.description,
            amount: entry.amount,
            is_recurring,
            recurring_id,
        }
    }
}
