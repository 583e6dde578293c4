//! Ledger domain models, persistence-friendly types, and helpers.

pub mod expense;
pub mod ids;
pub mod income;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod month;
pub mod savings;

pub use expense::{ExpenseEntry, ExpenseOrigin, RecurringTemplate};
pub use ids::EntryId;
pub use income::IncomeEntry;
pub use ledger::Ledger;
pub use month::{MonthKey, MonthRecord};
pub use savings::{monthly_contribution, months_span, progress, SavingsGoal, SavingsProgress};
