pub mod expense_service;
pub mod income_service;
pub mod month_service;
pub mod recurring_service;
pub mod savings_service;
pub mod summary_service;

pub use expense_service::ExpenseService;
pub use income_service::IncomeService;
pub use month_service::MonthService;
pub use recurring_service::RecurringService;
pub use savings_service::SavingsService;
pub use summary_service::{BudgetTotals, SummaryService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;

/// Rejects negative, NaN and infinite amounts before they reach the ledger.
pub(crate) fn ensure_amount(amount: f64) -> ServiceResult<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}
