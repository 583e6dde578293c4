use crate::ledger::MonthRecord;

/// Income/expense totals for one month. Values are unrounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub disposable: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(record: &MonthRecord) -> BudgetTotals {
        let total_income = record.income.iter().map(|entry| entry.amount).sum::<f64>();
        let total_expenses = record.expenses.iter().map(|entry| entry.amount).sum::<f64>();
        BudgetTotals {
            total_income,
            total_expenses,
            disposable: total_income - total_expenses,
        }
    }

    /// Sum of recurring instances only, i.e. the month's fixed costs.
    pub fn fixed_expenses(record: &MonthRecord) -> f64 {
        record
            .expenses
            .iter()
            .filter(|entry| entry.is_recurring())
            .map(|entry| entry.amount)
            .sum()
    }
}
