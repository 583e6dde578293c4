//! Savings goal management and projections.

use chrono::NaiveDate;

use super::{ensure_amount, ServiceResult};
use crate::errors::LedgerError;
use crate::ledger::{savings, EntryId, Ledger, SavingsGoal, SavingsProgress};

pub struct SavingsService;

impl SavingsService {
    /// Required constant monthly contribution; see [`savings::monthly_contribution`].
    pub fn monthly_contribution(
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> f64 {
        savings::monthly_contribution(target, current, start_date, end_date)
    }

    pub fn progress(goal: &SavingsGoal) -> SavingsProgress {
        goal.progress()
    }

    /// Progress of every goal, in ledger order.
    pub fn all_progress(ledger: &Ledger) -> Vec<(&SavingsGoal, SavingsProgress)> {
        ledger
            .savings
            .iter()
            .map(|goal| (goal, goal.progress()))
            .collect()
    }

    pub fn add_goal(
        ledger: &mut Ledger,
        name: &str,
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ServiceResult<EntryId> {
        let (target, current) = validate_amounts(target, current)?;
        let goal = SavingsGoal::new(name, target, current, start_date, end_date);
        let id = goal.id().clone();
        tracing::info!(
            goal = %id,
            monthly = goal.monthly_contribution(),
            "added savings goal"
        );
        ledger.savings.push(goal);
        Ok(id)
    }

    /// Returns `Ok(false)` when the goal does not exist.
    pub fn edit_goal(
        ledger: &mut Ledger,
        id: &EntryId,
        name: &str,
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ServiceResult<bool> {
        let (target, current) = validate_amounts(target, current)?;
        let Some(goal) = ledger.savings_goal_mut(id) else {
            return Ok(false);
        };
        goal.update(name, target, current, start_date, end_date);
        tracing::info!(
            goal = %id,
            monthly = goal.monthly_contribution(),
            "edited savings goal"
        );
        Ok(true)
    }

    pub fn delete_goal(ledger: &mut Ledger, id: &EntryId) -> bool {
        let before = ledger.savings.len();
        ledger.savings.retain(|goal| goal.id() != id);
        let removed = ledger.savings.len() != before;
        if removed {
            tracing::info!(goal = %id, "deleted savings goal");
        }
        removed
    }
}

fn validate_amounts(target: f64, current: f64) -> ServiceResult<(f64, f64)> {
    let target = ensure_amount(target)?;
    if target == 0.0 {
        return Err(LedgerError::InvalidAmount(target));
    }
    Ok((target, ensure_amount(current)?))
}
