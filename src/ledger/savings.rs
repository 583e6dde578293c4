use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ids::EntryId;

/// Savings goal with a cached monthly contribution target.
///
/// Value fields are private so the cached contribution can only change through
/// [`SavingsGoal::update`], which recomputes it. The stored `monthly` value is written for
/// compatibility but recomputed on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredGoal")]
pub struct SavingsGoal {
    id: EntryId,
    name: String,
    target: f64,
    current: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(rename = "monthly")]
    monthly_contribution: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGoal {
    id: EntryId,
    name: String,
    target: f64,
    current: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<StoredGoal> for SavingsGoal {
    fn from(stored: StoredGoal) -> Self {
        Self {
            monthly_contribution: monthly_contribution(
                stored.target,
                stored.current,
                stored.start_date,
                stored.end_date,
            ),
            id: stored.id,
            name: stored.name,
            target: stored.target,
            current: stored.current,
            start_date: stored.start_date,
            end_date: stored.end_date,
        }
    }
}

/// Projection of a goal's progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsProgress {
    /// Share of the target reached, capped at 100.
    pub percent: f64,
    /// Amount still missing; zero or negative once the goal is reached.
    pub remaining_amount: f64,
    /// Months of contributions left. `None` when the goal is not reached but the monthly
    /// contribution is zero, so no projection is possible.
    pub months_remaining: Option<u32>,
}

impl SavingsProgress {
    pub fn is_complete(&self) -> bool {
        self.remaining_amount <= 0.0
    }
}

impl SavingsGoal {
    pub fn new(
        name: impl Into<String>,
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            target,
            current,
            start_date,
            end_date,
            monthly_contribution: monthly_contribution(target, current, start_date, end_date),
        }
    }

    /// Replaces every value field and recomputes the monthly contribution.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) {
        self.name = name.into();
        self.target = target;
        self.current = current;
        self.start_date = start_date;
        self.end_date = end_date;
        self.monthly_contribution = monthly_contribution(target, current, start_date, end_date);
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn progress(&self) -> SavingsProgress {
        progress(self.target, self.current, self.monthly_contribution)
    }
}

/// Inclusive count of calendar months from `start` to `end`; day of month is ignored.
pub fn months_span(start: NaiveDate, end: NaiveDate) -> i64 {
    (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64)
        + 1
}

/// Constant monthly amount needed to go from `current` to `target` between the two months.
///
/// Returns zero when the span is empty or the target is already met.
pub fn monthly_contribution(target: f64, current: f64, start: NaiveDate, end: NaiveDate) -> f64 {
    let span = months_span(start, end);
    let remaining = target - current;
    if span <= 0 || remaining <= 0.0 {
        return 0.0;
    }
    remaining / span as f64
}

pub fn progress(target: f64, current: f64, monthly_contribution: f64) -> SavingsProgress {
    let percent = if target > 0.0 {
        (current / target * 100.0).min(100.0)
    } else {
        100.0
    };
    let remaining_amount = target - current;
    let months_remaining = if remaining_amount <= 0.0 {
        Some(0)
    } else if monthly_contribution > 0.0 {
        Some((remaining_amount / monthly_contribution).ceil() as u32)
    } else {
        None
    };
    SavingsProgress {
        percent,
        remaining_amount,
        months_remaining,
    }
}
