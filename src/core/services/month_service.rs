//! Month resolution and lazy materialization of month records.

use chrono::{Months, NaiveDate};

use super::recurring_service::RecurringService;
use crate::ledger::{Ledger, MonthKey, MonthRecord};

pub struct MonthService;

impl MonthService {
    /// Month-key for the calendar month containing `date`.
    pub fn month_key_for(date: NaiveDate) -> MonthKey {
        MonthKey::from_date(date)
    }

    /// Returns the record for `key`, creating it and filling in recurring instances on
    /// first access.
    pub fn get_or_create_month(ledger: &mut Ledger, key: MonthKey) -> &mut MonthRecord {
        if !ledger.budgets.contains_key(&key) {
            ledger.budgets.insert(key, MonthRecord::new());
            let populated = RecurringService::populate_month(ledger, key);
            tracing::debug!(month = %key, recurring = populated, "created month record");
        }
        ledger.budgets.entry(key).or_default()
    }

    /// Calendar-correct month arithmetic; the day is clamped to the target month's length.
    pub fn shift(date: NaiveDate, delta_months: i32) -> Option<NaiveDate> {
        let months = Months::new(delta_months.unsigned_abs());
        if delta_months >= 0 {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        }
    }
}
