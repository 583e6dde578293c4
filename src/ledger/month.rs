use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{expense::ExpenseEntry, ids::EntryId, income::IncomeEntry};
use crate::errors::LedgerError;

/// Calendar month identifier, rendered as `YYYY-MM`.
///
/// Ordering follows the calendar, so a `BTreeMap<MonthKey, _>` iterates chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(LedgerError::InvalidMonthKey(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`, using its calendar year and 1-indexed month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses the canonical `YYYY-MM` form only, so distinct strings never map to the same
    /// month.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let invalid = || LedgerError::InvalidMonthKey(value.to_string());
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.is_empty() {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let key = Self::new(year, month).map_err(|_| invalid())?;
        if key.to_string() != value {
            return Err(invalid());
        }
        Ok(key)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Moves `delta` months forward (or backward when negative).
    pub fn shift(&self, delta: i32) -> Option<Self> {
        let first = self.first_day();
        let shifted = if delta >= 0 {
            first.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            first.checked_sub_months(Months::new(delta.unsigned_abs()))
        }?;
        Some(Self::from_date(shifted))
    }

    /// English display label such as `March 2024`.
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Income and expenses recorded for a single month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    #[serde(default)]
    pub income: Vec<IncomeEntry>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
}

impl MonthRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn income_entry_mut(&mut self, id: &EntryId) -> Option<&mut IncomeEntry> {
        self.income.iter_mut().find(|entry| &entry.id == id)
    }

    pub fn expense(&self, id: &EntryId) -> Option<&ExpenseEntry> {
        self.expenses.iter().find(|entry| &entry.id == id)
    }

    pub fn expense_mut(&mut self, id: &EntryId) -> Option<&mut ExpenseEntry> {
        self.expenses.iter_mut().find(|entry| &entry.id == id)
    }

    /// Whether an instance of the given recurring template is already present.
    pub fn has_instance_of(&self, template_id: &EntryId) -> bool {
        self.expenses
            .iter()
            .any(|entry| entry.template_id() == Some(template_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> MonthKey {
        MonthKey::parse(value).expect("valid month key")
    }

    #[test]
    fn formats_with_zero_padded_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(MonthKey::from_date(date).to_string(), "2024-03");
        assert_eq!(key("2024-11").to_string(), "2024-11");
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["2024-3", "2024-13", "2024-00", "2024/03", "", "abcd-01", "-01"] {
            assert!(
                matches!(MonthKey::parse(raw), Err(LedgerError::InvalidMonthKey(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_canonical_spellings() {
        for raw in ["+2024-03", " 2024-03", "2024-03 ", "02024-03", "2024-+3"] {
            assert!(
                matches!(MonthKey::parse(raw), Err(LedgerError::InvalidMonthKey(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn shift_rolls_over_year_boundaries() {
        assert_eq!(key("2024-12").shift(1), Some(key("2025-01")));
        assert_eq!(key("2025-01").shift(-1), Some(key("2024-12")));
        assert_eq!(key("2024-06").shift(-18), Some(key("2022-12")));
        assert_eq!(key("2024-06").shift(0), Some(key("2024-06")));
    }

    #[test]
    fn orders_chronologically() {
        assert!(key("2023-12") < key("2024-01"));
        assert!(key("2024-02") < key("2024-10"));
    }

    #[test]
    fn label_uses_month_name() {
        assert_eq!(key("2024-03").label(), "March 2024");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&key("2024-05")).unwrap();
        assert_eq!(json, "\"2024-05\"");
        let parsed: MonthKey = serde_json::from_str("\"2023-09\"").unwrap();
        assert_eq!(parsed, key("2023-09"));
        assert!(serde_json::from_str::<MonthKey>("\"2023-9\"").is_err());
    }
}
