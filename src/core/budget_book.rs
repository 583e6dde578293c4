use chrono::NaiveDate;

use crate::config::Config;
use crate::core::services::{
    BudgetTotals, ExpenseService, IncomeService, MonthService, RecurringService, SavingsService,
    SummaryService,
};
use crate::core::time::{Clock, SystemClock};
use crate::errors::{LedgerError, Result};
use crate::ledger::{EntryId, Ledger, MonthKey, MonthRecord, SavingsGoal, SavingsProgress};
use crate::storage::{self, JsonStorage, StorageBackend};

/// Owns the ledger together with its storage backend.
///
/// Every successful mutation is written through as a whole document. When a write fails the
/// in-memory change is kept, the book stays dirty and the failure is returned as
/// [`LedgerError::Persistence`]; [`BudgetBook::flush`] retries the write. Edits and deletes
/// of unknown ids return `Ok(false)` and write nothing.
pub struct BudgetBook {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    key: String,
    clock: Box<dyn Clock>,
    dirty: bool,
}

impl BudgetBook {
    /// Loads the document under `key`, or starts an empty ledger when none exists.
    pub fn open(storage: Box<dyn StorageBackend>, key: impl Into<String>) -> Result<Self> {
        Self::open_with_clock(storage, key, Box::new(SystemClock))
    }

    pub fn open_with_clock(
        storage: Box<dyn StorageBackend>,
        key: impl Into<String>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let key = key.into();
        let ledger = match storage::load_ledger(storage.as_ref(), &key)? {
            Some(ledger) => {
                tracing::info!(key = %key, months = ledger.budgets.len(), "loaded ledger");
                ledger
            }
            None => {
                tracing::info!(key = %key, "no stored ledger, starting empty");
                Ledger::new()
            }
        };
        Ok(Self {
            ledger,
            storage,
            key,
            clock,
            dirty: false,
        })
    }

    /// Opens the JSON file store described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = JsonStorage::new(config.resolve_data_dir(), Some(config.backup_retention))?;
        Self::open(Box::new(storage), config.storage_key.clone())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether in-memory changes have not reached storage yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn current_month(&self) -> MonthKey {
        MonthService::month_key_for(self.clock.today())
    }

    pub fn month_label(&self, key: MonthKey) -> String {
        key.label()
    }

    /// Returns the month record, materializing it on first access.
    ///
    /// A newly created month marks the book dirty; it is written with the next mutation or
    /// [`BudgetBook::flush`].
    pub fn month(&mut self, key: MonthKey) -> &MonthRecord {
        if !self.ledger.budgets.contains_key(&key) {
            self.dirty = true;
        }
        MonthService::get_or_create_month(&mut self.ledger, key)
    }

    pub fn totals(&mut self, key: MonthKey) -> BudgetTotals {
        SummaryService::totals(self.month(key))
    }

    pub fn savings_progress(&self) -> Vec<(&SavingsGoal, SavingsProgress)> {
        SavingsService::all_progress(&self.ledger)
    }

    pub fn add_income(
        &mut self,
        month: MonthKey,
        description: &str,
        amount: f64,
    ) -> Result<EntryId> {
        let id = IncomeService::add(&mut self.ledger, month, description, amount)?;
        self.commit()?;
        Ok(id)
    }

    pub fn edit_income(
        &mut self,
        month: MonthKey,
        id: &EntryId,
        description: &str,
        amount: f64,
    ) -> Result<bool> {
        let changed = IncomeService::edit(&mut self.ledger, month, id, description, amount)?;
        self.commit_if(changed)
    }

    pub fn delete_income(&mut self, month: MonthKey, id: &EntryId) -> Result<bool> {
        let changed = IncomeService::delete(&mut self.ledger, month, id);
        self.commit_if(changed)
    }

    /// Adds a one-time expense to `month`.
    pub fn add_expense(
        &mut self,
        month: MonthKey,
        category: &str,
        description: &str,
        amount: f64,
    ) -> Result<EntryId> {
        let id = ExpenseService::add_one_time(
            &mut self.ledger,
            month,
            category,
            description,
            amount,
        )?;
        self.commit()?;
        Ok(id)
    }

    /// Adds a recurring expense to every month currently in the ledger and to every month
    /// created later. Returns the template id.
    pub fn add_recurring_expense(
        &mut self,
        category: &str,
        description: &str,
        amount: f64,
    ) -> Result<EntryId> {
        let id = RecurringService::add_recurring_expense(
            &mut self.ledger,
            category,
            description,
            amount,
        )?;
        self.commit()?;
        Ok(id)
    }

    pub fn edit_expense(
        &mut self,
        month: MonthKey,
        id: &EntryId,
        category: &str,
        description: &str,
        amount: f64,
    ) -> Result<bool> {
        let changed =
            ExpenseService::edit(&mut self.ledger, month, id, category, description, amount)?;
        self.commit_if(changed)
    }

    pub fn delete_expense(&mut self, month: MonthKey, id: &EntryId) -> Result<bool> {
        let changed = ExpenseService::delete(&mut self.ledger, month, id);
        self.commit_if(changed)
    }

    pub fn edit_recurring_expense(
        &mut self,
        template_id: &EntryId,
        category: &str,
        description: &str,
        amount: f64,
    ) -> Result<bool> {
        let changed = RecurringService::edit_recurring_expense(
            &mut self.ledger,
            template_id,
            category,
            description,
            amount,
        )?;
        self.commit_if(changed)
    }

    pub fn delete_recurring_expense(&mut self, template_id: &EntryId) -> Result<bool> {
        let changed = RecurringService::delete_recurring_expense(&mut self.ledger, template_id);
        self.commit_if(changed)
    }

    pub fn add_savings_goal(
        &mut self,
        name: &str,
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<EntryId> {
        let id = SavingsService::add_goal(
            &mut self.ledger,
            name,
            target,
            current,
            start_date,
            end_date,
        )?;
        self.commit()?;
        Ok(id)
    }

    pub fn edit_savings_goal(
        &mut self,
        id: &EntryId,
        name: &str,
        target: f64,
        current: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool> {
        let changed = SavingsService::edit_goal(
            &mut self.ledger,
            id,
            name,
            target,
            current,
            start_date,
            end_date,
        )?;
        self.commit_if(changed)
    }

    pub fn delete_savings_goal(&mut self, id: &EntryId) -> Result<bool> {
        let changed = SavingsService::delete_goal(&mut self.ledger, id);
        self.commit_if(changed)
    }

    /// Writes the whole ledger to storage if anything is pending.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        match storage::save_ledger(self.storage.as_ref(), &self.key, &self.ledger) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    %err,
                    "failed to persist ledger, changes kept in memory"
                );
                Err(LedgerError::Persistence(err.to_string()))
            }
        }
    }

    fn commit(&mut self) -> Result<()> {
        self.dirty = true;
        self.flush()
    }

    fn commit_if(&mut self, changed: bool) -> Result<bool> {
        if changed {
            self.commit()?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    /// Shares one memory store between the book and the test.
    struct Shared(Arc<MemoryStorage>);

    impl StorageBackend for Shared {
        fn get(&self, key: &str) -> storage::Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, blob: &str) -> storage::Result<()> {
            self.0.set(key, blob)
        }
    }

    fn book_on(store: &Arc<MemoryStorage>) -> BudgetBook {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        BudgetBook::open_with_clock(Box::new(Shared(store.clone())), "doc", Box::new(clock))
            .unwrap()
    }

    #[test]
    fn current_month_follows_clock() {
        let store = Arc::new(MemoryStorage::new());
        let book = book_on(&store);
        assert_eq!(book.current_month().to_string(), "2024-03");
        assert_eq!(book.month_label(book.current_month()), "March 2024");
    }

    #[test]
    fn mutations_write_through() {
        let store = Arc::new(MemoryStorage::new());
        let mut book = book_on(&store);
        let month = book.current_month();
        book.add_income(month, "Salary", 20000.0).unwrap();
        assert!(!book.is_dirty());

        let reopened = book_on(&store);
        assert_eq!(reopened.ledger(), book.ledger());
    }

    #[test]
    fn failed_write_keeps_change_and_can_be_flushed() {
        let store = Arc::new(MemoryStorage::new());
        let mut book = book_on(&store);
        let month = book.current_month();

        store.fail_writes(true);
        let err = book.add_expense(month, "Food", "Groceries", 400.0).unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert!(book.is_dirty());
        assert_eq!(book.ledger().month(month).unwrap().expenses.len(), 1);
        assert!(!store.contains("doc"));

        store.fail_writes(false);
        book.flush().unwrap();
        assert!(!book.is_dirty());
        assert_eq!(book_on(&store).ledger(), book.ledger());
    }

    #[test]
    fn unknown_ids_do_not_write() {
        let store = Arc::new(MemoryStorage::new());
        let mut book = book_on(&store);
        let month = book.current_month();
        let missing = EntryId::from("missing");

        assert!(!book.delete_income(month, &missing).unwrap());
        assert!(!book.delete_expense(month, &missing).unwrap());
        assert!(!book.delete_savings_goal(&missing).unwrap());
        assert!(!store.contains("doc"));
    }

    #[test]
    fn viewing_a_month_marks_dirty_without_writing() {
        let store = Arc::new(MemoryStorage::new());
        let mut book = book_on(&store);
        let month = book.current_month();
        book.month(month);
        assert!(book.is_dirty());
        assert!(!store.contains("doc"));
        book.flush().unwrap();
        assert!(store.contains("doc"));
    }

    #[test]
    fn corrupt_document_fails_to_open() {
        let storage = MemoryStorage::with_blob("doc", "{\"budgets\": 5}");
        let result = BudgetBook::open(Box::new(storage), "doc");
        assert!(matches!(result, Err(LedgerError::CorruptData(_))));
    }
}
