#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use pocketbank::{
    core::{BudgetBook, FixedClock},
    storage::JsonStorage,
    MonthKey,
};
use tempfile::TempDir;

pub const KEY: &str = "pocketbank-data";

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory for one test.
pub fn temp_data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn month(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).expect("valid month")
}

/// Opens a book on JSON storage in `dir` with the clock pinned to `today`.
pub fn open_book(dir: &Path, today: NaiveDate) -> BudgetBook {
    let storage =
        JsonStorage::new(dir.to_path_buf(), Some(3)).expect("create json storage backend");
    BudgetBook::open_with_clock(Box::new(storage), KEY, Box::new(FixedClock(today)))
        .expect("open budget book")
}

/// Fresh book in its own directory, dated 15 March 2024.
pub fn setup_test_book() -> (BudgetBook, PathBuf) {
    let dir = temp_data_dir();
    let book = open_book(&dir, date(2024, 3, 15));
    (book, dir)
}
