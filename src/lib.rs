#![doc(test(attr(deny(warnings))))]

//! PocketBank keeps a personal monthly budget: income and expenses per calendar month,
//! recurring fixed expenses propagated across months, and savings goals with projected
//! monthly contributions. The whole ledger is persisted as one JSON document.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::BudgetBook;
pub use errors::LedgerError;
pub use ledger::{Ledger, MonthKey};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("PocketBank tracing initialized.");
    });
}
