//! Budget services and the persisted book facade built on top of the ledger model.

pub mod budget_book;
pub mod services;
pub mod time;

pub use budget_book::BudgetBook;
pub use time::{Clock, FixedClock, SystemClock};
