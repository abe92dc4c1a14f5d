//! split_ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod domain;
pub mod handlers;
pub mod ledger;
pub mod store;

pub mod config;
mod error;

pub use config::{Config, ConfigError, LogFormat};
pub use domain::{Expense, ExpenseId, GroupId, LedgerError, Money, MoneyError, SplitPolicy, UserId};
pub use error::{AppError, AppResult, ErrorResponse};
pub use ledger::{GroupBalances, Settlement};
pub use store::{InMemoryStore, LedgerSnapshot, LedgerStore, StoreError};
