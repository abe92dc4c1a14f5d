//! Handlers module
//!
//! Request-level operations that orchestrate the store and the ledger core.
//! Each handler borrows a `LedgerStore` for the duration of one call.

mod balance_handler;
mod commands;
mod expense_handler;


pub use balance_handler::{GroupBalancesHandler, UserBalancesHandler};
pub use commands::*;
pub use expense_handler::CreateExpenseHandler;
