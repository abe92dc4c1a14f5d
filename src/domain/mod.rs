//! Domain module
//!
//! Core domain types shared by the ledger, the store and the handlers.

pub mod error;
pub mod ids;
pub mod model;
pub mod money;

pub use error::LedgerError;
pub use ids::{ExpenseId, GroupId, UserId};
pub use model::{
    Expense, Group, GroupMembership, GroupNetBalance, NetBalance, SettlementTransaction, Split,
    SplitPolicy, User, UserBalanceSummary,
};
pub use money::{Money, MoneyError, CURRENCY_SCALE};
