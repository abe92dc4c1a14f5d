//! Ledger module
//!
//! The pure ledger core: split calculation, balance aggregation, settlement
//! matching and cross-group user balances. Everything here is synchronous,
//! performs no I/O and recomputes from the snapshot it is given.

pub mod balance;
pub mod settlement;
pub mod split;
pub mod user_balance;

pub use balance::{compute_group_balances, validate_participants, GroupBalances};
pub use settlement::{compute_settlement, Settlement};
pub use split::compute_splits;
pub use user_balance::{compute_user_balance, compute_user_balance_from};
