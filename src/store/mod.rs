//! Store module
//!
//! The read/write boundary between the ledger and whatever persists users,
//! groups and expenses. The ledger only ever sees fully committed snapshots
//! returned by these methods.

mod error;
mod memory;
mod snapshot;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use snapshot::{GroupSnapshot, LedgerSnapshot};

use crate::domain::{Expense, Group, GroupId, GroupMembership, User, UserId};

/// Storage operations the ledger handlers rely on.
///
/// Writes take `&mut self`, so writes and reads against one store are
/// serialized by the caller.
pub trait LedgerStore {
    /// Look up a user
    fn user(&self, user_id: UserId) -> Option<User>;

    /// Look up a group
    fn group(&self, group_id: GroupId) -> Option<Group>;

    /// All users, ordered by id
    fn users(&self) -> Vec<User>;

    /// All groups, ordered by id
    fn groups(&self) -> Vec<Group>;

    /// Current members of a group, in the order they joined
    fn group_members(&self, group_id: GroupId) -> Result<Vec<UserId>, StoreError>;

    /// Every group the user belongs to
    fn memberships_for_user(&self, user_id: UserId) -> Vec<GroupMembership>;

    /// All expenses of a group with their splits, oldest first
    fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, StoreError>;

    /// Persist an expense and its splits as one unit
    fn insert_expense(&mut self, expense: Expense) -> Result<(), StoreError>;

    /// Display name of a user, if known
    fn user_name(&self, user_id: UserId) -> Option<String> {
        self.user(user_id).map(|user| user.name)
    }
}
