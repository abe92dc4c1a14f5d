//! In-memory store
//!
//! `LedgerStore` backed by ordered maps. Used by the report binary (loaded
//! from a snapshot file) and by tests.

use std::collections::{BTreeMap, HashSet};

use crate::domain::{Expense, ExpenseId, Group, GroupId, GroupMembership, User, UserId};

use super::{LedgerSnapshot, LedgerStore, StoreError};

#[derive(Debug, Clone)]
struct GroupRecord {
    group: Group,
    members: Vec<UserId>,
    expenses: Vec<Expense>,
}

/// In-memory ledger store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, GroupRecord>,
    expense_ids: HashSet<ExpenseId>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, checking referential integrity.
    ///
    /// Expenses must have a positive amount and at least one split. Expenses
    /// whose splits don't add up are kept (they are historical data) but
    /// logged; the balance query reports the resulting drift.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, StoreError> {
        let mut store = Self::new();

        for user in snapshot.users {
            store.add_user(user)?;
        }

        for group in snapshot.groups {
            store.add_group(group.group(), group.members)?;
        }

        for expense in snapshot.expenses {
            check_shape(&expense)?;
            if !expense.is_balanced() {
                tracing::warn!(
                    expense_id = %expense.id,
                    amount = %expense.amount,
                    split_total = ?expense.split_total(),
                    "Snapshot expense splits do not add up to its amount"
                );
            }
            store.push_expense(expense)?;
        }

        Ok(store)
    }

    /// Register a user
    pub fn add_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::duplicate("user", user.id));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    /// Register a group with its members. Repeated member ids are kept once.
    pub fn add_group(&mut self, group: Group, members: Vec<UserId>) -> Result<(), StoreError> {
        if self.groups.contains_key(&group.id) {
            return Err(StoreError::duplicate("group", group.id));
        }

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(members.len());
        for user_id in members {
            if !self.users.contains_key(&user_id) {
                return Err(StoreError::UserNotFound(user_id));
            }
            if seen.insert(user_id) {
                unique.push(user_id);
            }
        }

        self.groups.insert(
            group.id,
            GroupRecord {
                group,
                members: unique,
                expenses: Vec::new(),
            },
        );
        Ok(())
    }

    fn push_expense(&mut self, expense: Expense) -> Result<(), StoreError> {
        if self.expense_ids.contains(&expense.id) {
            return Err(StoreError::duplicate("expense", expense.id));
        }

        let record = self
            .groups
            .get_mut(&expense.group_id)
            .ok_or(StoreError::GroupNotFound(expense.group_id))?;

        let referenced = std::iter::once(expense.payer_id)
            .chain(expense.splits.iter().map(|split| split.user_id));
        for user_id in referenced {
            if !self.users.contains_key(&user_id) {
                return Err(StoreError::UserNotFound(user_id));
            }
        }

        self.expense_ids.insert(expense.id);
        record.expenses.push(expense);
        Ok(())
    }

    fn record(&self, group_id: GroupId) -> Result<&GroupRecord, StoreError> {
        self.groups
            .get(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))
    }
}

impl LedgerStore for InMemoryStore {
    fn user(&self, user_id: UserId) -> Option<User> {
        self.users.get(&user_id).cloned()
    }

    fn group(&self, group_id: GroupId) -> Option<Group> {
        self.groups.get(&group_id).map(|record| record.group.clone())
    }

    fn users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    fn groups(&self) -> Vec<Group> {
        self.groups.values().map(|record| record.group.clone()).collect()
    }

    fn group_members(&self, group_id: GroupId) -> Result<Vec<UserId>, StoreError> {
        Ok(self.record(group_id)?.members.clone())
    }

    fn memberships_for_user(&self, user_id: UserId) -> Vec<GroupMembership> {
        self.groups
            .values()
            .filter(|record| record.members.contains(&user_id))
            .map(|record| GroupMembership {
                group_id: record.group.id,
                user_id,
            })
            .collect()
    }

    fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, StoreError> {
        Ok(self.record(group_id)?.expenses.clone())
    }

    fn insert_expense(&mut self, expense: Expense) -> Result<(), StoreError> {
        check_shape(&expense)?;

        if !expense.is_balanced() {
            let total = expense
                .split_total()
                .map_or_else(|err| err.to_string(), |total| total.to_string());
            return Err(StoreError::InconsistentExpense {
                expense_id: expense.id,
                reason: format!("splits total {total} but amount is {}", expense.amount),
            });
        }

        self.push_expense(expense)
    }
}

/// Reject expenses no split policy can produce
fn check_shape(expense: &Expense) -> Result<(), StoreError> {
    let reason = if !expense.amount.is_positive() {
        format!("amount must be positive (got {})", expense.amount)
    } else if expense.splits.is_empty() {
        "expense has no splits".to_string()
    } else {
        return Ok(());
    };

    Err(StoreError::InconsistentExpense {
        expense_id: expense.id,
        reason,
    })
}
