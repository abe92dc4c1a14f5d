//! Store Errors
//!
//! Error types for snapshot loading and store operations.

use crate::domain::{ExpenseId, GroupId, UserId};

/// Errors that can occur in the ledger store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Group does not exist
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// User does not exist
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Record with the same id already stored
    #[error("Duplicate {kind}: {id}")]
    Duplicate { kind: &'static str, id: String },

    /// Expense rejected on write
    #[error("Inconsistent expense {expense_id}: {reason}")]
    InconsistentExpense { expense_id: ExpenseId, reason: String },

    /// Snapshot file could not be read
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot content is not valid JSON for the expected shape
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn duplicate(kind: &'static str, id: impl ToString) -> Self {
        Self::Duplicate {
            kind,
            id: id.to_string(),
        }
    }

    /// Check if this error is a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::GroupNotFound(_) | StoreError::UserNotFound(_))
    }
}
