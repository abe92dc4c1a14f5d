//! Ledger snapshot
//!
//! JSON document holding everything the ledger needs for a report: users,
//! groups with their member ids, and expenses with their splits.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{Expense, Group, GroupId, User, UserId};

use super::StoreError;

/// A group together with its member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl GroupSnapshot {
    pub fn group(&self) -> Group {
        Group {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Full, committed view of the ledger data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl LedgerSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            users = snapshot.users.len(),
            groups = snapshot.groups.len(),
            expenses = snapshot.expenses.len(),
            "Loaded ledger snapshot"
        );

        Ok(snapshot)
    }
}
