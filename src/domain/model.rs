//! Ledger data model
//!
//! Records supplied by the storage layer (users, groups, memberships, expenses)
//! and the derived shapes the ledger produces for the request layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ExpenseId, GroupId, LedgerError, Money, MoneyError, UserId};

// =========================================================================
// Stored records
// =========================================================================

/// A person taking part in shared expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// A named collection of users sharing expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

/// Group ↔ user link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMembership {
    pub group_id: GroupId,
    pub user_id: UserId,
}

/// How an expense amount is divided among its participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    Equal,
    Percentage,
}

impl SplitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "percentage" => Ok(Self::Percentage),
            other => Err(LedgerError::invalid_split(format!(
                "unsupported split policy '{other}'"
            ))),
        }
    }
}

/// One participant's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub user_id: UserId,
    pub amount: Money,
    /// Share in percent; implicit 100/N for equal splits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

/// A recorded expense together with its splits.
///
/// `participants` is the member list captured when the expense was created.
/// It is never recomputed from current group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub description: String,
    pub amount: Money,
    pub payer_id: UserId,
    pub split_policy: SplitPolicy,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<UserId>,
    pub splits: Vec<Split>,
}

impl Expense {
    /// Sum of all split amounts
    pub fn split_total(&self) -> Result<Money, MoneyError> {
        Money::try_sum(self.splits.iter().map(|split| split.amount))
    }

    /// Whether the splits add up to the expense amount exactly
    pub fn is_balanced(&self) -> bool {
        self.split_total() == Ok(self.amount)
    }
}

// =========================================================================
// Derived shapes
// =========================================================================

/// A user's net position within one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    pub user_id: UserId,
    pub user_name: String,
    pub net_balance: Money,
}

/// One settling payment: `debtor_id` pays `creditor_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub debtor_id: UserId,
    pub creditor_id: UserId,
    pub amount: Money,
}

/// A user's net balance in one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupNetBalance {
    pub group_id: GroupId,
    pub net_balance: Money,
}

/// A user's balances across every group they belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalanceSummary {
    pub user_id: UserId,
    pub per_group: Vec<GroupNetBalance>,
    pub total_net_balance: Money,
}
