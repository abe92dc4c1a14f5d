//! Command and report definitions
//!
//! Commands carry requests to change the ledger; reports are the shapes the
//! handlers return to the request layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{GroupId, Money, NetBalance, SettlementTransaction, UserId};

// =========================================================================
// CreateExpenseCommand
// =========================================================================

/// One participant's percentage in a percentage split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    pub user_id: UserId,
    pub percentage: Decimal,
}

impl SplitShare {
    pub fn new(user_id: UserId, percentage: Decimal) -> Self {
        Self {
            user_id,
            percentage,
        }
    }
}

/// Command to record an expense in a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpenseCommand {
    pub group_id: GroupId,
    pub description: String,
    /// Amount as a decimal string ("90.00")
    pub amount: String,
    /// Payer, must be a group member
    pub paid_by: UserId,
    /// Split policy tag: "equal" or "percentage"
    pub split_type: String,
    /// Required for percentage splits, ignored for equal splits
    pub splits: Option<Vec<SplitShare>>,
}

impl CreateExpenseCommand {
    pub fn new(
        group_id: GroupId,
        description: String,
        amount: String,
        paid_by: UserId,
        split_type: String,
    ) -> Self {
        Self {
            group_id,
            description,
            amount,
            paid_by,
            split_type,
            splits: None,
        }
    }

    pub fn with_shares(mut self, shares: Vec<SplitShare>) -> Self {
        self.splits = Some(shares);
        self
    }
}

// =========================================================================
// Balance reports
// =========================================================================

/// The other side of a settlement payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub user_id: UserId,
    pub user_name: String,
    pub amount: Money,
}

/// A member's balance with who they pay and who pays them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    #[serde(flatten)]
    pub balance: NetBalance,
    pub owes_to: Vec<Counterparty>,
    pub owed_by: Vec<Counterparty>,
}

/// Balances and settlement of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalanceReport {
    pub group_id: GroupId,
    pub group_name: String,
    pub total_expenses: Money,
    pub balances: Vec<MemberBalance>,
    pub settlement: Vec<SettlementTransaction>,
    /// Left undischarged by the settlement; zero for a consistent ledger
    pub unsettled: Money,
    /// Sum of all balances; zero for a consistent ledger
    pub rounding_residual: Money,
}

impl GroupBalanceReport {
    /// Balance row of one member
    pub fn member(&self, user_id: UserId) -> Option<&MemberBalance> {
        self.balances
            .iter()
            .find(|member| member.balance.user_id == user_id)
    }
}

/// A user's position in one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroupBalance {
    pub group_id: GroupId,
    pub group_name: String,
    pub net_balance: Money,
    pub owes_to: Vec<Counterparty>,
    pub owed_by: Vec<Counterparty>,
}

/// A user's balances across all their groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalanceReport {
    pub user_id: UserId,
    pub user_name: String,
    pub groups: Vec<UserGroupBalance>,
    pub total_net_balance: Money,
}
