//! Cross-group user balance
//!
//! Composes one user's balance from each group they belong to. Groups are
//! never netted against each other; settlement stays per group.

use std::collections::HashSet;

use crate::domain::{
    Expense, GroupId, GroupMembership, GroupNetBalance, LedgerError, Money, UserBalanceSummary,
    UserId,
};

use super::{compute_group_balances, GroupBalances};

/// Compute a user's balance in every group they are a member of.
///
/// `expenses_of` loads a group's expense snapshot; its errors are passed
/// through untouched. Memberships of other users are ignored and a group
/// listed twice is counted once. A group where the user has no expenses
/// contributes a zero balance.
pub fn compute_user_balance<F, E>(
    user_id: UserId,
    memberships: &[GroupMembership],
    mut expenses_of: F,
) -> Result<UserBalanceSummary, E>
where
    F: FnMut(GroupId) -> Result<Vec<Expense>, E>,
    E: From<LedgerError>,
{
    compute_user_balance_from(user_id, memberships, |group_id| {
        let expenses = expenses_of(group_id)?;
        Ok(compute_group_balances(&expenses)?)
    })
}

/// Same as [`compute_user_balance`], for callers that already aggregate each
/// group's balances themselves.
pub fn compute_user_balance_from<F, E>(
    user_id: UserId,
    memberships: &[GroupMembership],
    mut balances_of: F,
) -> Result<UserBalanceSummary, E>
where
    F: FnMut(GroupId) -> Result<GroupBalances, E>,
    E: From<LedgerError>,
{
    let mut seen = HashSet::new();
    let mut per_group = Vec::new();

    for membership in memberships {
        if membership.user_id != user_id || !seen.insert(membership.group_id) {
            continue;
        }

        let net_balance = balances_of(membership.group_id)?.get(user_id);

        per_group.push(GroupNetBalance {
            group_id: membership.group_id,
            net_balance,
        });
    }

    let total_net_balance = Money::try_sum(per_group.iter().map(|group| group.net_balance))
        .map_err(|_| LedgerError::overflow("summing a user's group balances"))?;

    tracing::debug!(
        %user_id,
        groups = per_group.len(),
        %total_net_balance,
        "Computed cross-group user balance"
    );

    Ok(UserBalanceSummary {
        user_id,
        per_group,
        total_net_balance,
    })
}
