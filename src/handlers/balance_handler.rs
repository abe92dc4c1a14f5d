//! Balance Handlers
//!
//! Group and user balance reports. Every call recomputes from the store's
//! current expenses; nothing is cached between calls.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Expense, GroupId, LedgerError, Money, NetBalance, UserId};
use crate::error::{AppError, AppResult};
use crate::ledger::{
    compute_group_balances, compute_settlement, compute_user_balance_from, validate_participants,
    Settlement,
};
use crate::store::LedgerStore;

use super::{
    Counterparty, GroupBalanceReport, MemberBalance, UserBalanceReport, UserGroupBalance,
};

/// Who the user pays and who pays the user under a settlement
fn counterparties<S: LedgerStore>(
    store: &S,
    settlement: &Settlement,
    user_id: UserId,
) -> (Vec<Counterparty>, Vec<Counterparty>) {
    let party = |other: UserId, amount: Money| Counterparty {
        user_id: other,
        user_name: display_name(store, other),
        amount,
    };

    let owes_to = settlement
        .payments_by(user_id)
        .map(|tx| party(tx.creditor_id, tx.amount))
        .collect();
    let owed_by = settlement
        .payments_to(user_id)
        .map(|tx| party(tx.debtor_id, tx.amount))
        .collect();

    (owes_to, owed_by)
}

fn display_name<S: LedgerStore>(store: &S, user_id: UserId) -> String {
    store
        .user_name(user_id)
        .unwrap_or_else(|| user_id.to_string())
}

/// Load a group's expenses after checking they only reference members
fn load_checked_expenses<S: LedgerStore>(
    store: &S,
    group_id: GroupId,
    members: &[UserId],
) -> AppResult<Vec<Expense>> {
    let members: BTreeSet<UserId> = members.iter().copied().collect();
    let expenses = store.group_expenses(group_id)?;
    validate_participants(group_id, &members, &expenses)?;
    Ok(expenses)
}

// =========================================================================
// GroupBalancesHandler
// =========================================================================

/// Handler for a group's balances and settlement
pub struct GroupBalancesHandler<'a, S> {
    store: &'a S,
}

impl<'a, S: LedgerStore> GroupBalancesHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build the balance report of a group
    pub fn execute(&self, group_id: GroupId) -> AppResult<GroupBalanceReport> {
        let group = self
            .store
            .group(group_id)
            .ok_or(AppError::GroupNotFound(group_id))?;

        let members = self.store.group_members(group_id)?;
        let expenses = load_checked_expenses(self.store, group_id, &members)?;

        let balances = compute_group_balances(&expenses)?;
        let settlement = compute_settlement(&balances);
        let total_expenses = Money::try_sum(expenses.iter().map(|expense| expense.amount))
            .map_err(|_| LedgerError::overflow("summing group expenses"))?;

        // Every member gets a row, including those without expenses yet.
        let mut rows: BTreeSet<UserId> = members.into_iter().collect();
        rows.extend(balances.iter().map(|(user_id, _)| user_id));

        let report_rows = rows
            .into_iter()
            .map(|user_id| {
                let (owes_to, owed_by) = counterparties(self.store, &settlement, user_id);
                MemberBalance {
                    balance: NetBalance {
                        user_id,
                        user_name: display_name(self.store, user_id),
                        net_balance: balances.get(user_id),
                    },
                    owes_to,
                    owed_by,
                }
            })
            .collect();

        let report = GroupBalanceReport {
            group_id,
            group_name: group.name,
            total_expenses,
            balances: report_rows,
            settlement: settlement.transactions,
            unsettled: settlement.unsettled,
            rounding_residual: balances.total()?,
        };

        tracing::debug!(
            %group_id,
            expenses = expenses.len(),
            payments = report.settlement.len(),
            "Computed group balances"
        );

        Ok(report)
    }
}

// =========================================================================
// UserBalancesHandler
// =========================================================================

/// Handler for a user's balances across all groups
pub struct UserBalancesHandler<'a, S> {
    store: &'a S,
}

impl<'a, S: LedgerStore> UserBalancesHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build the cross-group balance report of a user
    pub fn execute(&self, user_id: UserId) -> AppResult<UserBalanceReport> {
        let user = self
            .store
            .user(user_id)
            .ok_or(AppError::UserNotFound(user_id))?;

        let memberships = self.store.memberships_for_user(user_id);

        // Each group is aggregated once; its settlement is kept for the
        // counterparty lists below.
        let mut settlements: HashMap<GroupId, Settlement> = HashMap::new();
        let summary = compute_user_balance_from(user_id, &memberships, |group_id| {
            let members = self.store.group_members(group_id)?;
            let expenses = load_checked_expenses(self.store, group_id, &members)?;
            let balances = compute_group_balances(&expenses)?;
            settlements.insert(group_id, compute_settlement(&balances));
            Ok::<_, AppError>(balances)
        })?;

        let mut groups = Vec::with_capacity(summary.per_group.len());
        for entry in &summary.per_group {
            let group_name = self
                .store
                .group(entry.group_id)
                .map(|group| group.name)
                .ok_or(AppError::GroupNotFound(entry.group_id))?;

            let settlement = settlements.remove(&entry.group_id).unwrap_or_default();
            let (owes_to, owed_by) = counterparties(self.store, &settlement, user_id);

            groups.push(UserGroupBalance {
                group_id: entry.group_id,
                group_name,
                net_balance: entry.net_balance,
                owes_to,
                owed_by,
            });
        }

        Ok(UserBalanceReport {
            user_id,
            user_name: user.name,
            groups,
            total_net_balance: summary.total_net_balance,
        })
    }
}
