//! Group balance aggregation
//!
//! Folds a group's expenses into one net balance per user: payers are credited
//! the full expense amount, participants are debited their split.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Expense, GroupId, LedgerError, Money, UserId};

/// Net balance per user within one group, ordered by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupBalances {
    balances: BTreeMap<UserId, Money>,
}

impl GroupBalances {
    /// Balance for a user; users without any expense have a zero balance.
    pub fn get(&self, user_id: UserId) -> Money {
        self.balances.get(&user_id).copied().unwrap_or(Money::ZERO)
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.balances.contains_key(&user_id)
    }

    /// Iterate `(user, balance)` in ascending user id order
    pub fn iter(&self) -> impl Iterator<Item = (UserId, Money)> + '_ {
        self.balances.iter().map(|(user_id, balance)| (*user_id, *balance))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances; zero for a closed ledger
    ///
    /// # Errors
    /// `LedgerError::AmountOverflow` if the sum is not representable.
    pub fn total(&self) -> Result<Money, LedgerError> {
        Money::try_sum(self.balances.values().copied())
            .map_err(|_| LedgerError::overflow("summing group balances"))
    }

    /// Whether every balance is zero
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(|balance| balance.is_zero())
    }

    /// Check the closed-ledger invariant.
    ///
    /// # Errors
    /// `LedgerError::RoundingInconsistency` carrying the non-zero total, or
    /// `LedgerError::AmountOverflow` if the total cannot be computed.
    pub fn check_closed(&self) -> Result<(), LedgerError> {
        let residual = self.total()?;
        if residual.is_zero() {
            Ok(())
        } else {
            Err(LedgerError::RoundingInconsistency { residual })
        }
    }

    pub(crate) fn credit(&mut self, user_id: UserId, amount: Money) -> Result<(), LedgerError> {
        let balance = self.balances.entry(user_id).or_default();
        *balance = balance
            .try_add(amount)
            .map_err(|_| LedgerError::overflow("crediting a balance"))?;
        Ok(())
    }

    pub(crate) fn debit(&mut self, user_id: UserId, amount: Money) -> Result<(), LedgerError> {
        let balance = self.balances.entry(user_id).or_default();
        *balance = balance
            .try_sub(amount)
            .map_err(|_| LedgerError::overflow("debiting a balance"))?;
        Ok(())
    }
}

/// Build balances from `(user, balance)` pairs; a later pair for the same user
/// replaces the earlier one.
impl FromIterator<(UserId, Money)> for GroupBalances {
    fn from_iter<I: IntoIterator<Item = (UserId, Money)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

/// Compute every user's net balance over a group's expenses.
///
/// Users appear in the result if they paid for or took part in at least one
/// expense. A non-zero total can only come from expenses whose splits don't add
/// up to their amount; it is logged and left on the result for
/// [`GroupBalances::check_closed`] rather than failing the query.
///
/// # Errors
/// `LedgerError::AmountOverflow` if a balance leaves the representable range.
pub fn compute_group_balances(expenses: &[Expense]) -> Result<GroupBalances, LedgerError> {
    let mut balances = GroupBalances::default();

    for expense in expenses {
        balances.credit(expense.payer_id, expense.amount)?;
        for split in &expense.splits {
            balances.debit(split.user_id, split.amount)?;
        }
    }

    match balances.check_closed() {
        Ok(()) => {}
        Err(LedgerError::AmountOverflow { .. }) => {
            // Individual balances are exact; only their sum is out of range.
            tracing::warn!(users = balances.len(), "Group balance total not representable");
        }
        Err(diagnostic) => {
            let unbalanced = expenses.iter().filter(|e| !e.is_balanced()).count();
            if cfg!(debug_assertions) {
                tracing::error!(
                    %diagnostic,
                    unbalanced_expenses = unbalanced,
                    "Group ledger does not close"
                );
            } else {
                tracing::warn!(
                    %diagnostic,
                    unbalanced_expenses = unbalanced,
                    "Group ledger does not close"
                );
            }
        }
    }

    Ok(balances)
}

/// Check that every payer and split participant is a member of the group.
///
/// # Errors
/// `LedgerError::UnknownParticipant` for the first non-member found.
pub fn validate_participants(
    group_id: GroupId,
    members: &BTreeSet<UserId>,
    expenses: &[Expense],
) -> Result<(), LedgerError> {
    for expense in expenses {
        let users = std::iter::once(expense.payer_id)
            .chain(expense.splits.iter().map(|split| split.user_id));

        for user_id in users {
            if !members.contains(&user_id) {
                tracing::warn!(
                    expense_id = %expense.id,
                    %user_id,
                    %group_id,
                    "Expense references a user outside the group"
                );
                return Err(LedgerError::UnknownParticipant { user_id, group_id });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseId, Split, SplitPolicy};
    use chrono::Utc;

    fn expense(payer: u64, amount: i64, shares: &[(u64, i64)]) -> Expense {
        Expense {
            id: ExpenseId::new(),
            group_id: GroupId(1),
            description: "test".to_string(),
            amount: Money::from_cents(amount),
            payer_id: UserId(payer),
            split_policy: SplitPolicy::Equal,
            created_at: Utc::now(),
            participants: shares.iter().map(|(user, _)| UserId(*user)).collect(),
            splits: shares
                .iter()
                .map(|(user, cents)| Split {
                    user_id: UserId(*user),
                    amount: Money::from_cents(*cents),
                    percentage: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_equal_expense() {
        let expenses = vec![expense(1, 9000, &[(1, 3000), (2, 3000), (3, 3000)])];
        let balances = compute_group_balances(&expenses).unwrap();

        assert_eq!(balances.get(UserId(1)), Money::from_cents(6000));
        assert_eq!(balances.get(UserId(2)), Money::from_cents(-3000));
        assert_eq!(balances.get(UserId(3)), Money::from_cents(-3000));
        assert!(balances.check_closed().is_ok());
    }

    #[test]
    fn test_two_expenses_combined() {
        let expenses = vec![
            expense(1, 9000, &[(1, 3000), (2, 3000), (3, 3000)]),
            expense(2, 10000, &[(1, 2500), (2, 2500), (3, 5000)]),
        ];
        let balances = compute_group_balances(&expenses).unwrap();

        assert_eq!(balances.get(UserId(1)), Money::from_cents(3500));
        assert_eq!(balances.get(UserId(2)), Money::from_cents(4500));
        assert_eq!(balances.get(UserId(3)), Money::from_cents(-8000));
        assert_eq!(balances.total(), Ok(Money::ZERO));
    }

    #[test]
    fn test_payer_outside_splits() {
        let expenses = vec![expense(4, 1000, &[(1, 500), (2, 500)])];
        let balances = compute_group_balances(&expenses).unwrap();

        assert_eq!(balances.get(UserId(4)), Money::from_cents(1000));
        assert_eq!(balances.len(), 3);
    }

    #[test]
    fn test_absent_user_is_zero() {
        let balances = compute_group_balances(&[]).unwrap();
        assert!(balances.is_empty());
        assert_eq!(balances.get(UserId(42)), Money::ZERO);
        assert!(!balances.contains(UserId(42)));
    }

    #[test]
    fn test_unbalanced_expense_reported_not_fatal() {
        let expenses = vec![expense(1, 1000, &[(1, 333), (2, 333), (3, 333)])];
        let balances = compute_group_balances(&expenses).unwrap();

        assert_eq!(balances.get(UserId(1)), Money::from_cents(667));
        assert_eq!(
            balances.check_closed(),
            Err(LedgerError::RoundingInconsistency {
                residual: Money::from_cents(1)
            })
        );
    }

    #[test]
    fn test_recomputation_is_identical() {
        let expenses = vec![
            expense(1, 9000, &[(1, 3000), (2, 3000), (3, 3000)]),
            expense(3, 500, &[(2, 500)]),
        ];
        assert_eq!(
            compute_group_balances(&expenses).unwrap(),
            compute_group_balances(&expenses).unwrap()
        );
    }

    #[test]
    fn test_validate_participants() {
        let members: BTreeSet<UserId> = [UserId(1), UserId(2)].into_iter().collect();

        let ok = vec![expense(1, 1000, &[(1, 500), (2, 500)])];
        assert!(validate_participants(GroupId(1), &members, &ok).is_ok());

        let stray_split = vec![expense(1, 1000, &[(1, 500), (5, 500)])];
        assert_eq!(
            validate_participants(GroupId(1), &members, &stray_split),
            Err(LedgerError::UnknownParticipant {
                user_id: UserId(5),
                group_id: GroupId(1)
            })
        );

        let stray_payer = vec![expense(9, 1000, &[(1, 1000)])];
        assert!(matches!(
            validate_participants(GroupId(1), &members, &stray_payer),
            Err(LedgerError::UnknownParticipant { user_id: UserId(9), .. })
        ));
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        // 1e14 cents each; 100k of them exceed i64
        let big = 100_000_000_000_000;
        let expenses: Vec<Expense> = (0..100_000)
            .map(|_| expense(1, big, &[(2, big)]))
            .collect();

        assert_eq!(
            compute_group_balances(&expenses),
            Err(LedgerError::overflow("crediting a balance"))
        );
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let balances: GroupBalances = [(UserId(1), Money::MAX), (UserId(2), Money::MAX)]
            .into_iter()
            .collect();

        assert!(matches!(
            balances.check_closed(),
            Err(LedgerError::AmountOverflow { .. })
        ));
    }
}
