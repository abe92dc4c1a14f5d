//! Expense Handler
//!
//! Records a new expense: validates it against the group, computes the splits
//! and stores expense and splits together.

use chrono::Utc;
use std::collections::HashSet;

use crate::domain::{Expense, ExpenseId, LedgerError, Money, SplitPolicy, UserId};
use crate::error::{AppError, AppResult};
use crate::ledger::compute_splits;
use crate::store::LedgerStore;

use super::CreateExpenseCommand;

/// Handler for recording expenses
pub struct CreateExpenseHandler<'a, S> {
    store: &'a mut S,
}

impl<'a, S: LedgerStore> CreateExpenseHandler<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Execute the create-expense command
    pub fn execute(&mut self, command: CreateExpenseCommand) -> AppResult<Expense> {
        let group = self
            .store
            .group(command.group_id)
            .ok_or(AppError::GroupNotFound(command.group_id))?;

        let description = command.description.trim();
        if description.is_empty() {
            return Err(AppError::InvalidRequest(
                "Expense description must not be empty".to_string(),
            ));
        }

        let amount: Money = command.amount.parse()?;
        let policy: SplitPolicy = command.split_type.parse()?;

        let members = self.store.group_members(group.id)?;
        let member_set: HashSet<UserId> = members.iter().copied().collect();

        let is_member = |user_id: UserId| -> Result<(), LedgerError> {
            if member_set.contains(&user_id) {
                Ok(())
            } else {
                Err(LedgerError::UnknownParticipant {
                    user_id,
                    group_id: group.id,
                })
            }
        };

        is_member(command.paid_by)?;

        // Equal splits capture the membership as it is right now; the list is
        // stored with the expense and never recomputed.
        let (participants, percentages) = match policy {
            SplitPolicy::Equal => (members.clone(), None),
            SplitPolicy::Percentage => {
                let shares = command
                    .splits
                    .as_deref()
                    .filter(|shares| !shares.is_empty())
                    .ok_or_else(|| {
                        LedgerError::invalid_split("percentage split requires shares")
                    })?;

                for share in shares {
                    is_member(share.user_id)?;
                }

                let participants: Vec<UserId> = shares.iter().map(|s| s.user_id).collect();
                let percentages: Vec<_> = shares.iter().map(|s| s.percentage).collect();
                (participants, Some(percentages))
            }
        };

        let splits = compute_splits(amount, policy, &participants, percentages.as_deref())?;

        let expense = Expense {
            id: ExpenseId::new(),
            group_id: group.id,
            description: description.to_string(),
            amount,
            payer_id: command.paid_by,
            split_policy: policy,
            created_at: Utc::now(),
            participants,
            splits,
        };

        self.store.insert_expense(expense.clone())?;

        tracing::info!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            payer_id = %expense.payer_id,
            amount = %expense.amount,
            policy = %expense.split_policy,
            participants = expense.participants.len(),
            "Expense recorded"
        );

        Ok(expense)
    }
}
