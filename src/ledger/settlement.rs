//! Settlement matching
//!
//! Greedy largest-first matching of debtors to creditors. The result zeroes the
//! group ledger with at most `debtors + creditors - 1` payments; it is not a
//! minimum-payment solution.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::domain::{LedgerError, Money, SettlementTransaction, UserId};

use super::GroupBalances;

/// Payments that settle a group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Payments in the order they were matched
    pub transactions: Vec<SettlementTransaction>,
    /// Amount left undischarged because debts and credits did not match
    pub unsettled: Money,
}

impl Settlement {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Payments the user has to make
    pub fn payments_by(&self, user_id: UserId) -> impl Iterator<Item = &SettlementTransaction> {
        self.transactions
            .iter()
            .filter(move |tx| tx.debtor_id == user_id)
    }

    /// Payments the user will receive
    pub fn payments_to(&self, user_id: UserId) -> impl Iterator<Item = &SettlementTransaction> {
        self.transactions
            .iter()
            .filter(move |tx| tx.creditor_id == user_id)
    }

    /// Balances left after every payment has been made.
    ///
    /// # Errors
    /// `LedgerError::AmountOverflow` if a payment pushes a balance out of range.
    pub fn apply_to(&self, balances: &GroupBalances) -> Result<GroupBalances, LedgerError> {
        let mut remaining = balances.clone();
        for tx in &self.transactions {
            remaining.credit(tx.debtor_id, tx.amount)?;
            remaining.debit(tx.creditor_id, tx.amount)?;
        }
        Ok(remaining)
    }
}

/// Heap entry: largest amount first, then lowest user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Outstanding {
    amount: Money,
    user_id: Reverse<UserId>,
}

impl Outstanding {
    fn new(user_id: UserId, amount: Money) -> Self {
        Self {
            amount,
            user_id: Reverse(user_id),
        }
    }

    fn user(&self) -> UserId {
        self.user_id.0
    }

    /// Outstanding amount after paying `amount`, which never exceeds it.
    fn reduced_by(mut self, amount: Money) -> Self {
        self.amount = Money::from_cents(self.amount.cents() - amount.cents());
        self
    }
}

/// Compute the payments that settle a group's balances.
///
/// Each round matches the debtor owing the most with the creditor owed the
/// most (lower user id wins ties) for the smaller of the two amounts. The
/// output depends only on `balances`, so repeated calls are identical.
pub fn compute_settlement(balances: &GroupBalances) -> Settlement {
    let mut debtors = BinaryHeap::new();
    let mut creditors = BinaryHeap::new();

    for (user_id, balance) in balances.iter() {
        if balance.is_negative() {
            debtors.push(Outstanding::new(user_id, balance.abs()));
        } else if balance.is_positive() {
            creditors.push(Outstanding::new(user_id, balance));
        }
    }

    let mut transactions = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));

    while let (Some(mut debtor), Some(mut creditor)) =
        (debtors.peek().copied(), creditors.peek().copied())
    {
        debtors.pop();
        creditors.pop();

        let amount = debtor.amount.min(creditor.amount);
        transactions.push(SettlementTransaction {
            debtor_id: debtor.user(),
            creditor_id: creditor.user(),
            amount,
        });

        tracing::trace!(
            debtor = %debtor.user(),
            creditor = %creditor.user(),
            %amount,
            "Matched settlement payment"
        );

        debtor = debtor.reduced_by(amount);
        creditor = creditor.reduced_by(amount);

        if debtor.amount.is_positive() {
            debtors.push(debtor);
        }
        if creditor.amount.is_positive() {
            creditors.push(creditor);
        }
    }

    // Only one side can be left over. Its sum is capped rather than failed.
    let unsettled = Money::try_sum(
        debtors
            .iter()
            .chain(creditors.iter())
            .map(|entry| entry.amount),
    )
    .unwrap_or(Money::MAX);

    if !unsettled.is_zero() {
        if cfg!(debug_assertions) {
            tracing::error!(%unsettled, "Settlement left an undischarged remainder");
        } else {
            tracing::warn!(%unsettled, "Settlement rounding note: debts and credits differ");
        }
    }

    Settlement {
        transactions,
        unsettled,
    }
}
