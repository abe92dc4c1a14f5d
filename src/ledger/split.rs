//! Split calculation
//!
//! Turns an expense amount into one owed share per participant.
//!
//! Shares are computed in whole cents. Equal shares are rounded down and the
//! leftover cents are handed out one at a time starting with the first
//! participant, so no share is more than one cent away from amount / N.
//! Percentage shares are rounded to the nearest cent and the residual goes to
//! the first participant. Either way the shares add up to the amount exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

use crate::domain::{LedgerError, Money, Split, SplitPolicy, UserId};

/// Decimal places kept for the implicit percentage of an equal split
const PERCENT_SCALE: u32 = 4;

/// Maximum distance of a percentage total from 100
const PERCENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Compute the splits of an expense.
///
/// `percentages` is only read for [`SplitPolicy::Percentage`], where it must
/// hold one entry per participant, in participant order.
///
/// # Errors
/// - `LedgerError::InvalidAmount` if `amount` is not positive
/// - `LedgerError::InvalidSplitPolicy` for an empty or duplicated participant
///   list, or percentages that are missing, out of range, or don't sum to 100
pub fn compute_splits(
    amount: Money,
    policy: SplitPolicy,
    participants: &[UserId],
    percentages: Option<&[Decimal]>,
) -> Result<Vec<Split>, LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount(format!(
            "expense amount must be positive (got {amount})"
        )));
    }

    if participants.is_empty() {
        return Err(LedgerError::invalid_split("participant list is empty"));
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for user_id in participants {
        if !seen.insert(*user_id) {
            return Err(LedgerError::invalid_split(format!(
                "participant {user_id} is listed more than once"
            )));
        }
    }

    match policy {
        SplitPolicy::Equal => Ok(equal_splits(amount, participants)),
        SplitPolicy::Percentage => {
            let percentages = percentages.ok_or_else(|| {
                LedgerError::invalid_split("percentage split requires percentages")
            })?;
            percentage_splits(amount, participants, percentages)
        }
    }
}

fn equal_splits(amount: Money, participants: &[UserId]) -> Vec<Split> {
    let count = participants.len() as i64;
    let mut shares = vec![amount.cents() / count; participants.len()];
    distribute_residual(&mut shares, amount.cents() % count);

    let percentage = (Decimal::ONE_HUNDRED / Decimal::from(count)).round_dp(PERCENT_SCALE);

    participants
        .iter()
        .zip(shares)
        .map(|(&user_id, cents)| Split {
            user_id,
            amount: Money::from_cents(cents),
            percentage: Some(percentage),
        })
        .collect()
}

fn percentage_splits(
    amount: Money,
    participants: &[UserId],
    percentages: &[Decimal],
) -> Result<Vec<Split>, LedgerError> {
    if percentages.len() != participants.len() {
        return Err(LedgerError::invalid_split(format!(
            "expected {} percentages, got {}",
            participants.len(),
            percentages.len()
        )));
    }

    for (user_id, percentage) in participants.iter().zip(percentages) {
        if *percentage <= Decimal::ZERO || *percentage > Decimal::ONE_HUNDRED {
            return Err(LedgerError::invalid_split(format!(
                "percentage for user {user_id} must be in (0, 100] (got {percentage})"
            )));
        }
    }

    let total: Decimal = percentages.iter().sum();
    if (total - Decimal::ONE_HUNDRED).abs() > PERCENT_TOLERANCE {
        return Err(LedgerError::invalid_split(format!(
            "percentages must sum to 100 (got {total})"
        )));
    }

    // Scale by the actual total so a sum within tolerance still allocates
    // the whole amount.
    let cents = Decimal::from(amount.cents());
    let mut shares = Vec::with_capacity(percentages.len());
    for percentage in percentages {
        let share = (cents * percentage / total)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| LedgerError::InvalidAmount(format!("share of {amount} overflows")))?;
        shares.push(share);
    }

    let allocated: i64 = shares.iter().sum();
    assign_residual_to_first(&mut shares, amount.cents() - allocated);

    Ok(participants
        .iter()
        .zip(percentages)
        .zip(shares)
        .map(|((&user_id, &percentage), cents)| Split {
            user_id,
            amount: Money::from_cents(cents),
            percentage: Some(percentage),
        })
        .collect())
}

/// Hand out `residual` cents of an equal split one by one, starting with the
/// first share.
///
/// `residual` is always in `[0, shares.len())` because every share was rounded
/// down by less than one cent.
fn distribute_residual(shares: &mut [i64], residual: i64) {
    if residual == 0 {
        return;
    }

    tracing::debug!(
        residual_cents = residual,
        participants = shares.len(),
        "Assigning split residual starting with the first participant"
    );

    for share in shares.iter_mut().take(residual as usize) {
        *share += 1;
    }
}

/// Put the whole rounding residual on the first share.
///
/// A negative residual that would push the first share below zero spills
/// over to the following shares.
fn assign_residual_to_first(shares: &mut [i64], residual: i64) {
    if residual == 0 {
        return;
    }

    tracing::debug!(
        residual_cents = residual,
        participants = shares.len(),
        "Assigning percentage split residual to the first participant"
    );

    if residual > 0 {
        if let Some(first) = shares.first_mut() {
            *first += residual;
        }
        return;
    }

    let mut owed = -residual;
    for share in shares.iter_mut() {
        let taken = owed.min(*share);
        *share -= taken;
        owed -= taken;
        if owed == 0 {
            break;
        }
    }
}
