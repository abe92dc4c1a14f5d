//! Ledger Error Types
//!
//! Pure ledger errors that don't depend on storage or transport.

use thiserror::Error;

use super::{GroupId, Money, UserId};

/// Errors raised by the ledger core.
///
/// None of these are retryable: the caller has to correct its input or the
/// upstream data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or inconsistent split configuration
    #[error("Invalid split policy: {0}")]
    InvalidSplitPolicy(String),

    /// Amount is zero, negative, or otherwise unusable
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A payer or split participant is not a member of the group
    #[error("Unknown participant: user {user_id} is not a member of group {group_id}")]
    UnknownParticipant { user_id: UserId, group_id: GroupId },

    /// Closed-ledger invariant violated; diagnostic only
    #[error("Rounding inconsistency: ledger is off by {residual}")]
    RoundingInconsistency { residual: Money },

    /// Ledger arithmetic left the representable range
    #[error("Amount overflow while {context}")]
    AmountOverflow { context: &'static str },
}

impl LedgerError {
    /// Create an invalid split policy error
    pub fn invalid_split(reason: impl Into<String>) -> Self {
        Self::InvalidSplitPolicy(reason.into())
    }

    /// Create an overflow error for the named computation
    pub fn overflow(context: &'static str) -> Self {
        Self::AmountOverflow { context }
    }

    /// Check if this is a client error (caller's input is wrong)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidSplitPolicy(_) | Self::InvalidAmount(_))
    }
}
