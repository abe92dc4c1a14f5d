//! Error handling module
//!
//! Centralized application error type and stable error codes for callers.

use serde::Serialize;

use crate::domain::{GroupId, LedgerError, MoneyError, UserId};
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Invalid amount: {0}")]
    Money(#[from] MoneyError),

    // Ledger errors
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Error body for the request layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::UserNotFound(_) => "user_not_found",
            AppError::GroupNotFound(_) => "group_not_found",
            AppError::Money(_) => "invalid_amount",
            AppError::Ledger(err) => match err {
                LedgerError::InvalidSplitPolicy(_) => "invalid_split_policy",
                LedgerError::InvalidAmount(_) => "invalid_amount",
                LedgerError::UnknownParticipant { .. } => "unknown_participant",
                LedgerError::RoundingInconsistency { .. } => "rounding_inconsistency",
                LedgerError::AmountOverflow { .. } => "amount_overflow",
            },
            AppError::Store(err) => match err {
                StoreError::GroupNotFound(_) => "group_not_found",
                StoreError::UserNotFound(_) => "user_not_found",
                StoreError::Duplicate { .. } => "duplicate_record",
                StoreError::InconsistentExpense { .. } => "inconsistent_expense",
                StoreError::Io(_) | StoreError::Format(_) => "snapshot_error",
            },
        }
    }

    /// Whether the caller has to fix its input; nothing here is retryable
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::InvalidRequest(_)
            | AppError::UserNotFound(_)
            | AppError::GroupNotFound(_)
            | AppError::Money(_) => true,
            AppError::Ledger(err) => err.is_client_error(),
            AppError::Store(err) => err.is_not_found(),
        }
    }

    /// Build the error body, logging server-side faults
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            AppError::InvalidRequest(msg) => Some(msg.clone()),
            AppError::UserNotFound(id) => Some(id.to_string()),
            AppError::GroupNotFound(id) => Some(id.to_string()),
            AppError::Ledger(err) => Some(err.to_string()),
            AppError::Store(err) if err.is_not_found() => Some(err.to_string()),
            _ => None,
        };

        if !self.is_client_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }

        ErrorResponse {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_codes() {
        let err: AppError = LedgerError::invalid_split("empty").into();
        assert_eq!(err.error_code(), "invalid_split_policy");
        assert!(err.is_client_error());

        let err: AppError = LedgerError::UnknownParticipant {
            user_id: UserId(1),
            group_id: GroupId(2),
        }
        .into();
        assert_eq!(err.error_code(), "unknown_participant");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_store_not_found_is_client_error() {
        let err: AppError = StoreError::GroupNotFound(GroupId(5)).into();
        assert_eq!(err.error_code(), "group_not_found");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_response_body() {
        let response = AppError::GroupNotFound(GroupId(9)).to_response();
        assert_eq!(response.error_code, "group_not_found");
        assert_eq!(response.details.as_deref(), Some("9"));

        let err: AppError = StoreError::Duplicate {
            kind: "expense",
            id: "x".to_string(),
        }
        .into();
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(json["error_code"], "duplicate_record");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_overflow_is_server_fault() {
        let err: AppError = LedgerError::overflow("summing group expenses").into();
        assert_eq!(err.error_code(), "amount_overflow");
        assert!(!err.is_client_error());
    }
}
