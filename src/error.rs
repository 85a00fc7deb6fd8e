//! Error types for the Elidune lending core

use thiserror::Error;

/// Stable error codes handed to control layers for display and mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadValue = 18,
    InvalidState = 22,
    NoPendingList = 23,
    OutOfRange = 24,
}

/// Main lending error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed constructor arguments (empty strings, non-positive ids, bad dates)
    #[error("Validation error: {0}")]
    Validation(String),

    /// An entity method was called in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The borrower has no pending loan list; `create_new_pending_list` must be called first
    #[error("No pending loan list exists for borrower {0}")]
    MissingPendingList(i32),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

impl AppError {
    /// Numeric code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::InvalidState(_) => ErrorCode::InvalidState,
            AppError::MissingPendingList(_) => ErrorCode::NoPendingList,
            AppError::OutOfRange(_) => ErrorCode::OutOfRange,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for lending operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Validation("x".into()).code(), ErrorCode::BadValue);
        assert_eq!(AppError::InvalidState("x".into()).code(), ErrorCode::InvalidState);
        assert_eq!(AppError::MissingPendingList(3).code(), ErrorCode::NoPendingList);
        assert_eq!(AppError::OutOfRange("x".into()).code() as u32, 24);
    }

    #[test]
    fn test_every_error_has_its_own_code() {
        let codes: Vec<u32> = [
            AppError::Validation("x".into()),
            AppError::InvalidState("x".into()),
            AppError::MissingPendingList(1),
            AppError::OutOfRange("x".into()),
        ]
        .iter()
        .map(|err| err.code() as u32)
        .collect();
        assert_eq!(codes, vec![18, 22, 23, 24]);
    }

    #[test]
    fn test_missing_pending_list_message() {
        let err = AppError::MissingPendingList(7);
        assert_eq!(err.to_string(), "No pending loan list exists for borrower 7");
    }
}
