//! Typed failures returned across the domain boundary.

use super::models::{SettingsValidationError, TaskValidationError};

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Proof not found: {0}")]
    ProofNotFound(String),
    /// Deliberately silent about whether the account exists
    #[error("Invalid account or password")]
    InvalidCredential,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Not permitted for the current user")]
    AccessDenied,
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Name cannot be empty")]
    EmptyName,
    #[error(transparent)]
    InvalidTask(#[from] TaskValidationError),
    #[error(transparent)]
    InvalidSettings(#[from] SettingsValidationError),
    #[error(transparent)]
    SessionRejected(#[from] SessionStartError),
    #[error("State unavailable: {0}")]
    StateUnavailable(#[from] anyhow::Error),
}

/// Why a usage session could not start
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStartError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Account is locked by a parent")]
    AccountLocked,
    #[error("No minutes left to spend")]
    InsufficientBalance,
    #[error("No app selected")]
    NoAppSelected,
    #[error("A session is already running")]
    AlreadyActive,
}

/// Failure talking to the advisory service. Never reaches ledger state;
/// the gateway turns every variant into a placeholder result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    #[error("Advisory service unavailable: {0}")]
    Unavailable(String),
    #[error("Advisory service timed out")]
    Timeout,
    #[error("Advisory service returned unusable content: {0}")]
    MalformedResponse(String),
}
