//! Error taxonomy for the approval engine.
//!
//! Every variant is surfaced synchronously to the caller and none of them
//! leaves partially applied state behind.

use thiserror::Error;

use crate::core::domain::{Address, TxId};

/// Errors returned by wallet construction and the approval operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Owner set or threshold rejected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Caller is not a member of the owner set.
    #[error("Unauthorized: {0} is not an owner")]
    Unauthorized(Address),

    /// No transaction with this id exists.
    #[error("Transaction not found: {0}")]
    NotFound(TxId),

    /// Transaction already reached quorum and was executed.
    #[error("Transaction already executed: {0}")]
    AlreadyExecuted(TxId),

    /// Owner already confirmed this transaction.
    #[error("Duplicate confirmation: {owner} already confirmed transaction {tx_id}")]
    DuplicateConfirmation { owner: Address, tx_id: TxId },

    /// Payment collaborator failed; the triggering confirmation was rolled back.
    #[error("Execution failed for transaction {tx_id}: {reason}")]
    ExecutionFailed { tx_id: TxId, reason: String },

    /// Malformed identity string.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExecuted(_) => "ALREADY_EXECUTED",
            Self::DuplicateConfirmation { .. } => "DUPLICATE_CONFIRMATION",
            Self::ExecutionFailed { .. } => "EXECUTION_FAILED",
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether a later identical call could succeed without any other
    /// operation happening in between. Only a failed payment qualifies, and
    /// retrying is still left to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExecutionFailed { .. })
    }
}

impl From<toml::de::Error> for WalletError {
    fn from(err: toml::de::Error) -> Self {
        WalletError::Config(err.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        WalletError::Config(err.to_string())
    }
}
