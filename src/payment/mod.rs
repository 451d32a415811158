//! External value-transfer collaborator.
//!
//! The approval engine never moves value itself; once a transaction reaches
//! quorum it hands destination and amount to a [`PaymentTransfer`].

pub mod ledger;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::core::domain::{Address, Amount};

pub use ledger::InMemoryLedger;

/// Failure reported by a payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error("transfer timed out after {0:?}")]
    Timeout(Duration),
}

/// Performs the actual value movement for an executed transaction.
#[async_trait]
pub trait PaymentTransfer: Send + Sync {
    /// Move `amount` to `destination`. Either the whole transfer happens or
    /// an error is returned and nothing moved.
    ///
    /// # Cancel safety
    /// The returned future may be dropped before it resolves, either by the
    /// engine's payment timeout or by a caller abandoning `confirm`. The
    /// engine records execution only after this call returns `Ok`, so a
    /// dropped call that already moved value leaves the transaction pending
    /// and a later confirmation pays again. Implementations must either move
    /// value atomically at a single await-free point or deduplicate retried
    /// executions themselves. Identical `(destination, amount)` pairs are not
    /// a safe dedup key, since separate proposals may carry the same pair.
    async fn transfer(&self, destination: &Address, amount: Amount) -> Result<(), TransferError>;
}
