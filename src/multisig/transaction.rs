//! Proposed transfer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::domain::{amount_serde, Address, Amount, TxId};

/// Lifecycle position of a transaction. `Executed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Executed,
}

/// A proposed transfer and the owners who have confirmed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub proposer: Address,
    pub destination: Address,
    #[serde(with = "amount_serde")]
    pub amount: Amount,
    pub executed: bool,
    pub(crate) confirmations: BTreeSet<Address>,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub(crate) fn new(id: TxId, proposer: Address, destination: Address, amount: Amount) -> Self {
        Self {
            id,
            proposer,
            destination,
            amount,
            executed: false,
            confirmations: BTreeSet::new(),
            created_at: Utc::now(),
            executed_at: None,
        }
    }

    pub fn status(&self) -> TransactionStatus {
        if self.executed {
            TransactionStatus::Executed
        } else {
            TransactionStatus::Pending
        }
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations.len()
    }

    pub fn is_confirmed_by(&self, owner: &Address) -> bool {
        self.confirmations.contains(owner)
    }

    /// Record `owner`'s vote and, when `execute` is set, close the transaction.
    /// Callers have already checked every precondition.
    pub(crate) fn commit_confirmation(&mut self, owner: Address, execute: bool) {
        self.confirmations.insert(owner);
        if execute {
            self.executed = true;
            self.executed_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_creation() {
        let tx = Transaction::new(0, Address::from_low_u8(1), Address::from_low_u8(9), 50);

        assert_eq!(tx.id, 0);
        assert_eq!(tx.amount, 50);
        assert_eq!(tx.status(), TransactionStatus::Pending);
        assert_eq!(tx.confirmation_count(), 0);
        assert!(tx.executed_at.is_none());
    }

    #[test]
    fn test_commit_confirmation() {
        let mut tx = Transaction::new(3, Address::from_low_u8(1), Address::from_low_u8(9), 10);
        tx.commit_confirmation(Address::from_low_u8(2), false);
        assert!(tx.is_confirmed_by(&Address::from_low_u8(2)));
        assert_eq!(tx.status(), TransactionStatus::Pending);

        tx.commit_confirmation(Address::from_low_u8(1), true);
        assert_eq!(tx.confirmation_count(), 2);
        assert_eq!(tx.status(), TransactionStatus::Executed);
        assert!(tx.executed_at.is_some());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionStatus::Executed).unwrap();
        assert_eq!(json, "\"executed\"");
    }
}
