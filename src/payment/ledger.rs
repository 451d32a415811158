//! In-memory balance book used by the CLI simulator and the tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{PaymentTransfer, TransferError};
use crate::core::domain::{Address, Amount};

#[derive(Debug, Default)]
struct Balances {
    wallet: Amount,
    accounts: HashMap<Address, Amount>,
    transfers: Vec<(Address, Amount)>,
}

/// Holds the wallet's funded balance and credits destinations on transfer.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<Balances>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(initial: Amount) -> Self {
        let ledger = Self::new();
        ledger.deposit(initial);
        ledger
    }

    /// Fund the wallet.
    pub fn deposit(&self, amount: Amount) -> Amount {
        let mut inner = self.inner.write();
        inner.wallet = inner.wallet.saturating_add(amount);
        debug!(amount, balance = inner.wallet, "wallet funded");
        inner.wallet
    }

    /// Current wallet balance.
    pub fn balance(&self) -> Amount {
        self.inner.read().wallet
    }

    /// Amount credited to `address` so far.
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.inner.read().accounts.get(address).copied().unwrap_or(0)
    }

    /// Completed transfers in the order they happened.
    pub fn transfers(&self) -> Vec<(Address, Amount)> {
        self.inner.read().transfers.clone()
    }
}

#[async_trait]
impl PaymentTransfer for InMemoryLedger {
    async fn transfer(&self, destination: &Address, amount: Amount) -> Result<(), TransferError> {
        let mut inner = self.inner.write();
        if inner.wallet < amount {
            warn!(
                destination = %destination.short(),
                requested = amount,
                available = inner.wallet,
                "transfer refused: insufficient funds"
            );
            return Err(TransferError::InsufficientFunds {
                requested: amount,
                available: inner.wallet,
            });
        }
        let credited = inner
            .accounts
            .get(destination)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or_else(|| {
                warn!(
                    destination = %destination.short(),
                    requested = amount,
                    "transfer refused: destination balance overflow"
                );
                TransferError::Rejected("destination balance overflow".to_string())
            })?;

        inner.wallet -= amount;
        inner.accounts.insert(*destination, credited);
        inner.transfers.push((*destination, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_moves_balance() {
        let ledger = InMemoryLedger::with_balance(100);
        let dest = Address::from_low_u8(5);

        ledger.transfer(&dest, 50).await.unwrap();

        assert_eq!(ledger.balance(), 50);
        assert_eq!(ledger.balance_of(&dest), 50);
        assert_eq!(ledger.transfers(), vec![(dest, 50)]);
    }

    #[tokio::test]
    async fn test_insufficient_funds_moves_nothing() {
        let ledger = InMemoryLedger::with_balance(10);
        let dest = Address::from_low_u8(5);

        let err = ledger.transfer(&dest, 11).await.unwrap_err();

        assert_eq!(err, TransferError::InsufficientFunds { requested: 11, available: 10 });
        assert_eq!(ledger.balance(), 10);
        assert_eq!(ledger.balance_of(&dest), 0);
        assert!(ledger.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_destination_overflow_moves_nothing() {
        let ledger = InMemoryLedger::with_balance(u128::MAX);
        let dest = Address::from_low_u8(5);
        ledger.transfer(&dest, u128::MAX).await.unwrap();
        ledger.deposit(1);

        let err = ledger.transfer(&dest, 1).await.unwrap_err();

        assert_eq!(err, TransferError::Rejected("destination balance overflow".to_string()));
        assert_eq!(ledger.balance(), 1);
        assert_eq!(ledger.balance_of(&dest), u128::MAX);
        assert_eq!(ledger.transfers(), vec![(dest, u128::MAX)]);
    }

    #[test]
    fn test_deposit_accumulates() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.deposit(30), 30);
        assert_eq!(ledger.deposit(70), 100);
        assert_eq!(ledger.balance(), 100);
    }
}
