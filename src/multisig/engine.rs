//! Multisig approval state machine.
//!
//! Owners propose transfers and confirm them; the confirmation that reaches
//! quorum triggers the payment collaborator exactly once. If that payment
//! fails, neither the confirmation nor the execution is committed.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::config::MultiSigConfig;
use super::transaction::Transaction;
use crate::core::config::WalletConfig;
use crate::core::domain::{Address, Amount, TxId};
use crate::core::errors::WalletError;
use crate::events::{EventBus, EventSubscriber, LoggingSubscriber, WalletEvent};
use crate::payment::{PaymentTransfer, TransferError};

/// Default bound on a single payment call.
pub const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of an accepted confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    /// Recorded; quorum not reached yet.
    Pending { confirmations: usize, required: usize },
    /// This confirmation reached quorum and the transfer went through.
    Executed,
}

/// Owner set, threshold and the append-only ledger of proposals.
pub struct MultisigApprovalEngine {
    config: MultiSigConfig,
    /// Indexed by `TxId`.
    ledger: RwLock<Vec<Transaction>>,
    /// Serializes `propose` and `confirm`. Held across the payment call.
    writer: Mutex<()>,
    payment: Arc<dyn PaymentTransfer>,
    payment_timeout: Duration,
    events: EventBus,
}

impl MultisigApprovalEngine {
    /// Create an engine with an empty ledger.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the owner set or threshold is invalid.
    pub fn new(
        owners: Vec<Address>,
        required_confirmations: usize,
        payment: Arc<dyn PaymentTransfer>,
    ) -> Result<Self, WalletError> {
        let config = MultiSigConfig::new(owners, required_confirmations)?;
        Ok(Self::with_config(config, payment, DEFAULT_PAYMENT_TIMEOUT, EventBus::default()))
    }

    /// Build from a deployment config file.
    pub fn from_config(
        config: &WalletConfig,
        payment: Arc<dyn PaymentTransfer>,
    ) -> Result<Self, WalletError> {
        let multisig = config.validate()?;
        Ok(Self::with_config(
            multisig,
            payment,
            config.payment_timeout(),
            EventBus::new(config.event_buffer_size),
        ))
    }

    fn with_config(
        config: MultiSigConfig,
        payment: Arc<dyn PaymentTransfer>,
        payment_timeout: Duration,
        events: EventBus,
    ) -> Self {
        info!(
            "🔐 Initializing multisig wallet: {} owners, {} confirmations required",
            config.owners().len(),
            config.required_confirmations()
        );
        events.subscribe(Arc::new(LoggingSubscriber::new("engine-log")));
        Self {
            config,
            ledger: RwLock::new(Vec::new()),
            writer: Mutex::new(()),
            payment,
            payment_timeout,
            events,
        }
    }

    /// Override the bound on payment calls.
    pub fn with_payment_timeout(mut self, timeout: Duration) -> Self {
        self.payment_timeout = timeout;
        self
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), WalletError> {
        if self.config.is_owner(caller) {
            Ok(())
        } else {
            debug!(caller = %caller, "rejected call from non-owner");
            Err(WalletError::Unauthorized(*caller))
        }
    }

    /// Propose a transfer of `amount` to `destination`.
    ///
    /// # Returns
    /// The new transaction's id.
    pub async fn propose(
        &self,
        caller: &Address,
        destination: Address,
        amount: Amount,
    ) -> Result<TxId, WalletError> {
        self.ensure_owner(caller)?;
        let _writer = self.writer.lock().await;

        let tx_id = {
            let mut ledger = self.ledger.write();
            let tx_id = ledger.len() as TxId;
            ledger.push(Transaction::new(tx_id, *caller, destination, amount));
            tx_id
        };

        self.events.publish(WalletEvent::Proposed {
            owner: *caller,
            tx_id,
            destination,
            amount,
            timestamp: chrono::Utc::now(),
        });

        Ok(tx_id)
    }

    /// Confirm transaction `tx_id` on behalf of `caller`.
    ///
    /// When this confirmation brings the distinct-owner count to the
    /// threshold, the payment collaborator is invoked before anything is
    /// committed. On payment failure the call returns `ExecutionFailed` and
    /// the ledger is left exactly as it was, so the same owner may confirm
    /// again later.
    pub async fn confirm(&self, caller: &Address, tx_id: TxId) -> Result<ConfirmOutcome, WalletError> {
        self.ensure_owner(caller)?;
        let _writer = self.writer.lock().await;

        let (destination, amount, confirmations) = {
            let ledger = self.ledger.read();
            let tx = Self::lookup(&ledger, tx_id)?;
            if tx.executed {
                return Err(WalletError::AlreadyExecuted(tx_id));
            }
            if tx.is_confirmed_by(caller) {
                return Err(WalletError::DuplicateConfirmation { owner: *caller, tx_id });
            }
            (tx.destination, tx.amount, tx.confirmation_count() + 1)
        };

        let required = self.config.required_confirmations();
        if !self.config.policy().is_satisfied(confirmations) {
            self.commit(tx_id, *caller, false);
            self.events.publish(WalletEvent::Confirmed {
                owner: *caller,
                tx_id,
                timestamp: chrono::Utc::now(),
            });
            return Ok(ConfirmOutcome::Pending { confirmations, required });
        }

        info!(tx_id, "quorum reached ({}/{}), executing transfer", confirmations, required);
        if let Err(e) = self.execute_transfer(&destination, amount).await {
            warn!(tx_id, error = %e, "transfer failed, confirmation rolled back");
            return Err(WalletError::ExecutionFailed { tx_id, reason: e.to_string() });
        }

        self.commit(tx_id, *caller, true);
        let now = chrono::Utc::now();
        self.events.publish_all(vec![
            WalletEvent::Confirmed { owner: *caller, tx_id, timestamp: now },
            WalletEvent::Executed { tx_id, timestamp: now },
        ]);

        Ok(ConfirmOutcome::Executed)
    }

    async fn execute_transfer(&self, destination: &Address, amount: Amount) -> Result<(), TransferError> {
        match tokio::time::timeout(self.payment_timeout, self.payment.transfer(destination, amount)).await {
            Ok(result) => result,
            Err(_) => Err(TransferError::Timeout(self.payment_timeout)),
        }
    }

    /// Only called with the writer gate held and preconditions checked.
    fn commit(&self, tx_id: TxId, owner: Address, execute: bool) {
        let mut ledger = self.ledger.write();
        if let Some(tx) = usize::try_from(tx_id).ok().and_then(|i| ledger.get_mut(i)) {
            tx.commit_confirmation(owner, execute);
        }
    }

    fn lookup(ledger: &[Transaction], tx_id: TxId) -> Result<&Transaction, WalletError> {
        usize::try_from(tx_id)
            .ok()
            .and_then(|i| ledger.get(i))
            .ok_or(WalletError::NotFound(tx_id))
    }

    pub fn owners(&self) -> &[Address] {
        self.config.owners()
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.config.is_owner(address)
    }

    pub fn required_confirmations(&self) -> usize {
        self.config.required_confirmations()
    }

    pub fn payment_timeout(&self) -> Duration {
        self.payment_timeout
    }

    /// Snapshot of one transaction.
    pub fn transaction(&self, tx_id: TxId) -> Option<Transaction> {
        let ledger = self.ledger.read();
        Self::lookup(&ledger, tx_id).ok().cloned()
    }

    /// Snapshot of the whole ledger in id order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.ledger.read().clone()
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.ledger.read().iter().filter(|tx| !tx.executed).cloned().collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger.read().len()
    }

    pub fn confirmation_count(&self, tx_id: TxId) -> Result<usize, WalletError> {
        let ledger = self.ledger.read();
        Ok(Self::lookup(&ledger, tx_id)?.confirmation_count())
    }

    pub fn is_confirmed_by(&self, tx_id: TxId, owner: &Address) -> Result<bool, WalletError> {
        let ledger = self.ledger.read();
        Ok(Self::lookup(&ledger, tx_id)?.is_confirmed_by(owner))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, subscriber: Arc<dyn EventSubscriber>) {
        self.events.subscribe(subscriber);
    }
}
