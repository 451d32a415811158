// tests/util.rs
// Shared test helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use safe_wallet::core::domain::{Address, Amount};
use safe_wallet::events::RecordingSubscriber;
use safe_wallet::payment::{PaymentTransfer, TransferError};
use safe_wallet::MultisigApprovalEngine;

pub const A: Address = Address::from_low_u8(0xa1);
pub const B: Address = Address::from_low_u8(0xb2);
pub const C: Address = Address::from_low_u8(0xc3);
pub const D: Address = Address::from_low_u8(0xd4);
pub const X: Address = Address::from_low_u8(0xee);

/// Records every transfer; can be switched to fail or stall.
#[derive(Default)]
pub struct MockPayment {
    calls: Mutex<Vec<(Address, Amount)>>,
    fail: AtomicBool,
    delay_ms: AtomicUsize,
}

impl MockPayment {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let mock = Self::new();
        mock.set_failing(true);
        mock
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(Address, Amount)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PaymentTransfer for MockPayment {
    async fn transfer(&self, destination: &Address, amount: Amount) -> Result<(), TransferError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransferError::Rejected("payment backend unavailable".to_string()));
        }
        self.calls.lock().push((*destination, amount));
        Ok(())
    }
}

/// Engine with a recorder already subscribed.
pub fn engine_with(
    owners: Vec<Address>,
    required: usize,
    payment: Arc<MockPayment>,
) -> (MultisigApprovalEngine, Arc<RecordingSubscriber>) {
    let engine = MultisigApprovalEngine::new(owners, required, payment).expect("valid config");
    let recorder = Arc::new(RecordingSubscriber::new());
    engine.subscribe(recorder.clone());
    (engine, recorder)
}
