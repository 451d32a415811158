//! Domain event notification.
//!
//! Every mutating engine call publishes an ordered sequence of events to an
//! [`EventBus`]. Within one `confirm` call `Confirmed` always precedes
//! `Executed`.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::domain::{amount_serde, Address, Amount, TxId};

/// Observable state change of the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WalletEvent {
    /// A new transaction was appended to the ledger.
    Proposed {
        owner: Address,
        tx_id: TxId,
        destination: Address,
        #[serde(with = "amount_serde")]
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// An owner's confirmation was committed.
    Confirmed {
        owner: Address,
        tx_id: TxId,
        timestamp: DateTime<Utc>,
    },

    /// The transfer went through and the transaction is closed.
    Executed {
        tx_id: TxId,
        timestamp: DateTime<Utc>,
    },
}

impl WalletEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            WalletEvent::Proposed { .. } => "proposed",
            WalletEvent::Confirmed { .. } => "confirmed",
            WalletEvent::Executed { .. } => "executed",
        }
    }

    pub fn tx_id(&self) -> TxId {
        match self {
            WalletEvent::Proposed { tx_id, .. }
            | WalletEvent::Confirmed { tx_id, .. }
            | WalletEvent::Executed { tx_id, .. } => *tx_id,
        }
    }
}

/// Receives published events.
pub trait EventSubscriber: Send + Sync {
    fn on_event(&self, event: &WalletEvent);

    fn name(&self) -> &str;

    /// Event types this subscriber wants. Empty means all.
    fn interested_events(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Fan-out of wallet events plus a bounded buffer of recent ones.
pub struct EventBus {
    subscribers: RwLock<Vec<Arc<dyn EventSubscriber>>>,
    event_buffer: Mutex<VecDeque<WalletEvent>>,
    buffer_size: usize,
}

impl EventBus {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            event_buffer: Mutex::new(VecDeque::with_capacity(buffer_size)),
            buffer_size,
        }
    }

    pub fn subscribe(&self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    pub fn unsubscribe(&self, subscriber_name: &str) {
        self.subscribers.write().retain(|s| s.name() != subscriber_name);
    }

    /// Publish events in order. The whole batch is buffered before any
    /// subscriber sees it.
    pub fn publish_all(&self, events: Vec<WalletEvent>) {
        if events.is_empty() {
            return;
        }

        {
            let mut buffer = self.event_buffer.lock();
            for event in &events {
                if self.buffer_size > 0 && buffer.len() >= self.buffer_size {
                    buffer.pop_front();
                }
                if self.buffer_size > 0 {
                    buffer.push_back(event.clone());
                }
            }
        }

        let subs = self.subscribers.read().clone();
        for event in &events {
            for subscriber in subs.iter() {
                let interested = subscriber.interested_events();
                if interested.is_empty() || interested.contains(&event.event_type()) {
                    subscriber.on_event(event);
                }
            }
        }
    }

    pub fn publish(&self, event: WalletEvent) {
        self.publish_all(vec![event]);
    }

    /// The `count` most recent events, oldest first.
    pub fn recent_events(&self, count: usize) -> Vec<WalletEvent> {
        let buffer = self.event_buffer.lock();
        let start = buffer.len().saturating_sub(count);
        buffer.iter().skip(start).cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Forwards events to `tracing`.
pub struct LoggingSubscriber {
    name: String,
}

impl LoggingSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EventSubscriber for LoggingSubscriber {
    fn on_event(&self, event: &WalletEvent) {
        use tracing::info;

        match event {
            WalletEvent::Proposed { owner, tx_id, destination, amount, .. } => {
                info!(
                    tx_id,
                    owner = %owner.short(),
                    destination = %destination.short(),
                    amount,
                    "📝 transaction proposed"
                );
            }
            WalletEvent::Confirmed { owner, tx_id, .. } => {
                info!(tx_id, owner = %owner.short(), "✍️ transaction confirmed");
            }
            WalletEvent::Executed { tx_id, .. } => {
                info!(tx_id, "✅ transaction executed");
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Keeps every event it receives. Used by the simulator and in tests.
#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<WalletEvent>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WalletEvent> {
        self.events.lock().clone()
    }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<WalletEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSubscriber for RecordingSubscriber {
    fn on_event(&self, event: &WalletEvent) {
        self.events.lock().push(event.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executed(tx_id: TxId) -> WalletEvent {
        WalletEvent::Executed { tx_id, timestamp: Utc::now() }
    }

    #[test]
    fn test_buffer_is_bounded() {
        let bus = EventBus::new(2);
        bus.publish(executed(0));
        bus.publish(executed(1));
        bus.publish(executed(2));

        let ids: Vec<TxId> = bus.recent_events(10).iter().map(|e| e.tx_id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_subscriber_filtering() {
        struct OnlyExecuted(Mutex<usize>);
        impl EventSubscriber for OnlyExecuted {
            fn on_event(&self, _event: &WalletEvent) {
                *self.0.lock() += 1;
            }
            fn name(&self) -> &str {
                "only-executed"
            }
            fn interested_events(&self) -> Vec<&'static str> {
                vec!["executed"]
            }
        }

        let bus = EventBus::default();
        let sub = Arc::new(OnlyExecuted(Mutex::new(0)));
        bus.subscribe(sub.clone());
        bus.publish_all(vec![
            WalletEvent::Confirmed { owner: Address::from_low_u8(1), tx_id: 0, timestamp: Utc::now() },
            executed(0),
        ]);
        assert_eq!(*sub.0.lock(), 1);

        bus.unsubscribe("only-executed");
        bus.publish(executed(1));
        assert_eq!(*sub.0.lock(), 1);
    }

    #[test]
    fn test_recording_subscriber_preserves_order() {
        let bus = EventBus::default();
        let rec = Arc::new(RecordingSubscriber::new());
        bus.subscribe(rec.clone());
        bus.publish_all(vec![
            WalletEvent::Confirmed { owner: Address::from_low_u8(1), tx_id: 7, timestamp: Utc::now() },
            executed(7),
        ]);

        let types: Vec<&str> = rec.take().iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec!["confirmed", "executed"]);
        assert!(rec.events().is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = WalletEvent::Executed { tx_id: 3, timestamp: Utc::now() };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "executed");
        assert_eq!(value["tx_id"], 3);
    }

    #[test]
    fn test_proposed_amount_above_u64_round_trips() {
        let event = WalletEvent::Proposed {
            owner: Address::from_low_u8(1),
            tx_id: 0,
            destination: Address::from_low_u8(9),
            amount: u64::MAX as Amount + 1,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""amount":"18446744073709551616""#));
        let back: WalletEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
