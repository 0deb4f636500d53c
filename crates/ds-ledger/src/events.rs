//! Account change notifications

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use ds_slot::PlayerAccount;
use parking_lot::Mutex;
use serde::Serialize;

/// Per-subscriber queue depth; events beyond this are dropped for that subscriber
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Something changed on an account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum AccountEvent {
    Registered {
        player: String,
    },
    CreditGranted {
        player: String,
        amount: u64,
        account: PlayerAccount,
    },
    SpinSettled {
        player: String,
        stake: u64,
        payout: u64,
        account: PlayerAccount,
    },
}

impl AccountEvent {
    pub fn player(&self) -> &str {
        match self {
            AccountEvent::Registered { player }
            | AccountEvent::CreditGranted { player, .. }
            | AccountEvent::SpinSettled { player, .. } => player,
        }
    }

    /// Account state after the change, if the event carries one
    pub fn account(&self) -> Option<&PlayerAccount> {
        match self {
            AccountEvent::Registered { .. } => None,
            AccountEvent::CreditGranted { account, .. }
            | AccountEvent::SpinSettled { account, .. } => Some(account),
        }
    }
}

/// Fan-out of events to every live subscriber
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<AccountEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<AccountEvent> {
        let (tx, rx) = bounded(EVENT_QUEUE_CAPACITY);
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Deliver to all subscribers, forgetting those whose receiver is gone
    pub fn publish(&self, event: AccountEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("event queue full, dropping {:?} for one subscriber", event);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}
