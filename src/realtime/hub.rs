use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::realtime::protocol::ContractEvent;

/// Fans contract change events out to every open realtime subscription.
///
/// Each subscription gets its own unbounded channel; the WebSocket session that
/// owns the receiver forwards events to the browser in delivery order.
pub struct RealtimeHub {
    /// subscription id -> sender for that subscription
    subscribers: RwLock<HashMap<Uuid, mpsc::UnboundedSender<ContractEvent>>>,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscription. Returns its id and the receiving end.
    pub async fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<ContractEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.subscribers.write().await.insert(id, tx);
        tracing::debug!(subscription = %id, "Realtime subscriber joined");
        (id, rx)
    }

    pub async fn unsubscribe(&self, id: Uuid) {
        self.subscribers.write().await.remove(&id);
        tracing::debug!(subscription = %id, "Realtime subscriber left");
    }

    /// Send an event to every subscriber. Returns how many received it.
    ///
    /// Subscribers whose receiver is gone are dropped on the way.
    pub async fn publish(&self, event: ContractEvent) -> usize {
        let mut dead = Vec::new();
        let mut delivered = 0;

        {
            let subscribers = self.subscribers.read().await;
            for (id, sender) in subscribers.iter() {
                if sender.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    dead.push(*id);
                }
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in dead {
                subscribers.remove(&id);
            }
        }

        delivered
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}
