//! Realtime Publisher (C7): fan-out of every committed transaction's
//! `TransactionResponse` to subscribers, best-effort. A `tokio::sync::broadcast`
//! channel serves consumers that want a `Receiver`; a direct subscriber list
//! serves consumers that want push callbacks (mirrors a WebSocket session
//! manager without actually speaking STOMP — see §6).
//!
//! Ordering per subscriber is FIFO with respect to publish calls from a
//! single emitting worker (§4.7); `publish` is only ever awaited serially by
//! a given caller, so this falls out of `Vec` iteration order rather than
//! needing an explicit sequence number.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use vigil_core::TransactionResponse;

use crate::error::BusError;
use crate::subscriber::TransactionSubscriber;

const DEFAULT_CAPACITY: usize = 1024;

pub struct TransactionBus {
    sender: broadcast::Sender<TransactionResponse>,
    subscribers: Vec<Arc<dyn TransactionSubscriber>>,
}

impl TransactionBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, subscribers: Vec::new() }
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn TransactionSubscriber>) {
        info!(name = subscriber.name(), "realtime subscriber registered");
        self.subscribers.push(subscriber);
    }

    /// Best-effort fan-out. A subscriber failure is logged at `warn!` and
    /// does not surface to the caller — the commit this response describes
    /// already succeeded and must not be rolled back on a publish failure.
    pub async fn publish(&self, response: TransactionResponse) {
        debug!(subscribers = self.subscribers.len(), "publishing transaction response");

        let _ = self.sender.send(response.clone());

        for subscriber in &self.subscribers {
            if let Err(err) = subscriber.handle(&response).await {
                warn!(subscriber = subscriber.name(), error = %err, "subscriber failed to handle transaction response");
            }
        }
    }

    /// A broadcast receiver for consumers that prefer pull (`/topic/transactions`
    /// stand-in, §6).
    pub fn receiver(&self) -> broadcast::Receiver<TransactionResponse> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for TransactionBus {
    fn default() -> Self {
        Self::new()
    }
}
