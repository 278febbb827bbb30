use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::dispatcher::{EmitError, EventEmitter};

/// Default channel capacity; slow subscribers lag past this many notifications
pub const DEFAULT_CAPACITY: usize = 1024;

/// Owned copy of an emitted event, as delivered to broadcast subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub name: String,
    pub payload: Vec<Value>,
    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    /// `before` or `after`, parsed back out of the event name
    pub fn phase(&self) -> Option<&str> {
        self.name.split('.').nth(1)
    }

    pub fn model(&self) -> Option<&str> {
        self.name.split('.').next()
    }
}

/// Fans notifications out to any number of async subscribers over a
/// `tokio::sync::broadcast` channel. Sending never blocks.
#[derive(Debug, Clone)]
pub struct BroadcastEmitter {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastEmitter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventEmitter for BroadcastEmitter {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError> {
        let notification = Notification {
            name: event.to_string(),
            payload: payload.to_vec(),
            emitted_at: Utc::now(),
        };

        // Err only means nobody is subscribed
        match self.sender.send(notification) {
            Ok(receivers) => {
                tracing::trace!("Broadcast {} to {} subscribers", event, receivers);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}
