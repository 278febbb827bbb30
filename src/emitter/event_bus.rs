use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::dispatcher::{EmitError, EventEmitter};

/// Listener callback invoked synchronously with the event payload
pub type Listener = Arc<dyn Fn(&[Value]) -> Result<(), EmitError> + Send + Sync>;

/// In-process listener registry keyed by event name.
///
/// Listeners run synchronously inside `emit`, in registration order. The first
/// failing listener stops delivery and its error is returned to the emitter's caller.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a listener for an exact event name such as `User.after.create`
    pub fn on<F>(&self, event: impl Into<String>, listener: F)
    where
        F: Fn(&[Value]) -> Result<(), EmitError> + Send + Sync + 'static,
    {
        let event = event.into();
        tracing::debug!("Registered listener for '{}'", event);
        self.listeners.write().entry(event).or_default().push(Arc::new(listener));
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }

    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.listeners.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop listeners for one event, or for every event when `event` is `None`
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        let mut listeners = self.listeners.write();
        match event {
            Some(event) => {
                listeners.remove(event);
            }
            None => listeners.clear(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.event_names())
            .finish()
    }
}

impl EventEmitter for EventBus {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError> {
        // Snapshot so listeners may register further listeners without deadlocking
        let listeners: Vec<Listener> = match self.listeners.read().get(event) {
            Some(listeners) if !listeners.is_empty() => listeners.clone(),
            _ => return Ok(false),
        };

        for listener in listeners {
            listener(payload)?;
        }
        Ok(true)
    }
}
