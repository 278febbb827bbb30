#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use orm_event_dispatcher::{EmitError, EventBus, EventEmitter, MiddlewareParams};
use serde_json::Value;

/// Event names captured from an `EventBus`, in emission order
#[derive(Clone, Default)]
pub struct Captured {
    events: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl Captured {
    pub fn names(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn payload(&self, index: usize) -> Vec<Value> {
        self.events.lock().unwrap()[index].1.clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

/// Bus with a capturing listener on every before/after event for the given models
pub fn capturing_bus(models: &[&str]) -> (Arc<EventBus>, Captured) {
    let bus = EventBus::new_shared();
    let captured = Captured::default();

    for model in models {
        for action in orm_event_dispatcher::Action::ALL {
            for when in [orm_event_dispatcher::When::Before, orm_event_dispatcher::When::After] {
                let name = orm_event_dispatcher::event_name(model, when, action);
                let sink = captured.clone();
                let recorded = name.clone();
                bus.on(name, move |payload: &[Value]| {
                    sink.events.lock().unwrap().push((recorded.clone(), payload.to_vec()));
                    Ok(())
                });
            }
        }
    }

    (bus, captured)
}

/// Emitter counting calls regardless of event name
#[derive(Default)]
pub struct CountingEmitter {
    calls: Mutex<Vec<String>>,
}

impl CountingEmitter {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl EventEmitter for CountingEmitter {
    fn emit(&self, event: &str, _payload: &[Value]) -> Result<bool, EmitError> {
        self.calls.lock().unwrap().push(event.to_string());
        Ok(true)
    }
}

/// Continuation resolving to `value`
pub async fn resolve(value: Value, _params: MiddlewareParams) -> Result<Value> {
    Ok(value)
}
