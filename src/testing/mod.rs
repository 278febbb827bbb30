use std::sync::Mutex;

use serde_json::Value;

use crate::dispatcher::{EmitError, EventEmitter};

/// One captured `emit` call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: Vec<Value>,
}

/// Emitter that records every event in order and reports no listeners
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|event| event.name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError> {
        self.events.lock().unwrap().push(RecordedEvent {
            name: event.to_string(),
            payload: payload.to_vec(),
        });
        Ok(false)
    }
}

/// Emitter whose listener for one event name always fails
#[derive(Debug)]
pub struct FailingEmitter {
    failing_event: String,
}

impl FailingEmitter {
    pub fn on(event: &str) -> Self {
        Self { failing_event: event.to_string() }
    }
}

impl EventEmitter for FailingEmitter {
    fn emit(&self, event: &str, _payload: &[Value]) -> Result<bool, EmitError> {
        if event == self.failing_event {
            return Err(EmitError::listener(event, "listener exploded"));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_emitter_keeps_order() {
        let emitter = RecordingEmitter::new();
        emitter.emit("a", &[]).unwrap();
        emitter.emit("b", &[Value::Bool(true)]).unwrap();

        assert_eq!(emitter.names(), vec!["a", "b"]);
        assert_eq!(emitter.events()[1].payload, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_failing_emitter_only_fails_its_event() {
        let emitter = FailingEmitter::on("User.before.create");
        assert!(emitter.emit("User.after.create", &[]).unwrap());
        assert!(emitter.emit("User.before.create", &[]).is_err());
    }
}
