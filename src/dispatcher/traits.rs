use std::sync::Arc;

use serde_json::Value;

use crate::dispatcher::error::EmitError;

/// Fire-and-forget publisher the dispatcher announces notifications through.
///
/// `emit` returns whether at least one listener received the event. Listener
/// registration is the implementor's business; the dispatcher only publishes.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError>;
}

impl<T: EventEmitter + ?Sized> EventEmitter for Arc<T> {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError> {
        (**self).emit(event, payload)
    }
}

impl<T: EventEmitter + ?Sized> EventEmitter for &T {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError> {
        (**self).emit(event, payload)
    }
}

impl<T: EventEmitter + ?Sized> EventEmitter for Box<T> {
    fn emit(&self, event: &str, payload: &[Value]) -> Result<bool, EmitError> {
        (**self).emit(event, payload)
    }
}
