use thiserror::Error;

use crate::dispatcher::EmitError;

/// Errors flowing back through the middleware chain
#[derive(Error, Debug)]
pub enum MiddlewareError {
    #[error("Event emission failed: {0}")]
    Emit(#[from] EmitError),

    #[error("Execution error: {0}")]
    Execution(String),
}

impl MiddlewareError {
    pub fn execution(message: impl Into<String>) -> Self {
        MiddlewareError::Execution(message.into())
    }
}
