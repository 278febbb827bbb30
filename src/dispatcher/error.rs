use thiserror::Error;

/// Errors raised while building or configuring a dispatcher
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown phase: {0} (expected 'before' or 'after')")]
    UnknownPhase(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by an event emitter while announcing a notification
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Listener for '{event}' failed: {message}")]
    Listener { event: String, message: String },

    #[error("Payload serialization error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl EmitError {
    pub fn listener(event: impl Into<String>, message: impl Into<String>) -> Self {
        EmitError::Listener {
            event: event.into(),
            message: message.into(),
        }
    }
}
