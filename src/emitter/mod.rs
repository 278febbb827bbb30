// Concrete EventEmitter implementations: listener registry and broadcast channel

pub mod event_bus;
pub mod broadcast;

pub use event_bus::{EventBus, Listener};
pub use broadcast::{BroadcastEmitter, Notification};
