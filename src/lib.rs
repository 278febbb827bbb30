pub mod config;
pub mod dispatcher;
pub mod emitter;
pub mod logging;
pub mod middleware;

pub use dispatcher::{
    event_name, is_truthy, Action, DispatchError, DispatcherOptions, EmitError, EventDispatcher,
    EventEmitter, MiddlewareParams, When,
};
pub use emitter::{BroadcastEmitter, EventBus, Notification};
pub use middleware::{Executor, Middleware, MiddlewareError, MiddlewarePipeline, Next};

#[cfg(test)]
pub mod testing;
