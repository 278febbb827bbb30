// Ordered middleware chain ending in a terminal executor, modelled on the ORM's `$use` hook

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::dispatcher::{EventDispatcher, EventEmitter, MiddlewareParams};
use crate::middleware::error::MiddlewareError;

/// A stage wrapping every operation. Call `next.run(params)` to continue the
/// chain; returning without doing so short-circuits the operation.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Name for logging and debugging
    fn name(&self) -> &'static str;

    async fn handle(&self, params: MiddlewareParams, next: Next<'_>) -> Result<Value, MiddlewareError>;
}

/// Terminal stage that actually performs the data access
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, params: MiddlewareParams) -> Result<Value, MiddlewareError>;
}

#[async_trait]
impl<F> Executor for F
where
    F: Fn(MiddlewareParams) -> BoxFuture<'static, Result<Value, MiddlewareError>> + Send + Sync,
{
    async fn execute(&self, params: MiddlewareParams) -> Result<Value, MiddlewareError> {
        (self)(params).await
    }
}

/// One-shot handle to the remainder of the chain
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    executor: &'a dyn Executor,
}

impl<'a> Next<'a> {
    pub async fn run(self, params: MiddlewareParams) -> Result<Value, MiddlewareError> {
        match self.middlewares.split_first() {
            Some((middleware, rest)) => {
                tracing::trace!("Entering middleware '{}'", middleware.name());
                let next = Next {
                    middlewares: rest,
                    executor: self.executor,
                };
                middleware.handle(params, next).await
            }
            None => self.executor.execute(params).await,
        }
    }
}

/// Middlewares run in registration order around the executor
pub struct MiddlewarePipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
    executor: Arc<dyn Executor>,
}

impl MiddlewarePipeline {
    pub fn new(executor: impl Executor + 'static) -> Self {
        Self {
            middlewares: Vec::new(),
            executor: Arc::new(executor),
        }
    }

    pub fn register(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        tracing::debug!(
            "Registered middleware '{}' at position {}",
            middleware.name(),
            self.middlewares.len()
        );
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub async fn execute(&self, params: MiddlewareParams) -> Result<Value, MiddlewareError> {
        let next = Next {
            middlewares: &self.middlewares,
            executor: self.executor.as_ref(),
        };
        next.run(params).await
    }
}

#[async_trait]
impl<E: EventEmitter> Middleware for EventDispatcher<E> {
    fn name(&self) -> &'static str {
        "event_dispatcher"
    }

    async fn handle(&self, params: MiddlewareParams, next: Next<'_>) -> Result<Value, MiddlewareError> {
        self.dispatch(params, |params| next.run(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{Action, DispatcherOptions};
    use crate::testing::RecordingEmitter;
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::Mutex;

    /// Appends its tag to `args.trail` before continuing
    struct Tagger(&'static str);

    #[async_trait]
    impl Middleware for Tagger {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn handle(&self, mut params: MiddlewareParams, next: Next<'_>) -> Result<Value, MiddlewareError> {
            let mut trail = params.args["trail"].as_array().cloned().unwrap_or_default();
            trail.push(json!(self.0));
            params.args = json!({ "trail": trail });
            next.run(params).await
        }
    }

    struct Blocker;

    #[async_trait]
    impl Middleware for Blocker {
        fn name(&self) -> &'static str {
            "blocker"
        }

        async fn handle(&self, _params: MiddlewareParams, _next: Next<'_>) -> Result<Value, MiddlewareError> {
            Err(MiddlewareError::execution("blocked"))
        }
    }

    fn echo_args() -> impl Executor {
        |params: MiddlewareParams| async move { Ok::<_, MiddlewareError>(params.args) }.boxed()
    }

    #[tokio::test]
    async fn test_middlewares_run_in_registration_order() {
        let mut pipeline = MiddlewarePipeline::new(echo_args());
        pipeline.register(Tagger("first")).register(Tagger("second"));

        let result = pipeline
            .execute(MiddlewareParams::new("User", Action::FindMany))
            .await
            .unwrap();

        assert_eq!(pipeline.len(), 2);
        assert_eq!(result, json!({ "trail": ["first", "second"] }));
    }

    #[tokio::test]
    async fn test_empty_pipeline_calls_executor() {
        let pipeline = MiddlewarePipeline::new(echo_args());
        let params = MiddlewareParams::new("User", Action::Count).with_args(json!(3));

        assert!(pipeline.is_empty());
        assert_eq!(pipeline.execute(params).await.unwrap(), json!(3));
    }

    #[tokio::test]
    async fn test_short_circuit_skips_executor() {
        let executed = Arc::new(Mutex::new(false));
        let flag = executed.clone();
        let mut pipeline = MiddlewarePipeline::new(move |_: MiddlewareParams| {
            *flag.lock().unwrap() = true;
            async { Ok::<_, MiddlewareError>(Value::Null) }.boxed()
        });
        pipeline.register(Blocker);

        let err = pipeline
            .execute(MiddlewareParams::new("User", Action::Delete))
            .await
            .unwrap_err();

        assert!(matches!(err, MiddlewareError::Execution(ref msg) if msg == "blocked"));
        assert!(!*executed.lock().unwrap());
    }

    #[tokio::test]
    async fn test_dispatcher_wraps_downstream_stages() {
        let emitter = Arc::new(RecordingEmitter::new());
        let mut pipeline = MiddlewarePipeline::new(echo_args());
        pipeline
            .register(EventDispatcher::setup(DispatcherOptions::default(), emitter.clone()))
            .register(Tagger("inner"));

        let params = MiddlewareParams::new("User", Action::Create);
        let result = pipeline.execute(params.clone()).await.unwrap();

        assert_eq!(result, json!({ "trail": ["inner"] }));
        let events = emitter.events();
        assert_eq!(emitter.names(), vec!["User.before.create", "User.after.create"]);
        // Downstream changes never leak into the announced descriptor
        assert_eq!(events[1].payload[0], serde_json::to_value(&params).unwrap());
        assert_eq!(events[1].payload[1], result);
    }
}
