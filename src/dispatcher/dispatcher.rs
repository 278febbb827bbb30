use std::future::Future;

use serde_json::Value;

use crate::dispatcher::error::EmitError;
use crate::dispatcher::traits::EventEmitter;
use crate::dispatcher::types::{event_name, is_truthy, DispatcherOptions, MiddlewareParams, When};

/// Middleware stage that announces `<model>.before.<action>` and
/// `<model>.after.<action>` around each ORM operation that passes its filters.
///
/// The wrapped operation always runs, whether or not anything is announced.
/// Holds no per-call state, so one instance can serve concurrent operations.
#[derive(Debug, Clone)]
pub struct EventDispatcher<E> {
    options: DispatcherOptions,
    emitter: E,
}

impl<E: EventEmitter> EventDispatcher<E> {
    pub fn new(options: DispatcherOptions, emitter: E) -> Self {
        Self { options, emitter }
    }

    /// Alias for [`EventDispatcher::new`], reads better at middleware registration sites
    pub fn setup(options: DispatcherOptions, emitter: E) -> Self {
        Self::new(options, emitter)
    }

    /// Run `next` with `params`, announcing the operation if the filters allow.
    ///
    /// `next` is invoked exactly once and its result is returned unchanged.
    /// The after-event fires only for a truthy result. Errors from `next` are
    /// returned as-is; emitter errors are converted into `Err` and abort the
    /// sequence where they occur, so a failing before-event means `next` never runs.
    pub async fn dispatch<F, Fut, Err>(&self, params: MiddlewareParams, next: F) -> Result<Value, Err>
    where
        F: FnOnce(MiddlewareParams) -> Fut,
        Fut: Future<Output = Result<Value, Err>>,
        Err: From<EmitError>,
    {
        let model = match params.model.clone() {
            Some(model) => model,
            None => {
                tracing::trace!(
                    "No model on {} operation (raw: {}) - passing through",
                    params.action,
                    params.action.is_raw()
                );
                return next(params).await;
            }
        };

        if !self.options.allows_model(&model) {
            tracing::trace!("Model {} not in dispatcher filter - passing through", model);
            return next(params).await;
        }

        let action = params.action;
        if !self.options.allows_action(action) {
            tracing::trace!("Action {} not in dispatcher filter - passing through", action);
            return next(params).await;
        }

        let emit_before = self.options.allows_phase(When::Before);
        let emit_after = self.options.allows_phase(When::After);
        if !emit_before && !emit_after {
            return next(params).await;
        }

        let descriptor = serde_json::to_value(&params).map_err(EmitError::from)?;

        if emit_before {
            self.announce(&event_name(&model, When::Before, action), &[descriptor.clone()])?;
        }

        let result = next(params).await?;

        if emit_after && is_truthy(&result) {
            self.announce(&event_name(&model, When::After, action), &[descriptor, result.clone()])?;
        }

        Ok(result)
    }

    fn announce(&self, event: &str, payload: &[Value]) -> Result<(), EmitError> {
        let delivered = self.emitter.emit(event, payload)?;
        tracing::debug!("Emitted {} (listeners: {})", event, delivered);
        Ok(())
    }
}
