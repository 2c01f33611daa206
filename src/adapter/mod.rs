//! Uniform invocation adapters.
//!
//! Every accepted handler, whatever its shape, is called the same way:
//!
//! ```ignore
//! let adapter = build_adapter(descriptor);
//! adapter.call(AnyMessage::new(PlaceOrder { .. }), token).await?;
//! ```
//!
//! `call` never panics and never fails synchronously. Instance resolution,
//! message mismatches, handler errors and handler panics all come back as an
//! `Err` from the returned future.
//!
//! ## Cancellation
//!
//! The token is forwarded only to handlers declared with a
//! `CancellationToken` parameter. Other handlers never see it and run to
//! completion regardless of its state; check `supports_cancellation()` before
//! relying on cancellation having any effect.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tokio_util::sync::CancellationToken;

use crate::binding::{Call, Fault, HandlerShape, Pending};
use crate::descriptor::{HandlerDescriptor, HandlerSummary};
use crate::error::{panic_message, InvocationError, ResolutionError};
use crate::instance::resolver::resolve;
use crate::instance::{Instance, InstanceFactory};
use crate::message::AnyMessage;
use crate::metadata::TypeInfo;

/// Future returned by every adapter call.
pub type Invocation = BoxFuture<'static, Result<(), InvocationError>>;

type Invoke = dyn Fn(AnyMessage, CancellationToken) -> Invocation + Send + Sync;

/// Uniform `(message, token) -> future` callable for one handler method.
#[derive(Clone)]
pub struct Adapter {
    declaring_type: TypeInfo,
    message_type: TypeInfo,
    method: &'static str,
    shape: HandlerShape,
    invoke: Arc<Invoke>,
}

impl Adapter {
    /// Invoke the handler.
    pub fn call(&self, message: AnyMessage, token: CancellationToken) -> Invocation {
        (self.invoke)(message, token)
    }

    /// Invoke the handler with a concrete message.
    pub fn call_with<M: Any + Send>(&self, message: M, token: CancellationToken) -> Invocation {
        self.call(AnyMessage::new(message), token)
    }

    pub fn declaring_type(&self) -> TypeInfo {
        self.declaring_type
    }

    pub fn message_type(&self) -> TypeInfo {
        self.message_type
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn shape(&self) -> HandlerShape {
        self.shape
    }

    pub fn supports_cancellation(&self) -> bool {
        self.shape.supports_cancellation()
    }

    pub fn summary(&self) -> HandlerSummary {
        HandlerSummary {
            declaring_type: self.declaring_type.name().to_string(),
            message_type: self.message_type.name().to_string(),
            method: self.method.to_string(),
            is_async: self.shape.is_async(),
            supports_cancellation: self.shape.supports_cancellation(),
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("declaring_type", &self.declaring_type.name())
            .field("message_type", &self.message_type.name())
            .field("method", &self.method)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Turn a descriptor into its adapter.
pub fn build_adapter(descriptor: HandlerDescriptor) -> Adapter {
    let shape = descriptor.shape();
    let (declaring_type, message_type, method, binding, factory) = descriptor.into_parts();
    let label: Arc<str> = Arc::from(format!("{}::{}", declaring_type.name(), method));

    let target = Target {
        label,
        declaring_type,
        factory,
    };

    let invoke: Arc<Invoke> = match binding.into_call() {
        Call::Sync(call) => Arc::new(move |message: AnyMessage, _token: CancellationToken| {
            let outcome = target
                .resolve()
                .and_then(|instance| target.guard(|| call(instance, message)));
            future::ready(report(outcome)).boxed()
        }),
        Call::Async(call) => Arc::new(move |message: AnyMessage, token: CancellationToken| {
            if token.is_cancelled() {
                tracing::trace!(
                    handler = %target.label,
                    "handler does not observe cancellation; running to completion"
                );
            }
            target.settle(
                target
                    .resolve()
                    .and_then(|instance| target.guard(|| call(instance, message))),
            )
        }),
        Call::Cancellable(call) => Arc::new(move |message: AnyMessage, token: CancellationToken| {
            target.settle(
                target
                    .resolve()
                    .and_then(|instance| target.guard(|| call(instance, message, token))),
            )
        }),
    };

    Adapter {
        declaring_type,
        message_type,
        method,
        shape,
        invoke,
    }
}

/// Per-adapter state shared by the three strategies.
struct Target {
    label: Arc<str>,
    declaring_type: TypeInfo,
    factory: InstanceFactory,
}

impl Target {
    fn resolve(&self) -> Result<Arc<dyn Instance>, InvocationError> {
        resolve(&self.factory, &self.declaring_type).map_err(|source| {
            InvocationError::Resolution {
                handler: self.label.clone(),
                source,
            }
        })
    }

    /// Run a bound call, turning faults and panics into invocation errors.
    fn guard<T>(&self, f: impl FnOnce() -> Result<T, Fault>) -> Result<T, InvocationError> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(fault)) => Err(self.fault(fault)),
            Err(payload) => Err(InvocationError::Panicked {
                handler: self.label.clone(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    fn fault(&self, fault: Fault) -> InvocationError {
        let handler = self.label.clone();
        match fault {
            Fault::Message { expected, actual } => InvocationError::MessageMismatch {
                handler,
                expected,
                actual,
            },
            Fault::Instance { expected, actual } => InvocationError::Resolution {
                handler,
                source: ResolutionError::WrongType { expected, actual },
            },
            Fault::Failed(source) => InvocationError::Failed { handler, source },
        }
    }

    /// Drive a pending handler future, catching its errors and panics.
    fn settle(&self, pending: Result<Pending, InvocationError>) -> Invocation {
        let pending = match pending {
            Ok(pending) => pending,
            Err(err) => return future::ready(Err(err)).boxed(),
        };

        let label = self.label.clone();
        AssertUnwindSafe(pending)
            .catch_unwind()
            .map(move |outcome| {
                let result = match outcome {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(InvocationError::Failed {
                        handler: label,
                        source,
                    }),
                    Err(payload) => Err(InvocationError::Panicked {
                        handler: label,
                        message: panic_message(payload.as_ref()),
                    }),
                };
                report(result)
            })
            .boxed()
    }
}

fn report(result: Result<(), InvocationError>) -> Result<(), InvocationError> {
    if let Err(err) = &result {
        tracing::debug!(error = %err, "handler settled with an error");
    }
    result
}
