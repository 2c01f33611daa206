//! Statically typed wrappers around marked methods.
//!
//! `#[handlers]` emits one `Binding` per wrappable method. The constructors
//! are generic over the declaring type and the message type so the compiler
//! checks every call site; the result is erased to a closed set of three call
//! shapes that the adapter matches on.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::instance::Instance;
use crate::message::AnyMessage;

/// The three supported handler shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerShape {
    /// `fn(&self, M)`
    Sync,
    /// `async fn(&self, M)`
    Async,
    /// `async fn(&self, M, CancellationToken)`
    AsyncCancellable,
}

impl HandlerShape {
    pub fn is_async(self) -> bool {
        !matches!(self, HandlerShape::Sync)
    }

    pub fn supports_cancellation(self) -> bool {
        matches!(self, HandlerShape::AsyncCancellable)
    }
}

/// Handler return values that can be read as completion or failure.
pub trait IntoCompletion {
    fn into_completion(self) -> Result<(), BoxError>;
}

impl IntoCompletion for () {
    fn into_completion(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E: Into<BoxError>> IntoCompletion for Result<(), E> {
    fn into_completion(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

pub(crate) type Shared = Arc<dyn Instance>;
pub(crate) type Pending = BoxFuture<'static, Result<(), BoxError>>;

/// Anything that goes wrong before or inside a bound call.
pub(crate) enum Fault {
    Message {
        expected: &'static str,
        actual: &'static str,
    },
    Instance {
        expected: &'static str,
        actual: &'static str,
    },
    Failed(BoxError),
}

type SyncCall = dyn Fn(Shared, AnyMessage) -> Result<(), Fault> + Send + Sync;
type AsyncCall = dyn Fn(Shared, AnyMessage) -> Result<Pending, Fault> + Send + Sync;
type CancellableCall =
    dyn Fn(Shared, AnyMessage, CancellationToken) -> Result<Pending, Fault> + Send + Sync;

#[derive(Clone)]
pub(crate) enum Call {
    Sync(Arc<SyncCall>),
    Async(Arc<AsyncCall>),
    Cancellable(Arc<CancellableCall>),
}

/// Erased, statically checked call wrapper for one handler method.
#[derive(Clone)]
pub struct Binding {
    call: Call,
}

impl Binding {
    /// Wrap `fn(&self, M) -> ()` or `fn(&self, M) -> Result<(), E>`.
    pub fn sync<T, M, R, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        M: Send + 'static,
        R: IntoCompletion,
        F: Fn(&T, M) -> R + Send + Sync + 'static,
    {
        let call = move |instance: Shared, message: AnyMessage| {
            let (instance, message) = unpack::<T, M>(instance, message)?;
            f(&instance, message).into_completion().map_err(Fault::Failed)
        };
        Self {
            call: Call::Sync(Arc::new(call)),
        }
    }

    /// Wrap an asynchronous method that does not take a token.
    pub fn future<T, M, Fut, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        M: Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: IntoCompletion,
        F: Fn(Arc<T>, M) -> Fut + Send + Sync + 'static,
    {
        let call = move |instance: Shared, message: AnyMessage| {
            let (instance, message) = unpack::<T, M>(instance, message)?;
            Ok(f(instance, message)
                .map(IntoCompletion::into_completion)
                .boxed())
        };
        Self {
            call: Call::Async(Arc::new(call)),
        }
    }

    /// Wrap an asynchronous method whose last parameter is the token.
    pub fn cancellable<T, M, Fut, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        M: Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: IntoCompletion,
        F: Fn(Arc<T>, M, CancellationToken) -> Fut + Send + Sync + 'static,
    {
        let call = move |instance: Shared, message: AnyMessage, token: CancellationToken| {
            let (instance, message) = unpack::<T, M>(instance, message)?;
            Ok(f(instance, message, token)
                .map(IntoCompletion::into_completion)
                .boxed())
        };
        Self {
            call: Call::Cancellable(Arc::new(call)),
        }
    }

    pub fn shape(&self) -> HandlerShape {
        match self.call {
            Call::Sync(_) => HandlerShape::Sync,
            Call::Async(_) => HandlerShape::Async,
            Call::Cancellable(_) => HandlerShape::AsyncCancellable,
        }
    }

    pub(crate) fn into_call(self) -> Call {
        self.call
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Binding").field(&self.shape()).finish()
    }
}

fn unpack<T, M>(instance: Shared, message: AnyMessage) -> Result<(Arc<T>, M), Fault>
where
    T: Send + Sync + 'static,
    M: Send + 'static,
{
    let actual = Instance::instance_type_name(&*instance);
    let instance = Instance::into_any(instance)
        .downcast::<T>()
        .map_err(|_| Fault::Instance {
            expected: std::any::type_name::<T>(),
            actual,
        })?;
    let message = message.downcast::<M>().map_err(|message| Fault::Message {
        expected: std::any::type_name::<M>(),
        actual: message.type_name(),
    })?;
    Ok((instance, message))
}
