//! Instance factories and the resolver the adapters call on every invocation.
//!
//! A factory is supplied by whoever runs discovery and is shared by every
//! adapter built from its descriptors. Whether it hands out a fresh value or
//! one shared singleton is entirely up to the factory.

pub(crate) mod resolver;

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;

/// Any value a factory can produce.
///
/// Blanket-implemented for every `Send + Sync + 'static` type. Call the
/// methods through a `&dyn Instance` (`Instance::instance_type_name(&*arc)`)
/// so they report the concrete type rather than the `Arc`.
pub trait Instance: Any + Send + Sync {
    fn instance_type_id(&self) -> TypeId;

    fn instance_type_name(&self) -> &'static str;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> Instance for T {
    fn instance_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn instance_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

type Produce = dyn Fn() -> Result<Arc<dyn Instance>, BoxError> + Send + Sync;

/// Zero-argument producer of handler instances.
#[derive(Clone)]
pub struct InstanceFactory {
    produce: Arc<Produce>,
}

impl InstanceFactory {
    /// A fresh instance on every call.
    pub fn new<T, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::from_fn(move || Ok(Arc::new(f()) as Arc<dyn Instance>))
    }

    /// A fresh instance on every call, or an error.
    pub fn try_new<T, E, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::from_fn(move || {
            f().map(|value| Arc::new(value) as Arc<dyn Instance>)
                .map_err(Into::into)
        })
    }

    /// The same instance on every call.
    pub fn shared<T: Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self::from_fn(move || Ok(instance.clone() as Arc<dyn Instance>))
    }

    pub fn default_of<T: Default + Send + Sync + 'static>() -> Self {
        Self::new(T::default)
    }

    /// Untyped factory. The resolver checks the produced type at call time.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Instance>, BoxError> + Send + Sync + 'static,
    {
        Self {
            produce: Arc::new(f),
        }
    }

    pub fn produce(&self) -> Result<Arc<dyn Instance>, BoxError> {
        (self.produce)()
    }
}

impl fmt::Debug for InstanceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceFactory").finish_non_exhaustive()
    }
}
