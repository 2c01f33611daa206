//! Type-erased message passed through adapters.

use std::any::{Any, TypeId};
use std::fmt;

/// A boxed message that remembers its concrete type name.
pub struct AnyMessage {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

impl AnyMessage {
    pub fn new<M: Any + Send>(message: M) -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            value: Box::new(message),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<M: Any>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }

    /// Take the message back out, or return it untouched on a type mismatch.
    pub fn downcast<M: Any>(self) -> Result<M, Self> {
        if !self.is::<M>() {
            return Err(self);
        }
        let Self {
            type_id,
            type_name,
            value,
        } = self;
        value.downcast::<M>().map(|boxed| *boxed).map_err(|value| Self {
            type_id,
            type_name,
            value,
        })
    }
}

impl fmt::Debug for AnyMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyMessage")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
