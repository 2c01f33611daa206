//! Handler descriptors: one immutable record per accepted method.

pub mod validator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binding::{Binding, HandlerShape};
use crate::error::{ShapeError, ShapeViolation};
use crate::instance::InstanceFactory;
use crate::metadata::{MethodInfo, ParamType, TypeInfo};

/// Everything needed to build an adapter for one handler method.
///
/// Created once at discovery time and consumed by `build_adapter`. Nothing
/// deduplicates descriptors: scanning a type twice yields two independent,
/// equivalent records.
pub struct HandlerDescriptor {
    declaring_type: TypeInfo,
    message_type: TypeInfo,
    method: &'static str,
    binding: Binding,
    shape: HandlerShape,
    instance_factory: InstanceFactory,
}

impl HandlerDescriptor {
    /// Validate `method` and package it with the caller's factory.
    pub fn new(
        declaring_type: TypeInfo,
        method: MethodInfo,
        instance_factory: InstanceFactory,
    ) -> Result<Self, ShapeError> {
        let reject = |violation| ShapeError {
            declaring_type: declaring_type.name(),
            method: method.name,
            violation,
        };

        let shape = validator::classify(&method).map_err(reject)?;

        // classify() has already checked both of these
        let Some(ParamType::Typed(message_type)) = method.params.first().map(|p| p.ty) else {
            return Err(reject(ShapeViolation::MissingMessage));
        };
        let Some(binding) = method.binding else {
            return Err(reject(ShapeViolation::BindingMismatch));
        };

        Ok(Self {
            declaring_type,
            message_type,
            method: method.name,
            binding,
            shape,
            instance_factory,
        })
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

    pub fn is_async(&self) -> bool {
        self.shape.is_async()
    }

    pub fn supports_cancellation(&self) -> bool {
        self.shape.supports_cancellation()
    }

    pub fn instance_factory(&self) -> &InstanceFactory {
        &self.instance_factory
    }

    pub fn summary(&self) -> HandlerSummary {
        HandlerSummary {
            declaring_type: self.declaring_type.name().to_string(),
            message_type: self.message_type.name().to_string(),
            method: self.method.to_string(),
            is_async: self.is_async(),
            supports_cancellation: self.supports_cancellation(),
        }
    }

    /// Build the uniform adapter, consuming the descriptor.
    pub fn into_adapter(self) -> crate::adapter::Adapter {
        crate::adapter::build_adapter(self)
    }

    pub(crate) fn into_parts(self) -> (TypeInfo, TypeInfo, &'static str, Binding, InstanceFactory) {
        (
            self.declaring_type,
            self.message_type,
            self.method,
            self.binding,
            self.instance_factory,
        )
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("declaring_type", &self.declaring_type.name())
            .field("message_type", &self.message_type.name())
            .field("method", &self.method)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a descriptor or adapter, for start-up reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSummary {
    pub declaring_type: String,
    pub message_type: String,
    pub method: String,
    pub is_async: bool,
    pub supports_cancellation: bool,
}
