//! Shape validation for marked methods.
//!
//! Rules run in a fixed order and the first failure wins:
//! message present, message composite, return shape, cancellation placement,
//! arity, and finally agreement with the generated binding.

use crate::binding::HandlerShape;
use crate::error::ShapeViolation;
use crate::metadata::{MethodInfo, ParamType, ReturnShape, TypeKind};

/// Classify a marked method or say why it cannot be a handler.
pub fn classify(method: &MethodInfo) -> Result<HandlerShape, ShapeViolation> {
    let message = match method.params.first() {
        Some(param) if !param.is_cancellation() => param,
        _ => return Err(ShapeViolation::MissingMessage),
    };

    match message.ty {
        ParamType::Typed(info) if info.kind() == TypeKind::Composite => {}
        _ => return Err(ShapeViolation::MessageNotComposite(message.type_name())),
    }

    if let ReturnShape::Other(ty) = method.returns.shape {
        return Err(ShapeViolation::UnsupportedReturn(ty));
    }
    let is_async = method.returns.is_async;

    let rest = &method.params[1..];
    let token_at = rest.iter().position(|p| p.is_cancellation());
    if let Some(index) = token_at {
        if index + 1 != rest.len() {
            return Err(ShapeViolation::CancellationNotLast);
        }
        if !is_async {
            return Err(ShapeViolation::CancellationOnSync);
        }
    }

    let expected = 1 + usize::from(token_at.is_some());
    if method.params.len() != expected {
        return Err(ShapeViolation::TooManyParameters(method.params.len()));
    }

    let shape = match (is_async, token_at.is_some()) {
        (false, _) => HandlerShape::Sync,
        (true, false) => HandlerShape::Async,
        (true, true) => HandlerShape::AsyncCancellable,
    };

    match &method.binding {
        Some(binding) if binding.shape() == shape => Ok(shape),
        _ => Err(ShapeViolation::BindingMismatch),
    }
}
