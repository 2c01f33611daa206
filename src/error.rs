//! Error types for discovery and invocation.
//!
//! The two classes never mix: `ShapeError` is returned synchronously while
//! scanning, `InvocationError` only ever arrives through an adapter's future.

use std::sync::Arc;

use thiserror::Error;

/// Failure currency for handler bodies and instance factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a marked method was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeViolation {
    /// No parameters, or the first parameter is a cancellation token.
    #[error("handler must accept a message parameter")]
    MissingMessage,
    /// The message parameter is a scalar or a borrowed/opaque type.
    #[error("message parameter must be a reference type (an owned struct or enum), found `{0}`")]
    MessageNotComposite(&'static str),
    /// The method returns something other than `()` or `Result<(), E>`.
    #[error("unsupported return type `{0}`")]
    UnsupportedReturn(&'static str),
    /// A synchronous method declares a cancellation token.
    #[error("cancellation is only supported on asynchronous handlers")]
    CancellationOnSync,
    /// A cancellation token is followed by further parameters.
    #[error("cancellation token must be the last parameter")]
    CancellationNotLast,
    /// More parameters than one message plus an optional token.
    #[error("handler accepts one message parameter and an optional cancellation token, found {0} parameters")]
    TooManyParameters(usize),
    /// The generated wrapper is missing or disagrees with the signature.
    #[error("handler binding does not match the declared signature")]
    BindingMismatch,
}

/// Discovery-time rejection of a marked method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid handler `{declaring_type}::{method}`: {violation}")]
pub struct ShapeError {
    pub declaring_type: &'static str,
    pub method: &'static str,
    #[source]
    pub violation: ShapeViolation,
}

/// Failure to obtain an instance of the declaring type.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("instance factory for `{declaring_type}` failed: {source}")]
    FactoryFailed {
        declaring_type: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("instance factory for `{declaring_type}` panicked: {message}")]
    FactoryPanicked {
        declaring_type: &'static str,
        message: String,
    },

    #[error("instance factory returned `{actual}`, expected `{expected}`")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Failure delivered through an adapter's future.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("handler `{handler}` could not resolve its instance: {source}")]
    Resolution {
        handler: Arc<str>,
        #[source]
        source: ResolutionError,
    },

    #[error("handler `{handler}` expects message `{expected}`, got `{actual}`")]
    MessageMismatch {
        handler: Arc<str>,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("handler `{handler}` failed: {source}")]
    Failed {
        handler: Arc<str>,
        #[source]
        source: BoxError,
    },

    #[error("handler `{handler}` panicked: {message}")]
    Panicked { handler: Arc<str>, message: String },
}

impl InvocationError {
    /// `Type::method` of the handler that produced this error.
    pub fn handler(&self) -> &str {
        match self {
            InvocationError::Resolution { handler, .. }
            | InvocationError::MessageMismatch { handler, .. }
            | InvocationError::Failed { handler, .. }
            | InvocationError::Panicked { handler, .. } => handler,
        }
    }

    /// The resolution failure, if that is what this is.
    pub fn resolution(&self) -> Option<&ResolutionError> {
        match self {
            InvocationError::Resolution { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
