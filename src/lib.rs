//! Convention-based discovery and uniform invocation of message handlers.
//!
//! Mark handler methods with `#[handler]` inside a `#[handlers]` impl block,
//! discover them into validated [`HandlerDescriptor`]s, and turn each one into
//! an [`Adapter`] with a single `(message, token) -> future` calling
//! convention.
//!
//! ```ignore
//! use wired_rust::{discover, handler, handlers, register_all, HandlerMap, InstanceFactory};
//!
//! #[derive(Default)]
//! struct Shipping;
//!
//! #[handlers]
//! impl Shipping {
//!     #[handler]
//!     async fn ship(&self, order: OrderPlaced, token: CancellationToken) -> Result<(), ShipError> {
//!         ..
//!     }
//! }
//!
//! let mut map = HandlerMap::new();
//! register_all(&mut map, discover::<Shipping>(InstanceFactory::default_of::<Shipping>())?)?;
//! map.dispatch_message(OrderPlaced { .. }, CancellationToken::new()).await?;
//! ```

extern crate self as wired_rust;

mod adapter;
mod binding;
mod descriptor;
mod discovery;
mod error;
mod instance;
mod message;
mod metadata;
mod registration;

pub use adapter::{build_adapter, Adapter, Invocation};
pub use binding::{Binding, HandlerShape, IntoCompletion};
pub use descriptor::{validator, HandlerDescriptor, HandlerSummary};
pub use discovery::{
    discover, discover_type, discover_types, discover_unit, discover_units, ComponentUnit,
    HandlerType, Handlers,
};
pub use error::{BoxError, InvocationError, ResolutionError, ShapeError, ShapeViolation};
pub use instance::{Instance, InstanceFactory};
pub use message::AnyMessage;
pub use metadata::{MethodInfo, ParamInfo, ParamType, ReturnInfo, ReturnShape, TypeInfo, TypeKind};
pub use registration::{
    register_all, ConflictPolicy, DispatchError, HandlerMap, RegistrationError, RegistrationTarget,
};

#[cfg(feature = "inventory")]
pub use discovery::HandlerTypeEntry;

pub use wired_rust_macros::{handler, handlers};

// Re-exported for `#[handlers]` expansions and handler signatures.
pub use tokio_util::sync::CancellationToken;

#[cfg(feature = "inventory")]
#[doc(hidden)]
pub use inventory;
