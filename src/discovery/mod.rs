//! Discovery drivers: scan types for marked methods and validate them.
//!
//! ```ignore
//! struct Billing;
//!
//! #[handlers]
//! impl Billing {
//!     #[handler]
//!     fn charge(&self, command: Charge) -> Result<(), BillingError> { .. }
//! }
//!
//! let descriptors = wired_rust::discover::<Billing>(InstanceFactory::new(|| Billing))?;
//! ```
//!
//! Every driver returns either all descriptors or the first `ShapeError`.
//! An empty result is a normal outcome.

mod unit;

pub use unit::ComponentUnit;
#[cfg(feature = "inventory")]
pub use unit::HandlerTypeEntry;

use std::fmt;

use crate::descriptor::HandlerDescriptor;
use crate::error::ShapeError;
use crate::instance::InstanceFactory;
use crate::metadata::{MethodInfo, TypeInfo};

/// Types carrying a `#[handlers]` impl block.
///
/// Implemented by the macro; `handler_methods` lists every `#[handler]`
/// method of the block in declaration order.
pub trait Handlers: Send + Sync + 'static {
    fn handler_methods() -> Vec<MethodInfo>;
}

/// A handler type as a value, so sets of types can be passed around.
#[derive(Clone, Copy)]
pub struct HandlerType {
    type_info: fn() -> TypeInfo,
    methods: fn() -> Vec<MethodInfo>,
    module_path: Option<&'static str>,
}

impl HandlerType {
    pub const fn of<T: Handlers>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>,
            methods: T::handler_methods,
            module_path: None,
        }
    }

    /// `of::<T>()` remembering the module its `#[handlers]` block lives in.
    pub const fn registered<T: Handlers>(module_path: &'static str) -> Self {
        Self {
            type_info: TypeInfo::of::<T>,
            methods: T::handler_methods,
            module_path: Some(module_path),
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }

    pub fn name(&self) -> &'static str {
        self.type_info().name()
    }

    /// Module of the `#[handlers]` block, or of the type when unknown.
    pub fn module_path(&self) -> &'static str {
        match self.module_path {
            Some(path) => path,
            None => {
                let name = self.name();
                name.rsplit_once("::").map_or("", |(module, _)| module)
            }
        }
    }

    pub fn methods(&self) -> Vec<MethodInfo> {
        (self.methods)()
    }
}

impl fmt::Debug for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerType")
            .field("name", &self.name())
            .field("module_path", &self.module_path())
            .finish()
    }
}

impl PartialEq for HandlerType {
    fn eq(&self, other: &Self) -> bool {
        self.type_info().id() == other.type_info().id()
    }
}

impl Eq for HandlerType {}

/// Build a `Vec<HandlerType>` from a list of handler types.
///
/// ```ignore
/// let types = wired_rust::handler_types![Billing, Shipping];
/// ```
#[macro_export]
macro_rules! handler_types {
    ($($ty:ty),* $(,)?) => {
        vec![$($crate::HandlerType::of::<$ty>()),*]
    };
}

#[cfg(feature = "inventory")]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit_handler_type {
    ($ty:ty) => {
        $crate::inventory::submit! {
            $crate::HandlerTypeEntry($crate::HandlerType::registered::<$ty>(::core::module_path!()))
        }
    };
}

#[cfg(not(feature = "inventory"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit_handler_type {
    ($ty:ty) => {};
}

/// Discover the handlers of `T`.
pub fn discover<T: Handlers>(
    instance_factory: InstanceFactory,
) -> Result<Vec<HandlerDescriptor>, ShapeError> {
    discover_type(HandlerType::of::<T>(), instance_factory)
}

/// Discover the handlers of one type, sharing `instance_factory` between them.
pub fn discover_type(
    handler_type: HandlerType,
    instance_factory: InstanceFactory,
) -> Result<Vec<HandlerDescriptor>, ShapeError> {
    let mut descriptors = Vec::new();
    scan(&handler_type, &mut |_: &HandlerType| instance_factory.clone(), &mut descriptors)?;
    Ok(descriptors)
}

/// Discover several types in input order.
///
/// `factory_for` runs at most once per type, and only for types that have
/// at least one marked method.
pub fn discover_types<I, F>(types: I, mut factory_for: F) -> Result<Vec<HandlerDescriptor>, ShapeError>
where
    I: IntoIterator<Item = HandlerType>,
    F: FnMut(&HandlerType) -> InstanceFactory,
{
    let mut descriptors = Vec::new();
    for handler_type in types {
        scan(&handler_type, &mut factory_for, &mut descriptors)?;
    }
    Ok(descriptors)
}

/// Discover every type of a component unit.
pub fn discover_unit<F>(unit: &ComponentUnit, mut factory_for: F) -> Result<Vec<HandlerDescriptor>, ShapeError>
where
    F: FnMut(&HandlerType) -> InstanceFactory,
{
    let mut descriptors = Vec::new();
    for handler_type in unit.types() {
        scan(handler_type, &mut factory_for, &mut descriptors)?;
    }

    tracing::info!(
        unit = %unit.name(),
        types = unit.len(),
        handlers = descriptors.len(),
        "scanned component unit"
    );
    Ok(descriptors)
}

/// Discover several component units, concatenating their results.
pub fn discover_units<'a, I, F>(units: I, mut factory_for: F) -> Result<Vec<HandlerDescriptor>, ShapeError>
where
    I: IntoIterator<Item = &'a ComponentUnit>,
    F: FnMut(&HandlerType) -> InstanceFactory,
{
    let mut descriptors = Vec::new();
    for unit in units {
        descriptors.extend(discover_unit(unit, &mut factory_for)?);
    }
    Ok(descriptors)
}

fn scan<F>(
    handler_type: &HandlerType,
    factory_for: &mut F,
    descriptors: &mut Vec<HandlerDescriptor>,
) -> Result<(), ShapeError>
where
    F: FnMut(&HandlerType) -> InstanceFactory,
{
    let methods = handler_type.methods();
    if methods.is_empty() {
        return Ok(());
    }

    let declaring_type = handler_type.type_info();
    let instance_factory = factory_for(handler_type);
    for method in methods {
        let descriptor = HandlerDescriptor::new(declaring_type, method, instance_factory.clone())?;
        tracing::debug!(
            handler = %declaring_type,
            method = descriptor.method(),
            message = %descriptor.message_type(),
            shape = ?descriptor.shape(),
            "discovered handler"
        );
        descriptors.push(descriptor);
    }
    Ok(())
}
