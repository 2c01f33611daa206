//! Registration bridge: hand adapters to whatever routes messages.
//!
//! The bridge only builds adapters and forwards them. Deciding what happens
//! when two handlers claim one message type is the target's business.

mod handler_map;

pub use handler_map::{ConflictPolicy, DispatchError, HandlerMap, RegistrationError};

use std::any::TypeId;
use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::BuildHasher;

use crate::adapter::{build_adapter, Adapter};
use crate::descriptor::HandlerDescriptor;
use crate::metadata::TypeInfo;

/// Something that maps message types to adapters.
pub trait RegistrationTarget {
    type Error;

    fn register(&mut self, message_type: TypeInfo, adapter: Adapter) -> Result<(), Self::Error>;
}

/// Build an adapter for each descriptor and register it under its message
/// type, in order. Stops at the first error from the target and returns it
/// unchanged; returns the number of registrations otherwise.
pub fn register_all<T, I>(target: &mut T, descriptors: I) -> Result<usize, T::Error>
where
    T: RegistrationTarget + ?Sized,
    I: IntoIterator<Item = HandlerDescriptor>,
{
    let mut registered = 0;
    for descriptor in descriptors {
        let message_type = descriptor.message_type();
        let adapter = build_adapter(descriptor);
        tracing::debug!(
            message = %message_type,
            handler = adapter.declaring_type().name(),
            method = adapter.method(),
            "registering handler"
        );
        target.register(message_type, adapter)?;
        registered += 1;
    }
    Ok(registered)
}

/// Plain map target: the last registration for a message type wins.
impl<S: BuildHasher> RegistrationTarget for HashMap<TypeId, Adapter, S> {
    type Error = Infallible;

    fn register(&mut self, message_type: TypeInfo, adapter: Adapter) -> Result<(), Infallible> {
        self.insert(message_type.id(), adapter);
        Ok(())
    }
}
