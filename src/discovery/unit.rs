//! Component units: named groups of handler types scanned together.

use std::borrow::Cow;

use super::{HandlerType, Handlers};

/// A named set of handler types, typically one application module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentUnit {
    name: Cow<'static, str>,
    types: Vec<HandlerType>,
}

impl ComponentUnit {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    pub fn with<T: Handlers>(self) -> Self {
        self.with_type(HandlerType::of::<T>())
    }

    pub fn with_type(mut self, handler_type: HandlerType) -> Self {
        self.types.push(handler_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[HandlerType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<HandlerType> for ComponentUnit {
    fn from_iter<I: IntoIterator<Item = HandlerType>>(iter: I) -> Self {
        Self {
            name: Cow::Borrowed("<anonymous>"),
            types: iter.into_iter().collect(),
        }
    }
}

/// Link-time registration of a `#[handlers]` type.
///
/// Submitted by the macro for every `#[handlers]` block; read back by
/// [`ComponentUnit::collect`].
#[cfg(feature = "inventory")]
pub struct HandlerTypeEntry(pub HandlerType);

#[cfg(feature = "inventory")]
inventory::collect!(HandlerTypeEntry);

#[cfg(feature = "inventory")]
impl ComponentUnit {
    /// Every `#[handlers]` type linked into the binary whose block lives in
    /// `module_prefix` or one of its submodules, sorted by type name.
    ///
    /// An empty prefix selects everything.
    pub fn collect(module_prefix: &'static str) -> Self {
        let mut types: Vec<HandlerType> = inventory::iter::<HandlerTypeEntry>()
            .map(|entry| entry.0)
            .filter(|ty| in_module(ty.module_path(), module_prefix))
            .collect();
        types.sort_by_key(|ty| ty.name());

        tracing::debug!(
            unit = module_prefix,
            types = types.len(),
            "collected handler types"
        );

        Self {
            name: Cow::Borrowed(module_prefix),
            types,
        }
    }
}

#[cfg(feature = "inventory")]
fn in_module(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}
