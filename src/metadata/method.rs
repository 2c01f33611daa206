use super::{TypeInfo, TypeKind};
use crate::binding::Binding;

/// Type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Typed(TypeInfo),
    /// References, `impl Trait` and types carrying lifetimes. Never a legal
    /// message; kept as source text for error messages.
    Opaque(&'static str),
}

/// One declared parameter of a marked method (receiver excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub ty: ParamType,
}

impl ParamInfo {
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Typed(TypeInfo::of::<T>()),
        }
    }

    pub fn opaque(name: &'static str, ty: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Opaque(ty),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.ty {
            ParamType::Typed(info) => info.name(),
            ParamType::Opaque(text) => text,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self.ty, ParamType::Typed(info) if info.kind() == TypeKind::Cancellation)
    }
}

/// What the method hands back once it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// `()`
    Unit,
    /// `Result<(), E>`
    Fallible,
    /// Anything else, as source text.
    Other(&'static str),
}

/// Return behaviour: the shape plus whether it arrives through a future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnInfo {
    pub is_async: bool,
    pub shape: ReturnShape,
}

impl ReturnInfo {
    pub fn unit(is_async: bool) -> Self {
        Self {
            is_async,
            shape: ReturnShape::Unit,
        }
    }

    pub fn fallible(is_async: bool) -> Self {
        Self {
            is_async,
            shape: ReturnShape::Fallible,
        }
    }

    pub fn other(is_async: bool, ty: &'static str) -> Self {
        Self {
            is_async,
            shape: ReturnShape::Other(ty),
        }
    }
}

/// Generated description of one marked method.
///
/// `binding` is present only when the macro could wrap the signature in one
/// of the three supported call shapes; the validator decides whether the
/// method is acceptable either way.
pub struct MethodInfo {
    pub name: &'static str,
    pub params: Vec<ParamInfo>,
    pub returns: ReturnInfo,
    pub binding: Option<Binding>,
}

impl MethodInfo {
    pub fn new(
        name: &'static str,
        params: Vec<ParamInfo>,
        returns: ReturnInfo,
        binding: Option<Binding>,
    ) -> Self {
        Self {
            name,
            params,
            returns,
            binding,
        }
    }
}

impl std::fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("binding", &self.binding.as_ref().map(Binding::shape))
            .finish()
    }
}
