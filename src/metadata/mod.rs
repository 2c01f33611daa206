//! Static metadata about handler types and their methods.
//!
//! Nothing here is discovered at runtime: `#[handlers]` writes the
//! `MethodInfo` table at compile time and `TypeInfo::of` classifies each
//! parameter type by its `TypeId`.

mod method;

pub use method::{MethodInfo, ParamInfo, ParamType, ReturnInfo, ReturnShape};

use std::any::TypeId;
use std::fmt;

use tokio_util::sync::CancellationToken;

/// Broad classification of a parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Structs and enums: the only legal message types.
    Composite,
    /// Primitives, `()`, `str` and `String`.
    Scalar,
    /// `tokio_util::sync::CancellationToken`.
    Cancellation,
}

/// Identity, name and kind of a `'static` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        let kind = if id == TypeId::of::<CancellationToken>() {
            TypeKind::Cancellation
        } else if scalar_ids().contains(&id) {
            TypeKind::Scalar
        } else {
            TypeKind::Composite
        };

        Self {
            id,
            name: std::any::type_name::<T>(),
            kind,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn scalar_ids() -> [TypeId; 19] {
    [
        TypeId::of::<()>(),
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<str>(),
        TypeId::of::<String>(),
    ]
}
