use core::any::TypeId;

use crate::Reflect;
use crate::info::{ListInfo, StructInfo, Type, TypePath};
use crate::serial::RawKind;

// -----------------------------------------------------------------------------
// Typed

/// Access to the static [`TypeInfo`] of a type.
///
/// The returned reference lives in a `static` cell, so repeated calls are
/// cheap and the address is stable.
pub trait Typed: Reflect + TypePath {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Shape of a reflected type.
///
/// The variant decides how a value is described on the wire:
///
/// - [`Primitive`](TypeInfo::Primitive): written raw, or boxed when it sits
///   behind a polymorphic slot.
/// - [`Struct`](TypeInfo::Struct): an object with named members.
/// - [`List`](TypeInfo::List): an ordered, countable collection.
/// - [`Opaque`](TypeInfo::Opaque): no visible layout. Only serializable
///   through a registered surrogate.
#[derive(Debug)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Struct(StructInfo),
    List(ListInfo),
    Opaque(OpaqueInfo),
}

impl TypeInfo {
    #[inline]
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => &info.ty,
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Opaque(info) => &info.ty,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    #[inline]
    pub const fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            Self::Struct(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_list(&self) -> Option<&ListInfo> {
        match self {
            Self::List(info) => Some(info),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::Opaque(_) => "opaque",
        }
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// A value the codec writes directly.
#[derive(Debug)]
pub struct PrimitiveInfo {
    ty: Type,
    kind: RawKind,
}

impl PrimitiveInfo {
    #[inline]
    pub fn new<T: TypePath>(kind: RawKind) -> Self {
        debug_assert!(kind.is_primitive());
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn kind(&self) -> RawKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: TypePath + ?Sized>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
