//! Lazily built statics for [`Typed`](crate::info::Typed) and
//! [`TypePath`](crate::info::TypePath) implementations.
//!
//! A `static` inside a generic function is shared by every instantiation,
//! so the generic cells key their contents by [`TypeId`].

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use ogs_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    pub trait CellValue: Send + Sync + 'static {}

    impl CellValue for alloc::string::String {}
    impl CellValue for crate::info::TypeInfo {}
}

use sealed::CellValue;

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Holds the [`TypeInfo`] of one non-generic type.
///
/// ```
/// use ogs_reflect::impls::NonGenericTypeInfoCell;
/// use ogs_reflect::info::{OpaqueInfo, TypeInfo};
///
/// struct Token;
/// # impl ogs_reflect::info::TypePath for Token {
/// #     fn type_path() -> &'static str { "demo::Token" }
/// #     fn type_name() -> &'static str { "Token" }
/// # }
///
/// static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
/// let info = CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Token>()));
/// assert_eq!(info.type_path(), "demo::Token");
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeInfoCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Holds one leaked value per instantiation of a generic type.
pub struct GenericTypeCell<T: CellValue>(RwLock<TypeIdMap<&'static T>>);

/// [`TypeInfo`] per instantiation.
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Type path strings per instantiation.
///
/// ```
/// use ogs_reflect::impls::{GenericTypePathCell, concat};
///
/// fn path_of<T: 'static>(inner: &str) -> &'static str {
///     static CELL: GenericTypePathCell = GenericTypePathCell::new();
///     CELL.get_or_insert::<T>(|| concat(&["Wrapper<", inner, ">"]))
/// }
///
/// assert_eq!(path_of::<u8>("u8"), "Wrapper<u8>");
/// assert_eq!(path_of::<u8>("ignored"), "Wrapper<u8>");
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: CellValue> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value for `G`, building it with `f` the first time.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &'static T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &'static T {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        if let Some(value) = found {
            return value;
        }

        // Built outside the lock: `f` may need other cells of this kind.
        let value = f();
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

impl<T: CellValue> Default for GenericTypeCell<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
