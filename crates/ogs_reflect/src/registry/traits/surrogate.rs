use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::graph::{Ref, SharedObject};
use crate::info::{TypeInfo, Typed};
use crate::registry::{FromType, GetTypeMeta};

// -----------------------------------------------------------------------------
// Surrogate

/// Serializes an opaque type through a simple stand-in struct.
///
/// The stand-in is described and written in place of the original, under
/// the original's type path. When decoding into a shared slot, the handle is
/// created from `restore(Simple::default())` first, so members of the
/// stand-in that point back at the object resolve to the final handle.
///
/// # Examples
///
/// ```
/// use ogs_reflect::{Reflect, registry::Surrogate};
///
/// #[derive(Reflect)]
/// #[reflect(opaque, surrogate)]
/// struct Celsius(f64);
///
/// #[derive(Reflect, Default)]
/// struct CelsiusParts {
///     degrees: f64,
/// }
///
/// impl Surrogate for Celsius {
///     type Simple = CelsiusParts;
///
///     fn simplify(&self) -> CelsiusParts {
///         CelsiusParts { degrees: self.0 }
///     }
///
///     fn restore(simple: CelsiusParts) -> Self {
///         Celsius(simple.degrees)
///     }
/// }
/// ```
pub trait Surrogate: Typed {
    type Simple: GetTypeMeta + Default;

    /// Values of this type skip identity tracking.
    const BY_VALUE: bool = false;

    fn simplify(&self) -> Self::Simple;

    fn restore(simple: Self::Simple) -> Self;
}

// -----------------------------------------------------------------------------
// TypeTraitSurrogate

/// Type-erased [`Surrogate`] stored in the registry.
#[derive(Clone, Copy)]
pub struct TypeTraitSurrogate {
    simple_type: TypeId,
    simple_info: fn() -> &'static TypeInfo,
    by_value: bool,
    simplify: fn(&dyn Reflect) -> Option<Box<dyn Reflect>>,
    restore: fn(Box<dyn Reflect>) -> Option<Box<dyn Reflect>>,
    restore_into: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Option<()>,
    provisional: fn() -> SharedObject,
}

impl TypeTraitSurrogate {
    #[inline(always)]
    pub const fn simple_type(&self) -> TypeId {
        self.simple_type
    }

    #[inline]
    pub fn simple_info(&self) -> &'static TypeInfo {
        (self.simple_info)()
    }

    #[inline(always)]
    pub const fn is_by_value(&self) -> bool {
        self.by_value
    }

    /// Converts `value` to its stand-in. `None` if `value` has another type.
    #[inline]
    pub fn simplify(&self, value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
        (self.simplify)(value)
    }

    #[inline(always)]
    pub(crate) const fn simplify_fn(&self) -> fn(&dyn Reflect) -> Option<Box<dyn Reflect>> {
        self.simplify
    }

    /// Rebuilds the original from a stand-in.
    #[inline]
    pub fn restore(&self, simple: Box<dyn Reflect>) -> Option<Box<dyn Reflect>> {
        (self.restore)(simple)
    }

    /// Rebuilds the original in place, overwriting `target`.
    #[inline]
    pub fn restore_into(&self, target: &mut dyn Reflect, simple: Box<dyn Reflect>) -> Option<()> {
        (self.restore_into)(target, simple)
    }

    /// A placeholder handle, restored from the default stand-in.
    #[inline]
    pub fn provisional(&self) -> SharedObject {
        (self.provisional)()
    }
}

impl<T: Surrogate> FromType<T> for TypeTraitSurrogate {
    fn from_type() -> Self {
        Self {
            simple_type: TypeId::of::<T::Simple>(),
            simple_info: <T::Simple as Typed>::type_info,
            by_value: T::BY_VALUE,
            simplify: |value| {
                let value = value.downcast_ref::<T>()?;
                Some(Box::new(value.simplify()))
            },
            restore: |simple| {
                let simple = simple.take::<T::Simple>()?;
                Some(Box::new(T::restore(simple)))
            },
            restore_into: |target, simple| {
                let target = target.downcast_mut::<T>()?;
                *target = T::restore(simple.take::<T::Simple>()?);
                Some(())
            },
            provisional: || SharedObject::new(Ref::new(T::restore(T::Simple::default()))),
        }
    }
}
