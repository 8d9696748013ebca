use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::graph::{ExtraFields, Value};
use crate::info::{TypeInfo, TypePath};
use crate::ops::List;

// -----------------------------------------------------------------------------
// Reflect

/// Dynamic access to a value the serializer can walk.
///
/// Implemented by `#[derive(Reflect)]` and by this crate for primitives and
/// the standard collections. Types that are reachable from several places
/// in a graph live behind a [`Ref`](crate::graph::Ref); the trait itself is
/// only concerned with one value.
pub trait Reflect: Any + Send + Sync {
    /// The static layout of the concrete type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;

    /// List operations, for types whose info is [`TypeInfo::List`].
    #[inline]
    fn as_list(&self) -> Option<&dyn List> {
        None
    }

    #[inline]
    fn as_list_mut(&mut self) -> Option<&mut dyn List> {
        None
    }

    /// The slot that keeps members this type does not declare.
    #[inline]
    fn extra_fields(&self) -> Option<&ExtraFields> {
        None
    }

    #[inline]
    fn extra_fields_mut(&mut self) -> Option<&mut ExtraFields> {
        None
    }

    /// Copies a primitive out as a [`Value`].
    ///
    /// A primitive reached through a shared or polymorphic slot is boxed
    /// instead of being described.
    #[inline]
    fn to_primitive(&self) -> Option<Value> {
        None
    }
}

impl dyn Reflect {
    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().type_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Takes ownership of the concrete value, or `None` on a type mismatch.
    #[inline]
    pub fn take<T: Reflect>(self: Box<Self>) -> Option<T> {
        self.into_any().downcast().ok().map(|value| *value)
    }

    #[inline]
    pub fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl TypePath for dyn Reflect {
    #[inline]
    fn type_path() -> &'static str {
        "dyn ogs_reflect::Reflect"
    }

    #[inline]
    fn type_name() -> &'static str {
        "dyn Reflect"
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_path())
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Expands to the boilerplate methods of [`Reflect`] inside an impl block.
macro_rules! impl_reflect_methods {
    () => {
        #[inline]
        fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
            <Self as $crate::info::Typed>::type_info()
        }

        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(
            self: ::alloc::boxed::Box<Self>,
        ) -> ::alloc::boxed::Box<dyn ::core::any::Any> {
            self
        }

        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        #[inline]
        fn into_reflect(
            self: ::alloc::boxed::Box<Self>,
        ) -> ::alloc::boxed::Box<dyn $crate::Reflect> {
            self
        }
    };
}

pub(crate) use impl_reflect_methods;
