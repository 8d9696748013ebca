use alloc::boxed::Box;

use crate::Reflect;
use crate::graph::{Ref, SharedObject};
use crate::info::Typed;
use crate::registry::FromType;

/// Makes the default instance a decoded value starts from.
///
/// Decoding needs two shapes: a shared handle that can be registered for
/// back-references before its members are read, and a plain box for values
/// held inline or by value.
#[derive(Clone, Copy)]
pub struct TypeTraitConstruct {
    shared: fn() -> SharedObject,
    boxed: fn() -> Box<dyn Reflect>,
}

impl TypeTraitConstruct {
    #[inline]
    pub const fn new(shared: fn() -> SharedObject, boxed: fn() -> Box<dyn Reflect>) -> Self {
        Self { shared, boxed }
    }

    /// A new default instance behind a fresh handle.
    #[inline]
    pub fn shared(&self) -> SharedObject {
        (self.shared)()
    }

    /// A new default instance.
    #[inline]
    pub fn boxed(&self) -> Box<dyn Reflect> {
        (self.boxed)()
    }
}

impl<T: Typed + Default> FromType<T> for TypeTraitConstruct {
    fn from_type() -> Self {
        Self {
            shared: || SharedObject::new(Ref::new(T::default())),
            boxed: || Box::new(T::default()),
        }
    }
}
