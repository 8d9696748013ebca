use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Reflect;
use crate::impls::{GenericTypePathCell, concat};
use crate::info::{TypePath, Typed};

// -----------------------------------------------------------------------------
// Ref

/// A shared, mutable node of an object graph.
///
/// Two `Ref`s that point at the same allocation are the same object: the
/// serializer writes it once and encodes every later occurrence as a
/// back-reference, so shared and cyclic structure survives a round trip.
///
/// # Examples
///
/// ```
/// use ogs_reflect::graph::Ref;
///
/// let a = Ref::new(1_i32);
/// let b = a.clone();
/// *b.write() += 1;
///
/// assert_eq!(*a.read(), 2);
/// assert!(a.ptr_eq(&b));
/// assert!(!a.ptr_eq(&Ref::new(2_i32)));
/// ```
pub struct Ref<T: ?Sized>(Arc<RwLock<T>>);

/// A shared node whose concrete type is only known at runtime.
pub type DynRef = Ref<dyn Reflect>;

impl<T> Ref<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }
}

impl<T: Reflect> Ref<T> {
    /// Forgets the static type. The result is still the same object.
    #[inline]
    pub fn into_dyn(self) -> DynRef {
        let inner: Arc<RwLock<dyn Reflect>> = self.0;
        Ref(inner)
    }
}

impl<T: ?Sized> Ref<T> {
    /// Takes a read lock, ignoring poisoning.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock, ignoring poisoning.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point at the same object, whatever
    /// their static types.
    #[inline]
    pub fn ptr_eq<U: ?Sized>(&self, other: &Ref<U>) -> bool {
        self.address() == other.address()
    }

    /// Identity of the object: the address of the shared allocation.
    #[inline]
    pub fn address(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>().addr()
    }

    #[inline]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<T: ?Sized + Send + Sync + 'static> Ref<T> {
    // Holds the allocation so its address cannot be reused while a
    // serialization pass still remembers it.
    #[inline]
    pub(crate) fn keep_alive(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(self.clone())
    }
}

impl<T: ?Sized> Clone for Ref<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Ref<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({:#x})", self.address())
    }
}

impl<T: TypePath + ?Sized> TypePath for Ref<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["ogs_reflect::graph::Ref<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Ref<", T::type_name(), ">"]))
    }
}

// -----------------------------------------------------------------------------
// SharedObject

/// A decoded shared object, kept in both its typed and dynamic form.
///
/// The deserializer records every shared object it materializes. A later
/// back-reference may ask for either form: a `Ref<T>` slot needs the typed
/// handle, a polymorphic slot needs the [`DynRef`]. Both point at the same
/// allocation.
#[derive(Clone)]
pub struct SharedObject {
    typed: Arc<dyn Any + Send + Sync>,
    dynamic: DynRef,
    type_path: &'static str,
}

impl SharedObject {
    pub fn new<T: Typed>(handle: Ref<T>) -> Self {
        Self {
            typed: Arc::new(handle.clone()),
            dynamic: handle.into_dyn(),
            type_path: T::type_path(),
        }
    }

    /// The typed handle, if the object is a `T`.
    #[inline]
    pub fn typed<T: Reflect>(&self) -> Option<Ref<T>> {
        self.typed.downcast_ref::<Ref<T>>().cloned()
    }

    #[inline]
    pub fn dynamic(&self) -> &DynRef {
        &self.dynamic
    }

    #[inline]
    pub fn into_dynamic(self) -> DynRef {
        self.dynamic
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }
}

impl fmt::Debug for SharedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedObject")
            .field("type_path", &self.type_path)
            .field("handle", &self.dynamic)
            .finish()
    }
}
