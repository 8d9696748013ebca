use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;
use core::ops::Deref;

use ogs_utils::TypeIdMap;

use crate::info::{Type, TypeInfo, Typed};
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeMeta

/// Registered information about one type: its [`TypeInfo`] and a table of
/// [`TypeTrait`] capabilities.
///
/// Usually produced by [`GetTypeMeta`], which `#[derive(Reflect)]`
/// implements.
pub struct TypeMeta {
    type_info: &'static TypeInfo,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates a meta with an empty trait table.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self {
            type_info: T::type_info(),
            trait_table: TypeIdMap::new(),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub const fn ty(&self) -> &'static Type {
        self.type_info.ty()
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

    /// Inserts a capability, replacing one of the same type.
    #[inline]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.trait_table.insert(TypeId::of::<T>(), Box::new(data));
    }

    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .and_then(|data| <dyn TypeTrait>::downcast_ref(data.deref()))
    }

    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .and_then(|data| <dyn TypeTrait>::downcast_mut(&mut **data))
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains_type::<T>()
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = TypeIdMap::with_capacity(self.trait_len());
        for (id, data) in self.trait_table.iter() {
            trait_table.insert(*id, (**data).clone_type_trait());
        }
        Self {
            type_info: self.type_info,
            trait_table,
        }
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_path", &self.type_path())
            .field("kind", &self.type_info.variant_name())
            .field("traits", &self.trait_len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Produces the [`TypeMeta`] of a type and registers what it depends on.
pub trait GetTypeMeta: Typed {
    fn get_type_meta() -> TypeMeta;

    /// Registers types reachable from `Self`, such as member types and
    /// surrogate stand-ins.
    #[inline]
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
