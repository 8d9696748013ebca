use alloc::string::String;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ogs_codec::chrono::{DateTime, Utc};
use ogs_codec::rust_decimal::Decimal;
use ogs_utils::TypeIdMap;
use ogs_utils::hash::HashMap;
use uuid::Uuid;

use crate::info::TypeInfo;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// TypeRegistry

/// Registered types, looked up by [`TypeId`] or type path.
///
/// The deserializer binds a schema it reads from a stream to a local type
/// through [`get_with_type_path`](Self::get_with_type_path) whenever the
/// static target is polymorphic.
///
/// # Examples
///
/// ```
/// use ogs_reflect::{Reflect, registry::TypeRegistry};
///
/// #[derive(Reflect, Default)]
/// #[reflect(type_path = "demo::Point")]
/// struct Point {
///     x: i32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
///
/// assert!(registry.contains(core::any::TypeId::of::<Point>()));
/// assert!(registry.get_with_type_path("demo::Point").is_some());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    auto_registered: bool,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any registrations.
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            auto_registered: false,
        }
    }

    /// Creates a registry with the primitive types registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<i8>();
        registry.register::<u8>();
        registry.register::<i16>();
        registry.register::<u16>();
        registry.register::<i32>();
        registry.register::<u32>();
        registry.register::<i64>();
        registry.register::<u64>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<Decimal>();
        registry.register::<DateTime<Utc>>();
        registry.register::<Uuid>();
        registry.register::<String>();
        registry
    }

    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
    ) {
        let ty = type_meta.ty();
        if let Some(previous) = type_path_to_id.insert(ty.path(), ty.id())
            && previous != ty.id()
        {
            log::warn!(
                "type path `{}` is claimed by two types, the later registration wins",
                ty.path()
            );
        }
    }

    // Returns `false` and does nothing if `type_id` is present.
    fn register_internal(&mut self, type_id: TypeId, get_type_meta: fn() -> TypeMeta) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
            );
            meta
        })
    }

    /// Registers `T` and, the first time only, its dependencies.
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            log::trace!("registered `{}`", T::type_path());
            T::register_dependencies(self);
        }
    }

    /// Inserts `type_meta` unless its type is already present.
    ///
    /// Dependencies are not registered.
    pub fn try_add_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        let type_id = type_meta.type_id();
        self.type_meta_table.try_insert(type_id, || {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
            );
            type_meta
        })
    }

    /// Adds capability `D` to `T`, registering `T` first if needed.
    pub fn register_type_trait<T: GetTypeMeta, D: TypeTrait + FromType<T>>(&mut self) {
        self.register::<T>();
        if let Some(meta) = self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            meta.insert_trait(D::from_type());
        }
    }

    /// Registers every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Returns `false` when the platform does not support link-time
    /// collection, in which case nothing was registered and types have to
    /// be registered by hand. Repeated calls are cheap.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        if !self.auto_registered {
            crate::__macro_exports::auto_register::register_types(self);
        }
        self.auto_registered
    }

    #[cfg(feature = "auto_register")]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Looks a type up by its full [type path](crate::info::TypePath::type_path).
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    #[inline]
    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.get(type_id).map(TypeMeta::type_info)
    }

    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        self.get(type_id).and_then(TypeMeta::get_trait::<T>)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    /// Iterates over every [`TypeMeta`] in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.type_path_to_id.keys())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared [`TypeRegistry`] behind a lock.
///
/// Cloning is cheap and every clone sees the same registrations.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock, ignoring poisoning.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock, ignoring poisoning.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<TypeRegistry> for TypeRegistryArc {
    #[inline]
    fn from(registry: TypeRegistry) -> Self {
        Self::new(registry)
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::registry::TypeTraitConstruct;
    use core::any::TypeId;

    #[cfg(feature = "auto_register")]
    #[derive(crate::Reflect, Default)]
    #[reflect(type_path = "auto::Listed", auto_register)]
    struct Listed {
        n: u8,
    }

    #[cfg(feature = "auto_register")]
    crate::derive::impl_auto_register!(Vec<Listed>);

    #[test]
    fn primitives_are_preregistered() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<String>()));
        assert_eq!(
            registry.get_with_type_path("i32").map(|meta| meta.type_id()),
            Some(TypeId::of::<i32>())
        );
        assert!(
            registry
                .get_type_trait::<TypeTraitConstruct>(TypeId::of::<u64>())
                .is_some()
        );
        assert!(TypeRegistry::empty().is_empty());
    }

    #[test]
    fn collections_register_their_items() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Vec<Vec<u8>>>();
        assert!(registry.contains(TypeId::of::<Vec<u8>>()));
        assert!(
            registry
                .get_with_type_path("alloc::vec::Vec<alloc::vec::Vec<u8>>")
                .is_some()
        );
    }

    #[test]
    fn later_path_claim_wins() {
        mod a {
            #[derive(crate::Reflect, Default)]
            #[reflect(type_path = "shared::Clash")]
            pub struct Clash;
        }
        mod b {
            #[derive(crate::Reflect, Default)]
            #[reflect(type_path = "shared::Clash")]
            pub struct Clash;
        }

        let mut registry = TypeRegistry::empty();
        registry.register::<a::Clash>();
        registry.register::<b::Clash>();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get_with_type_path("shared::Clash").map(|meta| meta.type_id()),
            Some(TypeId::of::<b::Clash>())
        );
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn link_time_registration() {
        let mut registry = TypeRegistry::empty();
        if registry.auto_register() {
            assert!(registry.contains(TypeId::of::<Listed>()));
            assert!(registry.contains(TypeId::of::<Vec<Listed>>()));
            assert!(registry.get_with_type_path("auto::Listed").is_some());
            let len = registry.len();
            assert!(registry.auto_register());
            assert_eq!(registry.len(), len);
        }
    }
}
