//! Items used by the code `#[derive(Reflect)]` expands to. Not public API.

use crate::Reflect;
use crate::info::Typed;
use crate::serial::SerialError;

pub use alloc::boxed::Box;

/// Views a member owner as `T`.
#[inline]
pub fn downcast_ref<T: Typed>(owner: &dyn Reflect) -> Result<&T, SerialError> {
    owner
        .downcast_ref::<T>()
        .ok_or_else(|| SerialError::mismatch(T::type_path(), owner.reflect_type_path()))
}

#[inline]
pub fn downcast_mut<T: Typed>(owner: &mut dyn Reflect) -> Result<&mut T, SerialError> {
    let found = owner.reflect_type_path();
    owner
        .downcast_mut::<T>()
        .ok_or_else(|| SerialError::mismatch(T::type_path(), found))
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::registry::{GetTypeMeta, TypeRegistry};

    pub use inventory;

    /// One link-time registration.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    // Runs with every other entry; if the platform drops link-time
    // sections, it never runs and the registry stays unmarked.
    inventory::submit! {
        __AutoRegisterFunc(TypeRegistry::mark_auto_registered)
    }

    pub(crate) fn register_types(registry: &mut TypeRegistry) {
        let mut count = 0_usize;
        for entry in inventory::iter::<__AutoRegisterFunc> {
            (entry.0)(registry);
            count += 1;
        }
        log::debug!("auto registration ran {count} entries");
    }
}
