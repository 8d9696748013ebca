use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::Reflect;
use crate::graph::{Ref, SharedObject};
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, TypeInfo, TypePath, Typed};
use crate::ops::List;
use crate::reflection::impl_reflect_methods;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitConstruct};
use crate::serial::{
    DeserializeDriver, FieldDescriptor, GraphValue, Header, RawKind, SerialError, SerializeDriver,
};

// -----------------------------------------------------------------------------
// Growable lists

macro_rules! impl_growable_list {
    ($ty:ident, $path:literal, $name:literal, $push:ident) => {
        impl<T: GraphValue> TypePath for $ty<T> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[$path, "<", T::type_path(), ">"]))
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[$name, "<", T::type_name(), ">"]))
            }
        }

        impl<T: GraphValue> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
            }
        }

        impl<T: GraphValue> Reflect for $ty<T> {
            impl_reflect_methods!();

            #[inline]
            fn as_list(&self) -> Option<&dyn List> {
                Some(self)
            }

            #[inline]
            fn as_list_mut(&mut self) -> Option<&mut dyn List> {
                Some(self)
            }
        }

        impl<T: GraphValue> List for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T>>::len(self)
            }

            fn encode_items(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
                for item in self.iter() {
                    item.encode(serializer)?;
                }
                Ok(())
            }

            fn decode_item(
                &mut self,
                index: usize,
                deserializer: &mut DeserializeDriver<'_>,
                item: &FieldDescriptor,
            ) -> Result<(), SerialError> {
                debug_assert_eq!(index, <$ty<T>>::len(self));
                self.$push(T::decode(deserializer, item)?);
                Ok(())
            }
        }

        impl<T: GraphValue> GetTypeMeta for $ty<T> {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait(<TypeTraitConstruct as FromType<Self>>::from_type());
                meta
            }

            #[inline]
            fn register_dependencies(registry: &mut TypeRegistry) {
                T::register_field_types(registry);
            }
        }

        impl<T: GraphValue> GraphValue for $ty<T> {
            const FIELD_KIND: RawKind = RawKind::Collection;

            #[inline]
            fn register_field_types(registry: &mut TypeRegistry) {
                registry.register::<Self>();
            }

            #[inline]
            fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
                serializer.write_owned(self)
            }

            #[inline]
            fn decode_complex(
                deserializer: &mut DeserializeDriver<'_>,
                header: Header,
            ) -> Result<Self, SerialError> {
                deserializer.read_owned(header)
            }
        }
    };
}

impl_growable_list!(Vec, "alloc::vec::Vec", "Vec", push);
impl_growable_list!(VecDeque, "alloc::collections::VecDeque", "VecDeque", push_back);

// -----------------------------------------------------------------------------
// Arrays

impl<T: GraphValue, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_path(), "; ", &N.to_string(), "]"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_name(), "; ", &N.to_string(), "]"]))
    }
}

impl<T: GraphValue + Default, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>().with_fixed_len(N)))
    }
}

impl<T: GraphValue + Default, const N: usize> Reflect for [T; N] {
    impl_reflect_methods!();

    #[inline]
    fn as_list(&self) -> Option<&dyn List> {
        Some(self)
    }

    #[inline]
    fn as_list_mut(&mut self) -> Option<&mut dyn List> {
        Some(self)
    }
}

impl<T: GraphValue + Default, const N: usize> List for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn encode_items(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        for item in self {
            item.encode(serializer)?;
        }
        Ok(())
    }

    fn decode_item(
        &mut self,
        index: usize,
        deserializer: &mut DeserializeDriver<'_>,
        item: &FieldDescriptor,
    ) -> Result<(), SerialError> {
        let value = T::decode(deserializer, item)?;
        let slot = self.get_mut(index).ok_or_else(|| {
            SerialError::mismatch(alloc::format!("at most {N} items"), alloc::format!("item {index}"))
        })?;
        *slot = value;
        Ok(())
    }
}

// `[T; N]` only implements `Default` up to 32 items.
fn default_array<T: Default, const N: usize>() -> [T; N] {
    core::array::from_fn(|_| T::default())
}

impl<T: GraphValue + Default, const N: usize> GetTypeMeta for [T; N] {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(TypeTraitConstruct::new(
            || SharedObject::new(Ref::new(default_array::<T, N>())),
            || Box::new(default_array::<T, N>()),
        ));
        meta
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_field_types(registry);
    }
}

impl<T: GraphValue + Default, const N: usize> GraphValue for [T; N] {
    const FIELD_KIND: RawKind = RawKind::Collection;

    #[inline]
    fn register_field_types(registry: &mut TypeRegistry) {
        registry.register::<Self>();
    }

    #[inline]
    fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        serializer.write_owned(self)
    }

    #[inline]
    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError> {
        deserializer.read_owned(header)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    use crate::info::{TypePath, Typed};
    use crate::serial::RawKind;

    #[test]
    fn list_paths() {
        assert_eq!(<Vec<u8>>::type_path(), "alloc::vec::Vec<u8>");
        assert_eq!(<VecDeque<Vec<i32>>>::type_name(), "VecDeque<Vec<i32>>");
        assert_eq!(<[u16; 4]>::type_path(), "[u16; 4]");
    }

    #[test]
    fn array_info_is_fixed() {
        let info = <[bool; 3]>::type_info().as_list().unwrap();
        assert_eq!(info.fixed_len(), Some(3));
        assert_eq!(info.item_kind(), RawKind::Bool);
        assert_eq!(<Vec<bool>>::type_info().as_list().unwrap().fixed_len(), None);
    }
}
