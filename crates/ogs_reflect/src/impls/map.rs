use alloc::collections::BTreeMap;
use core::hash::Hash;
use std::collections::HashMap;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, TypeInfo, TypePath, Typed};
use crate::ops::List;
use crate::reflection::impl_reflect_methods;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitConstruct};
use crate::serial::{
    DeserializeDriver, FieldDescriptor, GraphValue, Header, RawKind, SerialError, SerializeDriver,
};

// Maps are lists of `(K, V)` items. Each pair is cloned out to be written
// through its surrogate; a repeated key on the wire keeps the last value.
macro_rules! impl_map {
    ($ty:ident, $path:literal, $name:literal, $($key_bound:path),+) => {
        impl<K, V> TypePath for $ty<K, V>
        where
            K: GraphValue $(+ $key_bound)+,
            V: GraphValue,
        {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$path, "<", K::type_path(), ", ", V::type_path(), ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$name, "<", K::type_name(), ", ", V::type_name(), ">"])
                })
            }
        }

        impl<K, V> Typed for $ty<K, V>
        where
            K: GraphValue + Clone + Default $(+ $key_bound)+,
            V: GraphValue + Clone + Default,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, (K, V)>()))
            }
        }

        impl<K, V> Reflect for $ty<K, V>
        where
            K: GraphValue + Clone + Default $(+ $key_bound)+,
            V: GraphValue + Clone + Default,
        {
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

        impl<K, V> List for $ty<K, V>
        where
            K: GraphValue + Clone + Default $(+ $key_bound)+,
            V: GraphValue + Clone + Default,
        {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V>>::len(self)
            }

            fn encode_items(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
                for (key, value) in self.iter() {
                    (key.clone(), value.clone()).encode(serializer)?;
                }
                Ok(())
            }

            fn decode_item(
                &mut self,
                _index: usize,
                deserializer: &mut DeserializeDriver<'_>,
                item: &FieldDescriptor,
            ) -> Result<(), SerialError> {
                let (key, value) = <(K, V)>::decode(deserializer, item)?;
                self.insert(key, value);
                Ok(())
            }
        }

        impl<K, V> GetTypeMeta for $ty<K, V>
        where
            K: GraphValue + Clone + Default $(+ $key_bound)+,
            V: GraphValue + Clone + Default,
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait(<TypeTraitConstruct as FromType<Self>>::from_type());
                meta
            }

            #[inline]
            fn register_dependencies(registry: &mut TypeRegistry) {
                <(K, V)>::register_field_types(registry);
            }
        }

        impl<K, V> GraphValue for $ty<K, V>
        where
            K: GraphValue + Clone + Default $(+ $key_bound)+,
            V: GraphValue + Clone + Default,
        {
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

impl_map!(BTreeMap, "alloc::collections::BTreeMap", "BTreeMap", Ord);
impl_map!(HashMap, "std::collections::HashMap", "HashMap", Eq, Hash);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use std::collections::HashMap;

    use crate::impls::KeyValue;
    use crate::info::{TypePath, Typed};
    use crate::registry::TypeRegistry;
    use crate::serial::RawKind;

    #[test]
    fn maps_are_lists_of_pairs() {
        let info = <BTreeMap<String, i32>>::type_info().as_list().unwrap();
        assert_eq!(info.item_kind(), RawKind::Object);
        assert_eq!(info.item().path(), "(alloc::string::String, i32)");
        assert_eq!(<HashMap<u8, bool>>::type_name(), "HashMap<u8, bool>");
    }

    #[test]
    fn registering_a_map_registers_its_pair() {
        let mut registry = TypeRegistry::empty();
        registry.register::<HashMap<u8, String>>();
        assert!(registry.contains(core::any::TypeId::of::<(u8, String)>()));
        assert!(registry.contains(core::any::TypeId::of::<KeyValue<u8, String>>()));
        assert!(registry.contains(core::any::TypeId::of::<String>()));
    }
}
