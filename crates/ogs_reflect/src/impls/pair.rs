use crate::Reflect;
use crate::__macro_exports::{downcast_mut, downcast_ref};
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{FieldInfo, OpaqueInfo, StructInfo, TypeInfo, TypePath, Typed};
use crate::reflection::impl_reflect_methods;
use crate::registry::{
    FromType, GetTypeMeta, Surrogate, TypeMeta, TypeRegistry, TypeTraitConstruct,
    TypeTraitSurrogate,
};
use crate::serial::{DeserializeDriver, GraphValue, Header, RawKind, SerialError, SerializeDriver};

// -----------------------------------------------------------------------------
// KeyValue

/// The stand-in a `(K, V)` pair is written as: an object with a `key` and a
/// `value` member.
///
/// Maps are lists of these pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValue<K, V> {
    pub key: K,
    pub value: V,
}

impl<K: GraphValue, V: GraphValue> TypePath for KeyValue<K, V> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&["ogs_reflect::impls::KeyValue<", K::type_path(), ", ", V::type_path(), ">"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["KeyValue<", K::type_name(), ", ", V::type_name(), ">"]))
    }
}

impl<K: GraphValue, V: GraphValue> Typed for KeyValue<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let fields = [
                FieldInfo::new::<K>(
                    "key",
                    |owner, serializer| downcast_ref::<Self>(owner)?.key.encode(serializer),
                    |owner, deserializer, wire| {
                        let key = K::decode(deserializer, wire)?;
                        downcast_mut::<Self>(owner)?.key = key;
                        Ok(())
                    },
                ),
                FieldInfo::new::<V>(
                    "value",
                    |owner, serializer| downcast_ref::<Self>(owner)?.value.encode(serializer),
                    |owner, deserializer, wire| {
                        let value = V::decode(deserializer, wire)?;
                        downcast_mut::<Self>(owner)?.value = value;
                        Ok(())
                    },
                ),
            ];
            TypeInfo::Struct(StructInfo::new::<Self>(&fields).with_by_value(true))
        })
    }
}

impl<K: GraphValue, V: GraphValue> Reflect for KeyValue<K, V> {
    impl_reflect_methods!();
}

impl<K: GraphValue + Default, V: GraphValue + Default> GetTypeMeta for KeyValue<K, V> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<TypeTraitConstruct as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        K::register_field_types(registry);
        V::register_field_types(registry);
    }
}

// -----------------------------------------------------------------------------
// (K, V)

impl<K: GraphValue, V: GraphValue> TypePath for (K, V) {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["(", K::type_path(), ", ", V::type_path(), ")"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["(", K::type_name(), ", ", V::type_name(), ")"]))
    }
}

impl<K: GraphValue + Clone + Default, V: GraphValue + Clone + Default> Typed for (K, V) {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

impl<K: GraphValue + Clone + Default, V: GraphValue + Clone + Default> Reflect for (K, V) {
    impl_reflect_methods!();
}

impl<K: GraphValue + Clone + Default, V: GraphValue + Clone + Default> Surrogate for (K, V) {
    type Simple = KeyValue<K, V>;

    const BY_VALUE: bool = true;

    #[inline]
    fn simplify(&self) -> KeyValue<K, V> {
        KeyValue {
            key: self.0.clone(),
            value: self.1.clone(),
        }
    }

    #[inline]
    fn restore(simple: KeyValue<K, V>) -> Self {
        (simple.key, simple.value)
    }
}

impl<K: GraphValue + Clone + Default, V: GraphValue + Clone + Default> GetTypeMeta for (K, V) {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<TypeTraitConstruct as FromType<Self>>::from_type());
        meta.insert_trait(<TypeTraitSurrogate as FromType<Self>>::from_type());
        meta
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<KeyValue<K, V>>();
    }
}

impl<K: GraphValue + Clone + Default, V: GraphValue + Clone + Default> GraphValue for (K, V) {
    const FIELD_KIND: RawKind = RawKind::Object;

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
    use alloc::string::String;

    use crate::graph::Ref;
    use crate::info::TypePath;
    use crate::registry::{TypeRegistry, TypeTraitSurrogate};
    use crate::serial::describe;

    use super::KeyValue;

    #[test]
    fn pairs_describe_through_their_surrogate() {
        let mut registry = TypeRegistry::new();
        registry.register::<(String, Ref<u8>)>();
        assert!(registry.contains(core::any::TypeId::of::<KeyValue<String, Ref<u8>>>()));

        let surrogate = registry
            .get_type_trait::<TypeTraitSurrogate>(core::any::TypeId::of::<(String, Ref<u8>)>())
            .unwrap();
        assert!(surrogate.is_by_value());

        let info = <(String, Ref<u8>) as crate::info::Typed>::type_info();
        let descriptor = describe(info, &registry).unwrap();
        assert_eq!(descriptor.name(), <(String, Ref<u8>)>::type_path());
        assert!(descriptor.is_by_value());
        assert_eq!(descriptor.fields().len(), 2);
        assert_eq!(descriptor.fields()[0].name(), "key");
    }
}
