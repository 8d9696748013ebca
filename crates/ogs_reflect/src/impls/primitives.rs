use alloc::string::String;

use ogs_codec::chrono::{DateTime, Utc};
use ogs_codec::rust_decimal::Decimal;
use uuid::Uuid;

use crate::Reflect;
use crate::graph::Value;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{PrimitiveInfo, TypeInfo, TypePath, Typed};
use crate::reflection::impl_reflect_methods;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitConstruct};
use crate::serial::{
    DeserializeDriver, FieldDescriptor, GraphValue, Header, RawKind, SerialError, SerializeDriver,
    for_each_primitive,
};

// `alloc::string::String` is `String`, `chrono::DateTime<chrono::Utc>` is
// `DateTime<Utc>`.
fn short_name(path: &'static str) -> &'static str {
    match path {
        "chrono::DateTime<chrono::Utc>" => "DateTime<Utc>",
        _ => path.rsplit("::").next().unwrap_or(path),
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident, $path:literal, $write:ident($($deref:tt)?), $read:ident;)*) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                short_name($path)
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Primitive(PrimitiveInfo::new::<Self>(RawKind::$kind)))
            }
        }

        impl Reflect for $ty {
            impl_reflect_methods!();

            #[inline]
            fn to_primitive(&self) -> Option<Value> {
                Some(Value::$kind(<$ty as Clone>::clone(self)))
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait(<TypeTraitConstruct as FromType<Self>>::from_type());
                meta
            }
        }

        impl GraphValue for $ty {
            const FIELD_KIND: RawKind = RawKind::$kind;

            #[inline]
            fn register_field_types(registry: &mut TypeRegistry) {
                registry.register::<Self>();
            }

            #[inline]
            fn encode(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
                serializer.writer().$write($($deref)? self)?;
                Ok(())
            }

            #[inline]
            fn decode(
                deserializer: &mut DeserializeDriver<'_>,
                _field: &FieldDescriptor,
            ) -> Result<Self, SerialError> {
                Ok(deserializer.reader().$read()?)
            }

            fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
                serializer.begin_boxed(RawKind::$kind)?;
                self.encode(serializer)
            }

            fn decode_complex(
                deserializer: &mut DeserializeDriver<'_>,
                header: Header,
            ) -> Result<Self, SerialError> {
                match header {
                    Header::Null => Ok(<$ty>::default()),
                    Header::Boxing => match deserializer.read_boxed()? {
                        Value::$kind(value) => Ok(value),
                        other => Err(SerialError::mismatch($path, other.kind_name())),
                    },
                    other => Err(SerialError::mismatch($path, other.name())),
                }
            }
        }
    )*};
}

for_each_primitive!(impl_primitive);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use ogs_codec::chrono::{DateTime, Utc};

    use crate::graph::Value;
    use crate::info::{TypePath, Typed};
    use crate::serial::RawKind;

    #[test]
    fn names_and_kinds() {
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(String::type_name(), "String");
        assert_eq!(<DateTime<Utc>>::type_name(), "DateTime<Utc>");
        assert_eq!(u16::type_name(), "u16");

        let info = i64::type_info();
        assert!(matches!(info, crate::info::TypeInfo::Primitive(p) if p.kind() == RawKind::I64));
    }

    #[test]
    fn primitives_copy_out() {
        let value: &dyn crate::Reflect = &'x';
        assert_eq!(value.to_primitive(), Some(Value::Char('x')));
    }
}
