use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
use crate::reflection::impl_reflect_methods;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitConstruct};
use crate::serial::{DeserializeDriver, GraphValue, Header, RawKind, SerialError, SerializeDriver};

impl TypePath for () {
    #[inline]
    fn type_path() -> &'static str {
        "()"
    }

    #[inline]
    fn type_name() -> &'static str {
        "()"
    }
}

/// `()` carries no data and has no descriptor. It can be registered and
/// reflected, but encoding it fails with
/// [`UnsupportedTypeKind`](SerialError::UnsupportedTypeKind).
impl Typed for () {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

impl Reflect for () {
    impl_reflect_methods!();
}

impl GetTypeMeta for () {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<TypeTraitConstruct as FromType<Self>>::from_type());
        meta
    }
}

impl GraphValue for () {
    const FIELD_KIND: RawKind = RawKind::Object;

    #[inline]
    fn register_field_types(registry: &mut TypeRegistry) {
        registry.register::<Self>();
    }

    fn encode_complex(&self, _serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        Err(SerialError::unsupported(Self::type_path(), "the unit type has no schema"))
    }

    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError> {
        deserializer.read_owned(header)
    }
}
