use crate::Reflect;
use crate::graph::{DynRef, Ref, Value};
use crate::impls::{GenericTypePathCell, concat};
use crate::info::{TypeInfo, TypePath};
use crate::registry::{GetTypeMeta, TypeRegistry};
use crate::serial::{
    DeserializeDriver, FieldDescriptor, Header, RawKind, SerialError, SerializeDriver,
};

// -----------------------------------------------------------------------------
// GraphValue

/// A type that can sit in a member slot, a list item or the root of a
/// stream.
///
/// Every value has two forms:
///
/// - the *field* form, chosen by [`FIELD_KIND`](GraphValue::FIELD_KIND):
///   primitives are written raw, inline structs as bare members, and
///   everything else with a [`Header`];
/// - the *complex* form, used in object position (the root, `Option`
///   contents, polymorphic slots), which always starts with a header.
///
/// For object-kind types the two coincide.
pub trait GraphValue: TypePath + Sized + Send + Sync + 'static {
    const FIELD_KIND: RawKind;

    /// Whether the complex form has a null of its own.
    const NULLABLE: bool = false;

    /// The layout written in place of an [`Inline`](RawKind::Inline) member.
    #[inline]
    fn inline_info() -> Option<&'static TypeInfo> {
        None
    }

    /// Registers the types this value can materialize.
    #[inline]
    fn register_field_types(_registry: &mut TypeRegistry) {}

    fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError>;

    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError>;

    #[inline]
    fn encode(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        self.encode_complex(serializer)
    }

    /// Reads the field form. `field` is the member as found on the wire.
    #[inline]
    fn decode(
        deserializer: &mut DeserializeDriver<'_>,
        field: &FieldDescriptor,
    ) -> Result<Self, SerialError> {
        let _ = field;
        let header = deserializer.read_header()?;
        Self::decode_complex(deserializer, header)
    }
}

// -----------------------------------------------------------------------------
// Option

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }
}

/// `None` is written as a null header. Contents are always in their complex
/// form, so `Option<i32>` is a boxed primitive.
///
/// The contents must not be nullable themselves: `Some(None)` and
/// `Some(Value::Null)` would share `None`'s encoding, so `Option<Option<_>>`
/// and `Option<Value>` fail with
/// [`UnsupportedTypeKind`](SerialError::UnsupportedTypeKind).
impl<T: GraphValue> GraphValue for Option<T> {
    const FIELD_KIND: RawKind = RawKind::Object;
    const NULLABLE: bool = true;

    #[inline]
    fn register_field_types(registry: &mut TypeRegistry) {
        T::register_field_types(registry);
    }

    fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        reject_nested_null::<T>()?;
        match self {
            Some(value) => value.encode_complex(serializer),
            None => serializer.write_null(),
        }
    }

    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError> {
        reject_nested_null::<T>()?;
        match header {
            Header::Null => Ok(None),
            header => T::decode_complex(deserializer, header).map(Some),
        }
    }
}

#[inline]
fn reject_nested_null<T: GraphValue>() -> Result<(), SerialError> {
    if T::NULLABLE {
        return Err(SerialError::unsupported(
            Option::<T>::type_path(),
            "the contents have a null of their own",
        ));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Ref

impl<T: GetTypeMeta> GraphValue for Ref<T> {
    const FIELD_KIND: RawKind = RawKind::Object;

    #[inline]
    fn register_field_types(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }

    #[inline]
    fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        serializer.write_shared(self)
    }

    #[inline]
    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError> {
        deserializer.read_shared(header)
    }
}

/// A non-null polymorphic handle. Use `Option<DynRef>` for nullable slots.
impl GraphValue for Ref<dyn Reflect> {
    const FIELD_KIND: RawKind = RawKind::Object;

    #[inline]
    fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        serializer.write_shared(self)
    }

    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError> {
        deserializer
            .read_dyn(header)?
            .ok_or_else(|| SerialError::mismatch(DynRef::type_path(), Header::Null.name()))
    }
}

// -----------------------------------------------------------------------------
// Value

impl TypePath for Value {
    #[inline]
    fn type_path() -> &'static str {
        "ogs_reflect::graph::Value"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Value"
    }
}

impl GraphValue for Value {
    const FIELD_KIND: RawKind = RawKind::Object;
    const NULLABLE: bool = true;

    #[inline]
    fn encode_complex(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError> {
        serializer.write_dynamic(self)
    }

    #[inline]
    fn decode_complex(
        deserializer: &mut DeserializeDriver<'_>,
        header: Header,
    ) -> Result<Self, SerialError> {
        deserializer.read_dynamic(header)
    }
}
