use alloc::boxed::Box;
use alloc::string::String;

use ogs_codec::chrono::{DateTime, Utc};
use ogs_codec::rust_decimal::Decimal;
use ogs_codec::{CodecError, DocumentReader, DocumentWriter};
use uuid::Uuid;

use crate::Reflect;
use crate::graph::{DynRef, Ref};
use crate::serial::{RawKind, for_each_primitive};

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed slot: a primitive, an object handle or null.
///
/// Used for members whose static type is not known: polymorphic fields,
/// [`DynamicObject`](crate::graph::DynamicObject) members and
/// [`ExtraFields`](crate::graph::ExtraFields) entries.
///
/// # Examples
///
/// ```
/// use ogs_reflect::graph::Value;
/// use ogs_reflect::serial::RawKind;
///
/// let value = Value::from(7_i32);
/// assert_eq!(value.kind(), Some(RawKind::I32));
/// assert_eq!(value, Value::I32(7));
/// assert!(Value::Null.is_null());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
    String(String),
    Object(DynRef),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&DynRef> {
        match self {
            Self::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// Name of the held kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "null",
        }
    }
}

macro_rules! impl_value_primitives {
    ($($ty:ty => $kind:ident, $path:literal, $write:ident($($deref:tt)?), $read:ident;)*) => {
        impl Value {
            /// The wire kind of the held value. `None` for null.
            pub const fn kind(&self) -> Option<RawKind> {
                match self {
                    Self::Null => None,
                    Self::Object(_) => Some(RawKind::Object),
                    $(Self::$kind(_) => Some(RawKind::$kind),)*
                }
            }

            // Writes the raw payload of a primitive. Returns `false` for
            // null and objects, which have no raw payload.
            pub(crate) fn write_primitive(
                &self,
                writer: &mut (impl DocumentWriter + ?Sized),
            ) -> Result<bool, CodecError> {
                match self {
                    $(Self::$kind(value) => writer.$write($($deref)? value)?,)*
                    Self::Null | Self::Object(_) => return Ok(false),
                }
                Ok(true)
            }

            // Reads the raw payload of `kind`. `None` if `kind` is not a
            // primitive.
            pub(crate) fn read_primitive(
                kind: RawKind,
                reader: &mut (impl DocumentReader + ?Sized),
            ) -> Result<Option<Self>, CodecError> {
                Ok(Some(match kind {
                    $(RawKind::$kind => Self::$kind(reader.$read()?),)*
                    RawKind::Object | RawKind::Collection | RawKind::Inline => return Ok(None),
                }))
            }

            /// Moves a primitive into a box of its concrete type.
            pub fn into_reflect(self) -> Option<Box<dyn Reflect>> {
                match self {
                    $(Self::$kind(value) => Some(Box::new(value)),)*
                    Self::Null | Self::Object(_) => None,
                }
            }

            /// Turns the value into a shared handle. Primitives get a fresh
            /// handle of their own.
            pub fn into_dyn_ref(self) -> Option<DynRef> {
                match self {
                    $(Self::$kind(value) => Some(Ref::new(value).into_dyn()),)*
                    Self::Object(handle) => Some(handle),
                    Self::Null => None,
                }
            }
        }

        impl PartialEq for Value {
            fn eq(&self, other: &Self) -> bool {
                match (self, other) {
                    (Self::Null, Self::Null) => true,
                    (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
                    $((Self::$kind(a), Self::$kind(b)) => a == b,)*
                    _ => false,
                }
            }
        }

        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$kind(value)
                }
            }
        )*
    };
}

for_each_primitive!(impl_value_primitives);

impl From<DynRef> for Value {
    #[inline]
    fn from(handle: DynRef) -> Self {
        Self::Object(handle)
    }
}

impl<T: Reflect> From<Ref<T>> for Value {
    #[inline]
    fn from(handle: Ref<T>) -> Self {
        Self::Object(handle.into_dyn())
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
