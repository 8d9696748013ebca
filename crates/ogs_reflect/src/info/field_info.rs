use core::fmt;

use crate::Reflect;
use crate::info::TypeInfo;
use crate::serial::{DeserializeDriver, FieldDescriptor, GraphValue, RawKind, SerialError, SerializeDriver};

/// Writes one member of the reflected owner.
pub type EncodeFieldFn = fn(&dyn Reflect, &mut SerializeDriver<'_>) -> Result<(), SerialError>;

/// Reads one member into the reflected owner.
///
/// The [`FieldDescriptor`] is the one found on the wire, which carries the
/// nested descriptor of inline members.
pub type DecodeFieldFn =
    fn(&mut dyn Reflect, &mut DeserializeDriver<'_>, &FieldDescriptor) -> Result<(), SerialError>;

// -----------------------------------------------------------------------------
// FieldInfo

/// A named member of a [`StructInfo`](crate::info::StructInfo).
///
/// Besides the static shape, a field stores the two accessors that move its
/// value between the owner and the stream. `#[derive(Reflect)]` generates
/// them as non-capturing closures.
#[derive(Clone, Copy)]
pub struct FieldInfo {
    name: &'static str,
    kind: RawKind,
    type_path: fn() -> &'static str,
    inline_info: fn() -> Option<&'static TypeInfo>,
    encode: EncodeFieldFn,
    decode: DecodeFieldFn,
}

impl FieldInfo {
    /// Creates a field of type `F`.
    #[inline]
    pub fn new<F: GraphValue>(
        name: &'static str,
        encode: EncodeFieldFn,
        decode: DecodeFieldFn,
    ) -> Self {
        Self {
            name,
            kind: F::FIELD_KIND,
            type_path: F::type_path,
            inline_info: F::inline_info,
            encode,
            decode,
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn kind(&self) -> RawKind {
        self.kind
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        (self.type_path)()
    }

    /// The static layout of an [`Inline`](RawKind::Inline) member.
    #[inline]
    pub fn inline_info(&self) -> Option<&'static TypeInfo> {
        (self.inline_info)()
    }

    #[inline(always)]
    pub const fn encode_fn(&self) -> EncodeFieldFn {
        self.encode
    }

    #[inline(always)]
    pub const fn decode_fn(&self) -> DecodeFieldFn {
        self.decode
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type_path", &self.type_path())
            .finish_non_exhaustive()
    }
}
