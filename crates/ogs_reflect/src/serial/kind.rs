// -----------------------------------------------------------------------------
// RawKind

/// Wire classification of a member or a boxed value.
///
/// The byte values are part of the format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    /// An object or a polymorphic slot. The payload starts with a [`Header`].
    Object = 0,
    Bool = 1,
    Char = 2,
    I8 = 3,
    U8 = 4,
    I16 = 5,
    U16 = 6,
    I32 = 7,
    U32 = 8,
    I64 = 9,
    U64 = 10,
    F32 = 11,
    F64 = 12,
    Decimal = 13,
    DateTime = 14,
    Uuid = 15,
    String = 16,
    /// A list. Behaves like [`Object`](RawKind::Object) in member position.
    Collection = 17,
    /// A struct embedded without header or identity. The member carries the
    /// nested descriptor.
    Inline = 18,
}

impl RawKind {
    const ALL: [RawKind; 19] = [
        Self::Object,
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Decimal,
        Self::DateTime,
        Self::Uuid,
        Self::String,
        Self::Collection,
        Self::Inline,
    ];

    #[inline(always)]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if (byte as usize) < Self::ALL.len() {
            Some(Self::ALL[byte as usize])
        } else {
            None
        }
    }

    /// Kinds written raw by the codec.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Object | Self::Collection | Self::Inline)
    }

    /// Kinds whose member payload starts with a [`Header`].
    #[inline]
    pub const fn has_header(self) -> bool {
        matches!(self, Self::Object | Self::Collection)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::DateTime => "date-time",
            Self::Uuid => "uuid",
            Self::String => "string",
            Self::Collection => "collection",
            Self::Inline => "inline",
        }
    }
}

// -----------------------------------------------------------------------------
// Header

/// First byte of every object-kind payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// Nothing follows.
    Null = 0,
    /// A descriptor reference, then the members.
    Value = 1,
    /// An `i32` index into the objects visited so far.
    Reference = 2,
    /// A primitive kind byte, then the raw payload.
    Boxing = 3,
}

impl Header {
    #[inline(always)]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Null),
            1 => Some(Self::Value),
            2 => Some(Self::Reference),
            3 => Some(Self::Boxing),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Value => "value",
            Self::Reference => "back-reference",
            Self::Boxing => "boxed primitive",
        }
    }
}

// -----------------------------------------------------------------------------
// Primitive table

/// Invokes `$m` with one line per primitive:
/// `type => kind, type path, writer method(deref), reader method;`
macro_rules! for_each_primitive {
    ($m:ident) => {
        $m! {
            bool => Bool, "bool", write_bool(*), read_bool;
            char => Char, "char", write_char(*), read_char;
            i8 => I8, "i8", write_i8(*), read_i8;
            u8 => U8, "u8", write_u8(*), read_u8;
            i16 => I16, "i16", write_i16(*), read_i16;
            u16 => U16, "u16", write_u16(*), read_u16;
            i32 => I32, "i32", write_i32(*), read_i32;
            u32 => U32, "u32", write_u32(*), read_u32;
            i64 => I64, "i64", write_i64(*), read_i64;
            u64 => U64, "u64", write_u64(*), read_u64;
            f32 => F32, "f32", write_f32(*), read_f32;
            f64 => F64, "f64", write_f64(*), read_f64;
            Decimal => Decimal, "rust_decimal::Decimal", write_decimal(), read_decimal;
            DateTime<Utc> => DateTime, "chrono::DateTime<chrono::Utc>", write_date_time(), read_date_time;
            Uuid => Uuid, "uuid::Uuid", write_uuid(), read_uuid;
            String => String, "alloc::string::String", write_str(), read_string;
        }
    };
}

pub(crate) use for_each_primitive;

#[cfg(test)]
mod tests {
    use super::{Header, RawKind};

    #[test]
    fn kind_bytes_round_trip() {
        for byte in 0..=18_u8 {
            assert_eq!(RawKind::from_byte(byte).map(RawKind::to_byte), Some(byte));
        }
        assert_eq!(RawKind::from_byte(19), None);
        assert_eq!(RawKind::String.to_byte(), 16);
        assert!(RawKind::Uuid.is_primitive());
        assert!(!RawKind::Inline.is_primitive());
        assert!(RawKind::Collection.has_header());
    }

    #[test]
    fn header_bytes() {
        assert_eq!(Header::from_byte(3), Some(Header::Boxing));
        assert_eq!(Header::from_byte(4), None);
        assert_eq!(Header::Reference.to_byte(), 2);
    }
}
