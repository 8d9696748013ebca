use alloc::string::String;
use alloc::vec::Vec;
use std::io::Read;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::CodecError;

// -----------------------------------------------------------------------------
// DocumentReader

macro_rules! impl_read_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[inline]
            fn $name(&mut self) -> Result<$ty, CodecError> {
                let mut buf = [0_u8; size_of::<$ty>()];
                self.read_bytes(&mut buf)?;
                Ok(<$ty>::from_le_bytes(buf))
            }
        )*
    };
}

// Strings are pulled in bounded chunks so a corrupt length prefix cannot
// trigger a huge allocation up front.
const READ_CHUNK: usize = 8 * 1024;

/// Source of primitive values, the mirror of
/// [`DocumentWriter`](crate::DocumentWriter).
///
/// # Examples
///
/// ```
/// use ogs_codec::{DocumentReader, StreamReader};
///
/// let bytes = [1, 0, 0, 0, 2, b'a', b'b'];
/// let mut reader = StreamReader::new(&bytes[..]);
///
/// assert_eq!(reader.read_i32().unwrap(), 1);
/// assert_eq!(reader.read_string().unwrap(), "ab");
/// ```
pub trait DocumentReader {
    /// Fills `buf` completely, or fails.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError>;

    impl_read_le! {
        read_u8: u8,
        read_i8: i8,
        read_u16: u16,
        read_i16: i16,
        read_u32: u32,
        read_i32: i32,
        read_u64: u64,
        read_i64: i64,
        read_f32: f32,
        read_f64: f64,
    }

    fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    fn read_char(&mut self) -> Result<char, CodecError> {
        let scalar = self.read_u32()?;
        char::from_u32(scalar).ok_or(CodecError::InvalidChar(scalar))
    }

    /// Reads a 7-bit variable length integer.
    fn read_len(&mut self) -> Result<usize, CodecError> {
        let mut value = 0_u32;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            let bits = (byte & 0x7F) as u32;
            if shift == 28 && bits > 0x0F {
                return Err(CodecError::LengthOverflow);
            }
            value |= bits << shift;
            if byte & 0x80 == 0 {
                return Ok(value as usize);
            }
        }
        Err(CodecError::LengthOverflow)
    }

    fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_len()?;
        let mut bytes = Vec::with_capacity(len.min(READ_CHUNK));
        while bytes.len() < len {
            let start = bytes.len();
            let end = len.min(start + READ_CHUNK);
            bytes.resize(end, 0);
            self.read_bytes(&mut bytes[start..end])?;
        }
        Ok(String::from_utf8(bytes)?)
    }

    fn read_uuid(&mut self) -> Result<Uuid, CodecError> {
        let mut buf = [0_u8; 16];
        self.read_bytes(&mut buf)?;
        Ok(Uuid::from_bytes(buf))
    }

    fn read_decimal(&mut self) -> Result<Decimal, CodecError> {
        let mut buf = [0_u8; 16];
        self.read_bytes(&mut buf)?;
        // Flags word: scale lives in bits 16..24.
        let scale = buf[2];
        if scale > 28 {
            return Err(CodecError::InvalidDecimal(scale));
        }
        Ok(Decimal::deserialize(buf))
    }

    fn read_date_time(&mut self) -> Result<DateTime<Utc>, CodecError> {
        let text = self.read_string()?;
        match DateTime::parse_from_rfc3339(&text) {
            Ok(value) => Ok(value.with_timezone(&Utc)),
            Err(source) => Err(CodecError::InvalidDateTime { text, source }),
        }
    }
}

// -----------------------------------------------------------------------------
// StreamReader

/// [`DocumentReader`] over any [`Read`] source.
#[derive(Debug)]
pub struct StreamReader<R: Read> {
    inner: R,
    consumed: u64,
}

impl<R: Read> StreamReader<R> {
    #[inline]
    pub const fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Number of bytes taken from the source so far.
    #[inline]
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> DocumentReader for StreamReader<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        self.inner.read_exact(buf)?;
        self.consumed += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentReader, StreamReader};
    use crate::{CodecError, DocumentWriter, StreamWriter};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn primitives_in_sequence() {
        let when = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 7).unwrap();
        let id = Uuid::from_u128(0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF);
        let price = Decimal::new(-123_456, 3);

        let mut writer = StreamWriter::new(Vec::new());
        writer.write_bool(true).unwrap();
        writer.write_char('ß').unwrap();
        writer.write_i64(i64::MIN).unwrap();
        writer.write_f64(-0.5).unwrap();
        writer.write_str(&"x".repeat(200)).unwrap();
        writer.write_uuid(&id).unwrap();
        writer.write_decimal(&price).unwrap();
        writer.write_date_time(&when).unwrap();
        let bytes = writer.into_inner();

        let mut reader = StreamReader::new(bytes.as_slice());
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_char().unwrap(), 'ß');
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
        assert_eq!(reader.read_f64().unwrap(), -0.5);
        assert_eq!(reader.read_string().unwrap().len(), 200);
        assert_eq!(reader.read_uuid().unwrap(), id);
        assert_eq!(reader.read_decimal().unwrap(), price);
        assert_eq!(reader.read_date_time().unwrap(), when);
        assert_eq!(reader.consumed(), bytes.len() as u64);
    }

    #[test]
    fn truncated_input() {
        let mut reader = StreamReader::new(&[1_u8, 2][..]);
        assert!(matches!(reader.read_i32(), Err(CodecError::Io(_))));
    }

    #[test]
    fn rejects_bad_bool_and_char() {
        let mut reader = StreamReader::new(&[2_u8][..]);
        assert!(matches!(reader.read_bool(), Err(CodecError::InvalidBool(2))));

        let surrogate = 0xD800_u32.to_le_bytes();
        let mut reader = StreamReader::new(&surrogate[..]);
        assert!(matches!(reader.read_char(), Err(CodecError::InvalidChar(0xD800))));
    }

    #[test]
    fn rejects_overlong_length() {
        let mut reader = StreamReader::new(&[0xFF_u8, 0xFF, 0xFF, 0xFF, 0x7F][..]);
        assert!(matches!(reader.read_len(), Err(CodecError::LengthOverflow)));

        let mut reader = StreamReader::new(&[0xFF_u8, 0xFF, 0xFF, 0xFF, 0x0F][..]);
        assert_eq!(reader.read_len().unwrap(), u32::MAX as usize);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut reader = StreamReader::new(&[2_u8, 0xC3, 0x28][..]);
        assert!(matches!(reader.read_string(), Err(CodecError::InvalidUtf8(_))));
    }

    #[test]
    fn rejects_bad_decimal_scale() {
        let mut buf = [0_u8; 16];
        buf[2] = 29;
        let mut reader = StreamReader::new(&buf[..]);
        assert!(matches!(reader.read_decimal(), Err(CodecError::InvalidDecimal(29))));
    }

    #[test]
    fn rejects_bad_timestamp() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_str("yesterday").unwrap();
        let bytes = writer.into_inner();
        let mut reader = StreamReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_date_time(),
            Err(CodecError::InvalidDateTime { .. })
        ));
    }

    #[test]
    fn huge_length_fails_without_allocating() {
        // Claims 0x0FFF_FFFF bytes but carries only three.
        let mut reader = StreamReader::new(&[0xFF_u8, 0xFF, 0xFF, 0x7F, b'a', b'b', b'c'][..]);
        assert!(matches!(reader.read_string(), Err(CodecError::Io(_))));
    }
}
