use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{CodecError, MAX_LENGTH};

// -----------------------------------------------------------------------------
// DocumentWriter

macro_rules! impl_write_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[inline]
            fn $name(&mut self, value: $ty) -> Result<(), CodecError> {
                self.write_bytes(&value.to_le_bytes())
            }
        )*
    };
}

/// Sink for primitive values.
///
/// Only [`write_bytes`](DocumentWriter::write_bytes) is required, every other
/// method has a default encoding built on top of it. The trait is object safe
/// so the serializer can drive any sink through `&mut dyn DocumentWriter`.
///
/// # Examples
///
/// ```
/// use ogs_codec::{DocumentWriter, StreamWriter};
///
/// let mut bytes = Vec::new();
/// let mut writer = StreamWriter::new(&mut bytes);
/// writer.write_i32(1).unwrap();
/// writer.write_str("ab").unwrap();
///
/// assert_eq!(bytes, [1, 0, 0, 0, 2, b'a', b'b']);
/// ```
pub trait DocumentWriter {
    /// Writes raw bytes.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError>;

    impl_write_le! {
        write_u8: u8,
        write_i8: i8,
        write_u16: u16,
        write_i16: i16,
        write_u32: u32,
        write_i32: i32,
        write_u64: u64,
        write_i64: i64,
        write_f32: f32,
        write_f64: f64,
    }

    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.write_u8(value as u8)
    }

    #[inline]
    fn write_char(&mut self, value: char) -> Result<(), CodecError> {
        self.write_u32(value as u32)
    }

    /// Writes a length as a 7-bit variable length integer.
    ///
    /// Each byte carries 7 bits, low bits first; the high bit flags a
    /// continuation byte.
    fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        if len > MAX_LENGTH {
            return Err(CodecError::LengthOverflow);
        }
        let mut rest = len as u32;
        while rest >= 0x80 {
            self.write_u8((rest as u8) | 0x80)?;
            rest >>= 7;
        }
        self.write_u8(rest as u8)
    }

    fn write_str(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_len(value.len())?;
        self.write_bytes(value.as_bytes())
    }

    #[inline]
    fn write_uuid(&mut self, value: &Uuid) -> Result<(), CodecError> {
        self.write_bytes(value.as_bytes())
    }

    #[inline]
    fn write_decimal(&mut self, value: &Decimal) -> Result<(), CodecError> {
        self.write_bytes(&value.serialize())
    }

    fn write_date_time(&mut self, value: &DateTime<Utc>) -> Result<(), CodecError> {
        self.write_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

// -----------------------------------------------------------------------------
// StreamWriter

/// [`DocumentWriter`] over any [`Write`] sink.
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> StreamWriter<W> {
    #[inline]
    pub const fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Number of bytes handed to the sink so far.
    #[inline]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.inner.flush().map_err(CodecError::from)
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DocumentWriter for StreamWriter<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentWriter, StreamWriter};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn encode(f: impl FnOnce(&mut StreamWriter<&mut Vec<u8>>)) -> Vec<u8> {
        let mut bytes = Vec::new();
        f(&mut StreamWriter::new(&mut bytes));
        bytes
    }

    #[test]
    fn little_endian() {
        assert_eq!(encode(|w| w.write_i16(-2).unwrap()), [0xFE, 0xFF]);
        assert_eq!(
            encode(|w| w.write_u64(0x0102_0304_0506_0708).unwrap()),
            [8, 7, 6, 5, 4, 3, 2, 1]
        );
        assert_eq!(encode(|w| w.write_f32(1.0).unwrap()), [0, 0, 0x80, 0x3F]);
    }

    #[test]
    fn length_prefix() {
        assert_eq!(encode(|w| w.write_len(0x7F).unwrap()), [0x7F]);
        assert_eq!(encode(|w| w.write_len(0x80).unwrap()), [0x80, 0x01]);
        assert_eq!(encode(|w| w.write_len(300).unwrap()), [0xAC, 0x02]);
    }

    #[test]
    fn fixed_payloads() {
        let id = Uuid::from_bytes([7; 16]);
        assert_eq!(encode(|w| w.write_uuid(&id).unwrap()), [7; 16]);
        assert_eq!(
            encode(|w| w.write_decimal(&Decimal::new(15, 1)).unwrap()).len(),
            16
        );
        assert_eq!(encode(|w| w.write_char('A').unwrap()), [0x41, 0, 0, 0]);
    }

    #[test]
    fn counts_written_bytes() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_str("hello").unwrap();
        writer.write_bool(true).unwrap();
        assert_eq!(writer.written(), 7);
        assert_eq!(writer.into_inner().last(), Some(&1));
    }
}
