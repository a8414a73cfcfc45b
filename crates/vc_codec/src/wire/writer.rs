use alloc::vec::Vec;

use super::{ABSENT, PRESENT};

use crate::CodecError;
use crate::proxy::ProxyId;

// -----------------------------------------------------------------------------
// WireWriter

/// Appends wire primitives to an in-memory buffer.
///
/// The serializer encodes a whole value here first and only hands the buffer
/// to the byte sink once encoding succeeded, so a failed call writes nothing.
///
/// # Examples
///
/// ```
/// use vc_codec::wire::WireWriter;
///
/// let mut writer = WireWriter::new();
/// writer.write_i32(-2);
/// writer.write_text(Some("hi")).unwrap();
/// writer.write_text(None).unwrap();
///
/// assert_eq!(
///     writer.as_bytes(),
///     &[0xFE, 0xFF, 0xFF, 0xFF, 1, 2, 0, 0, 0, b'h', 0, b'i', 0, 0],
/// );
/// ```
#[derive(Default, Debug, Clone)]
pub struct WireWriter {
    buf: Vec<u8>,
}

macro_rules! impl_write_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Writes a little-endian `", stringify!($ty), "`.")]
            #[inline]
            pub fn $name(&mut self, value: $ty) {
                self.buf.extend_from_slice(&value.to_le_bytes());
            }
        )*
    };
}

impl WireWriter {
    /// Creates an empty writer.
    #[inline]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates an empty writer with at least `capacity` bytes preallocated.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    impl_write_le! {
        write_i8: i8,
        write_i16: i16,
        write_i32: i32,
        write_i64: i64,
        write_u16: u16,
        write_u32: u32,
        write_u64: u64,
        write_f32: f32,
        write_f64: f64,
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    /// Writes the Unicode scalar value of `value` as a `u32`.
    #[inline]
    pub fn write_char(&mut self, value: char) {
        self.write_u32(value as u32);
    }

    /// Writes a length or element count as an `i32`.
    pub fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        let len = i32::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?;
        self.write_i32(len);
        Ok(())
    }

    /// Writes nullable text: presence byte, UTF-16 unit count, code units.
    pub fn write_text(&mut self, text: Option<&str>) -> Result<(), CodecError> {
        let Some(text) = text else {
            self.buf.push(ABSENT);
            return Ok(());
        };

        self.buf.push(PRESENT);
        let units = text.encode_utf16().count();
        self.write_len(units)?;
        self.buf.reserve(units * 2);
        for unit in text.encode_utf16() {
            self.write_u16(unit);
        }
        Ok(())
    }

    /// Writes a [`ProxyId`] verbatim.
    #[inline]
    pub fn write_proxy_id(&mut self, id: ProxyId) {
        self.write_u64(id.get());
    }

    /// Returns the bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::WireWriter;

    #[test]
    fn integers_are_little_endian() {
        let mut writer = WireWriter::new();
        writer.write_i32(i32::MIN);
        writer.write_i32(i32::MAX);
        writer.write_u16(0x0102);
        assert_eq!(
            writer.as_bytes(),
            &[0x00, 0x00, 0x00, 0x80, 0xFF, 0xFF, 0xFF, 0x7F, 0x02, 0x01]
        );
    }

    #[test]
    fn empty_and_absent_text_differ() {
        let mut empty = WireWriter::new();
        empty.write_text(Some("")).unwrap();
        let mut absent = WireWriter::new();
        absent.write_text(None).unwrap();

        assert_eq!(empty.as_bytes(), &[1, 0, 0, 0, 0]);
        assert_eq!(absent.as_bytes(), &[0]);
    }

    #[test]
    fn text_length_counts_code_units() {
        let mut writer = WireWriter::new();
        // U+1F600 is one char but two UTF-16 code units.
        writer.write_text(Some("a\u{1F600}")).unwrap();
        assert_eq!(&writer.as_bytes()[1..5], &[3, 0, 0, 0]);
        assert_eq!(writer.len(), 1 + 4 + 3 * 2);
    }
}
