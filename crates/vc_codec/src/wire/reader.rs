use alloc::string::String;
use alloc::vec::Vec;

use futures_lite::io::{AsyncRead, AsyncReadExt};

use super::{ABSENT, PREALLOC_LIMIT, PRESENT};

use crate::CodecError;
use crate::proxy::ProxyId;

// -----------------------------------------------------------------------------
// WireReader

/// Reads wire primitives from an asynchronous byte source.
///
/// Every read either consumes exactly the bytes of one primitive or fails.
/// A short read is [`CodecError::CorruptStream`]; nothing is padded or
/// silently truncated.
///
/// # Examples
///
/// ```
/// use futures_lite::future::block_on;
/// use vc_codec::wire::WireReader;
///
/// let bytes: &[u8] = &[0xFE, 0xFF, 0xFF, 0xFF, 1, 2, 0, 0, 0, b'h', 0, b'i', 0];
/// let mut reader = WireReader::new(bytes);
///
/// block_on(async {
///     assert_eq!(reader.read_i32().await.unwrap(), -2);
///     assert_eq!(reader.read_text(16).await.unwrap().as_deref(), Some("hi"));
///     // Nothing left: the next read is a truncated stream.
///     assert!(reader.read_u8().await.unwrap_err().is_corrupt());
/// });
/// ```
#[derive(Debug)]
pub struct WireReader<R> {
    inner: R,
}

macro_rules! impl_read_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Reads a little-endian `", stringify!($ty), "`.")]
            #[inline]
            pub async fn $name(&mut self) -> Result<$ty, CodecError> {
                Ok(<$ty>::from_le_bytes(self.read_array().await?))
            }
        )*
    };
}

impl<R: AsyncRead + Unpin> WireReader<R> {
    #[inline]
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }

    async fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut bytes = [0_u8; N];
        self.inner.read_exact(&mut bytes).await?;
        Ok(bytes)
    }

    impl_read_le! {
        read_i8: i8,
        read_i16: i16,
        read_i32: i32,
        read_i64: i64,
        read_u8: u8,
        read_u16: u16,
        read_u32: u32,
        read_u64: u64,
        read_f32: f32,
        read_f64: f64,
    }

    /// Reads a `bool`; any byte other than `0` or `1` is corrupt.
    pub async fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8().await? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::CorruptStream("invalid bool byte")),
        }
    }

    /// Reads a `char` from its `u32` scalar value.
    pub async fn read_char(&mut self) -> Result<char, CodecError> {
        char::from_u32(self.read_u32().await?)
            .ok_or(CodecError::CorruptStream("invalid unicode scalar value"))
    }

    /// Reads a presence byte.
    pub async fn read_presence(&mut self) -> Result<bool, CodecError> {
        match self.read_u8().await? {
            ABSENT => Ok(false),
            PRESENT => Ok(true),
            _ => Err(CodecError::CorruptStream("invalid presence flag")),
        }
    }

    /// Reads an `i32` length prefix.
    ///
    /// Negative lengths, and lengths above `limit`, are corrupt.
    pub async fn read_len(&mut self, limit: usize) -> Result<usize, CodecError> {
        let len = self.read_i32().await?;
        let len = usize::try_from(len).map_err(|_| CodecError::CorruptStream("negative length"))?;
        if len > limit {
            return Err(CodecError::CorruptStream("length exceeds the configured limit"));
        }
        Ok(len)
    }

    /// Reads nullable text written by [`WireWriter::write_text`](super::WireWriter::write_text).
    pub async fn read_text(&mut self, limit: usize) -> Result<Option<String>, CodecError> {
        if !self.read_presence().await? {
            return Ok(None);
        }

        let units = self.read_len(limit).await?;

        // Grows with the bytes actually read, never with the declared count.
        let mut code_units = Vec::with_capacity(units.min(PREALLOC_LIMIT));
        let mut chunk = [0_u8; PREALLOC_LIMIT * 2];
        let mut remaining = units;
        while remaining > 0 {
            let take = remaining.min(PREALLOC_LIMIT);
            let bytes = &mut chunk[..take * 2];
            self.inner.read_exact(bytes).await?;
            code_units.extend(
                bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
            );
            remaining -= take;
        }

        char::decode_utf16(code_units)
            .collect::<Result<String, _>>()
            .map(Some)
            .map_err(|_| CodecError::CorruptStream("invalid UTF-16 text"))
    }

    /// Reads a [`ProxyId`] verbatim.
    #[inline]
    pub async fn read_proxy_id(&mut self) -> Result<ProxyId, CodecError> {
        Ok(ProxyId::new(self.read_u64().await?))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use futures_lite::future::block_on;

    use super::WireReader;
    use crate::codec::fixtures::LargestRead;
    use crate::wire::{PREALLOC_LIMIT, WireWriter};

    #[test]
    fn negative_length_is_corrupt() {
        let bytes = (-1_i32).to_le_bytes();
        let mut reader = WireReader::new(&bytes[..]);
        let err = block_on(reader.read_len(usize::MAX)).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn length_over_limit_is_corrupt() {
        let bytes = 10_i32.to_le_bytes();
        let mut reader = WireReader::new(&bytes[..]);
        assert!(block_on(reader.read_len(9)).unwrap_err().is_corrupt());
    }

    #[test]
    fn truncated_text_is_corrupt() {
        let mut writer = WireWriter::new();
        writer.write_text(Some("Hello World")).unwrap();
        let bytes = writer.into_inner();

        let mut reader = WireReader::new(&bytes[..bytes.len() - 1]);
        assert!(block_on(reader.read_text(64)).unwrap_err().is_corrupt());
    }

    #[test]
    fn text_round_trip() {
        let mut writer = WireWriter::new();
        for text in [None, Some(""), Some("Hello World"), Some("\u{1F600}")] {
            writer.write_text(text).unwrap();
        }
        let bytes = writer.into_inner();
        let mut reader = WireReader::new(&bytes[..]);

        block_on(async {
            assert_eq!(reader.read_text(64).await.unwrap(), None);
            assert_eq!(reader.read_text(64).await.unwrap().as_deref(), Some(""));
            assert_eq!(reader.read_text(64).await.unwrap().as_deref(), Some("Hello World"));
            assert_eq!(reader.read_text(64).await.unwrap().as_deref(), Some("\u{1F600}"));
        });
    }

    #[test]
    fn long_text_reads_in_chunks() {
        let text: String = core::iter::repeat_n('\u{1F600}', 1500).collect();
        let mut writer = WireWriter::new();
        writer.write_text(Some(text.as_str())).unwrap();
        let bytes = writer.into_inner();

        let mut reader = WireReader::new(LargestRead::new(&bytes));
        let back = block_on(reader.read_text(usize::MAX)).unwrap();
        assert_eq!(back.as_deref(), Some(text.as_str()));
        assert!(reader.get_mut().largest <= 2 * PREALLOC_LIMIT);
    }

    #[test]
    fn huge_declared_text_length_does_not_preallocate() {
        // Claims 16M code units, carries one.
        let mut bytes = alloc::vec![1];
        bytes.extend_from_slice(&(16 * 1024 * 1024_i32).to_le_bytes());
        bytes.extend_from_slice(&u16::from(b'a').to_le_bytes());

        let mut reader = WireReader::new(LargestRead::new(&bytes));
        assert!(block_on(reader.read_text(usize::MAX)).unwrap_err().is_corrupt());
        assert!(reader.get_mut().largest <= 2 * PREALLOC_LIMIT);
    }

    #[test]
    fn lone_surrogate_is_corrupt() {
        let mut bytes = alloc::vec![1, 1, 0, 0, 0];
        bytes.extend_from_slice(&0xD800_u16.to_le_bytes());
        let mut reader = WireReader::new(&bytes[..]);
        assert!(block_on(reader.read_text(8)).unwrap_err().is_corrupt());
    }

    #[test]
    fn invalid_flags_are_corrupt() {
        let mut reader = WireReader::new(&[2_u8][..]);
        assert!(block_on(reader.read_bool()).unwrap_err().is_corrupt());

        let mut reader = WireReader::new(&[7_u8][..]);
        assert!(block_on(reader.read_presence()).unwrap_err().is_corrupt());
    }
}
