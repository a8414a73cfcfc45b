/// Limits applied by a [`Serializer`](crate::Serializer).
///
/// On decode, a length or depth past a limit is reported as
/// [`CodecError::CorruptStream`](crate::CodecError::CorruptStream): no writer using the
/// same configuration could have produced it. On encode, only
/// [`max_depth`](Self::max_depth) is enforced.
///
/// # Examples
///
/// ```
/// use vc_codec::CodecConfig;
///
/// let config = CodecConfig::new()
///     .max_text_len(1024)
///     .max_container_len(4096);
///
/// assert_eq!(config.text_limit(), 1024);
/// assert_eq!(config.field_limit(), CodecConfig::DEFAULT_MAX_FIELD_COUNT);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct CodecConfig {
    /// Longest accepted text, in UTF-16 code units.
    max_text_len: usize,
    /// Largest accepted container element count.
    max_container_len: usize,
    /// Largest accepted field bag.
    max_field_count: usize,
    /// Deepest accepted nesting of containers and nested fields.
    max_depth: usize,
}

impl CodecConfig {
    pub const DEFAULT_MAX_TEXT_LEN: usize = 16 * 1024 * 1024;
    pub const DEFAULT_MAX_CONTAINER_LEN: usize = 16 * 1024 * 1024;
    pub const DEFAULT_MAX_FIELD_COUNT: usize = 65_536;
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Creates a configuration with the default limits.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_text_len: Self::DEFAULT_MAX_TEXT_LEN,
            max_container_len: Self::DEFAULT_MAX_CONTAINER_LEN,
            max_field_count: Self::DEFAULT_MAX_FIELD_COUNT,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the longest accepted text, in UTF-16 code units.
    #[inline]
    pub const fn max_text_len(mut self, len: usize) -> Self {
        self.max_text_len = len;
        self
    }

    /// Sets the largest accepted container element count.
    #[inline]
    pub const fn max_container_len(mut self, len: usize) -> Self {
        self.max_container_len = len;
        self
    }

    /// Sets the largest accepted number of fields in one field bag.
    #[inline]
    pub const fn max_field_count(mut self, count: usize) -> Self {
        self.max_field_count = count;
        self
    }

    /// Sets the deepest accepted nesting.
    ///
    /// The top-level value has depth zero; each container element or nested
    /// field adds one.
    #[inline]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[inline(always)]
    pub const fn text_limit(&self) -> usize {
        self.max_text_len
    }

    #[inline(always)]
    pub const fn container_limit(&self) -> usize {
        self.max_container_len
    }

    #[inline(always)]
    pub const fn field_limit(&self) -> usize {
        self.max_field_count
    }

    #[inline(always)]
    pub const fn depth_limit(&self) -> usize {
        self.max_depth
    }
}

impl Default for CodecConfig {
    /// See [`CodecConfig::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
