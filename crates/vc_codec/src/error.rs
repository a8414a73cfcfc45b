use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;

use crate::proxy::ProxyId;
use crate::registry::DeclaredType;

// -----------------------------------------------------------------------------
// CodecError

/// Error returned by [`Serializer`](crate::Serializer) operations.
///
/// Every error is local to the call that produced it. The strategy cache and
/// other in-flight calls are never affected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The declared type matches no encoding strategy.
    ///
    /// Raised before any byte is written or read; register the type to fix it.
    #[error("type `{0}` matches no encoding strategy")]
    UnsupportedType(DeclaredType),

    /// Lengths, counts, flags or tags read from the source are inconsistent.
    ///
    /// The source is left at an indeterminate position and must not be reused.
    #[error("corrupt stream: {0}")]
    CorruptStream(&'static str),

    /// The resolver could not map between an object and its proxy identity.
    #[error("proxy resolution failed: {0}")]
    ProxyResolution(#[from] ProxyError),

    /// The cancellation signal was observed mid-decode.
    #[error("decode was cancelled")]
    Cancelled,

    /// The value handed to the encoder is not an instance of the declared type.
    #[error("value is not an instance of the declared type `{0}`")]
    TypeMismatch(DeclaredType),

    /// A type's export or reconstruction path rejected its field bag.
    #[error("invalid state for `{ty}`: {source}")]
    State {
        ty: DeclaredType,
        #[source]
        source: StateError,
    },

    /// The value nests deeper than [`CodecConfig::max_depth`](crate::CodecConfig::max_depth).
    #[error("value nests deeper than the limit of {0}")]
    DepthExceeded(usize),

    /// A text or container is too long for its 32-bit length prefix.
    #[error("length {0} does not fit a 32-bit length prefix")]
    LengthOverflow(usize),

    /// The byte sink or source failed.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for CodecError {
    /// A short read means the stream was truncated, which is a corrupt stream
    /// rather than an I/O failure.
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            CodecError::CorruptStream("unexpected end of stream")
        } else {
            CodecError::Io(err)
        }
    }
}

impl CodecError {
    /// Returns `true` for [`CodecError::Cancelled`].
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CodecError::Cancelled)
    }

    /// Returns `true` for [`CodecError::CorruptStream`].
    #[inline]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CodecError::CorruptStream(_))
    }
}

// -----------------------------------------------------------------------------
// StateError

/// Error raised while building or consuming a [`FieldBag`](crate::FieldBag).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateError {
    #[error("field `{0}` is missing")]
    MissingField(Cow<'static, str>),

    #[error("field `{0}` was added twice")]
    DuplicateField(Cow<'static, str>),

    #[error("field `{name}` holds {found}, expected {expected}")]
    FieldTypeMismatch {
        name: Cow<'static, str>,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

impl StateError {
    /// Creates a [`StateError::Custom`] from any message.
    #[inline]
    pub fn custom(message: impl Into<String>) -> Self {
        StateError::Custom(message.into())
    }
}

// -----------------------------------------------------------------------------
// ProxyError

/// Error raised by a [`ResolveProxyIds`](crate::ResolveProxyIds) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProxyError {
    /// No object is known for this identity in the current session.
    #[error("no object is known for proxy id {0}")]
    UnknownIdentity(ProxyId),

    /// The resolved object is not an instance of the declared proxy type.
    #[error("proxy id {id} does not resolve to a `{expected}`")]
    TypeMismatch { id: ProxyId, expected: DeclaredType },

    #[error("{0}")]
    Custom(String),
}

// -----------------------------------------------------------------------------
// Tests
