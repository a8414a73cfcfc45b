use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use futures_lite::future::block_on;
use futures_lite::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::codec::{DecodeDriver, EncodeDriver};
use crate::proxy::ResolveProxyIds;
use crate::registry::{DeclaredType, GetTypeMeta, TypeRegistry, TypeRegistryArc};
use crate::strategy::{StrategyDispatcher, StrategyKind};
use crate::wire::WireWriter;
use crate::{CancelSignal, CodecConfig, CodecError};

// -----------------------------------------------------------------------------
// Serializer

/// The entry point of the codec.
///
/// A `Serializer` owns a [`StrategyDispatcher`] and a [`CodecConfig`] and
/// holds no per-call state: one instance can serve any number of concurrent
/// calls against independent sinks and sources.
///
/// # Examples
///
/// ```
/// use vc_codec::{Serializer, derive::SelfDescribing};
/// use vc_codec::proxy::NoProxyResolver;
/// use vc_codec::registry::TypeRegistry;
///
/// #[derive(SelfDescribing, Debug, PartialEq)]
/// struct Sample {
///     number: i32,
///     text: Option<String>,
/// }
///
/// let serializer = Serializer::new(TypeRegistry::new());
/// serializer.register::<Sample>();
///
/// let value = Sample { number: i32::MAX, text: Some("Hello World".into()) };
/// let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
/// let back: Sample = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
///
/// assert_eq!(back, value);
/// ```
#[derive(Debug)]
pub struct Serializer {
    dispatcher: StrategyDispatcher,
    config: CodecConfig,
}

impl Serializer {
    /// Creates a serializer over `registry` with the default [`CodecConfig`].
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, CodecConfig::new())
    }

    #[inline]
    pub fn with_config(registry: TypeRegistry, config: CodecConfig) -> Self {
        Self::from_shared(TypeRegistryArc::new(registry), config)
    }

    /// Creates a serializer over a registry shared with other owners.
    ///
    /// Types added through any handle to the shared registry are seen on
    /// their next use.
    #[inline]
    pub fn from_shared(registry: TypeRegistryArc, config: CodecConfig) -> Self {
        Self {
            dispatcher: StrategyDispatcher::new(registry),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    #[inline]
    pub fn dispatcher(&self) -> &StrategyDispatcher {
        &self.dispatcher
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        self.dispatcher.registry()
    }

    /// Registers `T` and its dependencies, then clears the strategy cache.
    #[inline]
    pub fn register<T: GetTypeMeta>(&self) {
        self.dispatcher.register_with(TypeRegistry::register::<T>);
    }

    /// Mutates the registry, then clears the strategy cache.
    #[inline]
    pub fn register_with<R>(&self, f: impl FnOnce(&mut TypeRegistry) -> R) -> R {
        self.dispatcher.register_with(f)
    }

    /// Returns the shape of the strategy chosen for `ty`.
    #[inline]
    pub fn strategy_of(&self, ty: DeclaredType) -> StrategyKind {
        self.dispatcher.strategy_for(ty).kind()
    }

    /// Encodes `value` as an instance of `declared` into a new buffer.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnsupportedType`] if `declared`, or a type reached
    ///   while encoding, has no strategy.
    /// - [`CodecError::TypeMismatch`] if `value` is not a `declared`.
    /// - [`CodecError::ProxyResolution`] if the resolver rejects an object.
    /// - [`CodecError::State`] if a type fails to export its state.
    /// - [`CodecError::DepthExceeded`] past [`CodecConfig::max_depth`].
    pub fn encode(
        &self,
        declared: DeclaredType,
        value: &dyn Any,
        resolver: &dyn ResolveProxyIds,
    ) -> Result<Vec<u8>, CodecError> {
        let mut writer = WireWriter::new();
        EncodeDriver::new(&self.dispatcher, resolver, &self.config)
            .encode(&mut writer, declared, value)?;
        Ok(writer.into_inner())
    }

    /// Writes the encoding of `value` to `sink`.
    ///
    /// The value is encoded when this method is called; the returned future
    /// only writes the finished bytes. On any encoding error the future
    /// resolves to that error without writing a single byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures_lite::future::block_on;
    /// use vc_codec::{DeclaredType, Serializer};
    /// use vc_codec::proxy::NoProxyResolver;
    /// use vc_codec::registry::TypeRegistry;
    ///
    /// struct Unregistered;
    ///
    /// let serializer = Serializer::new(TypeRegistry::new());
    /// let mut sink = Vec::new();
    ///
    /// let result = block_on(serializer.serialize(
    ///     &mut sink,
    ///     DeclaredType::of::<Unregistered>(),
    ///     &Unregistered,
    ///     &NoProxyResolver,
    /// ));
    ///
    /// assert!(result.is_err());
    /// assert!(sink.is_empty());
    /// ```
    pub fn serialize<W: AsyncWrite + Unpin + Send>(
        &self,
        sink: W,
        declared: DeclaredType,
        value: &dyn Any,
        resolver: &dyn ResolveProxyIds,
    ) -> impl Future<Output = Result<(), CodecError>> + Send + use<W> {
        let encoded = self.encode(declared, value, resolver);
        async move {
            let bytes = encoded?;
            let mut sink = sink;
            sink.write_all(&bytes).await.map_err(CodecError::Io)?;
            sink.flush().await.map_err(CodecError::Io)?;
            Ok(())
        }
    }

    /// Typed form of [`serialize`](Self::serialize), declaring `T`.
    #[inline]
    pub fn serialize_value<T: Any, W: AsyncWrite + Unpin + Send>(
        &self,
        sink: W,
        value: &T,
        resolver: &dyn ResolveProxyIds,
    ) -> impl Future<Output = Result<(), CodecError>> + Send + use<T, W> {
        self.serialize(sink, DeclaredType::of::<T>(), value, resolver)
    }

    /// Reads one value of `declared` from `source`.
    ///
    /// The cancellation signal is checked before anything is read, before
    /// each container element and before each field of a field bag.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnsupportedType`] before reading if `declared` has no strategy.
    /// - [`CodecError::CorruptStream`] if the bytes are truncated or inconsistent.
    /// - [`CodecError::ProxyResolution`] if the resolver can not map an id.
    /// - [`CodecError::Cancelled`] once `cancel` is observed.
    /// - [`CodecError::State`] if a type rejects its decoded field bag.
    /// - [`CodecError::Io`] if the source fails.
    pub async fn deserialize<R: AsyncRead + Unpin + Send>(
        &self,
        source: R,
        declared: DeclaredType,
        resolver: &dyn ResolveProxyIds,
        cancel: &CancelSignal,
    ) -> Result<Box<dyn Any + Send>, CodecError> {
        DecodeDriver::new(source, &self.dispatcher, resolver, &self.config, cancel)
            .decode(declared)
            .await
    }

    /// Typed form of [`deserialize`](Self::deserialize), declaring `T`.
    pub async fn deserialize_value<T: Any, R: AsyncRead + Unpin + Send>(
        &self,
        source: R,
        resolver: &dyn ResolveProxyIds,
        cancel: &CancelSignal,
    ) -> Result<T, CodecError> {
        let declared = DeclaredType::of::<T>();
        let value = self.deserialize(source, declared, resolver, cancel).await?;
        downcast(value, declared)
    }

    /// Encodes `value`, declaring `T`, into a new buffer.
    #[inline]
    pub fn to_bytes<T: Any>(
        &self,
        value: &T,
        resolver: &dyn ResolveProxyIds,
    ) -> Result<Vec<u8>, CodecError> {
        self.encode(DeclaredType::of::<T>(), value, resolver)
    }

    /// Decodes a `T` that must span all of `bytes`.
    ///
    /// Blocks the current thread; the source is in memory so it never waits.
    /// Trailing bytes after the value are [`CodecError::CorruptStream`].
    pub fn from_bytes<T: Any>(
        &self,
        bytes: &[u8],
        resolver: &dyn ResolveProxyIds,
    ) -> Result<T, CodecError> {
        let declared = DeclaredType::of::<T>();
        let mut source = bytes;
        let value = block_on(self.deserialize(
            &mut source,
            declared,
            resolver,
            &CancelSignal::never(),
        ))?;

        if !source.is_empty() {
            return Err(CodecError::CorruptStream("trailing bytes after the value"));
        }
        downcast(value, declared)
    }
}

#[inline]
fn downcast<T: Any>(value: Box<dyn Any + Send>, declared: DeclaredType) -> Result<T, CodecError> {
    match value.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(CodecError::TypeMismatch(declared)),
    }
}

// -----------------------------------------------------------------------------
// Tests
