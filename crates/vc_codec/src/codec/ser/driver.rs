use core::any::Any;

use crate::proxy::ResolveProxyIds;
use crate::registry::DeclaredType;
use crate::strategy::{EncodingStrategy, StrategyDispatcher};
use crate::wire::WireWriter;
use crate::{CodecConfig, CodecError};

// -----------------------------------------------------------------------------
// EncodeDriver

/// Encodes type-erased values according to their strategies.
///
/// A driver belongs to one call. It holds no state beyond the current
/// nesting depth, so independent calls never share anything but the
/// dispatcher.
///
/// # Examples
///
/// ```
/// use vc_codec::CodecConfig;
/// use vc_codec::codec::EncodeDriver;
/// use vc_codec::proxy::NoProxyResolver;
/// use vc_codec::registry::{DeclaredType, TypeRegistry, TypeRegistryArc};
/// use vc_codec::strategy::StrategyDispatcher;
/// use vc_codec::wire::WireWriter;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<u16>>();
/// let dispatcher = StrategyDispatcher::new(TypeRegistryArc::new(registry));
/// let config = CodecConfig::new();
///
/// let mut writer = WireWriter::new();
/// EncodeDriver::new(&dispatcher, &NoProxyResolver, &config)
///     .encode(&mut writer, DeclaredType::of::<Vec<u16>>(), &vec![1_u16, 2])
///     .unwrap();
///
/// assert_eq!(writer.as_bytes(), &[2, 0, 0, 0, 1, 0, 2, 0]);
/// ```
pub struct EncodeDriver<'a> {
    pub(super) dispatcher: &'a StrategyDispatcher,
    pub(super) resolver: &'a dyn ResolveProxyIds,
    pub(super) config: &'a CodecConfig,
    depth: usize,
}

impl<'a> EncodeDriver<'a> {
    #[inline]
    pub fn new(
        dispatcher: &'a StrategyDispatcher,
        resolver: &'a dyn ResolveProxyIds,
        config: &'a CodecConfig,
    ) -> Self {
        Self {
            dispatcher,
            resolver,
            config,
            depth: 0,
        }
    }

    /// Encodes `value` as an instance of `ty`.
    ///
    /// On error, `writer` holds a partial encoding that must be discarded.
    pub fn encode(
        &mut self,
        writer: &mut WireWriter,
        ty: DeclaredType,
        value: &dyn Any,
    ) -> Result<(), CodecError> {
        let strategy = self.dispatcher.strategy_for(ty);
        self.encode_with(writer, ty, &strategy, value)
    }

    pub(super) fn encode_with(
        &mut self,
        writer: &mut WireWriter,
        ty: DeclaredType,
        strategy: &EncodingStrategy,
        value: &dyn Any,
    ) -> Result<(), CodecError> {
        if self.depth > self.config.depth_limit() {
            return Err(CodecError::DepthExceeded(self.config.depth_limit()));
        }

        match strategy {
            EncodingStrategy::Scalar(ops) => super::scalar::encode_scalar(writer, ty, ops, value),
            EncodingStrategy::SelfDescribing(ops) => self.encode_object(writer, ty, ops, value),
            EncodingStrategy::Container {
                element,
                element_strategy,
                ops,
            } => self.encode_container(writer, ty, *element, element_strategy, ops, value),
            EncodingStrategy::ProxyReference(ops) => self.encode_proxy(writer, ty, ops, value),
            EncodingStrategy::Unsupported => Err(CodecError::UnsupportedType(ty)),
        }
    }

    /// Runs `f` one nesting level deeper.
    #[inline]
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
