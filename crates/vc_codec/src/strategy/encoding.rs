use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::registry::{DeclaredType, ScalarKind, TypeTraitContainer, TypeTraitProxy};
use crate::registry::{TypeTraitScalar, TypeTraitSelfDescribing};

// -----------------------------------------------------------------------------
// EncodingStrategy

/// The one encoding algorithm chosen for a declared type.
///
/// Computed once per type by the [`StrategyDispatcher`](super::StrategyDispatcher)
/// and immutable afterwards. Each variant carries the type-erased operations
/// it needs, so encoding and decoding never touch the registry.
#[derive(Clone)]
pub enum EncodingStrategy {
    /// A wire scalar, written without a tag.
    Scalar(TypeTraitScalar),
    /// A field bag, see [`SelfDescribing`](crate::SelfDescribing).
    SelfDescribing(TypeTraitSelfDescribing),
    /// A count followed by the elements in the element's own strategy.
    Container {
        element: DeclaredType,
        element_strategy: Arc<EncodingStrategy>,
        ops: TypeTraitContainer,
    },
    /// A [`ProxyId`](crate::ProxyId) obtained from the resolver.
    ProxyReference(TypeTraitProxy),
    /// No strategy applies; every call fails before touching the stream.
    Unsupported,
}

impl EncodingStrategy {
    /// Returns the comparable shape of the strategy.
    pub fn kind(&self) -> StrategyKind {
        match self {
            EncodingStrategy::Scalar(ops) => StrategyKind::Scalar(ops.kind()),
            EncodingStrategy::SelfDescribing(_) => StrategyKind::SelfDescribing,
            EncodingStrategy::Container {
                element_strategy, ..
            } => StrategyKind::Container(Box::new(element_strategy.kind())),
            EncodingStrategy::ProxyReference(_) => StrategyKind::ProxyReference,
            EncodingStrategy::Unsupported => StrategyKind::Unsupported,
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        !matches!(self, EncodingStrategy::Unsupported)
    }
}

impl core::fmt::Debug for EncodingStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.kind().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// StrategyKind

/// The shape of an [`EncodingStrategy`], without its operations.
///
/// # Examples
///
/// ```
/// use vc_codec::Serializer;
/// use vc_codec::registry::{DeclaredType, ScalarKind, TypeRegistry};
/// use vc_codec::strategy::StrategyKind;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<Vec<i32>>>();
/// let serializer = Serializer::new(registry);
///
/// assert_eq!(
///     serializer.strategy_of(DeclaredType::of::<Vec<Vec<i32>>>()),
///     StrategyKind::Container(Box::new(StrategyKind::Container(Box::new(
///         StrategyKind::Scalar(ScalarKind::I32)
///     )))),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyKind {
    Scalar(ScalarKind),
    SelfDescribing,
    Container(Box<StrategyKind>),
    ProxyReference,
    Unsupported,
}
