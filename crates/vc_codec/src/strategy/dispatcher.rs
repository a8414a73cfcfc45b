use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::hash_map::Entry;

use crate::registry::{DeclaredType, TypeRegistry, TypeRegistryArc};
use crate::registry::{TypeTraitContainer, TypeTraitProxy};
use crate::registry::{TypeTraitScalar, TypeTraitSelfDescribing};
use crate::strategy::EncodingStrategy;
use crate::utils::{TypeIdMap, new_type_id_map};

// -----------------------------------------------------------------------------
// StrategyDispatcher

/// Maps declared types to [`EncodingStrategy`]s and caches the result.
///
/// The decision order for a registered type is: scalar, self-describing,
/// container (whose element strategy must itself be supported), proxy
/// reference. Unregistered types and everything else are
/// [`Unsupported`](EncodingStrategy::Unsupported).
///
/// # Concurrency
///
/// Any number of threads may ask for strategies at once. Concurrent first
/// uses of one type may each compute a strategy, but only the first one
/// reaching the cache is stored and every caller gets that one.
///
/// Locks are always taken registry first, cache second. The cache remembers
/// the [generation](TypeRegistry::generation) of the registry it was filled
/// from and is dropped as soon as the registry moves on, so types added
/// through a shared [`TypeRegistryArc`] are picked up on their next use.
pub struct StrategyDispatcher {
    registry: TypeRegistryArc,
    cache: RwLock<StrategyCache>,
}

struct StrategyCache {
    generation: u64,
    strategies: TypeIdMap<Arc<EncodingStrategy>>,
}

impl StrategyDispatcher {
    #[inline]
    pub fn new(registry: TypeRegistryArc) -> Self {
        let generation = registry.read().generation();
        Self {
            registry,
            cache: RwLock::new(StrategyCache {
                generation,
                strategies: new_type_id_map(),
            }),
        }
    }

    /// Returns the shared registry strategies are computed from.
    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    #[inline]
    fn read_cache(&self) -> RwLockReadGuard<'_, StrategyCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write_cache(&self) -> RwLockWriteGuard<'_, StrategyCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the strategy of `ty`, computing and caching it on first use.
    pub fn strategy_for(&self, ty: DeclaredType) -> Arc<EncodingStrategy> {
        let registry = self.registry.read();
        self.resolve(&registry, ty)
    }

    fn cached(&self, registry: &TypeRegistry, ty: DeclaredType) -> Option<Arc<EncodingStrategy>> {
        let cache = self.read_cache();
        if cache.generation != registry.generation() {
            return None;
        }
        cache.strategies.get(&ty.id()).cloned()
    }

    // The registry read lock is held by the caller for the whole resolution,
    // including the cache insert.
    fn resolve(&self, registry: &TypeRegistry, ty: DeclaredType) -> Arc<EncodingStrategy> {
        if let Some(strategy) = self.cached(registry, ty) {
            return strategy;
        }

        let computed = Arc::new(self.compute(registry, ty));

        let mut cache = self.write_cache();
        if cache.generation != registry.generation() {
            log::debug!(
                "registry changed, dropping {} cached strategies",
                cache.strategies.len()
            );
            cache.strategies.clear();
            cache.generation = registry.generation();
        }

        match cache.strategies.entry(ty.id()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                if computed.is_supported() {
                    log::debug!("cached strategy {:?} for `{ty}`", computed.kind());
                } else {
                    log::warn!("type `{ty}` matches no encoding strategy");
                }
                entry.insert(computed).clone()
            }
        }
    }

    fn compute(&self, registry: &TypeRegistry, ty: DeclaredType) -> EncodingStrategy {
        let Some(meta) = registry.get(ty.id()) else {
            return EncodingStrategy::Unsupported;
        };

        if let Some(ops) = meta.get_trait::<TypeTraitScalar>() {
            return EncodingStrategy::Scalar(*ops);
        }

        if let Some(ops) = meta.get_trait::<TypeTraitSelfDescribing>() {
            return EncodingStrategy::SelfDescribing(*ops);
        }

        if let Some(ops) = meta.get_trait::<TypeTraitContainer>() {
            let element = ops.element();
            let element_strategy = self.resolve(registry, element);
            if !element_strategy.is_supported() {
                return EncodingStrategy::Unsupported;
            }
            return EncodingStrategy::Container {
                element,
                element_strategy,
                ops: *ops,
            };
        }

        if let Some(ops) = meta.get_trait::<TypeTraitProxy>() {
            return EncodingStrategy::ProxyReference(*ops);
        }

        EncodingStrategy::Unsupported
    }

    /// Mutates the registry and clears the strategy cache.
    ///
    /// Types that were unsupported before the change are recomputed on their
    /// next use.
    pub fn register_with<R>(&self, f: impl FnOnce(&mut TypeRegistry) -> R) -> R {
        let mut registry = self.registry.write();
        let result = f(&mut registry);
        self.write_cache().strategies.clear();
        result
    }

    /// Returns the number of cached strategies.
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.read_cache().strategies.len()
    }

    /// Returns `true` if the strategy of `ty` has been computed against the
    /// current registry.
    pub fn is_cached(&self, ty: DeclaredType) -> bool {
        let registry = self.registry.read();
        self.cached(&registry, ty).is_some()
    }
}

impl core::fmt::Debug for StrategyDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrategyDispatcher")
            .field("registry", &self.registry)
            .field("cached", &self.cached_len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
