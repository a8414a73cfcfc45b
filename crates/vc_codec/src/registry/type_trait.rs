use core::any::Any;
use core::fmt;

/// A capability of a registered type, stored in its [`TypeMeta`].
///
/// Any `Send + Sync + 'static` type qualifies. The codec looks for
/// [`TypeTraitScalar`], [`TypeTraitSelfDescribing`], [`TypeTraitContainer`]
/// and [`TypeTraitProxy`]; other entries are ignored by the codec but kept
/// for callers.
///
/// [`TypeMeta`]: crate::registry::TypeMeta
/// [`TypeTraitScalar`]: crate::registry::TypeTraitScalar
/// [`TypeTraitSelfDescribing`]: crate::registry::TypeTraitSelfDescribing
/// [`TypeTraitContainer`]: crate::registry::TypeTraitContainer
/// [`TypeTraitProxy`]: crate::registry::TypeTraitProxy
pub trait TypeTrait: Any + Send + Sync {}

impl<T: Any + Send + Sync> TypeTrait for T {}

impl dyn TypeTrait {
    /// Returns a reference to the inner value if it is of type `T`.
    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

impl fmt::Debug for dyn TypeTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTrait")
    }
}
