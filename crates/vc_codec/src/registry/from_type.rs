/// Builds a [`TypeTrait`] for the concrete type `T`.
///
/// [`TypeMeta`] helper constructors and the derive macro use this to fill a
/// type's capability table.
///
/// # Example
///
/// ```
/// use vc_codec::registry::{FromType, TypeMeta, TypeTraitScalar};
///
/// let mut meta = TypeMeta::of::<i32>();
/// meta.insert_trait::<TypeTraitScalar>(FromType::<i32>::from_type());
///
/// assert!(meta.has_trait::<TypeTraitScalar>());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
/// [`TypeMeta`]: crate::registry::TypeMeta
pub trait FromType<T> {
    fn from_type() -> Self;
}
