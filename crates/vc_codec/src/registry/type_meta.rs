use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::ops::Deref;

use crate::object::{FieldScalar, SelfDescribing};
use crate::registry::{Container, DeclaredType, FromType, TypeRegistry, TypeTrait};
use crate::registry::{TypeTraitContainer, TypeTraitProxy, TypeTraitScalar};
use crate::registry::TypeTraitSelfDescribing;
use crate::utils::{TypeIdMap, new_type_id_map};

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime metadata of a registered type: its [`DeclaredType`] plus a
/// [`TypeTrait`] table.
///
/// The strategy dispatcher reads the table to pick an encoding strategy.
/// Metas are usually produced by [`GetTypeMeta`], which
/// [`#[derive(SelfDescribing)]`](crate::derive::SelfDescribing) implements.
///
/// # Example
///
/// ```
/// use vc_codec::registry::{FromType, TypeMeta, TypeTraitScalar};
///
/// let mut meta = TypeMeta::of::<u16>();
/// assert!(!meta.has_trait::<TypeTraitScalar>());
///
/// meta.insert_trait::<TypeTraitScalar>(FromType::<u16>::from_type());
/// assert!(meta.get_trait::<TypeTraitScalar>().is_some());
///
/// // Helper constructors fill the table for the common cases.
/// assert!(TypeMeta::scalar::<u16>().has_trait::<TypeTraitScalar>());
/// ```
pub struct TypeMeta {
    ty: DeclaredType,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates an empty [`TypeMeta`] for `T`.
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self {
            ty: DeclaredType::of::<T>(),
            trait_table: new_type_id_map(),
        }
    }

    /// Creates an empty [`TypeMeta`] for `T` with room for `capacity` traits.
    #[inline]
    pub fn with_capacity<T: Any>(capacity: usize) -> Self {
        let mut meta = Self::of::<T>();
        meta.trait_table.reserve(capacity);
        meta
    }

    /// Creates the meta of a wire scalar.
    pub fn scalar<T: FieldScalar + Clone + Any + Send>() -> Self {
        let mut meta = Self::with_capacity::<T>(1);
        meta.insert_trait::<TypeTraitScalar>(FromType::<T>::from_type());
        meta
    }

    /// Creates the meta of a [`SelfDescribing`] type.
    pub fn self_describing<T: SelfDescribing>() -> Self {
        let mut meta = Self::with_capacity::<T>(1);
        meta.insert_trait::<TypeTraitSelfDescribing>(FromType::<T>::from_type());
        meta
    }

    /// Creates the meta of a [`Container`].
    ///
    /// The element type is **not** registered here, see
    /// [`GetTypeMeta::register_dependencies`].
    pub fn container<C: Container>() -> Self {
        let mut meta = Self::with_capacity::<C>(1);
        meta.insert_trait::<TypeTraitContainer>(FromType::<C>::from_type());
        meta
    }

    /// Creates the meta of the proxy reference type `Arc<T>`.
    pub fn proxy<T: Any + Send + Sync>() -> Self {
        let mut meta = Self::with_capacity::<Arc<T>>(1);
        meta.insert_trait::<TypeTraitProxy>(FromType::<Arc<T>>::from_type());
        meta
    }

    #[inline(always)]
    pub const fn ty(&self) -> DeclaredType {
        self.ty
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline(always)]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    /// Inserts a [`TypeTrait`], replacing any previous one of the same type.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Returns a [`TypeTrait`] reference, or `None` if it doesn't exist.
    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .map(Deref::deref)
            .and_then(<dyn TypeTrait>::downcast_ref)
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains_key(&TypeId::of::<T>())
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("trait_len", &self.trait_table.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A type that can produce its [`TypeMeta`] for registration into the
/// [`TypeRegistry`].
///
/// Implemented for the wire scalars, `Vec<T>`, `VecDeque<T>` and
/// `Arc<T: ProxyReference>`, and generated by
/// [`#[derive(SelfDescribing)]`](crate::derive::SelfDescribing).
///
/// # Manually
///
/// ```
/// use vc_codec::{FieldBag, SelfDescribing, StateError};
/// use vc_codec::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
///
/// struct Celsius(f64);
///
/// impl SelfDescribing for Celsius {
///     fn export_state(&self) -> Result<FieldBag, StateError> {
///         let mut bag = FieldBag::new();
///         bag.add("degrees", self.0)?;
///         Ok(bag)
///     }
///
///     fn from_state(mut bag: FieldBag) -> Result<Self, StateError> {
///         Ok(Celsius(bag.take("degrees")?))
///     }
/// }
///
/// impl GetTypeMeta for Celsius {
///     fn get_type_meta() -> TypeMeta {
///         TypeMeta::self_describing::<Self>()
///     }
///
///     fn register_dependencies(registry: &mut TypeRegistry) {
///         registry.register::<f64>();
///     }
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Celsius>();
/// assert!(registry.contains(core::any::TypeId::of::<f64>()));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot provide type registration information",
    note = "consider annotating `{Self}` with `#[derive(SelfDescribing)]`"
)]
pub trait GetTypeMeta: Any {
    /// Returns the **default** [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    /// **Allow** not to register oneself.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
