use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::object::SelfDescribing;
use crate::registry::{GetTypeMeta, TypeMeta, TypeTrait};
use crate::utils::{NameMap, NameSet, TypeIdMap};
use crate::utils::{new_name_map, new_name_set, new_type_id_map};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The central store of encodable types.
///
/// [Registering] a type stores its [`TypeMeta`], produced by the type's
/// [`GetTypeMeta`] implementation (generated by
/// [`#[derive(SelfDescribing)]`](crate::derive::SelfDescribing)). The strategy
/// dispatcher only ever selects a strategy for registered types, every other
/// type is unsupported.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use vc_codec::registry::{TypeRegistry, TypeTraitContainer};
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<i32>>();
///
/// let ops = registry
///     .get_type_trait::<TypeTraitContainer>(TypeId::of::<Vec<i32>>())
///     .unwrap();
/// assert!(ops.element().is::<i32>());
///
/// let meta = registry.get_with_type_name("Vec<i32>").unwrap();
/// assert!(meta.ty().is::<Vec<i32>>());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_name_to_id: NameMap<TypeId>,
    ambiguous_names: NameSet,
    generation: u64,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: new_type_id_map(),
            type_name_to_id: new_name_map(),
            ambiguous_names: new_name_set(),
            generation: 0,
        }
    }

    /// Creates a type registry with the wire scalars registered.
    ///
    /// - `bool` `char`
    /// - `i8 - i64`
    /// - `u8 - u64`
    /// - `f32` `f64`
    /// - `String` `Option<String>`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Option<String>>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_name_to_id: &mut NameMap<TypeId>,
        ambiguous_names: &mut NameSet,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.short_name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }
    }

    // - If key [`TypeId`] has already exist, the function will do nothing and return `false`.
    // - If the key [`TypeId`] does not exist, the function will insert value and return `true`.
    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        if self.type_meta_table.contains_key(&type_id) {
            return false;
        }
        let meta = get_type_meta();
        Self::add_new_type_indices(
            &meta,
            &mut self.type_name_to_id,
            &mut self.ambiguous_names,
        );
        self.type_meta_table.insert(type_id, meta);
        self.generation = self.generation.wrapping_add(1);
        true
    }

    /// Try add or do nothing.
    ///
    /// - If the type of `type_meta` is already registered, does nothing and returns `false`.
    /// - Otherwise inserts `type_meta` and returns `true`.
    ///
    /// This method will _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    #[inline]
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        self.register_internal(type_meta.type_id(), || type_meta)
    }

    /// Registers `T` if it has not been registered yet.
    ///
    /// This also registers the type dependencies given by
    /// [`GetTypeMeta::register_dependencies`], such as container elements and
    /// nested field types. If `T` is already registered, neither `T` nor its
    /// dependencies are touched.
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use std::collections::VecDeque;
    /// # use vc_codec::registry::TypeRegistry;
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<VecDeque<Vec<u8>>>();
    ///
    /// assert!(registry.contains(TypeId::of::<VecDeque<Vec<u8>>>()));
    /// assert!(registry.contains(TypeId::of::<Vec<u8>>()));
    /// assert!(registry.contains(TypeId::of::<u8>()));
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Registers `T` as a [`SelfDescribing`] type without a [`GetTypeMeta`]
    /// implementation.
    ///
    /// Nested field types are not registered.
    pub fn register_self_describing<T: SelfDescribing>(&mut self) {
        self.register_internal(TypeId::of::<T>(), TypeMeta::self_describing::<T>);
    }

    /// Registers `Arc<T>` as a proxy reference type.
    ///
    /// This is the opt-in for types that do not implement
    /// [`ProxyReference`](crate::ProxyReference).
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use std::sync::Arc;
    /// # use vc_codec::registry::{TypeRegistry, TypeTraitProxy};
    /// struct Session;
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register_proxy::<Session>();
    ///
    /// assert!(registry
    ///     .get_type_trait::<TypeTraitProxy>(TypeId::of::<Arc<Session>>())
    ///     .is_some());
    /// ```
    pub fn register_proxy<T: Any + Send + Sync>(&mut self) {
        self.register_internal(TypeId::of::<Arc<T>>(), TypeMeta::proxy::<T>);
    }

    /// Registers every non-generic type annotated with
    /// `#[codec(auto_register)]`.
    ///
    /// Equivalent to calling [`register`](Self::register) for each of them.
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current
    /// platform, otherwise `false`.
    ///
    /// ## Feature Dependency
    ///
    /// Requires the `auto_register` feature. When disabled, it does nothing
    /// and returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use core::any::TypeId;
    /// # use vc_codec::derive::SelfDescribing;
    /// # use vc_codec::registry::TypeRegistry;
    /// #[derive(SelfDescribing)]
    /// #[codec(auto_register)]
    /// struct Foo {
    ///     name: Option<String>,
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            // Reduce the cost of duplicate registrations.
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return true;
            }
            auto_register::__register_types(self);
            self.contains(TypeId::of::<auto_register::__AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// A counter that changes every time a type is added.
    ///
    /// Caches derived from the registry compare it to detect changes.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains_key(&type_id)
    }

    /// Returns the [`TypeMeta`] of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns the [`TypeMeta`] of the type with the given
    /// [short name](crate::DeclaredType::short_name).
    ///
    /// Returns `None` if the name is ambiguous or unknown.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given short name matches multiple registered types.
    ///
    /// # Example
    ///
    /// ```
    /// # use vc_codec::registry::{TypeMeta, TypeRegistry};
    /// mod foo { pub struct Handle; }
    /// mod bar { pub struct Handle; }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.try_insert_type_meta(TypeMeta::of::<foo::Handle>());
    /// registry.try_insert_type_meta(TypeMeta::of::<bar::Handle>());
    ///
    /// assert!(registry.is_ambiguous("Handle"));
    /// assert!(registry.get_with_type_name("Handle").is_none());
    /// ```
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the [`TypeTrait`] `T` of the type with the given [`TypeId`].
    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<T>(),
            None => None,
        }
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    /// Returns an iterator over the [`TypeMeta`]s of the registered types.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter().map(TypeMeta::type_name)).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared, lockable [`TypeRegistry`].
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
