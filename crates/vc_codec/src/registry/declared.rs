use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// DeclaredType

/// The type a caller asserts at both ends of an encode/decode pair.
///
/// The wire never carries type names, so the decoder must be handed the same
/// `DeclaredType` the encoder used.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// # Examples
///
/// ```
/// use vc_codec::DeclaredType;
///
/// let ty = DeclaredType::of::<Vec<i32>>();
///
/// assert!(ty.is::<Vec<i32>>());
/// assert_eq!(ty.short_name(), "Vec<i32>");
/// assert_ne!(ty, DeclaredType::of::<Vec<u32>>());
/// ```
#[derive(Clone, Copy)]
pub struct DeclaredType {
    id: TypeId,
    name: &'static str,
}

impl DeclaredType {
    /// Returns the declared type of `T`.
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name, as given by [`core::any::type_name`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the name without the leading module path.
    ///
    /// Generic arguments are kept as written, e.g. `alloc::vec::Vec<my::Foo>`
    /// becomes `Vec<my::Foo>`.
    pub fn short_name(&self) -> &'static str {
        let name = self.name;
        let head_end = name.find('<').unwrap_or(name.len());
        match name[..head_end].rfind("::") {
            Some(index) => &name[index + 2..],
            None => name,
        }
    }

    /// Returns `true` if this is the declared type of `T`.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for DeclaredType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DeclaredType {}

impl Hash for DeclaredType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeclaredType").field(&self.name).finish()
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// Tests
