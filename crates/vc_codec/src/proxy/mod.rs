//! Proxy identities and the resolver protocol.
//!
//! A proxy reference is an `Arc<T>` whose object conceptually lives on the
//! other side of the boundary. Encoding asks the caller's
//! [`ResolveProxyIds`] for the [`ProxyId`] of the object and writes that id.
//! Decoding reads the id back and asks the resolver for the local
//! representative. The codec never caches either direction.

use alloc::string::ToString;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::ProxyError;
use crate::registry::DeclaredType;

// -----------------------------------------------------------------------------
// ProxyId

/// An opaque, session-scoped identity assigned by a resolver.
///
/// The codec writes and reads it verbatim as eight bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ProxyId(u64);

impl ProxyId {
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline(always)]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyId({:#x})", self.0)
    }
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// -----------------------------------------------------------------------------
// ProxyObject

/// A type-erased shared object handed to and returned by a resolver.
pub type ProxyObject = Arc<dyn Any + Send + Sync>;

// -----------------------------------------------------------------------------
// ProxyReference

/// Opts `Arc<Self>` into the proxy reference strategy.
///
/// Ordinary value types never become proxies by accident: either implement
/// this marker and register `Arc<Self>`, or call
/// [`TypeRegistry::register_proxy`](crate::registry::TypeRegistry::register_proxy).
///
/// ```
/// use std::sync::Arc;
/// use vc_codec::ProxyReference;
/// use vc_codec::registry::TypeRegistry;
///
/// struct Printer;
/// impl ProxyReference for Printer {}
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Arc<Printer>>();
/// ```
pub trait ProxyReference: Any + Send + Sync {}

// -----------------------------------------------------------------------------
// ResolveProxyIds

/// Maps between live objects and session-scoped [`ProxyId`]s.
///
/// Supplied by the caller on every serializer call. If one resolver is
/// shared between concurrent calls, the implementation does its own
/// synchronization; the codec only ever calls these two methods.
///
/// # Examples
///
/// A resolver for a single, well-known object:
///
/// ```
/// use std::sync::Arc;
/// use vc_codec::{DeclaredType, ProxyError, ProxyId, ResolveProxyIds};
/// use vc_codec::proxy::ProxyObject;
///
/// struct Singleton(ProxyObject);
///
/// impl ResolveProxyIds for Singleton {
///     fn identity_for(&self, object: &ProxyObject) -> Result<ProxyId, ProxyError> {
///         if Arc::ptr_eq(object, &self.0) {
///             Ok(ProxyId::new(1))
///         } else {
///             Err(ProxyError::Custom("unknown object".into()))
///         }
///     }
///
///     fn object_for(&self, _ty: DeclaredType, id: ProxyId) -> Result<ProxyObject, ProxyError> {
///         match id.get() {
///             1 => Ok(self.0.clone()),
///             _ => Err(ProxyError::UnknownIdentity(id)),
///         }
///     }
/// }
/// ```
pub trait ResolveProxyIds: Send + Sync {
    /// Returns the identity of `object`, assigning one if needed.
    ///
    /// Must return the same id for the same object within one session.
    fn identity_for(&self, object: &ProxyObject) -> Result<ProxyId, ProxyError>;

    /// Returns the local representative of `id`.
    ///
    /// `ty` is the declared type of the shared object, `T` for `Arc<T>`,
    /// so a resolver can build a stub of the right type. The returned object
    /// must be a `T`.
    fn object_for(&self, ty: DeclaredType, id: ProxyId) -> Result<ProxyObject, ProxyError>;
}

impl<R: ResolveProxyIds + ?Sized> ResolveProxyIds for &R {
    #[inline]
    fn identity_for(&self, object: &ProxyObject) -> Result<ProxyId, ProxyError> {
        (**self).identity_for(object)
    }

    #[inline]
    fn object_for(&self, ty: DeclaredType, id: ProxyId) -> Result<ProxyObject, ProxyError> {
        (**self).object_for(ty, id)
    }
}

impl<R: ResolveProxyIds + ?Sized> ResolveProxyIds for Arc<R> {
    #[inline]
    fn identity_for(&self, object: &ProxyObject) -> Result<ProxyId, ProxyError> {
        (**self).identity_for(object)
    }

    #[inline]
    fn object_for(&self, ty: DeclaredType, id: ProxyId) -> Result<ProxyObject, ProxyError> {
        (**self).object_for(ty, id)
    }
}

// -----------------------------------------------------------------------------
// NoProxyResolver

/// A resolver for values that contain no proxy references.
///
/// Every call fails, so a proxy reached during encoding or decoding surfaces
/// as [`CodecError::ProxyResolution`](crate::CodecError::ProxyResolution).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProxyResolver;

impl ResolveProxyIds for NoProxyResolver {
    fn identity_for(&self, _object: &ProxyObject) -> Result<ProxyId, ProxyError> {
        Err(ProxyError::Custom("no proxy resolver was supplied".to_string()))
    }

    fn object_for(&self, _ty: DeclaredType, id: ProxyId) -> Result<ProxyObject, ProxyError> {
        Err(ProxyError::UnknownIdentity(id))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::sync::Arc;

    use super::{NoProxyResolver, ProxyId, ProxyObject, ResolveProxyIds};
    use crate::{DeclaredType, ProxyError};

    #[test]
    fn display_is_hex() {
        assert_eq!(format!("{}", ProxyId::new(255)), "0xff");
        assert_eq!(format!("{:?}", ProxyId::new(1)), "ProxyId(0x1)");
    }

    #[test]
    fn no_resolver_fails_both_ways() {
        let object: ProxyObject = Arc::new(1_u32);
        assert!(NoProxyResolver.identity_for(&object).is_err());
        let err = NoProxyResolver
            .object_for(DeclaredType::of::<u32>(), ProxyId::new(3))
            .err();
        assert_eq!(err, Some(ProxyError::UnknownIdentity(ProxyId::new(3))));
    }
}
