use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use crate::proxy::ProxyObject;
use crate::registry::{DeclaredType, FromType};

/// Type-erased access to a proxy reference type `Arc<T>`.
///
/// Built with `FromType::<Arc<T>>`. The resolver sees the shared object as a
/// [`ProxyObject`] and hands back a [`ProxyObject`] that must downcast to `T`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_codec::registry::{FromType, TypeTraitProxy};
///
/// struct Remote;
///
/// let ops: TypeTraitProxy = FromType::<Arc<Remote>>::from_type();
/// assert!(ops.target().is::<Remote>());
///
/// let local = Arc::new(Remote);
/// let object = ops.to_object(&local).unwrap();
///
/// let value = ops.from_object(object).unwrap();
/// let back = value.downcast::<Arc<Remote>>().unwrap();
/// assert!(Arc::ptr_eq(&local, &back));
///
/// // An object of another type is rejected.
/// assert!(ops.from_object(Arc::new(1_u8)).is_none());
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitProxy {
    target: fn() -> DeclaredType,
    to_object: fn(&dyn Any) -> Option<ProxyObject>,
    from_object: fn(ProxyObject) -> Option<Box<dyn Any + Send>>,
}

impl TypeTraitProxy {
    /// Returns the declared type of the shared object, `T` for `Arc<T>`.
    #[inline]
    pub fn target(&self) -> DeclaredType {
        (self.target)()
    }

    /// Shares the object behind a proxy reference.
    ///
    /// Returns `None` if `value` is not of the registered `Arc<T>` type.
    #[inline]
    pub fn to_object(&self, value: &dyn Any) -> Option<ProxyObject> {
        (self.to_object)(value)
    }

    /// Wraps a resolved object back into the registered `Arc<T>` type.
    ///
    /// Returns `None` if the object is not a `T`.
    #[inline]
    pub fn from_object(&self, object: ProxyObject) -> Option<Box<dyn Any + Send>> {
        (self.from_object)(object)
    }
}

impl<T: Any + Send + Sync> FromType<Arc<T>> for TypeTraitProxy {
    fn from_type() -> Self {
        Self {
            target: DeclaredType::of::<T>,
            to_object: |value| {
                value
                    .downcast_ref::<Arc<T>>()
                    .map(|value| Arc::clone(value) as ProxyObject)
            },
            from_object: |object| match object.downcast::<T>() {
                Ok(value) => Some(Box::new(value)),
                Err(_) => None,
            },
        }
    }
}
