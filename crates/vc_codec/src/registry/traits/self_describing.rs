use alloc::boxed::Box;
use core::any::Any;

use crate::StateError;
use crate::object::{FieldBag, SelfDescribing};
use crate::registry::{DeclaredType, FromType};

/// Type-erased access to a [`SelfDescribing`] implementation.
///
/// # Examples
///
/// ```
/// use vc_codec::{FieldBag, SelfDescribing, StateError};
/// use vc_codec::registry::{FromType, TypeTraitSelfDescribing};
///
/// #[derive(Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// impl SelfDescribing for Point {
///     fn export_state(&self) -> Result<FieldBag, StateError> {
///         let mut bag = FieldBag::with_capacity(2);
///         bag.add("x", self.x)?;
///         bag.add("y", self.y)?;
///         Ok(bag)
///     }
///
///     fn from_state(mut bag: FieldBag) -> Result<Self, StateError> {
///         Ok(Point { x: bag.take("x")?, y: bag.take("y")? })
///     }
/// }
///
/// let ops: TypeTraitSelfDescribing = FromType::<Point>::from_type();
///
/// let bag = ops.export(&Point { x: 1, y: 2 }).unwrap().unwrap();
/// let value = ops.import(bag).unwrap();
/// assert_eq!(*value.downcast::<Point>().unwrap(), Point { x: 1, y: 2 });
///
/// // Wrong concrete type.
/// assert!(ops.export(&5_i32).is_none());
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitSelfDescribing {
    export: fn(&dyn Any) -> Option<Result<FieldBag, StateError>>,
    import: fn(FieldBag) -> Result<Box<dyn Any + Send>, StateError>,
    nested_field_type: fn(&str) -> Option<DeclaredType>,
}

impl TypeTraitSelfDescribing {
    /// Calls [`SelfDescribing::export_state`].
    ///
    /// Returns `None` if `value` is not of the registered type.
    #[inline]
    pub fn export(&self, value: &dyn Any) -> Option<Result<FieldBag, StateError>> {
        (self.export)(value)
    }

    /// Calls [`SelfDescribing::from_state`].
    #[inline]
    pub fn import(&self, bag: FieldBag) -> Result<Box<dyn Any + Send>, StateError> {
        (self.import)(bag)
    }

    /// Calls [`SelfDescribing::nested_field_type`].
    #[inline]
    pub fn nested_field_type(&self, name: &str) -> Option<DeclaredType> {
        (self.nested_field_type)(name)
    }
}

impl<T: SelfDescribing> FromType<T> for TypeTraitSelfDescribing {
    fn from_type() -> Self {
        Self {
            export: |value| value.downcast_ref::<T>().map(T::export_state),
            import: |bag| match T::from_state(bag) {
                Ok(value) => Ok(Box::new(value)),
                Err(err) => Err(err),
            },
            nested_field_type: T::nested_field_type,
        }
    }
}
