use alloc::boxed::Box;
use core::any::Any;

use crate::object::{FieldScalar, FieldValue};
use crate::registry::FromType;
use crate::wire::tag;

// -----------------------------------------------------------------------------
// ScalarKind

/// The closed set of values encoded directly by the wire primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    /// Present text. Absent text read into this kind is corrupt.
    String,
    /// Nullable text.
    OptionString,
}

impl ScalarKind {
    /// Returns the field-bag tag of this kind.
    ///
    /// Both text kinds share [`tag::TEXT`].
    #[inline]
    pub const fn tag(self) -> u8 {
        match self {
            ScalarKind::Bool => tag::BOOL,
            ScalarKind::I8 => tag::I8,
            ScalarKind::I16 => tag::I16,
            ScalarKind::I32 => tag::I32,
            ScalarKind::I64 => tag::I64,
            ScalarKind::U8 => tag::U8,
            ScalarKind::U16 => tag::U16,
            ScalarKind::U32 => tag::U32,
            ScalarKind::U64 => tag::U64,
            ScalarKind::F32 => tag::F32,
            ScalarKind::F64 => tag::F64,
            ScalarKind::Char => tag::CHAR,
            ScalarKind::String | ScalarKind::OptionString => tag::TEXT,
        }
    }

    /// Maps a field-bag tag back to a kind.
    ///
    /// [`tag::TEXT`] maps to [`ScalarKind::OptionString`], since a bag keeps
    /// absent text until the type takes the field.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            tag::BOOL => ScalarKind::Bool,
            tag::I8 => ScalarKind::I8,
            tag::I16 => ScalarKind::I16,
            tag::I32 => ScalarKind::I32,
            tag::I64 => ScalarKind::I64,
            tag::U8 => ScalarKind::U8,
            tag::U16 => ScalarKind::U16,
            tag::U32 => ScalarKind::U32,
            tag::U64 => ScalarKind::U64,
            tag::F32 => ScalarKind::F32,
            tag::F64 => ScalarKind::F64,
            tag::CHAR => ScalarKind::Char,
            tag::TEXT => ScalarKind::OptionString,
            _ => return None,
        })
    }

    /// Returns the Rust spelling of the kind, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
            ScalarKind::String => "String",
            ScalarKind::OptionString => "Option<String>",
        }
    }
}

// -----------------------------------------------------------------------------
// TypeTraitScalar

/// Marks a type as a wire scalar and converts it to and from [`FieldValue`].
///
/// # Examples
///
/// ```
/// use vc_codec::registry::{ScalarKind, TypeRegistry, TypeTraitScalar};
/// use core::any::TypeId;
///
/// let registry = TypeRegistry::new();
/// let scalar = registry
///     .get_type_trait::<TypeTraitScalar>(TypeId::of::<i32>())
///     .unwrap();
///
/// assert_eq!(scalar.kind(), ScalarKind::I32);
///
/// let field = scalar.to_field(&7_i32).unwrap();
/// let value = scalar.from_field(field).unwrap();
/// assert_eq!(*value.downcast::<i32>().unwrap(), 7);
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitScalar {
    kind: ScalarKind,
    to_field: fn(&dyn Any) -> Option<FieldValue>,
    from_field: fn(FieldValue) -> Option<Box<dyn Any + Send>>,
}

impl TypeTraitScalar {
    #[inline(always)]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Converts `value` into a field value.
    ///
    /// Returns `None` if `value` is not of the registered type.
    #[inline]
    pub fn to_field(&self, value: &dyn Any) -> Option<FieldValue> {
        (self.to_field)(value)
    }

    /// Converts a field value back into the registered type.
    ///
    /// Returns `None` if the field does not hold this kind.
    #[inline]
    pub fn from_field(&self, value: FieldValue) -> Option<Box<dyn Any + Send>> {
        (self.from_field)(value)
    }
}

impl<T: FieldScalar + Clone + Any + Send> FromType<T> for TypeTraitScalar {
    fn from_type() -> Self {
        Self {
            kind: T::KIND,
            to_field: |value| value.downcast_ref::<T>().cloned().map(T::into_field),
            from_field: |value| match T::from_field(value) {
                Ok(value) => Some(Box::new(value)),
                Err(_) => None,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
