use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::StateError;
use crate::registry::{DeclaredType, ScalarKind};

// -----------------------------------------------------------------------------
// FieldValue

/// One value in a [`FieldBag`].
#[derive(Debug)]
pub enum FieldValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    /// Nullable text. Absent and empty text are distinct.
    Text(Option<String>),
    /// A value encoded with the strategy of its own declared type.
    Nested(NestedValue),
}

impl FieldValue {
    /// Returns the scalar kind, or `None` for [`FieldValue::Nested`].
    pub const fn kind(&self) -> Option<ScalarKind> {
        Some(match self {
            FieldValue::Bool(_) => ScalarKind::Bool,
            FieldValue::I8(_) => ScalarKind::I8,
            FieldValue::I16(_) => ScalarKind::I16,
            FieldValue::I32(_) => ScalarKind::I32,
            FieldValue::I64(_) => ScalarKind::I64,
            FieldValue::U8(_) => ScalarKind::U8,
            FieldValue::U16(_) => ScalarKind::U16,
            FieldValue::U32(_) => ScalarKind::U32,
            FieldValue::U64(_) => ScalarKind::U64,
            FieldValue::F32(_) => ScalarKind::F32,
            FieldValue::F64(_) => ScalarKind::F64,
            FieldValue::Char(_) => ScalarKind::Char,
            FieldValue::Text(_) => ScalarKind::OptionString,
            FieldValue::Nested(_) => return None,
        })
    }

    /// Describes the held value in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(None) => "absent text",
            FieldValue::Text(Some(_)) => "text",
            FieldValue::Nested(nested) if nested.value.is_none() => "an absent nested value",
            FieldValue::Nested(nested) => nested.ty.name(),
            scalar => match scalar.kind() {
                Some(kind) => kind.name(),
                None => "unknown",
            },
        }
    }
}

// -----------------------------------------------------------------------------
// NestedValue

/// A field value that is not a wire scalar.
///
/// The value is encoded with the strategy of `ty`: another self-describing
/// object, a container or a proxy reference.
pub struct NestedValue {
    ty: DeclaredType,
    value: Option<Box<dyn Any + Send>>,
}

impl NestedValue {
    #[inline]
    pub fn new(ty: DeclaredType, value: Option<Box<dyn Any + Send>>) -> Self {
        Self { ty, value }
    }

    #[inline]
    pub const fn ty(&self) -> DeclaredType {
        self.ty
    }

    #[inline]
    pub fn value(&self) -> Option<&(dyn Any + Send)> {
        self.value.as_deref()
    }

    #[inline]
    pub fn into_value(self) -> Option<Box<dyn Any + Send>> {
        self.value
    }
}

impl fmt::Debug for NestedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedValue")
            .field("ty", &self.ty)
            .field("present", &self.value.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// FieldScalar

/// A Rust type stored in a [`FieldBag`] as a wire scalar.
pub trait FieldScalar: Sized {
    const KIND: ScalarKind;

    fn into_field(self) -> FieldValue;

    /// Extracts `Self`, handing the value back if it holds another kind.
    fn from_field(value: FieldValue) -> Result<Self, FieldValue>;
}

macro_rules! impl_field_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldScalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                #[inline]
                fn into_field(self) -> FieldValue {
                    FieldValue::$variant(self)
                }

                #[inline]
                fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
                    match value {
                        FieldValue::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_field_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
}

impl FieldScalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    #[inline]
    fn into_field(self) -> FieldValue {
        FieldValue::Text(Some(self))
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Text(Some(text)) => Ok(text),
            other => Err(other),
        }
    }
}

impl FieldScalar for Option<String> {
    const KIND: ScalarKind = ScalarKind::OptionString;

    #[inline]
    fn into_field(self) -> FieldValue {
        FieldValue::Text(self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Text(text) => Ok(text),
            other => Err(other),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldBag

/// An ordered name to value snapshot of an object's exported state.
///
/// Produced by [`SelfDescribing::export_state`] and consumed by
/// [`SelfDescribing::from_state`]. Fields are encoded in insertion order.
/// Names are unique within a bag.
///
/// # Examples
///
/// ```
/// use vc_codec::{FieldBag, StateError};
///
/// let mut bag = FieldBag::new();
/// bag.add("number", i32::MIN).unwrap();
/// bag.add("text", None::<String>).unwrap();
///
/// // Names are unique.
/// assert_eq!(
///     bag.add("number", 0_i32),
///     Err(StateError::DuplicateField("number".into())),
/// );
///
/// assert_eq!(bag.take::<i32>("number"), Ok(i32::MIN));
/// assert_eq!(bag.take::<Option<String>>("text"), Ok(None));
/// assert!(bag.is_empty());
/// ```
///
/// [`SelfDescribing::export_state`]: crate::SelfDescribing::export_state
/// [`SelfDescribing::from_state`]: crate::SelfDescribing::from_state
#[derive(Debug, Default)]
pub struct FieldBag {
    fields: Vec<(Cow<'static, str>, FieldValue)>,
}

impl FieldBag {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(key, _)| key == name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the value of field `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.position(name).map(|index| &self.fields[index].1)
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (&**name, value))
    }

    /// Appends a raw field value.
    ///
    /// Fails with [`StateError::DuplicateField`] if `name` is already present.
    pub fn insert(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: FieldValue,
    ) -> Result<(), StateError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(StateError::DuplicateField(name));
        }
        self.fields.push((name, value));
        Ok(())
    }

    /// Appends a scalar field.
    #[inline]
    pub fn add<T: FieldScalar>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Result<(), StateError> {
        self.insert(name, value.into_field())
    }

    /// Appends a present nested field, encoded with the strategy of `T`.
    #[inline]
    pub fn add_nested<T: Any + Send + Clone>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: &T,
    ) -> Result<(), StateError> {
        let nested = NestedValue::new(DeclaredType::of::<T>(), Some(Box::new(value.clone())));
        self.insert(name, FieldValue::Nested(nested))
    }

    /// Appends a nullable nested field, encoded with the strategy of `T`.
    #[inline]
    pub fn add_nested_opt<T: Any + Send + Clone>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: Option<&T>,
    ) -> Result<(), StateError> {
        let value = value.map(|value| Box::new(value.clone()) as Box<dyn Any + Send>);
        self.insert(name, FieldValue::Nested(NestedValue::new(DeclaredType::of::<T>(), value)))
    }

    /// Removes and returns the raw value of field `name`.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.position(name)
            .map(|index| self.fields.swap_remove(index).1)
    }

    fn take_raw(&mut self, name: &str) -> Result<(Cow<'static, str>, FieldValue), StateError> {
        match self.position(name) {
            Some(index) => Ok(self.fields.swap_remove(index)),
            None => Err(StateError::MissingField(Cow::Owned(name.into()))),
        }
    }

    /// Removes field `name` and converts it to `T`.
    ///
    /// Fails with [`StateError::MissingField`] or
    /// [`StateError::FieldTypeMismatch`]. Absent text taken as a `String` is
    /// a mismatch.
    pub fn take<T: FieldScalar>(&mut self, name: &str) -> Result<T, StateError> {
        let (name, value) = self.take_raw(name)?;
        T::from_field(value).map_err(|found| StateError::FieldTypeMismatch {
            name,
            expected: T::KIND.name(),
            found: found.type_name(),
        })
    }

    /// Removes a present nested field and downcasts it to `T`.
    pub fn take_nested<T: Any>(&mut self, name: &str) -> Result<T, StateError> {
        let (name, value) = self.take_raw(name)?;
        match value {
            FieldValue::Nested(NestedValue {
                value: Some(value), ..
            }) => match (value as Box<dyn Any>).downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(Self::nested_mismatch::<T>(name, "a nested value of another type")),
            },
            other => Err(Self::nested_mismatch::<T>(name, other.type_name())),
        }
    }

    /// Removes a nullable nested field and downcasts it to `T`.
    pub fn take_nested_opt<T: Any>(&mut self, name: &str) -> Result<Option<T>, StateError> {
        let (name, value) = self.take_raw(name)?;
        match value {
            FieldValue::Nested(NestedValue { value: None, .. }) => Ok(None),
            FieldValue::Nested(NestedValue {
                value: Some(value), ..
            }) => match (value as Box<dyn Any>).downcast::<T>() {
                Ok(value) => Ok(Some(*value)),
                Err(_) => Err(Self::nested_mismatch::<T>(name, "a nested value of another type")),
            },
            other => Err(Self::nested_mismatch::<T>(name, other.type_name())),
        }
    }

    fn nested_mismatch<T: Any>(name: Cow<'static, str>, found: &'static str) -> StateError {
        StateError::FieldTypeMismatch {
            name,
            expected: core::any::type_name::<T>(),
            found,
        }
    }

    pub(crate) fn into_fields(self) -> Vec<(Cow<'static, str>, FieldValue)> {
        self.fields
    }
}

// -----------------------------------------------------------------------------
// Tests
