use core::any::Any;

use crate::StateError;
use crate::object::FieldBag;
use crate::registry::DeclaredType;

/// A type that controls exactly which fields cross the boundary and how it
/// is rebuilt from them.
///
/// Decoding calls [`from_state`](Self::from_state) and nothing else: no
/// `Default`, no constructor. Whatever a type's normal initialization does is
/// not observable on a decoded value unless `from_state` does it too.
///
/// Usually derived, see [`derive::SelfDescribing`](crate::derive::SelfDescribing).
///
/// # Examples
///
/// ```
/// use vc_codec::{DeclaredType, FieldBag, SelfDescribing, StateError};
///
/// struct Order {
///     id: u64,
///     lines: Vec<String>,
///     created_by_default: bool,
/// }
///
/// impl Default for Order {
///     fn default() -> Self {
///         Order { id: 0, lines: Vec::new(), created_by_default: true }
///     }
/// }
///
/// impl SelfDescribing for Order {
///     fn export_state(&self) -> Result<FieldBag, StateError> {
///         let mut bag = FieldBag::with_capacity(2);
///         bag.add("id", self.id)?;
///         bag.add_nested("lines", &self.lines)?;
///         Ok(bag)
///     }
///
///     fn from_state(mut bag: FieldBag) -> Result<Self, StateError> {
///         Ok(Order {
///             id: bag.take("id")?,
///             lines: bag.take_nested("lines")?,
///             created_by_default: false,
///         })
///     }
///
///     fn nested_field_type(name: &str) -> Option<DeclaredType> {
///         match name {
///             "lines" => Some(DeclaredType::of::<Vec<String>>()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait SelfDescribing: Any + Send + Sized {
    /// Snapshots the fields to transmit.
    fn export_state(&self) -> Result<FieldBag, StateError>;

    /// Rebuilds a value from a decoded bag.
    ///
    /// Must not go through the type's default initialization.
    fn from_state(bag: FieldBag) -> Result<Self, StateError>;

    /// Returns the declared type of the nested field `name`.
    ///
    /// The wire does not carry type names, so every field added with
    /// [`FieldBag::add_nested`] or [`FieldBag::add_nested_opt`] must be
    /// listed here for the decoder to read it back.
    #[inline]
    fn nested_field_type(name: &str) -> Option<DeclaredType> {
        let _ = name;
        None
    }
}

// -----------------------------------------------------------------------------
// Tests
