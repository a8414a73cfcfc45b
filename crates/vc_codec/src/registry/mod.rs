//! Type registration and capability lookup.
//!
//! ## Menu
//!
//! - [`DeclaredType`]: the type asserted by the caller at both ends of a call.
//! - [`TypeTrait`]: a capability supported by a type.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a declared type plus its `TypeTrait` table.
//! - [`GetTypeMeta`]: produces the `TypeMeta` of a type and registers its dependencies.
//! - [`TypeRegistry`]: stores `TypeMeta`s; [`TypeRegistryArc`] shares one behind a lock.
//! - TypeTraits read by the strategy dispatcher:
//!     - [`TypeTraitScalar`]: wire scalars.
//!     - [`TypeTraitSelfDescribing`]: types exporting a [`FieldBag`](crate::FieldBag).
//!     - [`TypeTraitContainer`]: ordered sequences, see [`Container`].
//!     - [`TypeTraitProxy`]: `Arc<T>` references resolved to proxy identities.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use the [`inventory`] crate to implement static registration. Not all
//! platforms support it (although major platforms do); where it is not
//! supported the method returns `false` without causing any errors.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod declared;
mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use declared::DeclaredType;
pub use from_type::FromType;
pub use traits::{Container, TypeTraitContainer};
pub use traits::{ScalarKind, TypeTraitScalar};
pub use traits::{TypeTraitProxy, TypeTraitSelfDescribing};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
