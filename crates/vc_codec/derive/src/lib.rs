//! Derive macro for `vc_codec`.
//!
//! See [`SelfDescribing`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static CODEC_ATTRIBUTE_NAME: &str = "codec";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Self-Describing Derivation
///
/// `#[derive(SelfDescribing)]` implements the following traits:
///
/// - `SelfDescribing`: exports every field into a `FieldBag` and rebuilds the
///   value from one.
/// - `GetTypeMeta`: so the type can be registered with
///   `TypeRegistry::register`, which also registers every field type.
///
/// Only structs with named fields (and unit structs) are supported. Generic
/// types are rejected, since the wire carries no type names to pick their
/// arguments from.
///
/// ```rust, ignore
/// #[derive(SelfDescribing)]
/// struct Account {
///     id: u64,
///     owner: Option<String>,
/// }
/// ```
///
/// Decoding calls only the generated `from_state`. The type's own `Default`
/// or constructors never run for a decoded value.
///
/// ## Scalar Fields
///
/// By default a field is a wire scalar: `bool`, `char`, the integers,
/// `f32`, `f64`, `String` or `Option<String>`. It is exported with a
/// clone of its value, so the field type must be `Clone`.
///
/// ## Nested Fields
///
/// Any other registered type (another self-describing type, a `Vec<T>`,
/// an `Arc<T>` proxy reference, ...) is marked `nested`. It is encoded with
/// the strategy of its own type.
///
/// ```rust, ignore
/// #[derive(SelfDescribing)]
/// struct Order {
///     id: u64,
///     #[codec(nested)]
///     lines: Vec<String>,
///     #[codec(nested)]
///     customer: Option<Arc<Customer>>,
/// }
/// ```
///
/// A nested field of type `Option<T>` is nullable: `None` is written as an
/// absent value and `T` is the declared type of the present one.
///
/// ## Renaming
///
/// The wire name is the field name unless `rename` is given. Names must be
/// unique within the type.
///
/// ```rust, ignore
/// #[derive(SelfDescribing)]
/// struct Sample {
///     #[codec(rename = "str")]
///     text: Option<String>,
/// }
/// ```
///
/// ## Skipping
///
/// A `skip` field is not exported. On decode it is set to the `Default` of
/// the field type (not of the struct), so the field type must implement
/// `Default`.
///
/// ```rust, ignore
/// #[derive(SelfDescribing)]
/// struct Session {
///     user: String,
///     #[codec(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
///
/// ## Auto Registration
///
/// With the `auto_register` feature, the type attribute below submits the
/// type to `inventory`, and `TypeRegistry::auto_register` registers it.
///
/// ```rust, ignore
/// #[derive(SelfDescribing)]
/// #[codec(auto_register)]
/// struct Heartbeat {
///     sequence: u64,
/// }
/// ```
///
/// Without the feature the attribute is accepted and ignored.
#[proc_macro_derive(SelfDescribing, attributes(codec))]
pub fn derive_self_describing(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive_data = match derive_data::CodecDerive::from_input(&ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error().into(),
    };

    impls::impl_self_describing(&derive_data).into()
}
