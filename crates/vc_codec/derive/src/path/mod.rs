//! Paths into `vc_codec` used by the generated code.
//!
//! Kept in one place so a change to the `vc_codec` layout only touches
//! this module. The only special case is the crate path itself, see
//! [`vc_codec`].

use proc_macro2::TokenStream;
use quote::quote;

mod manifest;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `vc_codec` crate from the calling crate.
///
/// 1. For crates that depend on `vc_codec`, `::vc_codec` is returned.
/// 2. For crates that depend on `vc_bridge`, `::vc_bridge::codec` is returned.
/// 3. For other situations, `::vc_codec` is returned, but this may be incorrect.
///
/// Reading the manifest is not cheap, so the path is obtained once per
/// derive and passed around.
pub(crate) fn vc_codec() -> syn::Path {
    manifest::Manifest::shared(manifest::Manifest::codec_path)
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn self_describing_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::SelfDescribing
    }
}

#[inline(always)]
pub(crate) fn field_bag_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::FieldBag
    }
}

#[inline(always)]
pub(crate) fn state_error_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::StateError
    }
}

#[inline(always)]
pub(crate) fn declared_type_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::DeclaredType
    }
}

#[inline(always)]
pub(crate) fn get_type_meta_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::registry::GetTypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_meta_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::registry::TypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_registry_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::registry::TypeRegistry
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_codec_path::__macro_exports::auto_register
    }
}

// -----------------------------------------------------------------------------
// Prelude

#[inline(always)]
pub(crate) fn result_() -> TokenStream {
    quote! { ::core::result::Result }
}

#[inline(always)]
pub(crate) fn option_() -> TokenStream {
    quote! { ::core::option::Option }
}

#[inline(always)]
pub(crate) fn clone_() -> TokenStream {
    quote! { ::core::clone::Clone }
}

#[inline(always)]
pub(crate) fn default_() -> TokenStream {
    quote! { ::core::default::Default }
}
