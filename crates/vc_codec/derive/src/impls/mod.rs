//! Code generation for `#[derive(SelfDescribing)]`.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::CodecDerive;

mod auto_register;
mod trait_get_type_meta;
mod trait_self_describing;

/// Generates every impl for `derive_data`.
pub(crate) fn impl_self_describing(derive_data: &CodecDerive) -> TokenStream {
    let self_describing = trait_self_describing::impl_trait_self_describing(derive_data);
    let get_type_meta = trait_get_type_meta::impl_trait_get_type_meta(derive_data);
    let auto_register = auto_register::get_auto_register_impl(derive_data);

    quote! {
        #self_describing

        #get_type_meta

        #auto_register
    }
}
