use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::Ident;
use syn::spanned::Spanned;

use crate::derive_data::{CodecDerive, FieldMode};

/// Generate implementation code for `GetTypeMeta` trait.
///
/// Every scalar field type and every nested declared type is registered as
/// a dependency. Skipped fields are not.
pub(crate) fn impl_trait_get_type_meta(derive_data: &CodecDerive) -> TokenStream {
    let vc_codec_path = derive_data.vc_codec_path();
    let get_type_meta_ = crate::path::get_type_meta_(vc_codec_path);
    let type_meta_ = crate::path::type_meta_(vc_codec_path);
    let type_registry_ = crate::path::type_registry_(vc_codec_path);

    let registry = Ident::new("__registry", Span::call_site());

    let register_deps: Vec<_> = derive_data
        .active_fields()
        .map(|field| {
            let ty = match field.attrs.mode {
                FieldMode::Nested => field.nested_type().0,
                _ => field.ty,
            };
            quote_spanned! { ty.span() =>
                #type_registry_::register::<#ty>(#registry);
            }
        })
        .collect();

    // Keeps a type without fields free of an unused parameter.
    let register_fn = if register_deps.is_empty() {
        crate::utils::empty()
    } else {
        quote! {
            fn register_dependencies(#registry: &mut #type_registry_) {
                #(#register_deps)*
            }
        }
    };

    let ident = derive_data.ident();

    quote! {
        impl #get_type_meta_ for #ident {
            fn get_type_meta() -> #type_meta_ {
                #type_meta_::self_describing::<Self>()
            }

            #register_fn
        }
    }
}
