use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::Ident;
use syn::spanned::Spanned;

use crate::derive_data::{CodecDerive, CodecField, FieldMode};

/// Generate implementation code for `SelfDescribing` trait.
pub(crate) fn impl_trait_self_describing(derive_data: &CodecDerive) -> TokenStream {
    let vc_codec_path = derive_data.vc_codec_path();
    let self_describing_ = crate::path::self_describing_(vc_codec_path);
    let field_bag_ = crate::path::field_bag_(vc_codec_path);
    let state_error_ = crate::path::state_error_(vc_codec_path);
    let declared_type_ = crate::path::declared_type_(vc_codec_path);
    let result_ = crate::path::result_();
    let option_ = crate::path::option_();

    let bag = Ident::new("__bag", Span::call_site());

    let export_state = impl_export_state(derive_data, &bag);
    let from_state = impl_from_state(derive_data, &bag);

    let nested_arms: Vec<_> = derive_data
        .active_fields()
        .filter(|field| field.attrs.mode == FieldMode::Nested)
        .map(|field| {
            let name = field.wire_name();
            let ty = field.nested_type().0;
            quote! {
                #name => #option_::Some(#declared_type_::of::<#ty>()),
            }
        })
        .collect();

    let nested_field_type = if nested_arms.is_empty() {
        crate::utils::empty()
    } else {
        quote! {
            fn nested_field_type(__name: &str) -> #option_<#declared_type_> {
                match __name {
                    #(#nested_arms)*
                    _ => #option_::None,
                }
            }
        }
    };

    let ident = derive_data.ident();
    let mut_bag = if derive_data.active_fields().next().is_some() {
        quote! { mut #bag }
    } else {
        quote! { #bag }
    };

    quote! {
        impl #self_describing_ for #ident {
            fn export_state(&self) -> #result_<#field_bag_, #state_error_> {
                #export_state
            }

            fn from_state(#mut_bag: #field_bag_) -> #result_<Self, #state_error_> {
                #from_state
            }

            #nested_field_type
        }
    }
}

fn impl_export_state(derive_data: &CodecDerive, bag: &Ident) -> TokenStream {
    let vc_codec_path = derive_data.vc_codec_path();
    let field_bag_ = crate::path::field_bag_(vc_codec_path);
    let result_ = crate::path::result_();
    let clone_ = crate::path::clone_();
    let option_ = crate::path::option_();

    let adds: Vec<_> = derive_data
        .active_fields()
        .map(|field| {
            let name = field.wire_name();
            let member = field.ident;
            match field.attrs.mode {
                FieldMode::Nested => match field.nested_type() {
                    (ty, true) => quote_spanned! { field.ty.span() =>
                        #field_bag_::add_nested_opt::<#ty>(&mut #bag, #name, #option_::as_ref(&self.#member))?;
                    },
                    (ty, false) => quote_spanned! { field.ty.span() =>
                        #field_bag_::add_nested::<#ty>(&mut #bag, #name, &self.#member)?;
                    },
                },
                _ => quote_spanned! { field.ty.span() =>
                    #field_bag_::add(&mut #bag, #name, #clone_::clone(&self.#member))?;
                },
            }
        })
        .collect();

    if adds.is_empty() {
        return quote! {
            #result_::Ok(#field_bag_::new())
        };
    }

    let capacity = adds.len();
    quote! {
        let mut #bag = #field_bag_::with_capacity(#capacity);
        #(#adds)*
        #result_::Ok(#bag)
    }
}

fn impl_from_state(derive_data: &CodecDerive, bag: &Ident) -> TokenStream {
    let result_ = crate::path::result_();

    // Nothing is taken from a bag without active fields.
    let discard = if derive_data.active_fields().next().is_none() {
        quote! { let _ = #bag; }
    } else {
        crate::utils::empty()
    };

    if derive_data.is_unit() {
        return quote! {
            #discard
            #result_::Ok(Self)
        };
    }

    let inits = derive_data
        .fields()
        .iter()
        .map(|field| field_init(derive_data, field, bag));

    quote! {
        #discard
        #result_::Ok(Self {
            #(#inits)*
        })
    }
}

fn field_init(derive_data: &CodecDerive, field: &CodecField, bag: &Ident) -> TokenStream {
    let field_bag_ = crate::path::field_bag_(derive_data.vc_codec_path());
    let default_ = crate::path::default_();

    let member = field.ident;
    let field_ty = field.ty;
    let name = field.wire_name();

    match field.attrs.mode {
        FieldMode::Scalar => quote_spanned! { field_ty.span() =>
            #member: #field_bag_::take::<#field_ty>(&mut #bag, #name)?,
        },
        FieldMode::Nested => match field.nested_type() {
            (ty, true) => quote_spanned! { field_ty.span() =>
                #member: #field_bag_::take_nested_opt::<#ty>(&mut #bag, #name)?,
            },
            (ty, false) => quote_spanned! { field_ty.span() =>
                #member: #field_bag_::take_nested::<#ty>(&mut #bag, #name)?,
            },
        },
        FieldMode::Skip => quote_spanned! { field_ty.span() =>
            #member: <#field_ty as #default_>::default(),
        },
    }
}
