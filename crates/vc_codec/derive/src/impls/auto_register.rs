use crate::derive_data::CodecDerive;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(derive_data: &CodecDerive) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    // Generic types are rejected while parsing, so every derived type can
    // be submitted.
    match derive_data.attrs().auto_register {
        Some(span) => {
            let auto_register_ = crate::path::auto_register_(derive_data.vc_codec_path());
            let ident = derive_data.ident();

            quote_spanned! { span =>
                #auto_register_::inventory::submit!{
                    #auto_register_::__AutoRegisterFunc(
                        <#ident as #auto_register_::__RegisterType>::__register
                    )
                }
            }
        }
        None => crate::utils::empty(),
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &CodecDerive) -> proc_macro2::TokenStream {
    crate::utils::empty()
}
