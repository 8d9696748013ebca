use crate::derive_data::ReflectMeta;

/// Submits the type to the link-time registry.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    let Some(span) = meta.attrs().auto_register else {
        return proc_macro2::TokenStream::new();
    };

    let auto_register_ = crate::path::auto_register_(meta.ogs_reflect_path());
    let ident = meta.ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectMeta) -> proc_macro2::TokenStream {
    proc_macro2::TokenStream::new()
}
