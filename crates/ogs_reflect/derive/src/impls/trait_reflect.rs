use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectKind, ReflectMeta};

pub(crate) fn impl_trait_reflect(meta: &ReflectMeta) -> TokenStream {
    let ogs_reflect_path = meta.ogs_reflect_path();
    let reflect_ = crate::path::reflect_(ogs_reflect_path);
    let info_ = crate::path::info_(ogs_reflect_path);
    let macro_exports_ = crate::path::macro_exports_(ogs_reflect_path);
    let ident = meta.ident();

    let extra_methods = match meta.kind() {
        ReflectKind::Struct {
            extra: Some(extra), ..
        } => {
            let extra_fields_ = crate::path::extra_fields_(ogs_reflect_path);
            quote! {
                #[inline]
                fn extra_fields(&self) -> ::core::option::Option<&#extra_fields_> {
                    ::core::option::Option::Some(&self.#extra)
                }

                #[inline]
                fn extra_fields_mut(&mut self) -> ::core::option::Option<&mut #extra_fields_> {
                    ::core::option::Option::Some(&mut self.#extra)
                }
            }
        }
        _ => TokenStream::new(),
    };

    quote! {
        impl #reflect_ for #ident {
            #[inline]
            fn reflect_type_info(&self) -> &'static #info_::TypeInfo {
                <Self as #info_::Typed>::type_info()
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(self: #macro_exports_::Box<Self>) -> #macro_exports_::Box<dyn ::core::any::Any> {
                self
            }

            #[inline]
            fn as_reflect(&self) -> &dyn #reflect_ {
                self
            }

            #[inline]
            fn as_reflect_mut(&mut self) -> &mut dyn #reflect_ {
                self
            }

            #[inline]
            fn into_reflect(self: #macro_exports_::Box<Self>) -> #macro_exports_::Box<dyn #reflect_> {
                self
            }

            #extra_methods
        }
    }
}
