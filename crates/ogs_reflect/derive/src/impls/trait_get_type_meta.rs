use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::{ReflectKind, ReflectMeta};

/// Generates `GetTypeMeta`.
///
/// Structs always get `TypeTraitConstruct`, so they must implement
/// `Default`. Opaque types only get it with `#[reflect(default)]`.
pub(crate) fn impl_trait_get_type_meta(meta: &ReflectMeta) -> TokenStream {
    let ogs_reflect_path = meta.ogs_reflect_path();
    let registry_ = crate::path::registry_(ogs_reflect_path);
    let serial_ = crate::path::serial_(ogs_reflect_path);
    let ident = meta.ident();
    let attrs = meta.attrs();

    let insert_construct = match (meta.kind(), attrs.default) {
        (ReflectKind::Struct { .. }, _) => quote! {
            meta.insert_trait(<#registry_::TypeTraitConstruct as #registry_::FromType<Self>>::from_type());
        },
        (ReflectKind::Opaque, Some(span)) => quote_spanned! { span =>
            meta.insert_trait(<#registry_::TypeTraitConstruct as #registry_::FromType<Self>>::from_type());
        },
        (ReflectKind::Opaque, None) => TokenStream::new(),
    };

    let (insert_surrogate, register_simple) = match attrs.surrogate {
        Some(span) => (
            quote_spanned! { span =>
                meta.insert_trait(<#registry_::TypeTraitSurrogate as #registry_::FromType<Self>>::from_type());
            },
            quote_spanned! { span =>
                registry.register::<<Self as #registry_::Surrogate>::Simple>();
            },
        ),
        None => (TokenStream::new(), TokenStream::new()),
    };

    let register_fields = match meta.kind() {
        ReflectKind::Struct { fields, .. } => fields
            .iter()
            .map(|field| {
                let ty = &field.ty;
                quote! {
                    <#ty as #serial_::GraphValue>::register_field_types(registry);
                }
            })
            .collect(),
        ReflectKind::Opaque => TokenStream::new(),
    };

    quote! {
        impl #registry_::GetTypeMeta for #ident {
            fn get_type_meta() -> #registry_::TypeMeta {
                let mut meta = #registry_::TypeMeta::of::<Self>();
                #insert_construct
                #insert_surrogate
                meta
            }

            #[allow(unused_variables)]
            fn register_dependencies(registry: &mut #registry_::TypeRegistry) {
                #register_fields
                #register_simple
            }
        }
    }
}
