use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generates `GraphValue`.
///
/// Structs with a fixed layout are written inline when used as a member.
/// Structs with an extra-member slot and opaque types are objects.
pub(crate) fn impl_trait_graph_value(meta: &ReflectMeta) -> TokenStream {
    let ogs_reflect_path = meta.ogs_reflect_path();
    let serial_ = crate::path::serial_(ogs_reflect_path);
    let info_ = crate::path::info_(ogs_reflect_path);
    let registry_ = crate::path::registry_(ogs_reflect_path);
    let ident = meta.ident();

    let inline_methods = if meta.is_inline() {
        quote! {
            const FIELD_KIND: #serial_::RawKind = #serial_::RawKind::Inline;

            #[inline]
            fn inline_info() -> ::core::option::Option<&'static #info_::TypeInfo> {
                ::core::option::Option::Some(<Self as #info_::Typed>::type_info())
            }

            #[inline]
            fn encode(
                &self,
                serializer: &mut #serial_::SerializeDriver<'_>,
            ) -> ::core::result::Result<(), #serial_::SerialError> {
                serializer.write_inline(self)
            }

            #[inline]
            fn decode(
                deserializer: &mut #serial_::DeserializeDriver<'_>,
                field: &#serial_::FieldDescriptor,
            ) -> ::core::result::Result<Self, #serial_::SerialError> {
                deserializer.read_inline(field)
            }
        }
    } else {
        quote! {
            const FIELD_KIND: #serial_::RawKind = #serial_::RawKind::Object;
        }
    };

    quote! {
        impl #serial_::GraphValue for #ident {
            #inline_methods

            #[inline]
            fn register_field_types(registry: &mut #registry_::TypeRegistry) {
                registry.register::<Self>();
            }

            #[inline]
            fn encode_complex(
                &self,
                serializer: &mut #serial_::SerializeDriver<'_>,
            ) -> ::core::result::Result<(), #serial_::SerialError> {
                serializer.write_owned(self)
            }

            #[inline]
            fn decode_complex(
                deserializer: &mut #serial_::DeserializeDriver<'_>,
                header: #serial_::Header,
            ) -> ::core::result::Result<Self, #serial_::SerialError> {
                deserializer.read_owned(header)
            }
        }
    }
}
