use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectKind, ReflectMeta};

/// Generates `Typed`: a `StructInfo` whose fields carry non-capturing
/// accessors, or an `OpaqueInfo`.
pub(crate) fn impl_trait_typed(meta: &ReflectMeta) -> TokenStream {
    let ogs_reflect_path = meta.ogs_reflect_path();
    let info_ = crate::path::info_(ogs_reflect_path);
    let serial_ = crate::path::serial_(ogs_reflect_path);
    let macro_exports_ = crate::path::macro_exports_(ogs_reflect_path);
    let cell_ = crate::path::non_generic_type_info_cell_(ogs_reflect_path);
    let ident = meta.ident();

    let info = match meta.kind() {
        ReflectKind::Opaque => quote! {
            #info_::TypeInfo::Opaque(#info_::OpaqueInfo::new::<Self>())
        },
        ReflectKind::Struct { fields, extra } => {
            let fields = fields.iter().map(|field| {
                let member = &field.ident;
                let name = member.to_string();
                let ty = &field.ty;
                quote! {
                    #info_::FieldInfo::new::<#ty>(
                        #name,
                        |owner, serializer| {
                            let owner = #macro_exports_::downcast_ref::<Self>(owner)?;
                            <#ty as #serial_::GraphValue>::encode(&owner.#member, serializer)
                        },
                        |owner, deserializer, wire| {
                            let value = <#ty as #serial_::GraphValue>::decode(deserializer, wire)?;
                            #macro_exports_::downcast_mut::<Self>(owner)?.#member = value;
                            ::core::result::Result::Ok(())
                        },
                    )
                }
            });
            let by_value = meta.attrs().by_value.is_some();
            let extra_slot = extra.is_some();
            quote! {
                #info_::TypeInfo::Struct(
                    #info_::StructInfo::new::<Self>(&[#(#fields),*])
                        .with_by_value(#by_value)
                        .with_extra_slot(#extra_slot)
                )
            }
        }
    };

    quote! {
        impl #info_::Typed for #ident {
            fn type_info() -> &'static #info_::TypeInfo {
                static CELL: #cell_ = #cell_::new();
                CELL.get_or_init(|| #info)
            }
        }
    }
}
