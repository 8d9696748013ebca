// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_get_type_meta;
mod trait_graph_value;
mod trait_reflect;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use auto_register::get_auto_register_impl;
use trait_get_type_meta::impl_trait_get_type_meta;
use trait_graph_value::impl_trait_graph_value;
use trait_reflect::impl_trait_reflect;
use trait_type_path::impl_trait_type_path;
use trait_typed::impl_trait_typed;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Every impl `#[derive(Reflect)]` emits, wrapped in an anonymous const.
pub(crate) fn impl_reflect(meta: &ReflectMeta) -> TokenStream {
    let type_path = impl_trait_type_path(meta);
    let typed = impl_trait_typed(meta);
    let reflect = impl_trait_reflect(meta);
    let get_type_meta = impl_trait_get_type_meta(meta);
    let graph_value = impl_trait_graph_value(meta);
    let auto_register = get_auto_register_impl(meta);

    quote! {
        const _: () = {
            #type_path
            #typed
            #reflect
            #get_type_meta
            #graph_value
            #auto_register
        };
    }
}
