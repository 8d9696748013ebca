//! Paths into `ogs_reflect` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// The path of `ogs_reflect` as seen from the crate being expanded.
///
/// 1. Crates depending on `ogs_reflect` get `::ogs_reflect`.
/// 2. Crates depending on the `ogs` facade get `::ogs::reflect`.
/// 3. Anything else gets `::ogs_reflect`, which `ogs_reflect` itself
///    satisfies through `extern crate self as ogs_reflect`.
///
/// Reading the manifest is not free, so the path is resolved once per
/// derive and passed around.
pub(crate) fn ogs_reflect() -> syn::Path {
    ogs_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("ogs_reflect"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn reflect_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::Reflect }
}

#[inline(always)]
pub(crate) fn info_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::info }
}

#[inline(always)]
pub(crate) fn registry_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::registry }
}

#[inline(always)]
pub(crate) fn serial_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::serial }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::impls::NonGenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn extra_fields_(ogs_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ogs_reflect_path::graph::ExtraFields }
}
