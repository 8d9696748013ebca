//! See following macros:
//!
//! - [`Reflect`]
//! - [`impl_auto_register`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Graph Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits:
///
/// - `TypePath`
/// - `Typed`
/// - `Reflect`
/// - `GetTypeMeta`
/// - `GraphValue`
///
/// Generic types are not supported.
///
/// ## Structs
///
/// Named members are serialized in declaration order. The type must
/// implement `Default`: decoding starts from the default instance and
/// assigns each member it reads.
///
/// A struct used as a member of another type is written *inline* (its
/// members follow the owner's directly, with no header and no identity),
/// unless it has an `extra` slot. Behind a `Ref` it is a shared object.
///
/// Unit structs are structs without members.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Account {
///     owner: String,
///     balance: rust_decimal::Decimal,
///     #[reflect(skip)]
///     cached_total: u64,
/// }
/// ```
///
/// ## Type Path
///
/// The default type path is `module_path!()` followed by the identifier.
/// Types that move between modules, or must match a peer that names them
/// differently, set it explicitly:
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(type_path = "ledger::Account")]
/// struct Account { /* ... */ }
/// ```
///
/// ## By Value
///
/// `#[reflect(by_value)]` marks a type as having no identity. Every
/// occurrence is written in full, even behind two handles to the same
/// object.
///
/// ## Extra Members
///
/// A single field of type `ExtraFields` marked `#[reflect(extra)]` collects
/// members found on the wire that the type does not declare. They are
/// written back after the declared members, so a round trip through an
/// older version keeps them.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Profile {
///     name: String,
///     #[reflect(extra)]
///     unknown: ExtraFields,
/// }
/// ```
///
/// ## Opaque and Surrogate Types
///
/// `#[reflect(opaque)]` hides the layout. Such a type can only be written
/// through a `Surrogate`, declared with `#[reflect(surrogate)]` (which
/// implies `opaque`) and an `impl Surrogate`. Tuple structs and enums must
/// be opaque.
///
/// Opaque types get `TypeTraitConstruct` only with `#[reflect(default)]`,
/// which requires `Default`.
///
/// ## Auto Registration
///
/// `#[reflect(auto_register)]` submits the type to the link-time registry,
/// so `TypeRegistry::auto_register` picks it up. It is a no-op when the
/// `auto_register` feature is disabled.
///
/// ## Field Attributes
///
/// - `skip`: the member is left out of the layout and keeps its default
///   when decoding.
/// - `extra`: see above.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectMeta::from_ast(&ast) {
        Ok(meta) => impls::impl_reflect(&meta).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Adds a type to the link-time registry.
///
/// If the feature is not enabled, this macro does nothing.
///
/// ## Example
///
/// ```ignore
/// impl_auto_register!(ledger::Account);
/// impl_auto_register!(Vec<ledger::Account>);
/// ```
///
/// See: [`derive Reflect`](derive_reflect)
#[proc_macro]
pub fn impl_auto_register(_input: TokenStream) -> TokenStream {
    #[cfg(not(feature = "auto_register"))]
    return TokenStream::new();

    #[cfg(feature = "auto_register")]
    {
        use quote::quote;

        let ty = parse_macro_input!(_input as syn::Type);

        let ogs_reflect_path = path::ogs_reflect();
        let auto_register_ = path::auto_register_(&ogs_reflect_path);

        TokenStream::from(quote! {
            const _: () = {
                #auto_register_::inventory::submit! {
                    #auto_register_::__AutoRegisterFunc(
                        <#ty as #auto_register_::__RegisterType>::__register
                    )
                }
            };
        })
    }
}
