//! Runtime type registration.
//!
//! A [`TypeRegistry`] maps type ids and type paths to [`TypeMeta`]: the
//! static [`TypeInfo`](crate::info::TypeInfo) plus a table of
//! [`TypeTrait`] capabilities. The serializer needs two of them:
//!
//! - [`TypeTraitConstruct`]: makes the default instance that decoding fills.
//! - [`TypeTraitSurrogate`]: converts an opaque type to and from its simple
//!   stand-in.

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{Surrogate, TypeTraitConstruct, TypeTraitSurrogate};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
