//! Reflection-driven binary serialization of object graphs.
//!
//! Values are described by static [`TypeInfo`](info::TypeInfo), registered
//! in a [`TypeRegistry`](registry::TypeRegistry) and written by the
//! [`Serializer`](serial::Serializer). Objects behind a shared
//! [`Ref`](graph::Ref) keep their identity across a round trip, including
//! cycles.
//!
//! ```
//! use ogs_reflect::{Reflect, graph::Ref};
//! use ogs_reflect::registry::TypeRegistryArc;
//! use ogs_reflect::serial::{Deserializer, Serializer};
//!
//! #[derive(Reflect, Default)]
//! struct Account {
//!     owner: String,
//!     balance: i64,
//! }
//!
//! #[derive(Reflect, Default)]
//! struct Ledger {
//!     main: Ref<Account>,
//!     mirror: Ref<Account>,
//! }
//!
//! let account = Ref::new(Account { owner: "ada".into(), balance: 10 });
//! let ledger = Ledger { main: account.clone(), mirror: account };
//!
//! let registry = TypeRegistryArc::default();
//! let bytes = Serializer::new(registry.clone()).serialize_to_vec(&ledger).unwrap();
//! let copy: Ledger = Deserializer::new(registry).deserialize_slice(&bytes).unwrap();
//!
//! assert!(copy.main.ptr_eq(&copy.mirror));
//! assert_eq!(copy.main.read().owner, "ada");
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// Lets the derive macro name this crate `ogs_reflect` from inside it.
extern crate self as ogs_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod graph;
pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;
pub mod serial;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use ogs_reflect_derive as derive;
pub use ogs_reflect_derive::Reflect;
pub use reflection::Reflect;
