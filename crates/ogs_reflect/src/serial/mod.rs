//! The binary object-graph format.
//!
//! A stream holds one root value. Objects are written with a [`Header`]:
//! the first occurrence of a shared object carries its [`TypeDescriptor`]
//! and members, later occurrences are back-references to its visit index.
//! Descriptors are written in full once per stream and by id afterwards.
//!
//! Reading binds each descriptor to a local type through the [`Strategy`]
//! chain. Bound plans live in a [`CodecCache`] keyed by type and descriptor
//! identity, so repeated calls skip the binding work.

// -----------------------------------------------------------------------------
// Modules

mod binder;
mod cache;
mod config;
mod de;
mod descriptor;
mod error;
mod graph_value;
mod kind;
mod plan;
mod ser;
mod tracker;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use binder::Strategy;
pub use cache::CodecCache;
pub use config::SerialConfig;
pub use de::{DeserializeDriver, Deserializer};
pub use descriptor::{FieldDescriptor, ITEM_FIELD, TypeDescriptor, describe};
pub use error::SerialError;
pub use graph_value::GraphValue;
pub use kind::{Header, RawKind};
pub use plan::Binding;
pub use ser::{SerializeDriver, Serializer};

pub(crate) use kind::for_each_primitive;
