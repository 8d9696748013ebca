//! The object graph: shared handles, dynamic values and the objects that
//! stand in for types the reader does not know.

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod extra;
mod shared;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::{DynamicList, DynamicObject};
pub use extra::{ExtraField, ExtraFields};
pub use shared::{DynRef, Ref, SharedObject};
pub use value::Value;
