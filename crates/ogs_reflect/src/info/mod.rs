//! Static type information.
//!
//! Every serializable type exposes a `&'static` [`TypeInfo`] through
//! [`Typed`]. The serializer never inspects values directly: it describes the
//! static shape once, then drives values through the function pointers
//! stored in [`FieldInfo`] and the [`List`](crate::ops::List) operations.

// -----------------------------------------------------------------------------
// Modules

mod field_info;
mod list_info;
mod struct_info;
mod type_info;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use field_info::{DecodeFieldFn, EncodeFieldFn, FieldInfo};
pub use list_info::ListInfo;
pub use struct_info::StructInfo;
pub use type_info::{OpaqueInfo, PrimitiveInfo, TypeInfo, Typed};
pub use type_path::{Type, TypePath};
