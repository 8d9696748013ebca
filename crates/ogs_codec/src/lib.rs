//! Primitive binary codec used by the object graph serializer.
//!
//! The codec only knows fixed primitive shapes: it never sees headers,
//! descriptors or object identity. Those live in `ogs_reflect::serial`.
//!
//! | kind            | encoding                                         |
//! |-----------------|--------------------------------------------------|
//! | integers/floats | little-endian, fixed width                       |
//! | `bool`          | one byte, `0` or `1`                             |
//! | `char`          | `u32` scalar value                               |
//! | strings         | 7-bit variable length prefix, then UTF-8 bytes   |
//! | [`Uuid`]        | 16 raw bytes                                     |
//! | [`Decimal`]     | the 16-byte `rust_decimal` layout                |
//! | [`DateTime`]    | RFC 3339 text, written as a string               |
//!
//! [`Uuid`]: uuid::Uuid
//! [`Decimal`]: rust_decimal::Decimal
//! [`DateTime`]: chrono::DateTime

// -----------------------------------------------------------------------------
// Extern Crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use error::CodecError;
pub use reader::{DocumentReader, StreamReader};
pub use writer::{DocumentWriter, StreamWriter};

// -----------------------------------------------------------------------------
// Re-export crates

pub use chrono;
pub use rust_decimal;
pub use uuid;

/// Largest byte count a length prefix may carry.
pub const MAX_LENGTH: usize = u32::MAX as usize;
