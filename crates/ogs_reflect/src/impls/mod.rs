//! Reflection for foreign types, and the helpers used to write it.
//!
//! - primitives: `bool`, `char`, the fixed-width integers, `f32`, `f64`,
//!   `Decimal`, `DateTime<Utc>`, `Uuid` and `String`
//! - lists: `Vec<T>`, `VecDeque<T>`, `[T; N]`
//! - maps: `BTreeMap<K, V>` and `HashMap<K, V>`, written as lists of
//!   key/value pairs
//! - `(K, V)` through its [`KeyValue`] surrogate
//! - `()`, registered but never written

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod list;
mod map;
mod pair;
mod primitives;
mod unit;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use pair::KeyValue;

/// Joins `parts` into one allocation.
///
/// ```
/// use ogs_reflect::impls::concat;
///
/// assert_eq!(concat(&["Vec<", "u8", ">"]), "Vec<u8>");
/// ```
#[inline(never)]
pub fn concat(parts: &[&str]) -> ::alloc::string::String {
    let len = parts.iter().map(|part| part.len()).sum();
    let mut joined = ::alloc::string::String::with_capacity(len);
    for part in parts {
        joined.push_str(part);
    }
    joined
}
