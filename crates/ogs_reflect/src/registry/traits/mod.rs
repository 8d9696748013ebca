mod construct;
mod surrogate;

pub use construct::TypeTraitConstruct;
pub use surrogate::{Surrogate, TypeTraitSurrogate};
