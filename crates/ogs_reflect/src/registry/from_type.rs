use crate::info::Typed;

/// Builds a [`TypeTrait`](crate::registry::TypeTrait) for `T`.
///
/// # Example
///
/// ```
/// # use ogs_reflect::registry::{TypeMeta, TypeTraitConstruct, FromType};
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitConstruct>(FromType::<String>::from_type());
/// assert!(meta.has_trait::<TypeTraitConstruct>());
/// ```
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
