use alloc::boxed::Box;

use crate::info::{FieldInfo, Type, TypePath};

// -----------------------------------------------------------------------------
// StructInfo

/// Layout of a struct with named members.
///
/// # Examples
///
/// ```
/// use ogs_reflect::{Reflect, info::Typed};
///
/// #[derive(Reflect, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let info = Point::type_info().as_struct().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.field("y").unwrap().type_path(), "i32");
/// ```
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[FieldInfo]>,
    by_value: bool,
    extra_slot: bool,
}

impl StructInfo {
    #[inline]
    pub fn new<T: TypePath>(fields: &[FieldInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            by_value: false,
            extra_slot: false,
        }
    }

    /// Marks instances as plain values: they never take part in identity
    /// tracking, so a value reached twice is written twice.
    #[inline]
    pub const fn with_by_value(mut self, by_value: bool) -> Self {
        self.by_value = by_value;
        self
    }

    /// Declares that the type keeps unrecognized members in an
    /// [`ExtraFields`](crate::graph::ExtraFields) slot.
    #[inline]
    pub const fn with_extra_slot(mut self, extra_slot: bool) -> Self {
        self.extra_slot = extra_slot;
        self
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline(always)]
    pub const fn is_by_value(&self) -> bool {
        self.by_value
    }

    #[inline(always)]
    pub const fn has_extra_slot(&self) -> bool {
        self.extra_slot
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }
}
