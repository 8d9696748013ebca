use crate::info::{Type, TypeInfo, TypePath};
use crate::serial::{GraphValue, RawKind};

// -----------------------------------------------------------------------------
// ListInfo

/// Layout of an ordered, countable collection.
///
/// Items are stored with the field kind of the item type. A list is either
/// growable (items are appended while decoding) or has a fixed length, in
/// which case items are set by index.
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    item: Type,
    item_kind: RawKind,
    item_inline: fn() -> Option<&'static TypeInfo>,
    fixed_len: Option<usize>,
}

impl ListInfo {
    #[inline]
    pub fn new<T: TypePath, I: GraphValue>() -> Self {
        Self {
            ty: Type::of::<T>(),
            item: Type::of::<I>(),
            item_kind: I::FIELD_KIND,
            item_inline: I::inline_info,
            fixed_len: None,
        }
    }

    #[inline]
    pub const fn with_fixed_len(mut self, len: usize) -> Self {
        self.fixed_len = Some(len);
        self
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn item(&self) -> &Type {
        &self.item
    }

    #[inline(always)]
    pub const fn item_kind(&self) -> RawKind {
        self.item_kind
    }

    #[inline]
    pub fn item_inline(&self) -> Option<&'static TypeInfo> {
        (self.item_inline)()
    }

    /// `Some(len)` for arrays.
    #[inline(always)]
    pub const fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }
}
