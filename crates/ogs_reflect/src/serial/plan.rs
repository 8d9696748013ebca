use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;

use uuid::Uuid;

use crate::Reflect;
use crate::info::{DecodeFieldFn, EncodeFieldFn};
use crate::registry::{TypeTraitConstruct, TypeTraitSurrogate};

// -----------------------------------------------------------------------------
// Binding

/// What a decode plan is bound against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// The statically expected type.
    Static(TypeId),
    /// A polymorphic slot: the type is looked up by the descriptor's name.
    ByName,
}

// -----------------------------------------------------------------------------
// Plans

/// How to write the members of a type under one descriptor.
pub(crate) enum EncodePlan {
    Plain(Box<[FieldEncoder]>),
    Collection,
    Surrogate {
        simplify: fn(&dyn Reflect) -> Option<Box<dyn Reflect>>,
        simple: Arc<EncodePlan>,
    },
    /// A dynamic object or list, written from its own descriptor.
    Structural,
}

pub(crate) enum FieldEncoder {
    Static(EncodeFieldFn),
    /// Index into the value's extra members.
    Extra(usize),
}

/// How to build a value from members laid out by one descriptor.
pub(crate) enum DecodePlan {
    /// The schema did not resolve: build a dynamic object or list.
    Unknown,
    Collection {
        construct: TypeTraitConstruct,
        insertion: Insertion,
    },
    Surrogate {
        surrogate: TypeTraitSurrogate,
        simple: Arc<DecodePlan>,
    },
    Plain {
        construct: TypeTraitConstruct,
        fields: Box<[FieldDecoder]>,
    },
}

/// One wire member, in wire order.
pub(crate) enum FieldDecoder {
    Bound(DecodeFieldFn),
    /// Stored in the target's extra members.
    Absorb,
    /// Read and dropped.
    Skip,
}

impl DecodePlan {
    /// Whether building with this plan reads wire members it cannot keep.
    pub(crate) fn drops_members(&self) -> bool {
        match self {
            DecodePlan::Plain { fields, .. } => {
                fields.iter().any(|field| matches!(field, FieldDecoder::Skip))
            }
            DecodePlan::Surrogate { simple, .. } => simple.drops_members(),
            DecodePlan::Unknown | DecodePlan::Collection { .. } => false,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Insertion {
    Append,
    Index { len: usize },
}

// -----------------------------------------------------------------------------
// Keys

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EncodeKey {
    pub type_id: TypeId,
    pub descriptor: Uuid,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DecodeKey {
    pub binding: Binding,
    pub descriptor: Uuid,
    pub flags: u8,
}
