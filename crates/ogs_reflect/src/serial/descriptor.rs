//! Serializable schemas.
//!
//! A [`TypeDescriptor`] is the wire form of a type: its name, kind and
//! ordered members. Descriptors of static types are derived once per process
//! from [`TypeInfo`] by [`describe`] and keep their identity for the life of
//! the process, so a stream can refer to a descriptor it already wrote by id
//! alone.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use ogs_utils::TypeIdMap;
use ogs_utils::hash::{FixedHashState, HashMap};
use uuid::Uuid;

use crate::Reflect;
use crate::graph::{DynamicList, DynamicObject, ExtraFields};
use crate::info::TypeInfo;
use crate::registry::{TypeRegistry, TypeTraitSurrogate};
use crate::serial::{RawKind, SerialError};

/// Name of the single member of a collection descriptor.
pub const ITEM_FIELD: &str = "item";

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One member of a [`TypeDescriptor`].
///
/// Members of kind [`Inline`](RawKind::Inline) carry the descriptor of the
/// embedded struct.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: Box<str>,
    kind: RawKind,
    nested: Option<Arc<TypeDescriptor>>,
}

impl FieldDescriptor {
    /// A member of any kind but [`Inline`](RawKind::Inline).
    #[inline]
    pub fn new(name: impl Into<Box<str>>, kind: RawKind) -> Self {
        debug_assert!(kind != RawKind::Inline);
        Self {
            name: name.into(),
            kind,
            nested: None,
        }
    }

    /// An [`Inline`](RawKind::Inline) member laid out by `nested`.
    #[inline]
    pub fn inline(name: impl Into<Box<str>>, nested: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            kind: RawKind::Inline,
            nested: Some(nested),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub const fn kind(&self) -> RawKind {
        self.kind
    }

    #[inline]
    pub fn nested(&self) -> Option<&Arc<TypeDescriptor>> {
        self.nested.as_ref()
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.nested.as_ref().map(|nested| nested.id())
                == other.nested.as_ref().map(|nested| nested.id())
    }
}

impl Eq for FieldDescriptor {}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nested {
            Some(nested) => write!(f, "{}: inline {}", self.name, nested.name()),
            None => write!(f, "{}: {}", self.name, self.kind.name()),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The schema of an object or collection.
///
/// Two descriptors are equal when their ids are. The id is random, so it
/// names one schema within one process and within the streams written by
/// that process.
pub struct TypeDescriptor {
    id: Uuid,
    name: Box<str>,
    kind: RawKind,
    by_value: bool,
    fields: Box<[FieldDescriptor]>,
}

impl TypeDescriptor {
    /// Creates a descriptor with a fresh id.
    pub fn new(
        name: impl Into<Box<str>>,
        kind: RawKind,
        by_value: bool,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, kind, by_value, fields)
    }

    pub(crate) fn with_id(
        id: Uuid,
        name: impl Into<Box<str>>,
        kind: RawKind,
        by_value: bool,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            by_value,
            fields: fields.into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The type path of the described type.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// [`Object`](RawKind::Object) or [`Collection`](RawKind::Collection).
    #[inline(always)]
    pub const fn kind(&self) -> RawKind {
        self.kind
    }

    /// Instances skip identity tracking.
    #[inline(always)]
    pub const fn is_by_value(&self) -> bool {
        self.by_value
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[inline]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        self.kind == RawKind::Collection
    }

    /// The item member of a collection descriptor.
    #[inline]
    pub fn item(&self) -> Option<&FieldDescriptor> {
        match self.kind {
            RawKind::Collection => self.fields.first(),
            _ => None,
        }
    }
}

impl PartialEq for TypeDescriptor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("by_value", &self.by_value)
            .field("fields", &self.fields)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// describe

static DESCRIPTORS: RwLock<TypeIdMap<Arc<TypeDescriptor>>> = RwLock::new(TypeIdMap::new());

/// Returns the process-wide descriptor of a static type.
///
/// The first call for a type builds the descriptor; every later call returns
/// the same `Arc`. `registry` is consulted for the surrogates of opaque
/// types.
///
/// # Errors
///
/// [`SerialError::UnsupportedTypeKind`] for primitives, which are never
/// described, and for opaque types without a registered surrogate.
pub fn describe(
    info: &'static TypeInfo,
    registry: &TypeRegistry,
) -> Result<Arc<TypeDescriptor>, SerialError> {
    let type_id = info.type_id();
    let found = DESCRIPTORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
        .cloned();
    if let Some(descriptor) = found {
        return Ok(descriptor);
    }

    // Nested descriptors are built without holding the lock.
    let created = Arc::new(build(info, registry)?);

    let mut table = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    let descriptor = table.get_or_insert(type_id, || {
        log::debug!("described `{}` as {}", created.name(), created.id());
        created
    });
    Ok(Arc::clone(descriptor))
}

fn build(info: &'static TypeInfo, registry: &TypeRegistry) -> Result<TypeDescriptor, SerialError> {
    match info {
        TypeInfo::Primitive(_) => Err(SerialError::unsupported(
            info.type_path(),
            "primitives are written raw or boxed",
        )),
        TypeInfo::Struct(struct_info) => {
            let fields = struct_info
                .fields()
                .iter()
                .map(|field| describe_field(field.name(), field.kind(), field.inline_info(), registry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeDescriptor::new(
                info.type_path(),
                RawKind::Object,
                struct_info.is_by_value(),
                fields,
            ))
        }
        TypeInfo::List(list_info) => {
            let item = describe_field(
                ITEM_FIELD,
                list_info.item_kind(),
                list_info.item_inline(),
                registry,
            )?;
            Ok(TypeDescriptor::new(
                info.type_path(),
                RawKind::Collection,
                false,
                alloc::vec![item],
            ))
        }
        TypeInfo::Opaque(_) => {
            let surrogate = registry
                .get_type_trait::<TypeTraitSurrogate>(info.type_id())
                .ok_or_else(|| {
                    SerialError::unsupported(info.type_path(), "opaque type without a surrogate")
                })?;
            let simple = surrogate.simple_info().as_struct().ok_or_else(|| {
                SerialError::unsupported(info.type_path(), "surrogate is not a struct")
            })?;
            let fields = simple
                .fields()
                .iter()
                .map(|field| describe_field(field.name(), field.kind(), field.inline_info(), registry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeDescriptor::new(
                info.type_path(),
                RawKind::Object,
                surrogate.is_by_value(),
                fields,
            ))
        }
    }
}

fn describe_field(
    name: &'static str,
    kind: RawKind,
    inline_info: Option<&'static TypeInfo>,
    registry: &TypeRegistry,
) -> Result<FieldDescriptor, SerialError> {
    match (kind, inline_info) {
        (RawKind::Inline, Some(info)) => Ok(FieldDescriptor::inline(name, describe(info, registry)?)),
        (RawKind::Inline, None) => Err(SerialError::unsupported(
            name,
            "inline member without a static layout",
        )),
        (kind, _) => Ok(FieldDescriptor::new(name, kind)),
    }
}

// -----------------------------------------------------------------------------
// Extra fields

#[derive(PartialEq, Eq, Hash)]
struct MergeKey {
    base: Uuid,
    extra: Box<[(String, RawKind, Option<Uuid>)]>,
}

impl MergeKey {
    fn new(base: &TypeDescriptor, extra: &ExtraFields) -> Self {
        let extra = extra
            .iter()
            .map(|entry| {
                let field = entry.descriptor();
                (
                    String::from(field.name()),
                    field.kind(),
                    field.nested().map(|nested| nested.id()),
                )
            })
            .collect();
        Self {
            base: base.id(),
            extra,
        }
    }
}

static MERGED: RwLock<HashMap<MergeKey, Arc<TypeDescriptor>>> =
    RwLock::new(HashMap::with_hasher(FixedHashState));

/// The descriptor of an instance whose extra-field slot is not empty.
///
/// Static members come first in declaration order, then extra members in
/// insertion order. An extra member whose name matches a static member
/// takes that member's place. The merged descriptor gets its own id, cached
/// per base descriptor and extra-member signature.
pub(crate) fn merge(base: &Arc<TypeDescriptor>, extra: &ExtraFields) -> Arc<TypeDescriptor> {
    if extra.is_empty() {
        return Arc::clone(base);
    }

    let key = MergeKey::new(base, extra);
    let found = MERGED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(descriptor) = found {
        return descriptor;
    }

    let mut fields = base.fields().to_vec();
    for entry in extra.iter() {
        match fields.iter_mut().find(|field| field.name() == entry.name()) {
            Some(slot) => *slot = entry.descriptor().clone(),
            None => fields.push(entry.descriptor().clone()),
        }
    }
    let created = Arc::new(TypeDescriptor::new(
        base.name(),
        base.kind(),
        base.is_by_value(),
        fields,
    ));

    let mut table = MERGED.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(table.entry(key).or_insert(created))
}

/// The descriptor `value` is written with.
///
/// Dynamic objects reuse the descriptor they were read with; everything else
/// is described statically and merged with its extra members.
pub(crate) fn descriptor_of(
    value: &dyn Reflect,
    registry: &TypeRegistry,
) -> Result<Arc<TypeDescriptor>, SerialError> {
    if let Some(object) = value.downcast_ref::<DynamicObject>() {
        return Ok(Arc::clone(object.descriptor()));
    }
    if let Some(list) = value.downcast_ref::<DynamicList>() {
        return Ok(Arc::clone(list.descriptor()));
    }

    let base = describe(value.reflect_type_info(), registry)?;
    Ok(match value.extra_fields() {
        Some(extra) => merge(&base, extra),
        None => base,
    })
}

#[cfg(test)]
mod tests {
    use super::{ITEM_FIELD, describe, merge};
    use crate::graph::{ExtraFields, Ref, Value};
    use crate::info::Typed;
    use crate::registry::TypeRegistry;
    use crate::serial::{FieldDescriptor, RawKind, SerialError};
    use alloc::sync::Arc;

    #[derive(crate::Reflect, Default)]
    #[reflect(by_value)]
    struct Span {
        start: i32,
        len: u16,
    }

    #[derive(crate::Reflect, Default)]
    struct Labelled {
        label: String,
        span: Span,
        next: Option<Ref<Labelled>>,
    }

    #[test]
    fn struct_layout() {
        let registry = TypeRegistry::new();
        let descriptor = describe(Labelled::type_info(), &registry).unwrap();

        assert_eq!(descriptor.kind(), RawKind::Object);
        assert!(!descriptor.is_by_value());
        let kinds: Vec<_> = descriptor.fields().iter().map(|f| (f.name(), f.kind())).collect();
        assert_eq!(
            kinds,
            [
                ("label", RawKind::String),
                ("span", RawKind::Inline),
                ("next", RawKind::Object)
            ]
        );

        let nested = descriptor.fields()[1].nested().unwrap();
        assert!(nested.is_by_value());
        assert_eq!(nested.fields()[1].kind(), RawKind::U16);
    }

    #[test]
    fn identity_is_stable() {
        let registry = TypeRegistry::new();
        let a = describe(Labelled::type_info(), &registry).unwrap();
        let b = describe(Labelled::type_info(), &registry).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let span = describe(Span::type_info(), &registry).unwrap();
        assert!(Arc::ptr_eq(a.fields()[1].nested().unwrap(), &span));
    }

    #[test]
    fn collections_have_one_item_member() {
        let registry = TypeRegistry::new();
        let descriptor = describe(<Vec<Span>>::type_info(), &registry).unwrap();
        assert!(descriptor.is_collection());
        assert_eq!(descriptor.fields().len(), 1);
        assert_eq!(descriptor.item().unwrap().name(), ITEM_FIELD);
        assert_eq!(descriptor.item().unwrap().kind(), RawKind::Inline);
    }

    #[test]
    fn primitives_and_bare_opaques_are_rejected() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            describe(i32::type_info(), &registry),
            Err(SerialError::UnsupportedTypeKind { .. })
        ));
        assert!(matches!(
            describe(<()>::type_info(), &registry),
            Err(SerialError::UnsupportedTypeKind { .. })
        ));
    }

    #[test]
    fn merged_descriptors() {
        let registry = TypeRegistry::new();
        let base = describe(Span::type_info(), &registry).unwrap();

        let mut extra = ExtraFields::new();
        assert!(Arc::ptr_eq(&merge(&base, &extra), &base));

        extra.insert(FieldDescriptor::new("unit", RawKind::String), Value::from("px"));
        extra.insert(FieldDescriptor::new("len", RawKind::U32), Value::U32(9));
        let merged = merge(&base, &extra);
        assert_ne!(merged.id(), base.id());

        let names: Vec<_> = merged.fields().iter().map(|f| (f.name(), f.kind())).collect();
        assert_eq!(
            names,
            [("start", RawKind::I32), ("len", RawKind::U32), ("unit", RawKind::String)]
        );

        // Same signature, same descriptor.
        let mut again = ExtraFields::new();
        again.insert(FieldDescriptor::new("unit", RawKind::String), Value::from("em"));
        again.insert(FieldDescriptor::new("len", RawKind::U32), Value::U32(1));
        assert!(Arc::ptr_eq(&merge(&base, &again), &merged));
    }
}
