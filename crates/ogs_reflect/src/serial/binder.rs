//! Schema adapters.
//!
//! A descriptor read from a stream is bound to a local type by trying each
//! [`Strategy`] in [`Strategy::CHAIN`] order; the first one that accepts
//! produces the [`DecodePlan`]. Encoding has no chain: the value's own type
//! decides the plan.

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::Reflect;
use crate::graph::{DynamicList, DynamicObject, ExtraFields};
use crate::info::{StructInfo, TypeInfo};
use crate::registry::{TypeMeta, TypeRegistry, TypeTraitConstruct, TypeTraitSurrogate};
use crate::serial::plan::{DecodePlan, EncodePlan, FieldDecoder, FieldEncoder, Insertion};
use crate::serial::{Binding, RawKind, SerialConfig, SerialError, TypeDescriptor};

// -----------------------------------------------------------------------------
// Strategy

/// One way of binding a wire schema to a local type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The schema names no registered type: decode a dynamic object.
    Unknown,
    /// The type is a list and the schema a collection.
    Collection,
    /// The type has a registered surrogate.
    Surrogate,
    /// The type is a struct: bind members by name.
    Plain,
}

impl Strategy {
    /// The order strategies are tried in.
    pub const CHAIN: [Strategy; 4] = [
        Strategy::Unknown,
        Strategy::Collection,
        Strategy::Surrogate,
        Strategy::Plain,
    ];

    fn try_bind(
        self,
        cx: &BindContext<'_>,
        resolved: Option<&TypeMeta>,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<DecodePlan>, SerialError> {
        match self {
            Strategy::Unknown => {
                if resolved.is_none() && cx.config.unknown_types {
                    log::warn!(
                        "`{}` is not registered, decoding it as a dynamic object",
                        descriptor.name()
                    );
                    Ok(Some(DecodePlan::Unknown))
                } else {
                    Ok(None)
                }
            }
            Strategy::Collection => {
                let Some(meta) = resolved else {
                    return Ok(None);
                };
                let (TypeInfo::List(list), Some(item)) = (meta.type_info(), descriptor.item())
                else {
                    return Ok(None);
                };
                if item.kind() != list.item_kind() {
                    return Err(SerialError::mismatch(
                        alloc::format!("{} items", list.item_kind().name()),
                        alloc::format!("{} items", item.kind().name()),
                    ));
                }
                let insertion = match list.fixed_len() {
                    Some(len) => Insertion::Index { len },
                    None => Insertion::Append,
                };
                Ok(Some(DecodePlan::Collection {
                    construct: constructor(meta)?,
                    insertion,
                }))
            }
            Strategy::Surrogate => {
                let Some(surrogate) = resolved.and_then(TypeMeta::get_trait::<TypeTraitSurrogate>)
                else {
                    return Ok(None);
                };
                if descriptor.kind() != RawKind::Object {
                    return Ok(None);
                }
                let simple_meta = cx.registry.get(surrogate.simple_type()).ok_or_else(|| {
                    SerialError::unbound(descriptor.name(), "surrogate type is not registered")
                })?;
                let simple = plain(cx, simple_meta, descriptor)?.ok_or_else(|| {
                    SerialError::unbound(descriptor.name(), "surrogate type is not a struct")
                })?;
                Ok(Some(DecodePlan::Surrogate {
                    surrogate: *surrogate,
                    simple: Arc::new(simple),
                }))
            }
            Strategy::Plain => match resolved {
                Some(meta) if descriptor.kind() == RawKind::Object => plain(cx, meta, descriptor),
                _ => Ok(None),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Decoding

pub(crate) struct BindContext<'a> {
    pub registry: &'a TypeRegistry,
    pub config: &'a SerialConfig,
}

/// Binds `descriptor` to the type named by `binding`.
pub(crate) fn bind_decode(
    cx: &BindContext<'_>,
    binding: Binding,
    descriptor: &TypeDescriptor,
) -> Result<DecodePlan, SerialError> {
    let resolved = match binding {
        Binding::Static(type_id) => Some(cx.registry.get(type_id).ok_or_else(|| {
            SerialError::unbound(descriptor.name(), "the expected type is not registered")
        })?),
        Binding::ByName => cx.registry.get_with_type_path(descriptor.name()),
    };

    for strategy in Strategy::CHAIN {
        if let Some(plan) = strategy.try_bind(cx, resolved, descriptor)? {
            log::debug!(
                "bound `{}` ({}) with the {strategy:?} strategy",
                descriptor.name(),
                descriptor.id()
            );
            return Ok(plan);
        }
    }

    Err(SerialError::unbound(
        descriptor.name(),
        if resolved.is_some() {
            "the local type does not match the schema kind"
        } else {
            "the type is not registered"
        },
    ))
}

fn constructor(meta: &TypeMeta) -> Result<TypeTraitConstruct, SerialError> {
    meta.get_trait::<TypeTraitConstruct>()
        .copied()
        .ok_or_else(|| SerialError::unbound(meta.type_path(), "the type has no default constructor"))
}

fn plain(
    cx: &BindContext<'_>,
    meta: &TypeMeta,
    descriptor: &TypeDescriptor,
) -> Result<Option<DecodePlan>, SerialError> {
    let TypeInfo::Struct(info) = meta.type_info() else {
        return Ok(None);
    };
    let construct = constructor(meta)?;

    let fields = descriptor
        .fields()
        .iter()
        .map(|wire| match info.field(wire.name()) {
            Some(field) if field.kind() == wire.kind() => Ok(FieldDecoder::Bound(field.decode_fn())),
            _ if info.has_extra_slot() => Ok(FieldDecoder::Absorb),
            _ if cx.config.absorb_missing_members => {
                log::warn!(
                    "dropping member `{}` of `{}`: no matching member in `{}`",
                    wire.name(),
                    descriptor.name(),
                    info.type_path()
                );
                Ok(FieldDecoder::Skip)
            }
            _ => Err(SerialError::MissingMember {
                type_path: info.type_path().into(),
                member: wire.name().into(),
            }),
        })
        .collect::<Result<Box<[_]>, _>>()?;

    Ok(Some(DecodePlan::Plain { construct, fields }))
}

// -----------------------------------------------------------------------------
// Encoding

/// Builds the plan that writes `value` under `descriptor`.
pub(crate) fn bind_encode(
    registry: &TypeRegistry,
    value: &dyn Reflect,
    descriptor: &TypeDescriptor,
) -> Result<EncodePlan, SerialError> {
    if value.is::<DynamicObject>() || value.is::<DynamicList>() {
        return Ok(EncodePlan::Structural);
    }

    let info = value.reflect_type_info();
    match info {
        TypeInfo::List(_) => Ok(EncodePlan::Collection),
        TypeInfo::Struct(struct_info) => plain_encode(struct_info, value.extra_fields(), descriptor),
        TypeInfo::Opaque(_) => {
            let surrogate = registry
                .get_type_trait::<TypeTraitSurrogate>(info.type_id())
                .ok_or_else(|| {
                    SerialError::unsupported(info.type_path(), "opaque type without a surrogate")
                })?;
            let simple = surrogate.simple_info().as_struct().ok_or_else(|| {
                SerialError::unsupported(info.type_path(), "surrogate is not a struct")
            })?;
            Ok(EncodePlan::Surrogate {
                simplify: surrogate.simplify_fn(),
                simple: Arc::new(plain_encode(simple, None, descriptor)?),
            })
        }
        TypeInfo::Primitive(_) => Err(SerialError::unsupported(
            info.type_path(),
            "primitives are written raw or boxed",
        )),
    }
}

fn plain_encode(
    info: &StructInfo,
    extra: Option<&ExtraFields>,
    descriptor: &TypeDescriptor,
) -> Result<EncodePlan, SerialError> {
    let fields = descriptor
        .fields()
        .iter()
        .map(|wire| {
            if let Some(index) = extra.and_then(|extra| extra.position(wire.name())) {
                return Ok(FieldEncoder::Extra(index));
            }
            match info.field(wire.name()) {
                Some(field) if field.kind() == wire.kind() => Ok(FieldEncoder::Static(field.encode_fn())),
                _ => Err(SerialError::MissingMember {
                    type_path: info.type_path().into(),
                    member: wire.name().into(),
                }),
            }
        })
        .collect::<Result<Box<[_]>, _>>()?;
    Ok(EncodePlan::Plain(fields))
}
