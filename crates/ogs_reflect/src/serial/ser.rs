use alloc::sync::Arc;
use alloc::vec::Vec;
use std::io::Write;

use ogs_codec::{CodecError, DocumentWriter, StreamWriter};
use ogs_utils::hash::HashSet;
use uuid::Uuid;

use crate::Reflect;
use crate::graph::{DynamicList, DynamicObject, Ref, Value};
use crate::registry::{TypeRegistry, TypeRegistryArc};
use crate::serial::binder::bind_encode;
use crate::serial::descriptor::{describe, descriptor_of};
use crate::serial::plan::{EncodeKey, EncodePlan, FieldEncoder};
use crate::serial::tracker::EncodeTracker;
use crate::serial::{
    CodecCache, FieldDescriptor, GraphValue, Header, RawKind, SerialConfig, SerialError,
    TypeDescriptor,
};

// -----------------------------------------------------------------------------
// SerializeDriver

/// State of one serialization call.
///
/// Owns the identity table and the set of descriptors already written, so
/// both are scoped to a single root value. [`GraphValue`] implementations
/// write through it.
pub struct SerializeDriver<'a> {
    writer: &'a mut (dyn DocumentWriter + 'a),
    registry: &'a TypeRegistry,
    cache: &'a CodecCache,
    config: &'a SerialConfig,
    tracker: EncodeTracker,
    written: HashSet<Uuid>,
    depth: usize,
}

impl<'a> SerializeDriver<'a> {
    pub(crate) fn new(
        writer: &'a mut (dyn DocumentWriter + 'a),
        registry: &'a TypeRegistry,
        cache: &'a CodecCache,
        config: &'a SerialConfig,
    ) -> Self {
        Self {
            writer,
            registry,
            cache,
            config,
            tracker: EncodeTracker::default(),
            written: HashSet::default(),
            depth: 0,
        }
    }

    /// The underlying primitive sink.
    #[inline]
    pub fn writer(&mut self) -> &mut (dyn DocumentWriter + 'a) {
        &mut *self.writer
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline]
    pub fn write_header(&mut self, header: Header) -> Result<(), SerialError> {
        self.writer.write_u8(header.to_byte())?;
        Ok(())
    }

    #[inline]
    pub fn write_null(&mut self) -> Result<(), SerialError> {
        self.write_header(Header::Null)
    }

    /// Writes the [`Boxing`](Header::Boxing) header and the kind byte. The
    /// raw payload must follow.
    pub fn begin_boxed(&mut self, kind: RawKind) -> Result<(), SerialError> {
        debug_assert!(kind.is_primitive());
        self.write_header(Header::Boxing)?;
        self.writer.write_u8(kind.to_byte())?;
        Ok(())
    }

    /// Writes a primitive with its boxing header.
    pub fn write_boxed(&mut self, value: &Value) -> Result<(), SerialError> {
        let Some(kind) = value.kind().filter(|kind| kind.is_primitive()) else {
            return Err(SerialError::mismatch("a primitive", value.kind_name()));
        };
        self.begin_boxed(kind)?;
        value.write_primitive(&mut *self.writer)?;
        Ok(())
    }

    /// Writes a shared object, or a back-reference if it was written before.
    pub fn write_shared<T: Reflect + ?Sized>(&mut self, handle: &Ref<T>) -> Result<(), SerialError> {
        let address = handle.address();
        if let Some(index) = self.tracker.lookup(address) {
            self.write_header(Header::Reference)?;
            self.writer.write_i32(index)?;
            return Ok(());
        }

        let guard = handle.read();
        let value = guard.as_reflect();
        if let Some(primitive) = value.to_primitive() {
            return self.write_boxed(&primitive);
        }

        let descriptor = descriptor_of(value, self.registry)?;
        if !descriptor.is_by_value() {
            self.tracker.register(address, handle.keep_alive());
        }
        self.write_object(value, &descriptor)
    }

    /// Writes an object held by value: it takes an identity index but can
    /// never be referenced.
    pub fn write_owned(&mut self, value: &dyn Reflect) -> Result<(), SerialError> {
        if let Some(primitive) = value.to_primitive() {
            return self.write_boxed(&primitive);
        }

        let descriptor = descriptor_of(value, self.registry)?;
        if !descriptor.is_by_value() {
            self.tracker.register_anonymous();
        }
        self.write_object(value, &descriptor)
    }

    /// Writes the members of an inline struct, without header or identity.
    pub fn write_inline(&mut self, value: &dyn Reflect) -> Result<(), SerialError> {
        let descriptor = describe(value.reflect_type_info(), self.registry)?;
        self.write_nested(value, &descriptor)
    }

    /// Writes a dynamic value in object position.
    pub fn write_dynamic(&mut self, value: &Value) -> Result<(), SerialError> {
        match value {
            Value::Null => self.write_null(),
            Value::Object(handle) => self.write_shared(handle),
            primitive => self.write_boxed(primitive),
        }
    }

    /// Writes a dynamic value as the member `field`.
    pub fn write_value(&mut self, field: &FieldDescriptor, value: &Value) -> Result<(), SerialError> {
        match field.kind() {
            RawKind::Object | RawKind::Collection => self.write_dynamic(value),
            RawKind::Inline => {
                let (Value::Object(handle), Some(nested)) = (value, field.nested()) else {
                    return Err(SerialError::mismatch("an inline object", value.kind_name()));
                };
                let guard = handle.read();
                self.write_nested(guard.as_reflect(), nested)
            }
            kind => {
                if value.kind() != Some(kind) {
                    return Err(SerialError::mismatch(kind.name(), value.kind_name()));
                }
                value.write_primitive(&mut *self.writer)?;
                Ok(())
            }
        }
    }

    fn write_object(
        &mut self,
        value: &dyn Reflect,
        descriptor: &Arc<TypeDescriptor>,
    ) -> Result<(), SerialError> {
        self.write_header(Header::Value)?;
        self.write_descriptor(descriptor)?;
        self.write_nested(value, descriptor)
    }

    fn write_nested(
        &mut self,
        value: &dyn Reflect,
        descriptor: &Arc<TypeDescriptor>,
    ) -> Result<(), SerialError> {
        self.enter()?;
        let result = self.write_body(value, descriptor);
        self.depth -= 1;
        result
    }

    fn write_body(
        &mut self,
        value: &dyn Reflect,
        descriptor: &Arc<TypeDescriptor>,
    ) -> Result<(), SerialError> {
        let key = EncodeKey {
            type_id: value.reflect_type_info().type_id(),
            descriptor: descriptor.id(),
        };
        let registry = self.registry;
        let plan = self
            .cache
            .encoder(key, || bind_encode(registry, value, descriptor))?;
        self.run_plan(&plan, value, descriptor)
    }

    fn run_plan(
        &mut self,
        plan: &EncodePlan,
        value: &dyn Reflect,
        descriptor: &TypeDescriptor,
    ) -> Result<(), SerialError> {
        match plan {
            EncodePlan::Plain(fields) => {
                for (encoder, wire) in fields.iter().zip(descriptor.fields()) {
                    match encoder {
                        FieldEncoder::Static(encode) => encode(value, self)?,
                        FieldEncoder::Extra(index) => {
                            let entry = value
                                .extra_fields()
                                .and_then(|extra| extra.get_index(*index))
                                .ok_or_else(|| {
                                    SerialError::mismatch(
                                        alloc::format!("extra member `{}`", wire.name()),
                                        "nothing",
                                    )
                                })?;
                            self.write_value(wire, entry.value())?;
                        }
                    }
                }
                Ok(())
            }
            EncodePlan::Collection => {
                let list = value.as_list().ok_or_else(|| {
                    SerialError::mismatch("a list", value.reflect_type_info().type_path())
                })?;
                self.write_count(list.len())?;
                list.encode_items(self)
            }
            EncodePlan::Surrogate { simplify, simple } => {
                let simple_value = simplify(value).ok_or_else(|| {
                    SerialError::mismatch(descriptor.name(), value.reflect_type_info().type_path())
                })?;
                self.run_plan(simple, &*simple_value, descriptor)
            }
            EncodePlan::Structural => {
                if let Some(object) = value.downcast_ref::<DynamicObject>() {
                    for (wire, member) in descriptor.fields().iter().zip(object.values()) {
                        self.write_value(wire, member)?;
                    }
                } else if let Some(list) = value.downcast_ref::<DynamicList>() {
                    let item = descriptor
                        .item()
                        .ok_or_else(|| SerialError::mismatch("a collection schema", descriptor.name()))?;
                    self.write_count(list.len())?;
                    for member in list.iter() {
                        self.write_value(item, member)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn write_count(&mut self, len: usize) -> Result<(), SerialError> {
        let count = i32::try_from(len).map_err(|_| CodecError::LengthOverflow)?;
        self.writer.write_i32(count)?;
        Ok(())
    }

    /// Writes a descriptor id, followed by the full descriptor the first
    /// time it appears in this call.
    fn write_descriptor(&mut self, descriptor: &TypeDescriptor) -> Result<(), SerialError> {
        self.writer.write_uuid(&descriptor.id())?;
        if !self.written.insert(descriptor.id()) {
            return Ok(());
        }

        log::trace!("writing schema `{}` ({})", descriptor.name(), descriptor.id());
        self.writer.write_str(descriptor.name())?;
        self.writer.write_u8(descriptor.kind().to_byte())?;
        self.writer.write_bool(descriptor.is_by_value())?;
        self.write_count(descriptor.fields().len())?;
        for field in descriptor.fields() {
            self.writer.write_u8(field.kind().to_byte())?;
            self.writer.write_str(field.name())?;
            if let Some(nested) = field.nested() {
                self.write_descriptor(nested)?;
            }
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), SerialError> {
        if let Some(limit) = self.config.max_depth
            && self.depth >= limit
        {
            return Err(SerialError::DepthExceeded { limit });
        }
        self.depth += 1;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Serializer

/// Writes object graphs.
///
/// # Examples
///
/// ```
/// use ogs_reflect::{Reflect, graph::Ref};
/// use ogs_reflect::registry::TypeRegistryArc;
/// use ogs_reflect::serial::{Deserializer, Serializer};
///
/// #[derive(Reflect, Default)]
/// struct Node {
///     label: String,
///     next: Option<Ref<Node>>,
/// }
///
/// let node = Ref::new(Node { label: "loop".into(), next: None });
/// node.write().next = Some(node.clone());
///
/// let registry = TypeRegistryArc::default();
/// let bytes = Serializer::new(registry.clone()).serialize_to_vec(&node).unwrap();
/// let copy: Ref<Node> = Deserializer::new(registry).deserialize_slice(&bytes).unwrap();
///
/// let next = copy.read().next.clone().unwrap();
/// assert!(next.ptr_eq(&copy));
/// # node.write().next = None;
/// # copy.write().next = None;
/// ```
#[derive(Clone, Debug)]
pub struct Serializer {
    registry: TypeRegistryArc,
    cache: Arc<CodecCache>,
    config: SerialConfig,
}

impl Serializer {
    /// Creates a serializer with a fresh plan cache.
    pub fn new(registry: TypeRegistryArc) -> Self {
        Self {
            registry,
            cache: Arc::new(CodecCache::new()),
            config: SerialConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: SerialConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares `cache` with other serializers.
    #[inline]
    pub fn with_cache(mut self, cache: Arc<CodecCache>) -> Self {
        self.cache = cache;
        self
    }

    #[inline]
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &Arc<CodecCache> {
        &self.cache
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    /// Writes `value` and everything reachable from it.
    pub fn serialize<T: GraphValue>(&self, writer: impl Write, value: &T) -> Result<(), SerialError> {
        let mut stream = StreamWriter::new(writer);
        self.serialize_document(&mut stream, value)?;
        stream.flush()?;
        Ok(())
    }

    pub fn serialize_to_vec<T: GraphValue>(&self, value: &T) -> Result<Vec<u8>, SerialError> {
        let mut bytes = Vec::new();
        self.serialize(&mut bytes, value)?;
        Ok(bytes)
    }

    /// Writes `value` to any [`DocumentWriter`].
    ///
    /// The types reachable from `T` are registered first.
    pub fn serialize_document<T: GraphValue>(
        &self,
        writer: &mut dyn DocumentWriter,
        value: &T,
    ) -> Result<(), SerialError> {
        T::register_field_types(&mut self.registry.write());
        let registry = self.registry.read();
        let mut driver = SerializeDriver::new(writer, &registry, &self.cache, &self.config);
        value.encode_complex(&mut driver)?;
        log::trace!(
            "serialized `{}`, {} objects visited",
            T::type_path(),
            driver.tracker.len()
        );
        Ok(())
    }
}
