use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use std::io::Read;

use ogs_codec::{DocumentReader, StreamReader};
use ogs_utils::hash::HashMap;
use uuid::Uuid;

use crate::Reflect;
use crate::graph::{DynRef, DynamicList, DynamicObject, Ref, SharedObject, Value};
use crate::info::Typed;
use crate::registry::{TypeRegistry, TypeRegistryArc, TypeTraitConstruct};
use crate::serial::binder::{BindContext, bind_decode};
use crate::serial::plan::{DecodeKey, DecodePlan, FieldDecoder, Insertion};
use crate::serial::tracker::{DecodeTracker, Tracked};
use crate::serial::{
    Binding, CodecCache, FieldDescriptor, GraphValue, Header, RawKind, SerialConfig, SerialError,
    TypeDescriptor,
};

// -----------------------------------------------------------------------------
// DeserializeDriver

/// State of one deserialization call, the mirror of
/// [`SerializeDriver`](crate::serial::SerializeDriver).
///
/// Descriptors and objects are numbered in the order the stream introduces
/// them. Both tables are dropped when the call ends.
pub struct DeserializeDriver<'a> {
    reader: &'a mut (dyn DocumentReader + 'a),
    registry: &'a TypeRegistry,
    cache: &'a CodecCache,
    config: &'a SerialConfig,
    tracker: DecodeTracker,
    known: HashMap<Uuid, Arc<TypeDescriptor>>,
    depth: usize,
    // Nesting of members being read into an extra-field slot.
    absorbing: usize,
}

impl<'a> DeserializeDriver<'a> {
    pub(crate) fn new(
        reader: &'a mut (dyn DocumentReader + 'a),
        registry: &'a TypeRegistry,
        cache: &'a CodecCache,
        config: &'a SerialConfig,
    ) -> Self {
        Self {
            reader,
            registry,
            cache,
            config,
            tracker: DecodeTracker::default(),
            known: HashMap::default(),
            depth: 0,
            absorbing: 0,
        }
    }

    /// The underlying primitive source.
    #[inline]
    pub fn reader(&mut self) -> &mut (dyn DocumentReader + 'a) {
        &mut *self.reader
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub fn read_header(&mut self) -> Result<Header, SerialError> {
        let byte = self.reader.read_u8()?;
        Header::from_byte(byte)
            .ok_or_else(|| SerialError::corrupt(format!("invalid header byte {byte:#04x}")))
    }

    /// Reads the kind byte and payload that follow a
    /// [`Boxing`](Header::Boxing) header.
    pub fn read_boxed(&mut self) -> Result<Value, SerialError> {
        let byte = self.reader.read_u8()?;
        match RawKind::from_byte(byte) {
            Some(kind) if kind.is_primitive() => self.read_raw(kind),
            _ => Err(SerialError::corrupt(format!("invalid boxed kind {byte}"))),
        }
    }

    /// Reads an object-position payload into a `Ref<T>`.
    pub fn read_shared<T: Typed>(&mut self, header: Header) -> Result<Ref<T>, SerialError> {
        let object = match header {
            Header::Null => return Err(SerialError::mismatch(T::type_path(), "null")),
            Header::Reference => self.resolve()?,
            Header::Value => {
                let descriptor = self.read_descriptor()?;
                let track = !descriptor.is_by_value();
                self.materialize_shared(Binding::Static(TypeId::of::<T>()), &descriptor, track)?
            }
            Header::Boxing => {
                let value = self.read_boxed()?;
                let found = value.kind_name();
                return value
                    .into_reflect()
                    .and_then(|boxed| boxed.take::<T>())
                    .map(Ref::new)
                    .ok_or_else(|| SerialError::mismatch(T::type_path(), found));
            }
        };
        object
            .typed::<T>()
            .ok_or_else(|| SerialError::mismatch(T::type_path(), object.type_path()))
    }

    /// Reads an object-position payload into a polymorphic handle. The
    /// concrete type is resolved from the descriptor's name.
    pub fn read_dyn(&mut self, header: Header) -> Result<Option<DynRef>, SerialError> {
        match header {
            Header::Null => Ok(None),
            Header::Reference => Ok(Some(self.resolve()?.into_dynamic())),
            Header::Value => {
                let descriptor = self.read_descriptor()?;
                let track = !descriptor.is_by_value();
                let object = self.materialize_shared(Binding::ByName, &descriptor, track)?;
                Ok(Some(object.into_dynamic()))
            }
            Header::Boxing => Ok(self.read_boxed()?.into_dyn_ref()),
        }
    }

    /// Like [`read_dyn`](Self::read_dyn), but primitives stay unboxed.
    pub fn read_dynamic(&mut self, header: Header) -> Result<Value, SerialError> {
        match header {
            Header::Boxing => self.read_boxed(),
            _ => Ok(self.read_dyn(header)?.map_or(Value::Null, Value::Object)),
        }
    }

    /// Reads an object-position payload into a value-held `T`.
    ///
    /// Null yields the registered default of `T`.
    pub fn read_owned<T: Typed>(&mut self, header: Header) -> Result<T, SerialError> {
        match header {
            Header::Null => {
                let construct = self
                    .registry
                    .get_type_trait::<TypeTraitConstruct>(TypeId::of::<T>())
                    .ok_or_else(|| SerialError::mismatch(T::type_path(), "null"))?;
                take(construct.boxed())
            }
            Header::Value => {
                let descriptor = self.read_descriptor()?;
                let track = !descriptor.is_by_value();
                take(self.materialize_owned(Binding::Static(TypeId::of::<T>()), &descriptor, track)?)
            }
            Header::Boxing => {
                let value = self.read_boxed()?;
                let found = value.kind_name();
                value
                    .into_reflect()
                    .and_then(|boxed| boxed.take::<T>())
                    .ok_or_else(|| SerialError::mismatch(T::type_path(), found))
            }
            Header::Reference => Err(SerialError::mismatch(T::type_path(), Header::Reference.name())),
        }
    }

    /// Reads the members of an inline struct laid out by `field`'s nested
    /// descriptor.
    pub fn read_inline<T: Typed>(&mut self, field: &FieldDescriptor) -> Result<T, SerialError> {
        let nested = self.nested_of(field)?;
        take(self.materialize_owned(Binding::Static(TypeId::of::<T>()), &nested, false)?)
    }

    /// Reads the member `field` as a dynamic value.
    pub fn read_value(&mut self, field: &FieldDescriptor) -> Result<Value, SerialError> {
        match field.kind() {
            RawKind::Object | RawKind::Collection => {
                let header = self.read_header()?;
                self.read_dynamic(header)
            }
            RawKind::Inline => {
                let nested = self.nested_of(field)?;
                let object = self.materialize_shared(Binding::ByName, &nested, false)?;
                Ok(Value::Object(object.into_dynamic()))
            }
            kind => self.read_raw(kind),
        }
    }

    fn read_raw(&mut self, kind: RawKind) -> Result<Value, SerialError> {
        Value::read_primitive(kind, &mut *self.reader)?
            .ok_or_else(|| SerialError::corrupt(format!("{} is not a primitive kind", kind.name())))
    }

    fn nested_of(&self, field: &FieldDescriptor) -> Result<Arc<TypeDescriptor>, SerialError> {
        field.nested().cloned().ok_or_else(|| {
            SerialError::corrupt(format!("inline member `{}` has no schema", field.name()))
        })
    }

    fn resolve(&mut self) -> Result<SharedObject, SerialError> {
        let index = self.reader.read_i32()?;
        self.tracker.resolve(index).cloned()
    }

    fn read_count(&mut self) -> Result<usize, SerialError> {
        let count = self.reader.read_i32()?;
        usize::try_from(count).map_err(|_| SerialError::corrupt(format!("negative count {count}")))
    }

    fn read_kind(&mut self) -> Result<RawKind, SerialError> {
        let byte = self.reader.read_u8()?;
        RawKind::from_byte(byte).ok_or_else(|| SerialError::corrupt(format!("invalid kind byte {byte}")))
    }

    /// Reads a descriptor id, and the full descriptor if the id is new to
    /// this stream.
    fn read_descriptor(&mut self) -> Result<Arc<TypeDescriptor>, SerialError> {
        let id = self.reader.read_uuid()?;
        if let Some(known) = self.known.get(&id) {
            return Ok(Arc::clone(known));
        }

        let name = self.reader.read_string()?;
        let kind = self.read_kind()?;
        if !kind.has_header() {
            return Err(SerialError::corrupt(format!(
                "schema `{name}` has kind {}",
                kind.name()
            )));
        }
        let by_value = self.reader.read_bool()?;
        let count = self.read_count()?;

        let mut fields = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let field_kind = self.read_kind()?;
            let field_name = self.reader.read_string()?;
            fields.push(match field_kind {
                RawKind::Inline => {
                    self.enter()?;
                    let nested = self.read_descriptor();
                    self.depth -= 1;
                    FieldDescriptor::inline(field_name, nested?)
                }
                kind => FieldDescriptor::new(field_name, kind),
            });
        }
        if kind == RawKind::Collection && fields.len() != 1 {
            return Err(SerialError::corrupt(format!(
                "collection schema `{name}` has {} members",
                fields.len()
            )));
        }

        log::trace!("read schema `{name}` ({id})");
        let descriptor = Arc::new(TypeDescriptor::with_id(id, name, kind, by_value, fields));
        self.known.insert(id, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    fn decode_plan(
        &self,
        binding: Binding,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<DecodePlan>, SerialError> {
        let key = DecodeKey {
            binding,
            descriptor: descriptor.id(),
            flags: self.config.binding_flags(),
        };
        let cx = BindContext {
            registry: self.registry,
            config: self.config,
        };
        let plan = self
            .cache
            .decoder(key, || bind_decode(&cx, binding, descriptor));

        // Absorbed members are written back under their wire schema, so a
        // polymorphic slot among them must keep every member it reads.
        if self.absorbing == 0 || binding != Binding::ByName {
            return plan;
        }
        match plan {
            Ok(plan) if !plan.drops_members() => Ok(plan),
            Ok(_) | Err(SerialError::MissingMember { .. }) => {
                log::debug!(
                    "keeping absorbed `{}` as a dynamic value, the local type is narrower",
                    descriptor.name()
                );
                Ok(Arc::new(DecodePlan::Unknown))
            }
            Err(err) => Err(err),
        }
    }

    fn materialize_shared(
        &mut self,
        binding: Binding,
        descriptor: &Arc<TypeDescriptor>,
        track: bool,
    ) -> Result<SharedObject, SerialError> {
        self.enter()?;
        let result = self.build_shared(binding, descriptor, track);
        self.depth -= 1;
        result
    }

    // The handle is registered before its members are read, so members that
    // point back at it resolve to the same object.
    fn build_shared(
        &mut self,
        binding: Binding,
        descriptor: &Arc<TypeDescriptor>,
        track: bool,
    ) -> Result<SharedObject, SerialError> {
        let plan = self.decode_plan(binding, descriptor)?;
        let object = match &*plan {
            DecodePlan::Surrogate { surrogate, simple } => {
                let object = surrogate.provisional();
                if track {
                    self.tracker.register(Tracked::Shared(object.clone()));
                }
                let simple_value = self.build_owned(simple, descriptor)?;
                let mut target = object.dynamic().write();
                surrogate
                    .restore_into(&mut *target, simple_value)
                    .ok_or_else(|| SerialError::mismatch(object.type_path(), descriptor.name()))?;
                drop(target);
                return Ok(object);
            }
            DecodePlan::Unknown if descriptor.is_collection() => {
                SharedObject::new(Ref::new(DynamicList::new(Arc::clone(descriptor))))
            }
            DecodePlan::Unknown => {
                SharedObject::new(Ref::new(DynamicObject::new(Arc::clone(descriptor))))
            }
            DecodePlan::Plain { construct, .. } | DecodePlan::Collection { construct, .. } => {
                construct.shared()
            }
        };

        if track {
            self.tracker.register(Tracked::Shared(object.clone()));
        }
        let mut target = object.dynamic().write();
        self.fill(&plan, descriptor, &mut *target)?;
        drop(target);
        Ok(object)
    }

    fn materialize_owned(
        &mut self,
        binding: Binding,
        descriptor: &Arc<TypeDescriptor>,
        track: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        self.enter()?;
        let result = self.decode_plan(binding, descriptor).and_then(|plan| {
            if track {
                self.tracker.register(Tracked::Anonymous);
            }
            self.build_owned(&plan, descriptor)
        });
        self.depth -= 1;
        result
    }

    fn build_owned(
        &mut self,
        plan: &DecodePlan,
        descriptor: &Arc<TypeDescriptor>,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        match plan {
            DecodePlan::Surrogate { surrogate, simple } => {
                let simple_value = self.build_owned(simple, descriptor)?;
                let found = simple_value.reflect_type_path();
                surrogate
                    .restore(simple_value)
                    .ok_or_else(|| SerialError::mismatch(descriptor.name(), found))
            }
            DecodePlan::Unknown if descriptor.is_collection() => {
                let mut list = DynamicList::new(Arc::clone(descriptor));
                self.fill(plan, descriptor, &mut list)?;
                Ok(Box::new(list))
            }
            DecodePlan::Unknown => {
                let mut object = DynamicObject::new(Arc::clone(descriptor));
                self.fill(plan, descriptor, &mut object)?;
                Ok(Box::new(object))
            }
            DecodePlan::Plain { construct, .. } | DecodePlan::Collection { construct, .. } => {
                let mut value = construct.boxed();
                self.fill(plan, descriptor, &mut *value)?;
                Ok(value)
            }
        }
    }

    fn fill(
        &mut self,
        plan: &DecodePlan,
        descriptor: &TypeDescriptor,
        target: &mut dyn Reflect,
    ) -> Result<(), SerialError> {
        match plan {
            DecodePlan::Plain { fields, .. } => {
                for (decoder, wire) in fields.iter().zip(descriptor.fields()) {
                    match decoder {
                        FieldDecoder::Bound(decode) => decode(target, self, wire)?,
                        FieldDecoder::Absorb => {
                            self.absorbing += 1;
                            let value = self.read_value(wire);
                            self.absorbing -= 1;
                            let value = value?;
                            let extra = target.extra_fields_mut().ok_or_else(|| {
                                SerialError::mismatch("an extra-field slot", descriptor.name())
                            })?;
                            extra.insert(wire.clone(), value);
                        }
                        FieldDecoder::Skip => {
                            self.read_value(wire)?;
                        }
                    }
                }
                Ok(())
            }
            DecodePlan::Collection { insertion, .. } => {
                let item = self.item_of(descriptor)?;
                let count = self.read_count()?;
                if let Insertion::Index { len } = *insertion
                    && count > len
                {
                    return Err(SerialError::mismatch(
                        format!("at most {len} items"),
                        format!("{count} items"),
                    ));
                }
                let list = target
                    .as_list_mut()
                    .ok_or_else(|| SerialError::mismatch("a list", descriptor.name()))?;
                for index in 0..count {
                    list.decode_item(index, self, item)?;
                }
                Ok(())
            }
            DecodePlan::Unknown => {
                if let Some(list) = target.downcast_mut::<DynamicList>() {
                    let item = self.item_of(descriptor)?;
                    let count = self.read_count()?;
                    for _ in 0..count {
                        let value = self.read_value(item)?;
                        list.push(value);
                    }
                } else if let Some(object) = target.downcast_mut::<DynamicObject>() {
                    for (index, wire) in descriptor.fields().iter().enumerate() {
                        let value = self.read_value(wire)?;
                        object.set_at(index, value);
                    }
                }
                Ok(())
            }
            DecodePlan::Surrogate { .. } => Err(SerialError::unbound(
                descriptor.name(),
                "surrogate plans build their own value",
            )),
        }
    }

    fn item_of<'d>(&self, descriptor: &'d TypeDescriptor) -> Result<&'d FieldDescriptor, SerialError> {
        descriptor.item().ok_or_else(|| {
            SerialError::corrupt(format!("collection schema `{}` has no item", descriptor.name()))
        })
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

fn take<T: Typed>(boxed: Box<dyn Reflect>) -> Result<T, SerialError> {
    let found = boxed.reflect_type_path();
    boxed
        .take::<T>()
        .ok_or_else(|| SerialError::mismatch(T::type_path(), found))
}

// -----------------------------------------------------------------------------
// Deserializer

/// Reads object graphs written by [`Serializer`](crate::serial::Serializer).
///
/// # Examples
///
/// ```
/// use ogs_reflect::graph::Value;
/// use ogs_reflect::registry::TypeRegistryArc;
/// use ogs_reflect::serial::{Deserializer, Serializer};
///
/// let registry = TypeRegistryArc::default();
/// let bytes = Serializer::new(registry.clone())
///     .serialize_to_vec(&vec![1_i32, 2, 3])
///     .unwrap();
///
/// let back: Vec<i32> = Deserializer::new(registry).deserialize_slice(&bytes).unwrap();
/// assert_eq!(back, [1, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Deserializer {
    registry: TypeRegistryArc,
    cache: Arc<CodecCache>,
    config: SerialConfig,
}

impl Deserializer {
    /// Creates a deserializer with a fresh plan cache.
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

    /// Shares `cache` with other deserializers.
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

    /// Reads one root value of type `T`.
    pub fn deserialize<T: GraphValue>(&self, reader: impl Read) -> Result<T, SerialError> {
        let mut stream = StreamReader::new(reader);
        self.deserialize_document(&mut stream)
    }

    #[inline]
    pub fn deserialize_slice<T: GraphValue>(&self, bytes: &[u8]) -> Result<T, SerialError> {
        self.deserialize(bytes)
    }

    /// Reads a root value without a static type. Registered types are
    /// materialized as themselves, unknown ones as dynamic objects.
    #[inline]
    pub fn deserialize_any(&self, reader: impl Read) -> Result<Value, SerialError> {
        self.deserialize(reader)
    }

    /// Reads one root value from any [`DocumentReader`].
    ///
    /// The types reachable from `T` are registered first.
    pub fn deserialize_document<T: GraphValue>(
        &self,
        reader: &mut dyn DocumentReader,
    ) -> Result<T, SerialError> {
        T::register_field_types(&mut self.registry.write());
        let registry = self.registry.read();
        let mut driver = DeserializeDriver::new(reader, &registry, &self.cache, &self.config);
        let header = driver.read_header()?;
        let value = T::decode_complex(&mut driver, header)?;
        log::trace!(
            "deserialized `{}`, {} objects materialized",
            T::type_path(),
            driver.tracker.len()
        );
        Ok(value)
    }
}
