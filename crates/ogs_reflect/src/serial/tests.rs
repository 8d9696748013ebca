use alloc::collections::{BTreeMap, VecDeque};
use alloc::sync::Arc;
use std::collections::HashMap;

use ogs_codec::chrono::{TimeZone, Utc};
use ogs_codec::rust_decimal::Decimal;
use uuid::Uuid;

use crate::Reflect;
use crate::graph::{DynRef, DynamicList, DynamicObject, ExtraFields, Ref, Value};
use crate::info::{TypePath, Typed};
use crate::registry::{Surrogate, TypeRegistryArc};
use crate::serial::{
    CodecCache, Deserializer, SerialConfig, SerialError, Serializer, describe,
};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Reflect, Default, Debug)]
struct Leaf {
    v: u8,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(by_value)]
struct Span {
    start: i32,
    len: u16,
}

#[derive(Reflect, Default, Debug)]
struct Sample {
    x: i32,
    leaf: Ref<Leaf>,
    again: Ref<Leaf>,
    span: Span,
}

#[derive(Reflect, Default, Debug)]
struct Node {
    label: String,
    next: Option<Ref<Node>>,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Secret")]
struct Secret {
    code: i32,
    span: Span,
    tags: Vec<String>,
    owner: Option<Ref<Leaf>>,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Profile")]
struct ProfileV1 {
    name: String,
    #[reflect(extra)]
    rest: ExtraFields,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Profile")]
struct ProfileV2 {
    name: String,
    age: u32,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Profile")]
struct ProfileNameOnly {
    name: String,
    #[reflect(skip)]
    touched: bool,
}

/// A shared type with no visible layout, written through [`PointyParts`].
#[derive(Reflect, Debug)]
#[reflect(surrogate)]
struct Pointy(String, Option<Ref<Pointy>>);

#[derive(Reflect, Default, Debug)]
struct PointyParts {
    label: String,
    me: Option<Ref<Pointy>>,
}

impl Surrogate for Pointy {
    type Simple = PointyParts;

    fn simplify(&self) -> PointyParts {
        PointyParts {
            label: self.0.clone(),
            me: self.1.clone(),
        }
    }

    fn restore(simple: PointyParts) -> Self {
        Pointy(simple.label, simple.me)
    }
}

#[derive(Reflect, Default, Debug)]
struct Bag {
    pet: Option<DynRef>,
    any: Value,
    boxed: Value,
}

#[derive(Reflect, Default, Debug)]
struct Twice {
    a: Ref<i32>,
    b: Ref<i32>,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Inner", by_value)]
struct InnerV2 {
    a: i32,
    b: i32,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Inner", by_value)]
struct InnerV1 {
    a: i32,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Tag")]
struct TagV2 {
    x: u8,
    y: u8,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Tag")]
struct TagV1 {
    x: u8,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Holder")]
struct HolderV2 {
    name: String,
    inner: InnerV2,
    tag: Ref<TagV2>,
}

/// Knows the older `Inner` and `Tag`, but under other member names.
#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "fixtures::Holder")]
struct HolderV1 {
    name: String,
    #[reflect(extra)]
    rest: ExtraFields,
    kept: InnerV1,
    kept_tag: Option<Ref<TagV1>>,
}

#[derive(Reflect, Default, Debug)]
struct Zed {
    n: i32,
}

#[derive(Reflect, Default, Debug)]
struct Outer {
    z: Ref<Zed>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Everything {
    flag: bool,
    letter: char,
    tiny: i8,
    byte: u8,
    short: i16,
    ushort: u16,
    int: i32,
    uint: u32,
    long: i64,
    ulong: u64,
    single: f32,
    double: f64,
    price: Decimal,
    when: ogs_codec::chrono::DateTime<Utc>,
    id: Uuid,
    text: String,
}

#[derive(Reflect, Default, Debug)]
struct Containers {
    fixed: [u16; 3],
    queue: VecDeque<String>,
    ordered: BTreeMap<String, Ref<Leaf>>,
    hashed: HashMap<u32, String>,
}

fn pair() -> (Serializer, Deserializer) {
    let registry = TypeRegistryArc::default();
    (Serializer::new(registry.clone()), Deserializer::new(registry))
}

fn push_str(bytes: &mut Vec<u8>, text: &str) {
    assert!(text.len() < 0x80);
    bytes.push(text.len() as u8);
    bytes.extend_from_slice(text.as_bytes());
}

// Counts `name` written as a length-prefixed string.
fn occurrences(haystack: &[u8], name: &str) -> usize {
    let mut needle = Vec::new();
    push_str(&mut needle, name);
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle.as_slice())
        .count()
}

fn unlink(node: &Ref<Node>) {
    let next = node.write().next.take();
    if let Some(next) = next
        && !next.ptr_eq(node)
    {
        unlink(&next);
    }
}

// -----------------------------------------------------------------------------
// Layout

#[test]
fn sample_bytes_are_exact() {
    let (serializer, _) = pair();
    let leaf = Ref::new(Leaf { v: 9 });
    let sample = Sample {
        x: 5,
        leaf: leaf.clone(),
        again: leaf,
        span: Span { start: 1, len: 2 },
    };
    let bytes = serializer.serialize_to_vec(&sample).unwrap();

    let registry = serializer.registry().read();
    let sample_id = describe(Sample::type_info(), &registry).unwrap().id();
    let leaf_id = describe(Leaf::type_info(), &registry).unwrap().id();
    let span_id = describe(Span::type_info(), &registry).unwrap().id();

    let mut expected = vec![1];
    expected.extend_from_slice(sample_id.as_bytes());
    push_str(&mut expected, Sample::type_path());
    expected.extend_from_slice(&[0, 0, 4, 0, 0, 0]);
    expected.push(7);
    push_str(&mut expected, "x");
    expected.push(0);
    push_str(&mut expected, "leaf");
    expected.push(0);
    push_str(&mut expected, "again");
    expected.push(18);
    push_str(&mut expected, "span");
    expected.extend_from_slice(span_id.as_bytes());
    push_str(&mut expected, Span::type_path());
    expected.extend_from_slice(&[0, 1, 2, 0, 0, 0]);
    expected.push(7);
    push_str(&mut expected, "start");
    expected.push(6);
    push_str(&mut expected, "len");

    // x
    expected.extend_from_slice(&5_i32.to_le_bytes());
    // leaf: index 1, the root value-held object took index 0.
    expected.push(1);
    expected.extend_from_slice(leaf_id.as_bytes());
    push_str(&mut expected, Leaf::type_path());
    expected.extend_from_slice(&[0, 0, 1, 0, 0, 0]);
    expected.push(4);
    push_str(&mut expected, "v");
    expected.push(9);
    // again
    expected.push(2);
    expected.extend_from_slice(&1_i32.to_le_bytes());
    // span
    expected.extend_from_slice(&1_i32.to_le_bytes());
    expected.extend_from_slice(&2_u16.to_le_bytes());

    assert_eq!(bytes, expected);
}

#[test]
fn descriptors_are_written_once_per_stream() {
    let (serializer, deserializer) = pair();
    let leaves: Vec<Ref<Leaf>> = (0..1000).map(|v| Ref::new(Leaf { v: v as u8 })).collect();
    let bytes = serializer.serialize_to_vec(&leaves).unwrap();

    assert_eq!(occurrences(&bytes, Leaf::type_path()), 1);

    let back: Vec<Ref<Leaf>> = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(back.len(), 1000);
    assert_eq!(back[999].read().v, (999 % 256) as u8);
}

#[test]
fn null_root() {
    let (serializer, deserializer) = pair();
    let bytes = serializer.serialize_to_vec(&None::<Ref<Leaf>>).unwrap();
    assert_eq!(bytes, [0]);

    let back: Option<Ref<Leaf>> = deserializer.deserialize_slice(&bytes).unwrap();
    assert!(back.is_none());

    assert!(matches!(
        deserializer.deserialize_slice::<Ref<Leaf>>(&bytes),
        Err(SerialError::TypeMismatch { .. })
    ));
}

// -----------------------------------------------------------------------------
// Identity

#[test]
fn shared_objects_stay_shared() {
    let (serializer, deserializer) = pair();
    let first = Ref::new(Leaf { v: 1 });
    let second = Ref::new(Leaf { v: 2 });
    let list = vec![first.clone(), second, first];

    let bytes = serializer.serialize_to_vec(&list).unwrap();
    let back: Vec<Ref<Leaf>> = deserializer.deserialize_slice(&bytes).unwrap();

    assert!(back[0].ptr_eq(&back[2]));
    assert!(!back[0].ptr_eq(&back[1]));
    assert_eq!(back[1].read().v, 2);
}

#[test]
fn members_of_list_items_share_targets() {
    let (serializer, deserializer) = pair();
    let zed = Ref::new(Zed { n: 9 });
    let items = vec![Outer { z: zed.clone() }, Outer { z: zed }];

    let bytes = serializer.serialize_to_vec(&items).unwrap();
    let back: Vec<Outer> = deserializer.deserialize_slice(&bytes).unwrap();

    assert_eq!(back.len(), 2);
    assert!(back[0].z.ptr_eq(&back[1].z));
    assert_eq!(back[1].z.read().n, 9);
}

#[test]
fn self_and_mutual_cycles() {
    let (serializer, deserializer) = pair();

    let lonely = Ref::new(Node {
        label: "self".into(),
        next: None,
    });
    lonely.write().next = Some(lonely.clone());
    let bytes = serializer.serialize_to_vec(&lonely).unwrap();
    let back: Ref<Node> = deserializer.deserialize_slice(&bytes).unwrap();
    assert!(back.read().next.as_ref().unwrap().ptr_eq(&back));
    unlink(&lonely);
    unlink(&back);

    let a = Ref::new(Node {
        label: "a".into(),
        next: None,
    });
    let b = Ref::new(Node {
        label: "b".into(),
        next: Some(a.clone()),
    });
    a.write().next = Some(b.clone());
    let bytes = serializer.serialize_to_vec(&a).unwrap();
    let back: Ref<Node> = deserializer.deserialize_slice(&bytes).unwrap();
    let other = back.read().next.clone().unwrap();
    assert_eq!(other.read().label, "b");
    assert!(other.read().next.as_ref().unwrap().ptr_eq(&back));
    unlink(&a);
    unlink(&back);
}

#[test]
fn primitives_behind_handles_are_boxed() {
    let (serializer, deserializer) = pair();
    let bytes = serializer.serialize_to_vec(&Ref::new(7_i32)).unwrap();
    assert_eq!(bytes, [3, 7, 7, 0, 0, 0]);

    let shared = Ref::new(3_i32);
    let twice = Twice {
        a: shared.clone(),
        b: shared,
    };
    let bytes = serializer.serialize_to_vec(&twice).unwrap();
    let back: Twice = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(*back.a.read(), 3);
    assert_eq!(*back.b.read(), 3);
    assert!(!back.a.ptr_eq(&back.b));
}

#[test]
fn surrogates_resolve_back_references() {
    let (serializer, deserializer) = pair();
    let pointy = Ref::new(Pointy("loop".into(), None));
    pointy.write().1 = Some(pointy.clone());

    let bytes = serializer.serialize_to_vec(&pointy).unwrap();
    assert_eq!(occurrences(&bytes, Pointy::type_path()), 1);
    assert_eq!(occurrences(&bytes, PointyParts::type_path()), 0);

    let back: Ref<Pointy> = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(back.read().0, "loop");
    assert!(back.read().1.as_ref().unwrap().ptr_eq(&back));

    pointy.write().1 = None;
    back.write().1 = None;
}

#[test]
fn polymorphic_slots() {
    let (serializer, deserializer) = pair();
    serializer.registry().write().register::<Leaf>();

    let leaf = Ref::new(Leaf { v: 4 });
    let bag = Bag {
        pet: Some(leaf.clone().into_dyn()),
        any: Value::from(leaf),
        boxed: Value::I64(-9),
    };
    let bytes = serializer.serialize_to_vec(&bag).unwrap();
    let back: Bag = deserializer.deserialize_slice(&bytes).unwrap();

    let pet = back.pet.unwrap();
    assert_eq!(pet.read().downcast_ref::<Leaf>().unwrap().v, 4);
    assert!(back.any.as_object().unwrap().ptr_eq(&pet));
    assert_eq!(back.boxed, Value::I64(-9));
}

// -----------------------------------------------------------------------------
// Schema evolution

#[test]
fn unknown_types_decode_dynamically_and_write_back() {
    let (serializer, _) = pair();
    let secret = Secret {
        code: 7,
        span: Span { start: -3, len: 8 },
        tags: vec!["a".into(), "b".into()],
        owner: Some(Ref::new(Leaf { v: 1 })),
    };
    let bytes = serializer.serialize_to_vec(&secret).unwrap();

    let stranger = TypeRegistryArc::default();
    let value = Deserializer::new(stranger.clone())
        .deserialize_slice::<Value>(&bytes)
        .unwrap();

    {
        let root = value.as_object().unwrap().read();
        let object = root.downcast_ref::<DynamicObject>().unwrap();
        assert_eq!(object.type_path(), "fixtures::Secret");
        assert_eq!(object.get("code"), Some(&Value::I32(7)));

        let span = object.get("span").and_then(Value::as_object).unwrap().read();
        let span = span.downcast_ref::<DynamicObject>().unwrap();
        assert_eq!(span.get("start"), Some(&Value::I32(-3)));

        let tags = object.get("tags").and_then(Value::as_object).unwrap().read();
        let tags = tags.downcast_ref::<DynamicList>().unwrap();
        assert_eq!(tags.get(1), Some(&Value::from("b")));
    }

    let again = Serializer::new(stranger).serialize_to_vec(&value).unwrap();
    assert_eq!(again, bytes);

    let strict = Deserializer::new(TypeRegistryArc::default())
        .with_config(SerialConfig::default().with_unknown_types(false));
    assert!(matches!(
        strict.deserialize_slice::<Value>(&bytes),
        Err(SerialError::UnboundType { .. })
    ));
}

#[test]
fn extra_members_survive_an_older_reader() {
    let newer = TypeRegistryArc::default();
    let older = TypeRegistryArc::default();

    let bytes = Serializer::new(newer.clone())
        .serialize_to_vec(&ProfileV2 {
            name: "ada".into(),
            age: 36,
        })
        .unwrap();

    let old: ProfileV1 = Deserializer::new(older.clone()).deserialize_slice(&bytes).unwrap();
    assert_eq!(old.name, "ada");
    assert_eq!(old.rest.get("age"), Some(&Value::U32(36)));

    let bytes = Serializer::new(older).serialize_to_vec(&old).unwrap();
    let new: ProfileV2 = Deserializer::new(newer).deserialize_slice(&bytes).unwrap();
    assert_eq!(new.name, "ada");
    assert_eq!(new.age, 36);
}

#[test]
fn absorbed_members_keep_members_the_reader_lacks() {
    let newer = TypeRegistryArc::default();
    let older = TypeRegistryArc::default();

    let bytes = Serializer::new(newer.clone())
        .serialize_to_vec(&HolderV2 {
            name: "cfg".into(),
            inner: InnerV2 { a: 1, b: 2 },
            tag: Ref::new(TagV2 { x: 3, y: 4 }),
        })
        .unwrap();

    let old: HolderV1 = Deserializer::new(older.clone()).deserialize_slice(&bytes).unwrap();
    assert_eq!(old.name, "cfg");
    assert!(older.read().get_with_type_path("fixtures::Inner").is_some());
    assert!(older.read().get_with_type_path("fixtures::Tag").is_some());
    {
        let inner = old.rest.get("inner").and_then(Value::as_object).unwrap().read();
        let inner = inner.downcast_ref::<DynamicObject>().unwrap();
        assert_eq!(inner.get("a"), Some(&Value::I32(1)));
        assert_eq!(inner.get("b"), Some(&Value::I32(2)));

        let tag = old.rest.get("tag").and_then(Value::as_object).unwrap().read();
        let tag = tag.downcast_ref::<DynamicObject>().unwrap();
        assert_eq!(tag.get("y"), Some(&Value::U8(4)));
    }

    let bytes = Serializer::new(older).serialize_to_vec(&old).unwrap();
    let new: HolderV2 = Deserializer::new(newer).deserialize_slice(&bytes).unwrap();
    assert_eq!(new.name, "cfg");
    assert_eq!((new.inner.a, new.inner.b), (1, 2));
    let tag = new.tag.read();
    assert_eq!((tag.x, tag.y), (3, 4));
}

#[test]
fn unmatched_members_are_dropped_or_rejected() {
    let bytes = Serializer::new(TypeRegistryArc::default())
        .serialize_to_vec(&ProfileV2 {
            name: "bob".into(),
            age: 2,
        })
        .unwrap();

    let lenient = Deserializer::new(TypeRegistryArc::default());
    let profile: ProfileNameOnly = lenient.deserialize_slice(&bytes).unwrap();
    assert_eq!(profile.name, "bob");
    assert!(!profile.touched);

    let strict = Deserializer::new(TypeRegistryArc::default())
        .with_config(SerialConfig::default().with_absorb_missing_members(false));
    match strict.deserialize_slice::<ProfileNameOnly>(&bytes) {
        Err(SerialError::MissingMember { member, .. }) => assert_eq!(member, "age"),
        other => panic!("expected a missing member, got {other:?}"),
    }
}

// -----------------------------------------------------------------------------
// Values

#[test]
fn every_primitive_round_trips() {
    let (serializer, deserializer) = pair();
    let everything = Everything {
        flag: true,
        letter: 'λ',
        tiny: -8,
        byte: 200,
        short: -300,
        ushort: 60_000,
        int: i32::MIN,
        uint: u32::MAX,
        long: -1 << 40,
        ulong: u64::MAX,
        single: 1.5,
        double: -0.25,
        price: Decimal::new(1999, 2),
        when: Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap(),
        id: Uuid::from_u128(42),
        text: "graph".into(),
    };
    let bytes = serializer.serialize_to_vec(&everything).unwrap();
    let back: Everything = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(back, everything);
}

#[test]
fn standard_collections() {
    let (serializer, deserializer) = pair();
    let shared = Ref::new(Leaf { v: 5 });
    let containers = Containers {
        fixed: [1, 2, 3],
        queue: VecDeque::from(["x".to_owned(), "y".to_owned()]),
        ordered: BTreeMap::from([("a".to_owned(), shared.clone()), ("b".to_owned(), shared)]),
        hashed: HashMap::from([(1, "one".to_owned()), (2, "two".to_owned())]),
    };
    let bytes = serializer.serialize_to_vec(&containers).unwrap();
    let back: Containers = deserializer.deserialize_slice(&bytes).unwrap();

    assert_eq!(back.fixed, [1, 2, 3]);
    assert_eq!(back.queue, ["x", "y"]);
    assert!(back.ordered["a"].ptr_eq(&back.ordered["b"]));
    assert_eq!(back.ordered["a"].read().v, 5);
    assert_eq!(back.hashed[&2], "two");
}

#[test]
fn fixed_arrays_reject_longer_lists() {
    let (serializer, deserializer) = pair();
    let bytes = serializer.serialize_to_vec(&vec![1_u16, 2, 3, 4]).unwrap();
    assert!(matches!(
        deserializer.deserialize_slice::<[u16; 3]>(&bytes),
        Err(SerialError::TypeMismatch { .. })
    ));

    let bytes = serializer.serialize_to_vec(&vec![1_u16]).unwrap();
    let back: [u16; 3] = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(back, [1, 0, 0]);
}

#[test]
fn nested_nullable_slots_are_rejected() {
    let (serializer, deserializer) = pair();

    let nested: Option<Option<Ref<Leaf>>> = Some(None);
    assert!(matches!(
        serializer.serialize_to_vec(&nested),
        Err(SerialError::UnsupportedTypeKind { .. })
    ));
    assert!(matches!(
        serializer.serialize_to_vec(&Some(Value::Null)),
        Err(SerialError::UnsupportedTypeKind { .. })
    ));
    assert!(matches!(
        deserializer.deserialize_slice::<Option<Option<Ref<Leaf>>>>(&[0]),
        Err(SerialError::UnsupportedTypeKind { .. })
    ));

    let bytes = serializer.serialize_to_vec(&Some(Ref::new(Leaf { v: 4 }))).unwrap();
    let back: Option<Ref<Leaf>> = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(back.as_ref().map(|leaf| leaf.read().v), Some(4));
}

#[test]
fn unit_has_no_schema() {
    let (serializer, _) = pair();
    assert!(matches!(
        serializer.serialize_to_vec(&()),
        Err(SerialError::UnsupportedTypeKind { .. })
    ));
}

// -----------------------------------------------------------------------------
// Corrupt input

#[test]
fn corrupt_streams_are_rejected() {
    let (_, deserializer) = pair();

    // Unknown header byte.
    assert!(matches!(
        deserializer.deserialize_slice::<Value>(&[9]),
        Err(SerialError::CorruptStream { .. })
    ));
    // Back-reference with nothing read yet.
    assert!(matches!(
        deserializer.deserialize_slice::<Option<Ref<Leaf>>>(&[2, 0, 0, 0, 0]),
        Err(SerialError::CorruptStream { .. })
    ));
    // A collection cannot be boxed.
    assert!(matches!(
        deserializer.deserialize_slice::<Value>(&[3, 17]),
        Err(SerialError::CorruptStream { .. })
    ));
    // Truncated payload.
    assert!(matches!(
        deserializer.deserialize_slice::<Value>(&[3, 7, 1]),
        Err(SerialError::Codec(_))
    ));

    // Negative item count.
    let (serializer, _) = pair();
    let mut bytes = serializer.serialize_to_vec(&Vec::<u8>::new()).unwrap();
    let at = bytes.len() - 4;
    bytes[at..].copy_from_slice(&(-1_i32).to_le_bytes());
    assert!(matches!(
        deserializer.deserialize_slice::<Vec<u8>>(&bytes),
        Err(SerialError::CorruptStream { .. })
    ));
}

#[test]
fn depth_limit() {
    let head = Ref::new(Node::default());
    let mut tail = head.clone();
    for index in 0..10 {
        let next = Ref::new(Node {
            label: index.to_string(),
            next: None,
        });
        tail.write().next = Some(next.clone());
        tail = next;
    }

    let limited = SerialConfig::default().with_max_depth(Some(4));
    let registry = TypeRegistryArc::default();
    assert!(matches!(
        Serializer::new(registry.clone())
            .with_config(limited)
            .serialize_to_vec(&head),
        Err(SerialError::DepthExceeded { limit: 4 })
    ));

    let bytes = Serializer::new(registry.clone()).serialize_to_vec(&head).unwrap();
    assert!(matches!(
        Deserializer::new(registry.clone())
            .with_config(limited)
            .deserialize_slice::<Ref<Node>>(&bytes),
        Err(SerialError::DepthExceeded { limit: 4 })
    ));
    let back: Ref<Node> = Deserializer::new(registry).deserialize_slice(&bytes).unwrap();
    assert_eq!(back.read().next.as_ref().unwrap().read().label, "0");
}

// -----------------------------------------------------------------------------
// Caching and threads

#[test]
fn plans_are_reused_across_calls() {
    let cache = Arc::new(CodecCache::new());
    let registry = TypeRegistryArc::default();
    let serializer = Serializer::new(registry.clone()).with_cache(Arc::clone(&cache));
    let deserializer = Deserializer::new(registry).with_cache(Arc::clone(&cache));

    let node = Ref::new(Node {
        label: "one".into(),
        next: Some(Ref::new(Node::default())),
    });
    let bytes = serializer.serialize_to_vec(&node).unwrap();
    let _: Ref<Node> = deserializer.deserialize_slice(&bytes).unwrap();
    let encoders = cache.encoder_len();
    let decoders = cache.decoder_len();
    assert!(encoders >= 1);
    assert!(decoders >= 1);

    let bytes = serializer.serialize_to_vec(&node).unwrap();
    let _: Ref<Node> = deserializer.deserialize_slice(&bytes).unwrap();
    assert_eq!(cache.encoder_len(), encoders);
    assert_eq!(cache.decoder_len(), decoders);
}

#[test]
fn concurrent_calls_share_one_cache() {
    let (serializer, deserializer) = pair();
    let expected = serializer
        .serialize_to_vec(&Sample {
            x: 1,
            ..Sample::default()
        })
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for x in 0..50 {
                    let sample = Sample {
                        x,
                        ..Sample::default()
                    };
                    let bytes = serializer.serialize_to_vec(&sample).unwrap();
                    assert_eq!(bytes.len(), expected.len());
                    let back: Sample = deserializer.deserialize_slice(&bytes).unwrap();
                    assert_eq!(back.x, x);
                    assert!(!back.leaf.ptr_eq(&back.again));
                }
            });
        }
    });
}
