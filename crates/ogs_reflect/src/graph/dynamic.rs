use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::graph::Value;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
use crate::reflection::impl_reflect_methods;
use crate::serial::{FieldDescriptor, TypeDescriptor};

// -----------------------------------------------------------------------------
// DynamicObject

/// An object whose type the reader could not resolve.
///
/// It keeps the descriptor found on the wire together with one [`Value`]
/// per member, so writing it again reproduces the original schema.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ogs_reflect::graph::{DynamicObject, Value};
/// use ogs_reflect::serial::{FieldDescriptor, RawKind, TypeDescriptor};
///
/// let descriptor = Arc::new(TypeDescriptor::new(
///     "legacy::Point",
///     RawKind::Object,
///     false,
///     vec![FieldDescriptor::new("x", RawKind::I32)],
/// ));
/// let mut point = DynamicObject::new(descriptor);
/// assert_eq!(point.get("x"), Some(&Value::Null));
///
/// assert!(point.set("x", Value::I32(3)));
/// assert!(!point.set("y", Value::I32(4)));
/// assert_eq!(point.get("x"), Some(&Value::I32(3)));
/// ```
pub struct DynamicObject {
    descriptor: Arc<TypeDescriptor>,
    values: Vec<Value>,
}

impl DynamicObject {
    /// Creates an object with every member set to [`Value::Null`].
    pub fn new(descriptor: Arc<TypeDescriptor>) -> Self {
        let values = descriptor.fields().iter().map(|_| Value::Null).collect();
        Self { descriptor, values }
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// The type path recorded on the wire.
    #[inline]
    pub fn type_path(&self) -> &str {
        self.descriptor.name()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.descriptor.field_index(name)?;
        self.values.get(index)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.descriptor.field_index(name)?;
        self.values.get_mut(index)
    }

    /// Replaces the member `name`. Returns `false` if there is no such member.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Iterates over members in wire order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&FieldDescriptor, &Value)> {
        self.descriptor.fields().iter().zip(self.values.iter())
    }

    #[inline]
    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub(crate) fn set_at(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("DynamicObject");
        debug.field("type_path", &self.type_path());
        for (field, value) in self.iter() {
            debug.field(field.name(), value);
        }
        debug.finish()
    }
}

// -----------------------------------------------------------------------------
// DynamicList

/// A collection whose type the reader could not resolve.
pub struct DynamicList {
    descriptor: Arc<TypeDescriptor>,
    items: Vec<Value>,
}

impl DynamicList {
    #[inline]
    pub fn new(descriptor: Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor,
            items: Vec::new(),
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn type_path(&self) -> &str {
        self.descriptor.name()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    #[inline]
    pub fn push(&mut self, item: Value) {
        self.items.push(item);
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.items.iter()
    }
}

impl fmt::Debug for DynamicList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Reflect

macro_rules! impl_dynamic_reflect {
    ($ty:ident, $path:literal) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($ty)
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
            }
        }

        impl Reflect for $ty {
            impl_reflect_methods!();
        }
    };
}

impl_dynamic_reflect!(DynamicObject, "ogs_reflect::graph::DynamicObject");
impl_dynamic_reflect!(DynamicList, "ogs_reflect::graph::DynamicList");
