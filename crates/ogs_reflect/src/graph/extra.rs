use alloc::vec::Vec;

use crate::graph::Value;
use crate::serial::FieldDescriptor;

/// A member the owning type does not declare.
#[derive(Clone, Debug)]
pub struct ExtraField {
    descriptor: FieldDescriptor,
    value: Value,
}

impl ExtraField {
    #[inline]
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Members read from a newer schema, kept so that writing the object again
/// does not lose them.
///
/// A struct opts in by marking one field of this type with
/// `#[reflect(extra)]`. Entries keep their insertion order; inserting a name
/// that is already present replaces the entry in place.
///
/// # Examples
///
/// ```
/// use ogs_reflect::graph::{ExtraFields, Value};
/// use ogs_reflect::serial::{FieldDescriptor, RawKind};
///
/// let mut extra = ExtraFields::new();
/// extra.insert(FieldDescriptor::new("email", RawKind::String), "a@b.c".into());
/// extra.insert(FieldDescriptor::new("age", RawKind::I32), Value::I32(30));
/// extra.insert(FieldDescriptor::new("email", RawKind::String), "x@y.z".into());
///
/// assert_eq!(extra.len(), 2);
/// assert_eq!(extra.get("email"), Some(&Value::from("x@y.z")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExtraFields {
    entries: Vec<ExtraField>,
}

impl ExtraFields {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .map(ExtraField::value)
    }

    /// Inserts or replaces the member named by `descriptor`, returning the
    /// previous value.
    pub fn insert(&mut self, descriptor: FieldDescriptor, value: Value) -> Option<Value> {
        match self.position(descriptor.name()) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.descriptor = descriptor;
                Some(core::mem::replace(&mut entry.value, value))
            }
            None => {
                self.entries.push(ExtraField { descriptor, value });
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ExtraField> {
        let index = self.position(name)?;
        Some(self.entries.remove(index))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ExtraField> {
        self.entries.iter()
    }

    #[inline]
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name() == name)
    }

    #[inline]
    pub(crate) fn get_index(&self, index: usize) -> Option<&ExtraField> {
        self.entries.get(index)
    }
}
