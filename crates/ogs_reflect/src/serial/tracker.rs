use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use ogs_utils::hash::HashMap;

use crate::graph::SharedObject;
use crate::serial::SerialError;

// -----------------------------------------------------------------------------
// EncodeTracker

/// Objects already written during one serialization call.
///
/// Indices are handed out in first-visit order. Value-held objects take an
/// index too, without an address, so the numbering matches what the reader
/// assigns.
#[derive(Default)]
pub(crate) struct EncodeTracker {
    visited: HashMap<usize, i32>,
    next: i32,
    // Handles are kept alive until the call ends so no address is reused.
    handles: Vec<Box<dyn Any + Send + Sync>>,
}

impl EncodeTracker {
    #[inline]
    pub fn lookup(&self, address: usize) -> Option<i32> {
        self.visited.get(&address).copied()
    }

    pub fn register(&mut self, address: usize, handle: Box<dyn Any + Send + Sync>) -> i32 {
        let index = self.register_anonymous();
        self.visited.insert(address, index);
        self.handles.push(handle);
        index
    }

    #[inline]
    pub fn register_anonymous(&mut self) -> i32 {
        let index = self.next;
        self.next += 1;
        index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.next as usize
    }
}

// -----------------------------------------------------------------------------
// DecodeTracker

/// An object the reader materialized.
pub(crate) enum Tracked {
    /// A shared handle that back-references may resolve to.
    Shared(SharedObject),
    /// A value-held object. It occupies an index but cannot be referenced.
    Anonymous,
}

/// Objects materialized during one deserialization call, by index.
#[derive(Default)]
pub(crate) struct DecodeTracker {
    objects: Vec<Tracked>,
}

impl DecodeTracker {
    pub fn register(&mut self, tracked: Tracked) -> i32 {
        self.objects.push(tracked);
        (self.objects.len() - 1) as i32
    }

    pub fn resolve(&self, index: i32) -> Result<&SharedObject, SerialError> {
        let slot = usize::try_from(index)
            .ok()
            .and_then(|slot| self.objects.get(slot));
        match slot {
            Some(Tracked::Shared(object)) => Ok(object),
            Some(Tracked::Anonymous) => Err(SerialError::corrupt(alloc::format!(
                "back-reference {index} points at a value-held object"
            ))),
            None => Err(SerialError::corrupt(alloc::format!(
                "back-reference {index} beyond the {} objects read so far",
                self.objects.len()
            ))),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeTracker, EncodeTracker, Tracked};
    use crate::graph::{Ref, SharedObject};
    use crate::serial::SerialError;

    #[test]
    fn indices_follow_visit_order() {
        let a = Ref::new(1_i32);
        let b = Ref::new(2_i32);

        let mut tracker = EncodeTracker::default();
        assert_eq!(tracker.register(a.address(), a.keep_alive()), 0);
        assert_eq!(tracker.register_anonymous(), 1);
        assert_eq!(tracker.register(b.address(), b.keep_alive()), 2);

        assert_eq!(tracker.lookup(b.address()), Some(2));
        assert_eq!(tracker.lookup(a.address()), Some(0));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn resolves_shared_only() {
        let handle = Ref::new(5_u8);
        let mut tracker = DecodeTracker::default();
        tracker.register(Tracked::Anonymous);
        tracker.register(Tracked::Shared(SharedObject::new(handle.clone())));

        let found = tracker.resolve(1).unwrap().typed::<u8>().unwrap();
        assert!(found.ptr_eq(&handle));

        assert!(matches!(tracker.resolve(0), Err(SerialError::CorruptStream { .. })));
        assert!(matches!(tracker.resolve(2), Err(SerialError::CorruptStream { .. })));
        assert!(matches!(tracker.resolve(-1), Err(SerialError::CorruptStream { .. })));
        assert_eq!(tracker.len(), 2);
    }
}
