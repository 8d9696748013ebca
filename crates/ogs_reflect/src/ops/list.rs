use crate::Reflect;
use crate::serial::{DeserializeDriver, FieldDescriptor, SerialError, SerializeDriver};

/// An ordered, countable collection.
///
/// The serializer writes the item count, then hands the stream back to the
/// list: items are encoded with their field form, so the same item type is
/// written the same way whether it is a struct member or a list element.
pub trait List: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes every item in order.
    fn encode_items(&self, serializer: &mut SerializeDriver<'_>) -> Result<(), SerialError>;

    /// Reads the item at `index`.
    ///
    /// Growable lists append, so `index` always equals the current length.
    /// Fixed length lists overwrite the slot.
    fn decode_item(
        &mut self,
        index: usize,
        deserializer: &mut DeserializeDriver<'_>,
        item: &FieldDescriptor,
    ) -> Result<(), SerialError>;
}
