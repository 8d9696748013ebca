use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use ogs_utils::hash::HashMap;

use crate::serial::SerialError;
use crate::serial::plan::{DecodeKey, DecodePlan, EncodeKey, EncodePlan};

/// Compiled codec plans, shared by every call that uses the cache.
///
/// A plan is built the first time a (type, descriptor) pair is seen and then
/// reused; plans are never invalidated. Concurrent callers may both build a
/// plan for the same key, in which case the first insert wins.
///
/// Every [`Serializer`](crate::serial::Serializer) and
/// [`Deserializer`](crate::serial::Deserializer) starts with its own cache.
/// Hand the same `Arc<CodecCache>` to several of them to share plans.
#[derive(Default)]
pub struct CodecCache {
    encoders: RwLock<HashMap<EncodeKey, Arc<EncodePlan>>>,
    decoders: RwLock<HashMap<DecodeKey, Arc<DecodePlan>>>,
}

impl CodecCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn encoder(
        &self,
        key: EncodeKey,
        bind: impl FnOnce() -> Result<EncodePlan, SerialError>,
    ) -> Result<Arc<EncodePlan>, SerialError> {
        let found = self
            .encoders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(plan) = found {
            return Ok(plan);
        }

        let plan = Arc::new(bind()?);
        let mut encoders = self.encoders.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(encoders.entry(key).or_insert(plan)))
    }

    pub(crate) fn decoder(
        &self,
        key: DecodeKey,
        bind: impl FnOnce() -> Result<DecodePlan, SerialError>,
    ) -> Result<Arc<DecodePlan>, SerialError> {
        let found = self
            .decoders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(plan) = found {
            return Ok(plan);
        }

        let plan = Arc::new(bind()?);
        // Unresolved schemas are bound again next time: the type may have
        // been registered since.
        if matches!(*plan, DecodePlan::Unknown) {
            return Ok(plan);
        }
        let mut decoders = self.decoders.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(decoders.entry(key).or_insert(plan)))
    }

    /// Number of compiled encode plans.
    pub fn encoder_len(&self) -> usize {
        self.encoders.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of compiled decode plans.
    pub fn decoder_len(&self) -> usize {
        self.decoders.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for CodecCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecCache")
            .field("encoders", &self.encoder_len())
            .field("decoders", &self.decoder_len())
            .finish()
    }
}
