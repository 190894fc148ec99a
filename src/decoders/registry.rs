use std::collections::HashMap;
use std::sync::Arc;

use super::{go32, FrameDecoder, Go32Decoder};

/// Satellite id to decoder bindings.
///
/// Built once at startup, then shared read-only (`&DecoderRegistry` or
/// `Arc<DecoderRegistry>`) across any number of workers.
#[derive(Default, Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<u32, Arc<dyn FrameDecoder>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every decoder shipped with this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(go32::NORAD_ID, Go32Decoder);
        registry
    }

    /// Bind `decoder` to `satellite_id`. The last registration wins.
    pub fn register<D>(&mut self, satellite_id: u32, decoder: D) -> &mut Self
    where
        D: FrameDecoder + 'static,
    {
        self.register_shared(satellite_id, Arc::new(decoder))
    }

    pub fn register_shared(
        &mut self,
        satellite_id: u32,
        decoder: Arc<dyn FrameDecoder>,
    ) -> &mut Self {
        if let Some(previous) = self.decoders.insert(satellite_id, decoder) {
            log::debug!(
                "NORAD {}: replacing decoder {}",
                satellite_id,
                previous.name()
            );
        }
        self
    }

    pub fn lookup(&self, satellite_id: u32) -> Option<&dyn FrameDecoder> {
        self.decoders.get(&satellite_id).map(|d| d.as_ref())
    }

    pub fn contains(&self, satellite_id: u32) -> bool {
        self.decoders.contains_key(&satellite_id)
    }

    pub fn satellite_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.decoders.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for id in self.satellite_ids() {
            if let Some(decoder) = self.lookup(id) {
                map.entry(&id, &decoder.name());
            }
        }
        map.finish()
    }
}
