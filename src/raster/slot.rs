use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    image: Option<Arc<RgbaImage>>,
}

/// Latest rasterized scene, shared between the producer and the preview.
///
/// Every publish bumps the generation. Readers compare generations to know when
/// to re-upload; the last write always wins.
#[derive(Debug, Clone, Default)]
pub struct TextureSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl TextureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, image: RgbaImage) -> u64 {
        let mut state = self.inner.lock();
        state.generation += 1;
        state.image = Some(Arc::new(image));
        state.generation
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn latest(&self) -> Option<(u64, Arc<RgbaImage>)> {
        let state = self.inner.lock();
        state
            .image
            .as_ref()
            .map(|image| (state.generation, Arc::clone(image)))
    }

    /// Image newer than `seen`, if any
    pub fn newer_than(&self, seen: u64) -> Option<(u64, Arc<RgbaImage>)> {
        self.latest().filter(|(generation, _)| *generation > seen)
    }
}
