use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

use crate::id_generator::ShapeId;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Invalid texture dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// What a cached texture shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Pixels of an image shape
    Shape(ShapeId),
    /// The rasterized scene
    Preview,
}

/// Converts decoded pixels into an egui image
pub fn color_image(image: &RgbaImage) -> Result<ColorImage, TextureGenerationError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureGenerationError::InvalidDimensions(width, height));
    }
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        image.as_raw(),
    ))
}

/// Manages GPU textures, providing caching and invalidation
pub struct TextureManager {
    /// Cache of textures by (key, version)
    texture_cache: HashMap<(TextureKey, u64), TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<(TextureKey, u64), u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or creates the texture for `key` at `version`
    pub fn get_or_create_texture<F>(
        &mut self,
        key: TextureKey,
        version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (key, version);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.id());
        }

        let image = generator()?;
        self.make_room();

        let name = match key {
            TextureKey::Shape(id) => format!("shape_{}_v{}", id, version),
            TextureKey::Preview => format!("preview_v{}", version),
        };
        let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);

        self.texture_cache.insert(cache_key, handle.clone());
        self.last_used.insert(cache_key, self.current_frame);
        Ok(handle.id())
    }

    /// Drops every version cached for `key`
    pub fn invalidate(&mut self, key: TextureKey) {
        self.texture_cache.retain(|(k, _), _| *k != key);
        self.last_used.retain(|(k, _), _| *k != key);
    }

    /// Evicts least recently used entries so one more fits
    fn make_room(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<((TextureKey, u64), u64)> =
            self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = self.texture_cache.len() + 1 - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn get_texture(&self, key: TextureKey, version: u64) -> Option<&TextureHandle> {
        self.texture_cache.get(&(key, version))
    }
}
