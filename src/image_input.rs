//! Turning files (picked, dropped or read from disk) into image sources.

use std::path::Path;

use eframe::egui;
use thiserror::Error;

use crate::shape::ImageSource;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Error)]
pub enum ImageInputError {
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{0} is not a supported image file")]
    UnsupportedFile(String),

    #[error("{0} has no pixels")]
    EmptyImage(String),
}

/// Check if a file name looks like an image we can decode
pub fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn decode_bytes(name: &str, bytes: &[u8]) -> Result<ImageSource, ImageInputError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| ImageInputError::Decode {
        name: name.to_owned(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ImageInputError::EmptyImage(name.to_owned()));
    }
    log::debug!("Decoded {}: {}x{}", name, rgba.width(), rgba.height());
    Ok(ImageSource::new(name, rgba))
}

pub fn decode_path(path: &Path) -> Result<ImageSource, ImageInputError> {
    let name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| ImageInputError::Io {
        name: name.clone(),
        source,
    })?;
    decode_bytes(&name, &bytes)
}

/// Native file dialog. `Ok(None)` when the user cancels.
#[cfg(not(target_arch = "wasm32"))]
pub fn pick_image() -> Result<Option<ImageSource>, ImageInputError> {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
    else {
        return Ok(None);
    };
    decode_path(&path).map(Some)
}

/// Decodes the files dropped onto the window this frame.
///
/// egui only reports a drop on the frame it lands, so dropping the same file again
/// later adds it again. Duplicates within one frame are decoded once.
pub fn take_dropped(ctx: &egui::Context) -> Vec<Result<ImageSource, ImageInputError>> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let mut seen: Vec<String> = Vec::with_capacity(dropped.len());
    dropped
        .iter()
        .filter_map(|file| {
            let name = dropped_name(file);
            if seen.contains(&name) {
                return None;
            }
            seen.push(name.clone());
            Some(decode_dropped(file, name))
        })
        .collect()
}

/// Dims the window while files hover over it
pub fn preview_files_being_dropped(ctx: &egui::Context) {
    use egui::{Align2, Color32, Id, LayerId, Order};

    if ctx.input(|i| i.raw.hovered_files.is_empty()) {
        return;
    }
    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        "Drop images to add them",
        egui::TextStyle::Heading.resolve(&ctx.style()),
        Color32::WHITE,
    );
}

fn dropped_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

fn is_image_file(file: &egui::DroppedFile, name: &str) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else {
        has_image_extension(name)
    }
}

fn decode_dropped(file: &egui::DroppedFile, name: String) -> Result<ImageSource, ImageInputError> {
    if !is_image_file(file, &name) {
        return Err(ImageInputError::UnsupportedFile(name));
    }
    if let Some(bytes) = &file.bytes {
        return decode_bytes(&name, bytes);
    }
    match &file.path {
        #[cfg(not(target_arch = "wasm32"))]
        Some(path) => decode_path(path),
        _ => Err(ImageInputError::UnsupportedFile(name)),
    }
}
