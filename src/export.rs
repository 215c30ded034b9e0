//! Writing the flattened scene to a PNG file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::editor::Editor;
use crate::raster::{RasterError, Rasterizer};
use crate::transform::TransformController;
use crate::util::current_time_secs;
use crate::viewport::StageView;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export, the canvas is empty")]
    EmptyScene,

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Hides the handles and forces a unit-scale view until dropped.
struct ExportGuard<'a> {
    controller: &'a mut TransformController,
    view: &'a mut StageView,
    saved_view: StageView,
    handles_were_visible: bool,
}

impl<'a> ExportGuard<'a> {
    fn new(controller: &'a mut TransformController, view: &'a mut StageView) -> Self {
        let saved_view = *view;
        let handles_were_visible = controller.handles_visible();
        controller.set_handles_visible(false);
        *view = StageView::unit();
        Self {
            controller,
            view,
            saved_view,
            handles_were_visible,
        }
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        *self.view = self.saved_view;
        self.controller.set_handles_visible(self.handles_were_visible);
    }
}

/// Rasterizes the scene at full resolution and writes it to the configured export path.
pub fn export_png(
    editor: &mut Editor,
    view: &mut StageView,
    rasterizer: &mut dyn Rasterizer,
) -> Result<PathBuf, ExportError> {
    let path = editor.config().export_path();
    export_png_to(editor, view, rasterizer, &path)?;
    Ok(path)
}

pub fn export_png_to(
    editor: &mut Editor,
    view: &mut StageView,
    rasterizer: &mut dyn Rasterizer,
    path: &Path,
) -> Result<(), ExportError> {
    if !editor.can_export() {
        return Err(ExportError::EmptyScene);
    }

    // A half-finished gesture never ends up in the file
    editor.cancel_gesture(current_time_secs());

    let image = {
        let _guard = ExportGuard::new(&mut editor.controller, view);
        rasterizer.rasterize(&editor.scene, &mut editor.fonts)?
    };

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("💾 Exported {}x{} to {}", image.width(), image.height(), path.display());
    Ok(())
}
