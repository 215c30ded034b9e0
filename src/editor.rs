//! The editing session: scene, selection, transform controller and raster scheduling.
//!
//! UI code feeds pointer events and property edits in here; everything that
//! changes what gets rasterized ends in a raster request.

use egui::Pos2;
use image::RgbaImage;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::EditorConfig;
use crate::fonts::{self, DEFAULT_FONT_FAMILY, FontError, FontRegistry, FontVariant, StyleToggle};
use crate::id_generator::ShapeId;
use crate::raster::{RasterError, RasterScheduler, Rasterizer};
use crate::scene::Scene;
use crate::selection::{SelectedShape, Selection};
use crate::shape::{Element, ImageSource, ShapePatch, TextStylePatch, factory};
use crate::transform::{PointerTarget, TransformController};

pub struct Editor {
    pub(crate) scene: Scene,
    pub(crate) selection: Selection,
    pub(crate) controller: TransformController,
    pub(crate) scheduler: RasterScheduler,
    pub(crate) fonts: FontRegistry,
    config: EditorConfig,
    rng: StdRng,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("shapes", &self.scene.len())
            .field("selection", &self.selection)
            .field("transform", self.controller.state())
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_parts(config, FontRegistry::new(), StdRng::from_os_rng())
    }

    /// Editor with explicit collaborators, used by tests to avoid system fonts and fix placement
    pub fn with_parts(config: EditorConfig, fonts: FontRegistry, rng: StdRng) -> Self {
        Self {
            scene: Scene::default(),
            selection: Selection::new(),
            controller: TransformController::new(),
            scheduler: RasterScheduler::from_config(&config),
            fonts,
            config,
            rng,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TransformController {
        &mut self.controller
    }

    pub fn scheduler(&self) -> &RasterScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.scheduler = RasterScheduler::from_config(&config);
        self.config = config;
    }

    /// Adds a decoded image, fitted and centered, and selects it.
    pub fn add_image(&mut self, source: ImageSource, now: f64) -> ShapeId {
        let shape = factory::create_image(source, self.scene.resolution());
        let id = self.scene.add(shape);
        self.select(id);
        self.scheduler.request(now);
        id
    }

    /// Adds a default text once its font is available, and selects it.
    pub fn add_text(&mut self, text: &str, now: f64) -> Result<ShapeId, FontError> {
        // Text is only created once its face is ready
        self.fonts
            .ensure_font_loaded(DEFAULT_FONT_FAMILY, FontVariant::Normal, || {})?;

        let shape = factory::create_text(text, &mut self.rng);
        let id = self.scene.add(shape);
        self.select(id);
        self.scheduler.request(now);
        Ok(id)
    }

    /// Selects `id` and raises it to the top of its kind. Unknown ids are ignored.
    pub fn select(&mut self, id: ShapeId) -> bool {
        let Some(kind) = self.scene.kind_of(id) else {
            log::debug!("Ignoring selection of unknown shape {}", id);
            return false;
        };
        self.scene.bring_to_front(id);
        self.selection.set(SelectedShape { id, kind });
        self.controller.sync_selection(Some(id), &self.scene);
        true
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
        self.controller.sync_selection(None, &self.scene);
    }

    /// What a pointer at `pos` (canvas units) would land on
    pub fn hit_test(&self, pos: Pos2, view_scale: f32) -> PointerTarget {
        if let Some(corner) = self.controller.handle_at(pos, &self.scene, view_scale) {
            return PointerTarget::Handle(corner);
        }
        match self.scene.shape_at(pos) {
            Some(shape) => PointerTarget::Shape(shape.id()),
            None => PointerTarget::Stage,
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, view_scale: f32) -> PointerTarget {
        let target = self.hit_test(pos, view_scale);
        let started = match target {
            PointerTarget::Handle(corner) => self.controller.begin_resize(corner, pos, &self.scene),
            PointerTarget::Shape(id) => {
                self.select(id);
                self.controller.begin_drag(pos, &self.scene)
            }
            PointerTarget::Stage => {
                // Only a press on the canvas itself deselects
                self.deselect();
                Ok(())
            }
        };
        if let Err(err) = started {
            log::warn!("Pointer down ignored: {}", err);
        }
        target
    }

    pub fn pointer_move(&mut self, pos: Pos2, now: f64) {
        if self.controller.drag_to(pos, &self.scene).is_none()
            && self.controller.resize_to(pos, &self.scene).is_none()
        {
            return;
        }
        if self.scheduler.request_live(now) {
            self.controller.commit_live(&mut self.scene);
        }
    }

    /// Ends a gesture. Returns the shape whose geometry was committed.
    pub fn pointer_up(&mut self, now: f64) -> Option<ShapeId> {
        let committed = self.controller.end_gesture(&mut self.scene);
        self.scheduler.gesture_ended();
        if committed.is_some() {
            self.scheduler.request(now);
        }
        // The shape may have vanished mid-gesture
        if self.controller.attached_id().is_none() {
            self.selection.clear();
        }
        committed
    }

    /// Abandons the running gesture, undoing any geometry it already wrote.
    pub fn cancel_gesture(&mut self, now: f64) {
        if self.controller.cancel_gesture(&mut self.scene).is_some() {
            self.scheduler.request(now);
        }
        self.scheduler.gesture_ended();
    }

    pub fn remove_selected(&mut self, now: f64) -> Option<ShapeId> {
        let id = self.selection.id()?;
        self.remove(id, now).then_some(id)
    }

    pub fn remove(&mut self, id: ShapeId, now: f64) -> bool {
        if !self.scene.remove(id) {
            return false;
        }
        self.selection.forget(id);
        self.controller.sync_selection(self.selection.id(), &self.scene);
        self.scheduler.request(now);
        true
    }

    /// Merges `patch` into a shape, scheduling a raster if content changed.
    pub fn update_shape(&mut self, id: ShapeId, patch: ShapePatch, now: f64) -> bool {
        let affects_content = patch.affects_content();
        if !self.scene.update(id, patch) {
            return false;
        }
        if affects_content {
            self.scheduler.request(now);
        }
        true
    }

    /// Style edit on the selected text. Font changes go through [`Self::set_font`].
    pub fn set_text_style(&mut self, mut patch: TextStylePatch, now: f64) -> bool {
        let Some(id) = self.selected_text_id() else {
            return false;
        };
        patch.font_family = None;
        patch.font_style = None;
        self.update_shape(id, ShapePatch::style(patch), now)
    }

    /// Switches the selected text to `family`/`variant`.
    ///
    /// Combinations missing from the catalog are logged and leave the text unchanged.
    pub fn set_font(&mut self, family: &str, variant: FontVariant, now: f64) -> Result<(), FontError> {
        let Some(id) = self.selected_text_id() else {
            return Ok(());
        };
        if let Err(err) = fonts::validate(family, variant) {
            error!("Rejected font change on {}: {}", id, err);
            return Err(err);
        }

        let mut font_ready = false;
        self.fonts.ensure_font_loaded(family, variant, || font_ready = true)?;
        if font_ready {
            let patch = TextStylePatch {
                font_family: Some(family.to_owned()),
                font_style: Some(variant),
                ..Default::default()
            };
            self.update_shape(id, ShapePatch::style(patch), now);
            info!("🔤 {} now uses {} ({})", id, family, variant);
        }
        Ok(())
    }

    /// Flips bold or italic on the selected text.
    pub fn toggle_style(&mut self, toggle: StyleToggle, now: f64) -> Result<(), FontError> {
        let Some((family, variant)) = self.selected_text_id().and_then(|id| {
            let style = self.scene.find(id)?.as_text()?.style();
            Some((style.font_family.clone(), style.font_style))
        }) else {
            return Ok(());
        };
        self.set_font(&family, variant.toggled(toggle), now)
    }

    pub fn selected_text_id(&self) -> Option<ShapeId> {
        let id = self.selection.id()?;
        self.scene.find(id)?.as_text().map(|_| id)
    }

    /// Rasterizes the scene if a request is due. Returns the new image, if any.
    pub fn rasterize_if_due(
        &mut self,
        now: f64,
        rasterizer: &mut dyn Rasterizer,
    ) -> Option<Result<RgbaImage, RasterError>> {
        if !self.scheduler.take_due(now) {
            return None;
        }
        Some(rasterizer.rasterize(&self.scene, &mut self.fonts))
    }

    pub fn rasterize(&mut self, rasterizer: &mut dyn Rasterizer) -> Result<RgbaImage, RasterError> {
        rasterizer.rasterize(&self.scene, &mut self.fonts)
    }

    pub fn can_export(&self) -> bool {
        !self.scene.is_empty()
    }
}
