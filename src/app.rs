use std::time::Duration;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::image_input;
use crate::panels;
use crate::raster::{SceneRasterizer, TextureSlot};
use crate::texture_manager::TextureManager;
use crate::util::current_time_secs;
use crate::viewport::{StageView, Viewport};

const TEXTURE_CACHE_SIZE: usize = 64;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct MukiApp {
    pub(crate) show_preview: bool,

    #[serde(skip)]
    pub(crate) editor: Editor,
    #[serde(skip)]
    pub(crate) rasterizer: SceneRasterizer,
    /// Latest rasterized scene, shared with the preview
    #[serde(skip)]
    pub(crate) slot: TextureSlot,
    #[serde(skip)]
    pub(crate) preview_generation: u64,
    // Skip serializing textures since they are GPU resources
    #[serde(skip)]
    pub(crate) textures: TextureManager,
    #[serde(skip)]
    pub(crate) viewport: Option<Viewport>,
    #[serde(skip)]
    pub(crate) view: StageView,
    #[serde(skip)]
    pub(crate) status: Option<String>,
}

impl Default for MukiApp {
    fn default() -> Self {
        Self {
            show_preview: true,
            editor: Editor::new(EditorConfig::default()),
            rasterizer: SceneRasterizer::new(),
            slot: TextureSlot::new(),
            preview_generation: 0,
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
            viewport: None,
            view: StageView::unit(),
            status: None,
        }
    }
}

impl MukiApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.editor.set_config(config);
        app
    }

    pub(crate) fn report_error(&mut self, message: String) {
        log::error!("{}", message);
        self.status = Some(message);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context, now: f64) {
        // Text fields own the keyboard while focused
        if ctx.memory(|memory| memory.focused().is_some()) {
            return;
        }
        let (delete, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if delete {
            self.editor.remove_selected(now);
        }
        if escape {
            self.editor.cancel_gesture(now);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context, now: f64) {
        for result in image_input::take_dropped(ctx) {
            match result {
                Ok(source) => {
                    self.editor.add_image(source, now);
                }
                Err(err) => self.report_error(err.to_string()),
            }
        }
        image_input::preview_files_being_dropped(ctx);
    }

    fn rasterize_if_due(&mut self, ctx: &egui::Context, now: f64) {
        if let Some(result) = self.editor.rasterize_if_due(now, &mut self.rasterizer) {
            match result {
                Ok(image) => {
                    let generation = self.slot.publish(image);
                    log::debug!(
                        "Published raster #{} ({} runs)",
                        generation,
                        self.editor.scheduler().runs()
                    );
                }
                Err(err) => self.report_error(err.to_string()),
            }
        }
        if let Some(wait) = self.editor.scheduler().time_until_due(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(wait));
        }
    }
}

impl eframe::App for MukiApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = current_time_secs();
        self.textures.begin_frame();

        self.handle_dropped_files(ctx, now);
        self.handle_shortcuts(ctx, now);

        panels::toolbar(self, ctx, now);
        panels::text_controls(self, ctx, now);
        panels::preview_panel(self, ctx);
        panels::canvas_panel(self, ctx, now);

        self.rasterize_if_due(ctx, now);
    }
}
