use crate::MukiApp;
use crate::texture_manager::{TextureKey, color_image};

/// Shows the latest rasterized scene
pub fn preview_panel(app: &mut MukiApp, ctx: &egui::Context) {
    if !app.show_preview {
        return;
    }
    egui::SidePanel::right("preview_panel")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Preview");

            let Some((generation, image)) = app.slot.latest() else {
                ui.label("Nothing rasterized yet");
                return;
            };
            if generation != app.preview_generation {
                app.textures.invalidate(TextureKey::Preview);
                app.preview_generation = generation;
            }

            match app
                .textures
                .get_or_create_texture(TextureKey::Preview, generation, || color_image(&image), ctx)
            {
                Ok(texture) => {
                    let width = ui.available_width();
                    let aspect = image.height() as f32 / image.width().max(1) as f32;
                    ui.image(egui::load::SizedTexture::new(
                        texture,
                        egui::vec2(width, width * aspect),
                    ));
                }
                Err(err) => {
                    ui.colored_label(egui::Color32::RED, err.to_string());
                }
            }
        });
}
