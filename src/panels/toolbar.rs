use crate::MukiApp;
use crate::export::export_png;
use crate::shape::DEFAULT_TEXT;

pub fn toolbar(app: &mut MukiApp, ctx: &egui::Context, now: f64) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            #[cfg(not(target_arch = "wasm32"))]
            if ui.button("🖼 Add image").clicked() {
                match crate::image_input::pick_image() {
                    Ok(Some(source)) => {
                        app.editor.add_image(source, now);
                    }
                    Ok(None) => {}
                    Err(err) => app.report_error(err.to_string()),
                }
            }

            if ui.button("🔤 Add text").clicked() {
                if let Err(err) = app.editor.add_text(DEFAULT_TEXT, now) {
                    app.report_error(err.to_string());
                }
            }

            ui.separator();

            let can_export = app.editor.can_export();
            if ui
                .add_enabled(can_export, egui::Button::new("💾 Export PNG"))
                .clicked()
            {
                match export_png(&mut app.editor, &mut app.view, &mut app.rasterizer) {
                    Ok(path) => app.status = Some(format!("Saved {}", path.display())),
                    Err(err) => app.report_error(err.to_string()),
                }
            }

            ui.toggle_value(&mut app.show_preview, "Preview");

            if let Some(status) = &app.status {
                ui.separator();
                ui.label(status);
            }
        });
    });
}
