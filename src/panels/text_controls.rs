use crate::MukiApp;
use crate::components::StyleButton;
use crate::fonts::{FONT_CATALOG, StyleToggle, find_family};
use crate::shape::{ShapeKind, TextAlign, TextStylePatch};

/// Properties of the selected shape
pub fn text_controls(app: &mut MukiApp, ctx: &egui::Context, now: f64) {
    let Some(selected) = app.editor.selection().get() else {
        return;
    };

    egui::TopBottomPanel::bottom("text_controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(match selected.kind {
                ShapeKind::Text => "Edit text",
                ShapeKind::Image => "Edit image",
            });
            if ui.button("🗑 Delete").clicked() {
                app.editor.remove_selected(now);
            }
        });

        let Some(style) = app
            .editor
            .scene()
            .find(selected.id)
            .and_then(|shape| shape.as_text())
            .map(|text| text.style().clone())
        else {
            return;
        };

        let mut text = style.text.clone();
        let response = ui.add(
            egui::TextEdit::multiline(&mut text)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            app.editor.set_text_style(
                TextStylePatch {
                    text: Some(text),
                    ..Default::default()
                },
                now,
            );
        }
        if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            response.surrender_focus();
        }

        ui.horizontal(|ui| {
            ui.label("Font");
            let mut family = style.font_family.clone();
            egui::ComboBox::from_id_salt("font_family")
                .selected_text(&family)
                .show_ui(ui, |ui| {
                    for font in FONT_CATALOG {
                        ui.selectable_value(&mut family, font.family.to_owned(), font.family);
                    }
                });
            if family != style.font_family {
                // Keep the variant if the new family has it
                let variant = find_family(&family)
                    .filter(|font| font.supports(style.font_style))
                    .map(|_| style.font_style)
                    .unwrap_or_default();
                if let Err(err) = app.editor.set_font(&family, variant, now) {
                    app.report_error(err.to_string());
                }
            }

            let supported = |toggle: StyleToggle| {
                find_family(&style.font_family)
                    .is_some_and(|font| font.supports(style.font_style.toggled(toggle)))
            };
            for (glyph, toggle, active) in [
                ("B", StyleToggle::Bold, style.font_style.is_bold()),
                ("I", StyleToggle::Italic, style.font_style.is_italic()),
            ] {
                if StyleButton::new(glyph, active)
                    .enabled(supported(toggle))
                    .show(ui)
                    .clicked()
                {
                    if let Err(err) = app.editor.toggle_style(toggle, now) {
                        app.report_error(err.to_string());
                    }
                }
            }
        });

        ui.horizontal(|ui| {
            ui.label("Align");
            for align in TextAlign::ALL {
                if ui
                    .selectable_label(style.align == align, align.label())
                    .clicked()
                    && style.align != align
                {
                    app.editor.set_text_style(
                        TextStylePatch {
                            align: Some(align),
                            ..Default::default()
                        },
                        now,
                    );
                }
            }

            ui.separator();
            ui.label("Colour");
            let mut fill = style.fill;
            if ui.color_edit_button_srgba(&mut fill).changed() {
                app.editor.set_text_style(
                    TextStylePatch {
                        fill: Some(fill),
                        ..Default::default()
                    },
                    now,
                );
            }
        });
    });
}
