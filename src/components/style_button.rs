use eframe::egui;

/// Square toggle button with a single glyph, used for bold/italic
pub struct StyleButton {
    pub glyph: &'static str,
    pub active: bool,
    pub enabled: bool,
    pub font_id: egui::FontId,
}

impl StyleButton {
    pub fn new(glyph: &'static str, active: bool) -> Self {
        Self {
            glyph,
            active,
            enabled: true,
            font_id: egui::FontId::proportional(18.0),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let size = egui::vec2(32.0, 32.0);
        let sense = if self.enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.active {
                egui::Color32::from_rgb(0x6a, 0x6a, 0xc8)
            } else if response.hovered() && self.enabled {
                egui::Color32::from_gray(60)
            } else {
                egui::Color32::from_gray(40)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.enabled {
                egui::Color32::WHITE
            } else {
                egui::Color32::from_gray(110)
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.glyph,
                self.font_id.clone(),
                text_color,
            );
        }

        response
    }
}
