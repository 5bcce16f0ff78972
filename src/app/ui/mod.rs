// src/app/ui/mod.rs
pub mod table;
pub mod topbar;

use eframe::egui as eg;

impl crate::app::PickerApp {
    // Tiny; lives here rather than in its own file.
    pub(crate) fn ui_render_statusbar(&self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            let line = self.summary.status_line(self.genres.len());
            if self.summary.is_empty() {
                ui.label(eg::RichText::new(line).italics().weak());
            } else {
                ui.label(line);
            }
            if let Some(notice) = &self.notice {
                ui.separator();
                ui.label(eg::RichText::new(notice).color(eg::Color32::from_rgb(220, 120, 60)));
            }
        });
    }
}
