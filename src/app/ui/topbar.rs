// src/app/ui/topbar.rs
use super::super::filters::{
    rating_label, runtime_for_step, runtime_label, RATING_STEPS, RUNTIME_MAX_STEP, RUNTIME_MIN_STEP,
};
use super::super::WatchedFilter;
use eframe::egui as eg;

impl crate::app::PickerApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        // Row 1: search + actions
        ui.horizontal(|ui| {
            ui.label("Search:");
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.criteria.search)
                    .hint_text("Title…")
                    .desired_width(240.0),
            );
            if resp.changed() {
                self.mark_dirty();
            }

            if ui.button("Clear").clicked() {
                self.clear_search();
            }

            ui.separator();

            if ui.button("Remove Filters").clicked() {
                self.remove_filters();
            }
            if ui
                .button("Random Movie")
                .on_hover_text("Pick one of the movies currently listed")
                .clicked()
            {
                self.pick_random();
            }
        });

        ui.add_space(2.0);

        // Row 2: filters
        ui.horizontal(|ui| {
            // Watched state
            let mut changed_watched = false;
            eg::ComboBox::from_id_source("watched_filter_combo")
                .selected_text(self.criteria.watched.as_str())
                .width(96.0)
                .show_ui(ui, |ui| {
                    for filter in WatchedFilter::ALL {
                        if ui
                            .selectable_value(&mut self.criteria.watched, filter, filter.as_str())
                            .clicked()
                        {
                            changed_watched = true;
                        }
                    }
                });
            if changed_watched {
                self.mark_dirty();
            }

            ui.separator();

            // Genre include filter (all selected genres must be present)
            let mut picked_genre: Option<String> = None;
            ui.menu_button("Genres", |ui| {
                eg::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                    for genre in &self.genres {
                        let active = self.criteria.genres.contains(genre);
                        if ui
                            .add_enabled(!active, eg::Button::new(genre.as_str()))
                            .clicked()
                        {
                            picked_genre = Some(genre.clone());
                            ui.close_menu();
                        }
                    }
                });
            });
            if let Some(genre) = picked_genre {
                self.add_genre(&genre);
            }

            // Minimum rating
            let mut picked_rating: Option<f32> = None;
            ui.menu_button("IMDb Rating", |ui| {
                for step in RATING_STEPS {
                    if ui.button(rating_label(step)).clicked() {
                        picked_rating = Some(step);
                        ui.close_menu();
                    }
                }
            });
            if picked_rating.is_some() {
                self.set_min_rating(picked_rating);
            }

            ui.separator();

            // Year range; free text, bad input just means "unset"
            ui.label("Year:");
            let from = ui.add(
                eg::TextEdit::singleline(&mut self.criteria.year_from)
                    .hint_text("from")
                    .desired_width(44.0),
            );
            ui.label("to");
            let to = ui.add(
                eg::TextEdit::singleline(&mut self.criteria.year_to)
                    .hint_text("to")
                    .desired_width(44.0),
            );
            if from.changed() || to.changed() {
                self.mark_dirty();
            }

            ui.separator();

            // Runtime
            ui.label("Max Runtime (mins):");
            ui.label(eg::RichText::new(runtime_label(self.criteria.max_runtime)).monospace());
            let mut step = self.runtime_step;
            let resp = ui.add(
                eg::Slider::new(&mut step, RUNTIME_MIN_STEP..=RUNTIME_MAX_STEP).show_value(false),
            );
            if resp.changed() {
                self.set_runtime_step(step);
            }
            resp.on_hover_text(format!(
                "{} to {} minutes; far right shows every runtime",
                runtime_for_step(RUNTIME_MIN_STEP),
                runtime_for_step(RUNTIME_MAX_STEP - 1)
            ));
        });
    }

    // ---------- ACTIVE FILTER CHIPS ----------
    pub(crate) fn ui_render_filter_chips(&mut self, ui: &mut eg::Ui) {
        if !self.criteria.has_chips() {
            return;
        }

        let mut drop_genre: Option<String> = None;
        let mut drop_rating = false;

        ui.add_space(2.0);
        ui.horizontal_wrapped(|ui| {
            for genre in &self.criteria.genres {
                if ui
                    .button(format!("{genre} ✖"))
                    .on_hover_text("Remove this genre filter")
                    .clicked()
                {
                    drop_genre = Some(genre.clone());
                }
            }
            if let Some(min) = self.criteria.min_rating {
                if ui
                    .button(format!("IMDb Rating {} ✖", rating_label(min)))
                    .on_hover_text("Remove the rating filter")
                    .clicked()
                {
                    drop_rating = true;
                }
            }
        });

        // Apply after the loop so the set isn't borrowed while iterating
        if let Some(genre) = drop_genre {
            self.remove_genre(&genre);
        }
        if drop_rating {
            self.set_min_rating(None);
        }
    }
}
