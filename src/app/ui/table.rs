// src/app/ui/table.rs
use super::super::SortColumn;
use eframe::egui as eg;
use egui_extras::{Column, TableBuilder};

pub const ROW_HEIGHT: f32 = 22.0;

const WATCHED_BG: eg::Color32 = eg::Color32::from_rgb(0xC7, 0xF7, 0xC7);
const UNWATCHED_BG: eg::Color32 = eg::Color32::from_rgb(0xFF, 0xBF, 0xA8);

impl crate::app::PickerApp {
    pub(crate) fn ui_render_table(&mut self, ui: &mut eg::Ui) {
        let mut sort_clicked: Option<SortColumn> = None;
        let mut toggle_idx: Option<usize> = None;
        let mut open_idx: Option<usize> = None;
        let mut selected = self.selected_idx;

        let movies = &self.movies;
        let view = &self.view;
        let sort = self.sort;

        TableBuilder::new(ui)
            .striped(false)
            .resizable(true)
            .sense(eg::Sense::click())
            .cell_layout(eg::Layout::left_to_right(eg::Align::Center))
            .column(Column::initial(300.0).at_least(120.0).clip(true)) // Title
            .column(Column::initial(56.0)) // Year
            .column(Column::initial(56.0)) // Rating
            .column(Column::initial(64.0)) // Runtime
            .column(Column::remainder().clip(true)) // Genres
            .header(ROW_HEIGHT, |mut header| {
                for column in SortColumn::ALL {
                    header.col(|ui| {
                        let label = format!("{}{}", column.as_str(), sort.arrow(column));
                        let btn = eg::Button::new(eg::RichText::new(label).strong()).frame(false);
                        if ui.add(btn).on_hover_text("Click to sort").clicked() {
                            sort_clicked = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.len(), |mut row| {
                    let idx = view[row.index()];
                    let movie = &movies[idx];
                    row.set_selected(selected == Some(idx));

                    let bg = if movie.watched { WATCHED_BG } else { UNWATCHED_BG };
                    let cells = [
                        movie.title.clone(),
                        movie.year.to_string(),
                        movie.rating_label(),
                        movie.runtime.to_string(),
                        movie.genres_label(),
                    ];
                    for text in cells {
                        row.col(|ui| {
                            ui.painter().rect_filled(ui.max_rect(), 0.0, bg);
                            ui.label(eg::RichText::new(text).color(eg::Color32::BLACK));
                        });
                    }

                    let resp = row.response();
                    if resp.clicked() {
                        selected = Some(idx);
                    }
                    if resp.double_clicked() {
                        selected = Some(idx);
                        open_idx = Some(idx);
                    }
                    if resp.secondary_clicked() {
                        selected = Some(idx);
                        toggle_idx = Some(idx);
                    }
                });
            });

        self.selected_idx = selected;
        if let Some(column) = sort_clicked {
            self.sort_by(column);
        }
        if let Some(idx) = open_idx {
            self.open_movie_page(idx);
        }
        if let Some(idx) = toggle_idx {
            self.toggle_watched(idx);
        }
    }
}
