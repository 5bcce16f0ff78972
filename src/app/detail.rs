// src/app/detail.rs
use eframe::egui as eg;

impl crate::app::PickerApp {
    /// "Random Movie" popup for the last pick.
    pub(crate) fn ui_render_random_window(&mut self, ctx: &eg::Context) {
        if !self.show_random_window {
            return;
        }
        let Some(movie) = self.random_idx.and_then(|idx| self.movies.get(idx)) else {
            self.show_random_window = false;
            return;
        };

        let mut open = self.show_random_window;
        let mut open_page = false;
        let mut pick_again = false;

        eg::Window::new("Random Movie")
            .collapsible(false)
            .resizable(false)
            .min_width(300.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(4.0);
                    ui.label(eg::RichText::new(&movie.title).size(22.0).strong());
                    ui.label(eg::RichText::new(format!("Year: {}", movie.year)).size(15.0));
                    ui.label(format!("IMDb Rating: {}", movie.rating_label()));
                    ui.label(format!("Duration: {} mins", movie.runtime));
                    ui.label(eg::RichText::new(format!("Genres: {}", movie.genres_label())).small());
                    ui.add_space(6.0);

                    if ui.button("Open IMDb Page").clicked() {
                        open_page = true;
                    }

                    ui.add_space(10.0);
                    if movie.watched {
                        ui.label(
                            eg::RichText::new("You have already watched this movie!")
                                .color(eg::Color32::from_rgb(200, 60, 60)),
                        );
                    } else {
                        ui.label(
                            eg::RichText::new("You haven't watched this movie yet!")
                                .color(eg::Color32::from_rgb(60, 160, 60)),
                        );
                    }

                    ui.add_space(6.0);
                    if ui.small_button("Pick another").clicked() {
                        pick_again = true;
                    }
                });
            });

        if open_page {
            crate::app::utils::open_detail_page(&movie.url);
        }

        // Apply result (after .show so `movie` is no longer borrowed)
        self.show_random_window = open;
        if pick_again {
            self.pick_random();
        }
    }
}
