// src/app/mod.rs: in-memory catalog + filter/sort pipeline behind the egui front end

// ---- Standard lib imports ----
use std::path::PathBuf;

// ---- Crates ----
use eframe::egui as eg;
use tracing::{debug, info, warn};

// ---- Local modules ----
pub mod catalog;
pub mod data;
pub mod detail;
pub mod filters;
pub mod pick;
pub mod sort;
pub mod stats;
pub mod types;
pub mod ui;
pub mod utils;

pub use catalog::{Catalog, CatalogError, ColumnMap};
pub use data::Movie;
pub use filters::FilterCriteria;
pub use sort::SortState;
pub use stats::Summary;
pub use types::{SortColumn, WatchedFilter};

use filters::{runtime_cap_for_step, RUNTIME_MAX_STEP};

pub struct PickerApp {
    // data
    movies: Vec<Movie>,
    genres: Vec<String>,
    catalog_path: PathBuf,
    columns: ColumnMap,
    persist_watched: bool,

    // inputs
    criteria: FilterCriteria,
    sort: SortState,
    runtime_step: u32,

    // derived on every refresh
    view: Vec<usize>,
    summary: Summary,

    // selection / popups
    selected_idx: Option<usize>,
    random_idx: Option<usize>,
    show_random_window: bool,
    notice: Option<String>,

    dirty: bool,
}

impl PickerApp {
    pub fn new(catalog: Catalog, persist_watched: bool) -> Self {
        let mut app = Self {
            movies: catalog.movies,
            genres: catalog.genres,
            catalog_path: catalog.path,
            columns: catalog.columns,
            persist_watched,

            criteria: FilterCriteria::default(),
            sort: SortState::default(),
            runtime_step: RUNTIME_MAX_STEP,

            view: Vec::new(),
            summary: Summary::default(),

            selected_idx: None,
            random_idx: None,
            show_random_window: false,
            notice: None,

            dirty: true,
        };
        app.refresh();
        app
    }

    // ---- tiny flags ----
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Filter, summarize, then re-apply the active sort.
    pub fn refresh(&mut self) {
        let mut view = filters::filtered_indices(&self.movies, &self.criteria);
        self.summary = stats::summarize(&self.movies, &view);
        self.sort.apply(&self.movies, &mut view);
        self.view = view;
        self.dirty = false;
        debug!("view rebuilt: {} of {} movies", self.view.len(), self.movies.len());
    }

    pub fn refresh_if_dirty(&mut self) -> bool {
        if self.dirty {
            self.refresh();
            return true;
        }
        false
    }

    // ---- read access ----
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Displayed rows, as indices into `movies()`.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub const fn summary(&self) -> Summary {
        self.summary
    }

    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub const fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub const fn random_pick(&self) -> Option<usize> {
        self.random_idx
    }

    // ---- filter inputs ----
    pub fn set_search(&mut self, text: &str) {
        if self.criteria.search != text {
            self.criteria.search = text.to_string();
            self.mark_dirty();
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search("");
    }

    pub fn set_watched_filter(&mut self, filter: WatchedFilter) {
        if self.criteria.watched != filter {
            self.criteria.watched = filter;
            self.mark_dirty();
        }
    }

    pub fn add_genre(&mut self, genre: &str) {
        if self.criteria.genres.insert(genre.to_string()) {
            self.mark_dirty();
        }
    }

    pub fn remove_genre(&mut self, genre: &str) {
        if self.criteria.genres.remove(genre) {
            self.mark_dirty();
        }
    }

    /// Only one rating threshold is active at a time.
    pub fn set_min_rating(&mut self, min: Option<f32>) {
        if self.criteria.min_rating != min {
            self.criteria.min_rating = min;
            self.mark_dirty();
        }
    }

    pub fn set_year_bounds(&mut self, from: &str, to: &str) {
        self.criteria.year_from = from.to_string();
        self.criteria.year_to = to.to_string();
        self.mark_dirty();
    }

    pub fn set_runtime_step(&mut self, step: u32) {
        let step = step.clamp(filters::RUNTIME_MIN_STEP, RUNTIME_MAX_STEP);
        self.runtime_step = step;
        self.criteria.max_runtime = runtime_cap_for_step(step);
        self.mark_dirty();
    }

    pub fn remove_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.runtime_step = RUNTIME_MAX_STEP;
        self.notice = None;
        self.mark_dirty();
    }

    // ---- sorting ----
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.select(column);
        self.sort.apply(&self.movies, &mut self.view);
        debug!(
            "sorted by {} ({})",
            column.as_str(),
            if self.sort.descending { "desc" } else { "asc" }
        );
    }

    // ---- actions ----
    pub fn pick_random(&mut self) -> Option<usize> {
        let mut rng = rand::thread_rng();
        match pick::pick_random(&self.view, &mut rng) {
            Some(idx) => {
                self.random_idx = Some(idx);
                self.show_random_window = true;
                self.notice = None;
                info!("Random pick: {}", self.movies[idx].title);
                Some(idx)
            }
            None => {
                self.random_idx = None;
                self.show_random_window = false;
                self.notice = Some("Nothing to pick: no movies match the current filters.".into());
                None
            }
        }
    }

    pub fn toggle_watched(&mut self, idx: usize) {
        let Some(movie) = self.movies.get_mut(idx) else {
            return;
        };
        movie.watched = !movie.watched;
        debug!("{} marked {}", movie.title, if movie.watched { "watched" } else { "unwatched" });

        if self.persist_watched {
            if let Err(e) = catalog::save_watched(&self.catalog_path, &self.columns, &self.movies) {
                warn!("Failed to save watched flag to {}: {e}", self.catalog_path.display());
                self.notice = Some(format!("Could not save watched flag: {e}"));
            }
        }
        self.mark_dirty();
    }

    pub fn open_movie_page(&self, idx: usize) {
        if let Some(movie) = self.movies.get(idx) {
            utils::open_detail_page(&movie.url);
        }
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        eg::TopBottomPanel::top("filter_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.ui_render_topbar(ui);
            self.ui_render_filter_chips(ui);
            ui.add_space(2.0);
        });

        // inputs above may have changed the view; rebuild before drawing rows
        self.refresh_if_dirty();

        eg::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.ui_render_statusbar(ui);
        });

        eg::CentralPanel::default().show(ctx, |ui| {
            self.ui_render_table(ui);
        });

        self.ui_render_random_window(ctx);

        if self.refresh_if_dirty() {
            ctx.request_repaint();
        }
    }
}
