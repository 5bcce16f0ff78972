// src/app/sort.rs
use std::cmp::Ordering;

use super::data::Movie;
use super::types::SortColumn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub descending: bool,
}

impl SortState {
    /// Re-selecting the active column flips direction; any other column starts ascending.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.descending = !self.descending;
        } else {
            self.column = Some(column);
            self.descending = false;
        }
    }

    pub fn apply(&self, movies: &[Movie], indices: &mut [usize]) {
        if let Some(column) = self.column {
            sort_indices(movies, indices, column, self.descending);
        }
    }

    pub fn arrow(&self, column: SortColumn) -> &'static str {
        match (self.column == Some(column), self.descending) {
            (false, _) => "",
            (true, false) => " ⬆",
            (true, true) => " ⬇",
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Typed comparison: numbers compare numerically, text case-insensitively.
pub fn compare(a: &Movie, b: &Movie, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Title => cmp_text(&a.title, &b.title),
        SortColumn::Year => a.year.cmp(&b.year),
        SortColumn::Rating => a.rating.total_cmp(&b.rating),
        SortColumn::Runtime => a.runtime.cmp(&b.runtime),
        SortColumn::Genres => cmp_text(&a.genres_label(), &b.genres_label()),
    }
}

/// Stable sort of `indices` (positions into `movies`); ties keep their current order.
pub fn sort_indices(movies: &[Movie], indices: &mut [usize], column: SortColumn, descending: bool) {
    indices.sort_by(|&x, &y| {
        let ord = compare(&movies[x], &movies[y], column);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}
