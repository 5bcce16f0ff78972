use std::collections::BTreeSet;

use super::data::Movie;
use super::types::WatchedFilter;

/// Choices offered by the "IMDb Rating" menu.
pub const RATING_STEPS: [f32; 7] = [6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0];

/// Runtime slider works in half-hour steps: 3..=8 maps to 90..=240 minutes.
/// The top step means "no cap".
pub const RUNTIME_STEP_MINS: u32 = 30;
pub const RUNTIME_MIN_STEP: u32 = 3;
pub const RUNTIME_MAX_STEP: u32 = 8;
pub const MAX_RUNTIME_MINS: u32 = RUNTIME_MAX_STEP * RUNTIME_STEP_MINS;

pub const DEFAULT_YEAR_FROM: i32 = 0;
pub const DEFAULT_YEAR_TO: i32 = 9999;

#[derive(Clone, Debug, PartialEq)]
pub struct FilterCriteria {
    pub search: String,
    pub watched: WatchedFilter,
    pub min_rating: Option<f32>,
    /// Raw text from the year boxes; unparsable text counts as unset.
    pub year_from: String,
    pub year_to: String,
    /// `None` when the runtime slider sits at its top step.
    pub max_runtime: Option<u32>,
    pub genres: BTreeSet<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            watched: WatchedFilter::All,
            min_rating: None,
            year_from: String::new(),
            year_to: String::new(),
            max_runtime: None,
            genres: BTreeSet::new(),
        }
    }
}

impl FilterCriteria {
    pub fn year_range(&self) -> (i32, i32) {
        (
            parse_year_bound(&self.year_from, DEFAULT_YEAR_FROM),
            parse_year_bound(&self.year_to, DEFAULT_YEAR_TO),
        )
    }

    /// Genre or rating filters are shown as removable chips.
    pub fn has_chips(&self) -> bool {
        !self.genres.is_empty() || self.min_rating.is_some()
    }
}

pub fn parse_year_bound(raw: &str, default: i32) -> i32 {
    raw.trim().parse::<i32>().unwrap_or(default)
}

pub fn normalize_search(s: &str) -> String {
    s.trim().to_lowercase()
}

pub const fn runtime_for_step(step: u32) -> u32 {
    step * RUNTIME_STEP_MINS
}

pub const fn runtime_cap_for_step(step: u32) -> Option<u32> {
    if step >= RUNTIME_MAX_STEP {
        None
    } else {
        Some(runtime_for_step(step))
    }
}

pub fn runtime_label(cap: Option<u32>) -> String {
    match cap {
        Some(mins) => mins.to_string(),
        None => format!("{MAX_RUNTIME_MINS}+"),
    }
}

pub fn rating_label(min: f32) -> String {
    format!("{min}+")
}

pub fn matches(movie: &Movie, criteria: &FilterCriteria) -> bool {
    let needle = normalize_search(&criteria.search);
    if !needle.is_empty() && !movie.title.to_lowercase().contains(&needle) {
        return false;
    }

    if !criteria.watched.accepts(movie.watched) {
        return false;
    }

    if movie.rating < criteria.min_rating.unwrap_or(0.0) {
        return false;
    }

    let (from, to) = criteria.year_range();
    if movie.year < from || movie.year > to {
        return false;
    }

    if let Some(max) = criteria.max_runtime {
        if movie.runtime > max {
            return false;
        }
    }

    criteria.genres.iter().all(|g| movie.has_genre(g))
}

/// Indices into `movies` that pass `criteria`, in catalog order.
pub fn filtered_indices(movies: &[Movie], criteria: &FilterCriteria) -> Vec<usize> {
    movies
        .iter()
        .enumerate()
        .filter(|(_, m)| matches(m, criteria))
        .map(|(i, _)| i)
        .collect()
}
