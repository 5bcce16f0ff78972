use super::data::Movie;

/// Counts over the currently displayed subset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub watched: usize,
    pub unwatched: usize,
    pub watched_pct: f64,
    pub unwatched_pct: f64,
}

impl Summary {
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn status_line(&self, genre_count: usize) -> String {
        if self.is_empty() {
            return format!("No movies match the current filters | Total genres: {genre_count}");
        }
        format!(
            "Total movies: {} | Watched {} : %{:.2} | Unwatched {} : %{:.2} | Total genres: {} | Double click a movie to open its page",
            self.total, self.watched, self.watched_pct, self.unwatched, self.unwatched_pct, genre_count
        )
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

pub fn summarize(movies: &[Movie], indices: &[usize]) -> Summary {
    let total = indices.len();
    let watched = indices
        .iter()
        .filter_map(|&i| movies.get(i))
        .filter(|m| m.watched)
        .count();
    let unwatched = total - watched;

    Summary {
        total,
        watched,
        unwatched,
        watched_pct: percent(watched, total),
        unwatched_pct: percent(unwatched, total),
    }
}
