#[derive(Clone, Debug, Default, PartialEq)]
pub struct Movie {
    pub watched: bool,
    pub title: String,
    pub rating: f32,
    pub runtime: u32,
    pub year: i32,
    pub genres: Vec<String>,
    pub url: String,
    /// Zero-based data row in the source file (header excluded).
    pub source_row: usize,
}

impl Movie {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }

    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}
