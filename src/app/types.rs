// src/app/types.rs

// ---- UI controls ----
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WatchedFilter {
    #[default]
    All,
    Watched,
    Unwatched,
}

impl WatchedFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Watched, Self::Unwatched];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Watched => "Watched",
            Self::Unwatched => "Unwatched",
        }
    }

    pub const fn accepts(self, watched: bool) -> bool {
        match self {
            Self::All => true,
            Self::Watched => watched,
            Self::Unwatched => !watched,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Year,
    Rating,
    Runtime,
    Genres,
}

impl SortColumn {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Year,
        Self::Rating,
        Self::Runtime,
        Self::Genres,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Year => "Year",
            Self::Rating => "Rating",
            Self::Runtime => "Runtime",
            Self::Genres => "Genres",
        }
    }
}
