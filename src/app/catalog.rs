// src/app/catalog.rs
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use super::data::Movie;

// ---- Column layout ----
pub const DEFAULT_WATCHED_COLUMN: &str = "Watched";
/// Older exports use "Title", newer ones "Original Title". First match wins.
pub const TITLE_COLUMNS: [&str; 2] = ["Title", "Original Title"];
pub const RATING_COLUMN: &str = "IMDb Rating";
pub const RUNTIME_COLUMN: &str = "Runtime (mins)";
pub const YEAR_COLUMN: &str = "Year";
pub const GENRES_COLUMN: &str = "Genres";
pub const URL_COLUMN: &str = "URL";

pub const GENRE_SEPARATOR: &str = ", ";
pub const WATCHED_TRUE: &str = "True";
pub const WATCHED_FALSE: &str = "False";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("line {row}: field `{field}` has malformed value `{value}`")]
    DataFormat {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("catalog changed on disk: line {row} no longer holds `{title}`")]
    Stale { row: usize, title: String },
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Pin the title header instead of probing `TITLE_COLUMNS`.
    pub title_column: Option<String>,
    pub watched_column: String,
    pub shuffle: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            title_column: None,
            watched_column: DEFAULT_WATCHED_COLUMN.to_string(),
            shuffle: true,
        }
    }
}

/// Header positions resolved once per file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub watched: usize,
    pub title: usize,
    pub rating: usize,
    pub runtime: usize,
    pub year: usize,
    pub genres: usize,
    pub url: usize,
}

impl ColumnMap {
    pub fn resolve(headers: &csv::StringRecord, opts: &LoadOptions) -> Result<Self, CatalogError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| CatalogError::MissingColumn {
                column: name.to_string(),
            })
        };

        let title = match opts.title_column.as_deref() {
            Some(name) => require(name)?,
            None => TITLE_COLUMNS
                .iter()
                .find_map(|&name| find(name))
                .ok_or_else(|| CatalogError::MissingColumn {
                    column: TITLE_COLUMNS.join(" | "),
                })?,
        };

        Ok(Self {
            watched: require(opts.watched_column.as_str())?,
            title,
            rating: require(RATING_COLUMN)?,
            runtime: require(RUNTIME_COLUMN)?,
            year: require(YEAR_COLUMN)?,
            genres: require(GENRES_COLUMN)?,
            url: require(URL_COLUMN)?,
        })
    }
}

pub struct Catalog {
    pub path: PathBuf,
    pub columns: ColumnMap,
    pub movies: Vec<Movie>,
    /// Distinct genre labels across all movies, sorted.
    pub genres: Vec<String>,
}

/// Split a `Genres` cell on `", "`; drops blanks and repeats, keeps first-seen order.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unique()
        .map(str::to_string)
        .collect()
}

pub fn collect_genres(movies: &[Movie]) -> Vec<String> {
    movies
        .iter()
        .flat_map(|m| m.genres.iter().cloned())
        .sorted()
        .dedup()
        .collect()
}

fn parse_field<T: FromStr>(raw: &str, field: &'static str, row: usize) -> Result<T, CatalogError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| CatalogError::DataFormat {
            row,
            field,
            value: raw.to_string(),
        })
}

fn parse_row(
    record: &csv::StringRecord,
    cols: &ColumnMap,
    source_row: usize,
) -> Result<Movie, CatalogError> {
    // header sits on line 1
    let line = record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(source_row + 2);
    let cell = |idx: usize| record.get(idx).unwrap_or("");

    Ok(Movie {
        watched: cell(cols.watched) == WATCHED_TRUE,
        title: cell(cols.title).to_string(),
        rating: parse_field(cell(cols.rating), RATING_COLUMN, line)?,
        runtime: parse_field(cell(cols.runtime), RUNTIME_COLUMN, line)?,
        year: parse_field(cell(cols.year), YEAR_COLUMN, line)?,
        genres: split_genres(cell(cols.genres)),
        url: cell(cols.url).trim().to_string(),
        source_row,
    })
}

/// Parse every data row, in file order.
pub fn read_movies<R: Read>(
    reader: R,
    opts: &LoadOptions,
) -> Result<(ColumnMap, Vec<Movie>), CatalogError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let columns = ColumnMap::resolve(rdr.headers()?, opts)?;
    debug!("catalog columns resolved: {columns:?}");

    let mut movies = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        movies.push(parse_row(&record?, &columns, idx)?);
    }
    Ok((columns, movies))
}

fn io_error_for(path: &Path, e: io::Error) -> CatalogError {
    match e.kind() {
        io::ErrorKind::NotFound => CatalogError::NotFound {
            path: path.to_path_buf(),
        },
        _ => CatalogError::Io(e),
    }
}

fn open_catalog_file(path: &Path) -> Result<fs::File, CatalogError> {
    fs::File::open(path).map_err(|e| io_error_for(path, e))
}

pub fn load_catalog<R: Rng + ?Sized>(
    path: &Path,
    opts: &LoadOptions,
    rng: &mut R,
) -> Result<Catalog, CatalogError> {
    let file = open_catalog_file(path)?;
    let (columns, mut movies) = read_movies(file, opts)?;
    let genres = collect_genres(&movies);

    if opts.shuffle {
        movies.shuffle(rng);
    }

    info!(
        "Loaded {} movies ({} genres) from {}",
        movies.len(),
        genres.len(),
        path.display()
    );

    Ok(Catalog {
        path: path.to_path_buf(),
        columns,
        movies,
        genres,
    })
}

/// Byte-level details of the input file that a rewrite must keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FileLayout {
    bom: bool,
    crlf: bool,
}

impl FileLayout {
    fn sniff(bytes: &[u8]) -> Self {
        let crlf = bytes
            .iter()
            .position(|&b| b == b'\n')
            .is_some_and(|nl| nl > 0 && bytes[nl - 1] == b'\r');
        Self {
            bom: bytes.starts_with(UTF8_BOM),
            crlf,
        }
    }

    fn terminator(self) -> csv::Terminator {
        if self.crlf {
            csv::Terminator::CRLF
        } else {
            csv::Terminator::Any(b'\n')
        }
    }
}

/// Run `write` against `<path>.tmp`, then rename it over `path`.
/// The temp file is removed if any step fails.
fn replace_via_temp<F>(path: &Path, write: F) -> Result<(), CatalogError>
where
    F: FnOnce(fs::File) -> Result<(), CatalogError>,
{
    let tmp_path = PathBuf::from(format!("{}.tmp", path.display()));
    let result = fs::File::create(&tmp_path)
        .map_err(CatalogError::from)
        .and_then(write)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(CatalogError::from));

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            debug!("could not remove {}: {e}", tmp_path.display());
        }
    }
    result
}

/// Write every movie's watched flag back into `path`. Other cells, the
/// UTF-8 BOM and the line terminator are kept. Every movie must still sit on
/// its original row with the same title, otherwise nothing is written.
/// Returns the number of rows changed.
pub fn save_watched(path: &Path, columns: &ColumnMap, movies: &[Movie]) -> Result<usize, CatalogError> {
    let bytes = fs::read(path).map_err(|e| io_error_for(path, e))?;
    let layout = FileLayout::sniff(&bytes);
    let body = if layout.bom { &bytes[UTF8_BOM.len()..] } else { &bytes[..] };

    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(body);
    let headers = rdr.headers()?.clone();
    let mut rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>()?;

    let mut changed = 0usize;
    for movie in movies {
        let stale = || CatalogError::Stale {
            row: movie.source_row + 2,
            title: movie.title.clone(),
        };
        let row = rows.get_mut(movie.source_row).ok_or_else(stale)?;
        if row.get(columns.title) != Some(movie.title.as_str()) {
            return Err(stale());
        }

        let on_disk = row.get(columns.watched) == Some(WATCHED_TRUE);
        if on_disk == movie.watched {
            continue;
        }
        let flag = if movie.watched { WATCHED_TRUE } else { WATCHED_FALSE };
        let updated: csv::StringRecord = row
            .iter()
            .enumerate()
            .map(|(i, cell)| if i == columns.watched { flag } else { cell })
            .collect();
        *row = updated;
        changed += 1;
    }

    if changed == 0 {
        return Ok(0);
    }

    replace_via_temp(path, |mut file| {
        if layout.bom {
            file.write_all(UTF8_BOM)?;
        }
        let mut wtr = csv::WriterBuilder::new()
            .terminator(layout.terminator())
            .from_writer(file);
        wtr.write_record(&headers)?;
        for row in &rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    })?;

    info!("Wrote {changed} watched flag(s) back to {}", path.display());
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HEADER: &str = "Watched,Title,IMDb Rating,Runtime (mins),Year,Genres,URL";

    fn sample_csv() -> String {
        [
            HEADER,
            "True,Inception,8.8,148,2010,\"Action, Adventure, Sci-Fi\",https://www.imdb.com/title/tt1375666/",
            "False,Shutter Island,7.5,120,2010,\"Drama, Thriller\",https://www.imdb.com/title/tt1130884/",
            "False,\"Good, the Bad and the Ugly\",8.8,178,1966,Western,https://www.imdb.com/title/tt0060196/",
        ]
        .join("\n")
    }

    fn read(text: &str) -> Result<(ColumnMap, Vec<Movie>), CatalogError> {
        read_movies(text.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn parses_typed_fields() {
        let (_, movies) = read(&sample_csv()).unwrap();
        assert_eq!(movies.len(), 3);

        let shutter = &movies[1];
        assert_eq!(shutter.title, "Shutter Island");
        assert_eq!(shutter.rating, 7.5);
        assert_eq!(shutter.runtime, 120);
        assert_eq!(shutter.year, 2010);
        assert_eq!(shutter.genres, vec!["Drama", "Thriller"]);
        assert_eq!(shutter.source_row, 1);
        assert!(!shutter.watched);

        assert_eq!(movies[2].title, "Good, the Bad and the Ugly");
    }

    #[test]
    fn watched_requires_exact_literal() {
        let text = [
            HEADER,
            "True,A,7,90,2000,Drama,u",
            "true,B,7,90,2000,Drama,u",
            "1,C,7,90,2000,Drama,u",
            ",D,7,90,2000,Drama,u",
        ]
        .join("\n");
        let (_, movies) = read(&text).unwrap();
        let flags: Vec<bool> = movies.iter().map(|m| m.watched).collect();
        assert_eq!(flags, vec![true, false, false, false]);
    }

    #[test]
    fn accepts_original_title_header() {
        let text = [
            "Watched,Original Title,IMDb Rating,Runtime (mins),Year,Genres,URL",
            "False,Amélie,8.3,122,2001,\"Comedy, Romance\",https://www.imdb.com/title/tt0211915/",
        ]
        .join("\n");
        let (cols, movies) = read(&text).unwrap();
        assert_eq!(cols.title, 1);
        assert_eq!(movies[0].title, "Amélie");
    }

    #[test]
    fn plain_title_wins_over_original_title() {
        let text = [
            "Watched,Original Title,Title,IMDb Rating,Runtime (mins),Year,Genres,URL",
            "False,Le Fabuleux Destin,Amélie,8.3,122,2001,Comedy,u",
        ]
        .join("\n");
        let (_, movies) = read(&text).unwrap();
        assert_eq!(movies[0].title, "Amélie");

        let pinned = LoadOptions {
            title_column: Some("Original Title".into()),
            ..LoadOptions::default()
        };
        let (_, movies) = read_movies(text.as_bytes(), &pinned).unwrap();
        assert_eq!(movies[0].title, "Le Fabuleux Destin");
    }

    #[test]
    fn genres_are_deduplicated_per_movie() {
        assert_eq!(split_genres("Drama, Drama, Crime"), vec!["Drama", "Crime"]);
        assert!(split_genres("").is_empty());
    }

    #[test]
    fn genre_set_is_sorted_and_distinct() {
        let (_, movies) = read(&sample_csv()).unwrap();
        assert_eq!(
            collect_genres(&movies),
            vec!["Action", "Adventure", "Drama", "Sci-Fi", "Thriller", "Western"]
        );
    }

    #[test]
    fn malformed_number_names_line_and_field() {
        let text = [HEADER, "True,A,7,90,2000,Drama,u", "False,B,7.1,long,2001,Drama,u"].join("\n");
        match read(&text) {
            Err(CatalogError::DataFormat { row, field, value }) => {
                assert_eq!(row, 3);
                assert_eq!(field, RUNTIME_COLUMN);
                assert_eq!(value, "long");
            }
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_reported() {
        let text = [
            "Watched,Title,IMDb Rating,Runtime (mins),Year,Genres",
            "True,A,7,90,2000,Drama",
        ]
        .join("\n");
        match read(&text) {
            Err(CatalogError::MissingColumn { column }) => assert_eq!(column, URL_COLUMN),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let text = [HEADER, "True,A,7,90"].join("\n");
        assert!(matches!(read(&text), Err(CatalogError::Csv(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let mut rng = StdRng::seed_from_u64(1);
        match load_catalog(&path, &LoadOptions::default(), &mut rng) {
            Err(CatalogError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn load_shuffles_without_losing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_list.csv");
        fs::write(&path, sample_csv()).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let catalog = load_catalog(&path, &LoadOptions::default(), &mut rng).unwrap();
        let mut rows: Vec<usize> = catalog.movies.iter().map(|m| m.source_row).collect();
        rows.sort_unstable();
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(catalog.genres.len(), 6);

        let ordered = LoadOptions {
            shuffle: false,
            ..LoadOptions::default()
        };
        let catalog = load_catalog(&path, &ordered, &mut rng).unwrap();
        let rows: Vec<usize> = catalog.movies.iter().map(|m| m.source_row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn save_watched_rewrites_only_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_list.csv");
        fs::write(&path, sample_csv()).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let mut catalog = load_catalog(&path, &LoadOptions::default(), &mut rng).unwrap();
        for m in catalog.movies.iter_mut() {
            if m.title == "Shutter Island" {
                m.watched = true;
            }
        }

        let changed = save_watched(&path, &catalog.columns, &catalog.movies).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(save_watched(&path, &catalog.columns, &catalog.movies).unwrap(), 0);

        let (_, reloaded) = read_movies(fs::File::open(&path).unwrap(), &LoadOptions::default()).unwrap();
        assert!(reloaded[0].watched);
        assert!(reloaded[1].watched);
        assert!(!reloaded[2].watched);
        assert_eq!(reloaded[2].title, "Good, the Bad and the Ugly");
        assert_eq!(reloaded[0].genres, vec!["Action", "Adventure", "Sci-Fi"]);

        let after = fs::read(&path).unwrap();
        assert!(!after.contains(&b'\r'));
        assert!(!after.starts_with(UTF8_BOM));
    }

    #[test]
    fn save_watched_keeps_bom_and_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_list.csv");
        let before = format!(
            "\u{feff}{HEADER}\r\nFalse,Amélie,8.3,122,2001,\"Comedy, Romance\",u1\r\nFalse,Heat,8.3,170,1995,Crime,u2\r\n"
        );
        fs::write(&path, &before).unwrap();

        let ordered = LoadOptions {
            shuffle: false,
            ..LoadOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut catalog = load_catalog(&path, &ordered, &mut rng).unwrap();
        assert_eq!(catalog.movies[0].title, "Amélie");
        catalog.movies[0].watched = true;
        assert_eq!(save_watched(&path, &catalog.columns, &catalog.movies).unwrap(), 1);

        let after = fs::read_to_string(&path).unwrap();
        assert_eq!(after, before.replacen("False,Amélie", "True,Amélie", 1));
        assert!(!dir.path().join("movie_list.csv.tmp").exists());
    }

    #[test]
    fn save_watched_refuses_when_rows_moved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_list.csv");
        fs::write(&path, sample_csv()).unwrap();

        let ordered = LoadOptions {
            shuffle: false,
            ..LoadOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let mut catalog = load_catalog(&path, &ordered, &mut rng).unwrap();
        catalog.movies[1].watched = true;

        // someone edits the file behind our back: first two rows swapped
        let lines: Vec<String> = sample_csv().lines().map(str::to_string).collect();
        let edited = [&lines[0], &lines[2], &lines[1], &lines[3]]
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&path, &edited).unwrap();

        match save_watched(&path, &catalog.columns, &catalog.movies) {
            Err(CatalogError::Stale { row, title }) => {
                assert_eq!(row, 2);
                assert_eq!(title, "Inception");
            }
            other => panic!("expected Stale, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), edited);
    }

    #[test]
    fn failed_rewrite_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_list.csv");
        fs::write(&path, sample_csv()).unwrap();

        let result = replace_via_temp(&path, |mut file| {
            file.write_all(b"partial")?;
            Err(CatalogError::MissingColumn {
                column: URL_COLUMN.to_string(),
            })
        });
        assert!(matches!(result, Err(CatalogError::MissingColumn { .. })));
        assert!(!dir.path().join("movie_list.csv.tmp").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), sample_csv());
    }
}
