use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::app::catalog::{LoadOptions, DEFAULT_WATCHED_COLUMN, TITLE_COLUMNS};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_CATALOG_FILE: &str = "movie_list.csv";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub title_column: Option<String>,
    pub watched_column: String,
    pub shuffle: bool,
    /// Write watched toggles back into the catalog file. Off by default.
    pub persist_watched: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_FILE),
            title_column: None,
            watched_column: DEFAULT_WATCHED_COLUMN.to_string(),
            shuffle: true,
            persist_watched: false,
        }
    }
}

impl AppConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            title_column: self.title_column.clone(),
            watched_column: self.watched_column.clone(),
            shuffle: self.shuffle,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "csv_path", alias = "movie_list")]
    catalog_path: Option<String>,
    title_column: Option<String>,
    watched_column: Option<String>,
    shuffle: Option<bool>,
    persist_watched: Option<bool>,
}

pub fn load_config() -> AppConfig {
    load_config_from(Path::new(CONFIG_FILE))
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(path) = parsed.catalog_path.filter(|p| !p.trim().is_empty()) {
                    cfg.catalog_path = PathBuf::from(path);
                }
                if let Some(col) = parsed.title_column {
                    let col = col.trim().to_string();
                    if !col.is_empty() {
                        if !TITLE_COLUMNS.contains(&col.as_str()) {
                            warn!("title_column `{col}` is not a known title header; using it anyway.");
                        }
                        cfg.title_column = Some(col);
                    }
                }
                if let Some(col) = parsed.watched_column.filter(|c| !c.trim().is_empty()) {
                    cfg.watched_column = col.trim().to_string();
                }
                if let Some(shuffle) = parsed.shuffle {
                    cfg.shuffle = shuffle;
                }
                if let Some(persist) = parsed.persist_watched {
                    cfg.persist_watched = persist;
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", cfg_path.display(), err);
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.json"));
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.catalog_path, PathBuf::from("movie_list.csv"));
        assert!(!cfg.persist_watched);
    }

    #[test]
    fn fields_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "catalog_path": "lists/2024.csv", "title_column": "Original Title",
                 "shuffle": false, "persist_watched": true }"#,
        )
        .unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.catalog_path, PathBuf::from("lists/2024.csv"));
        assert_eq!(cfg.title_column.as_deref(), Some("Original Title"));
        assert_eq!(cfg.watched_column, "Watched");
        assert!(!cfg.shuffle);
        assert!(cfg.persist_watched);

        let opts = cfg.load_options();
        assert!(!opts.shuffle);
        assert_eq!(opts.title_column.as_deref(), Some("Original Title"));
    }

    #[test]
    fn legacy_key_alias_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "csv_path": "old.csv" }"#).unwrap();
        assert_eq!(load_config_from(&path).catalog_path, PathBuf::from("old.csv"));
    }

    #[test]
    fn broken_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ catalog_path: ").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }
}
