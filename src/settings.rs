use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tauri::AppHandle;
use tauri::Manager;

use crate::error::BrowserError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SearchEngine {
    Google,
    DuckDuckGo,
    Bing,
    Brave,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::Google
    }
}

impl SearchEngine {
    pub fn query_url(&self, query: &str) -> String {
        let q = urlencoding::encode(query);
        match self {
            Self::Google => format!("https://www.google.com/search?q={}", q),
            Self::DuckDuckGo => format!("https://duckduckgo.com/?q={}", q),
            Self::Bing => format!("https://bing.com/search?q={}", q),
            Self::Brave => format!("https://search.brave.com/search?q={}", q),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub homepage: String,
    pub search_engine: SearchEngine,
    pub https_only: bool,
    pub default_zoom: f64,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: "https://www.google.com".to_string(),
            search_engine: SearchEngine::default(),
            https_only: true,
            default_zoom: 1.0,
            window_width: 1200,
            window_height: 800,
        }
    }
}

impl Settings {
    pub fn get_path(app: &AppHandle) -> Result<PathBuf, BrowserError> {
        Ok(app.path().app_data_dir()?.join("settings.json"))
    }

    pub fn load(app: &AppHandle) -> Self {
        match Self::get_path(app) {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::warn!("[Settings] No app data dir ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, app: &AppHandle) -> Result<(), BrowserError> {
        self.save_to(&Self::get_path(app)?)
    }

    /// Reads settings from `path`, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), BrowserError> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        log::info!("[Settings] Saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.homepage, "https://www.google.com");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.homepage = "https://example.org".to_string();
        settings.search_engine = SearchEngine::DuckDuckGo;
        settings.https_only = false;
        settings.save_to(&path).unwrap();

        assert!(!path.with_extension("tmp").exists());
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "homepage": "https://rust-lang.org" }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.homepage, "https://rust-lang.org");
        assert_eq!(settings.search_engine, SearchEngine::Google);
        assert_eq!(settings.window_width, 1200);
    }

    #[test]
    fn test_search_engine_query_urls() {
        assert_eq!(
            SearchEngine::Google.query_url("rust lang"),
            "https://www.google.com/search?q=rust%20lang"
        );
        assert_eq!(
            SearchEngine::Brave.query_url("a&b"),
            "https://search.brave.com/search?q=a%26b"
        );
    }
}
