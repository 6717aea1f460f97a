// Shared state structs to avoid circular dependencies.
// Used by the shell, the commands and the menu, and testable on their own.

use std::sync::{Mutex, RwLock};
use serde::Serialize;

use crate::modules::browser::Browser;
use crate::modules::session_history::SessionHistory;
use crate::settings::Settings;

#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub webview_label: String,
    pub title: String,
    pub url: String,
    pub favicon: Option<String>,
    pub is_loading: bool,
    pub progress: u8,
    pub zoom: f64,
    #[serde(skip)]
    pub history: SessionHistory,
}

impl Tab {
    pub fn new(id: String, webview_label: String, zoom: f64) -> Self {
        Self {
            id,
            webview_label,
            title: String::new(),
            url: String::new(),
            favicon: None,
            is_loading: false,
            progress: 0,
            zoom,
            history: SessionHistory::new(),
        }
    }
}

pub struct AppState {
    pub browser: Mutex<Browser>,
    pub settings: RwLock<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            browser: Mutex::new(Browser::new(&settings)),
            settings: RwLock::new(settings),
        }
    }
}
