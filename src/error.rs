use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Browser state lock poisoned")]
    StatePoisoned,

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

// Commands hand errors to the chrome frontend as plain strings.
impl Serialize for BrowserError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for BrowserError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        BrowserError::StatePoisoned
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;
