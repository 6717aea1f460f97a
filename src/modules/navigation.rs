// Address bar and page URL helpers. No Tauri imports.

use std::net::IpAddr;

use url::Url;

use crate::settings::Settings;

// Schemes a typed URL may carry and still be loaded as given.
const DIRECT_SCHEMES: &[&str] = &["http", "https", "file", "about", "data"];

/// Resolves address bar text to the URL a surface should load.
///
/// Tried in order: a local server address, a URL with a direct scheme, a
/// bare host name, and finally a search with the configured engine. Empty
/// text opens `about:blank`.
pub fn parse_address_input(input: &str, settings: &Settings) -> String {
    let text = input.trim();
    if text.is_empty() {
        return "about:blank".to_string();
    }

    local_server_url(text)
        .or_else(|| direct_url(text))
        .or_else(|| bare_host_url(text, settings.https_only))
        .map(String::from)
        .unwrap_or_else(|| settings.search_engine.query_url(text))
}

/// `localhost:3000`, `127.0.0.1` or another IP literal with no scheme goes
/// over plain http.
fn local_server_url(text: &str) -> Option<Url> {
    if text.contains("://") {
        return None;
    }
    let local = text.starts_with("localhost")
        || text.starts_with("127.0.0.1")
        || text.parse::<IpAddr>().is_ok();
    if !local {
        return None;
    }
    Url::parse(&format!("http://{}", text)).ok()
}

// `example.com:8080` parses too, with scheme `example.com`; the scheme
// filter sends it on to `bare_host_url`.
fn direct_url(text: &str) -> Option<Url> {
    Url::parse(text)
        .ok()
        .filter(|url| DIRECT_SCHEMES.contains(&url.scheme()))
}

/// Dotted text without spaces, e.g. `docs.rs/url`.
fn bare_host_url(text: &str, https_only: bool) -> Option<Url> {
    if text.contains(' ') || !text.contains('.') || text.ends_with('.') {
        return None;
    }
    let scheme = if https_only { "https" } else { "http" };
    Url::parse(&format!("{}://{}", scheme, text))
        .ok()
        .filter(|url| url.host().is_some())
}

/// Conventional favicon location for a page, if the page has an origin.
pub fn favicon_url(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    match parsed.scheme() {
        "http" | "https" => parsed.join("/favicon.ico").ok().map(|u| u.to_string()),
        _ => None,
    }
}

/// Whether a finished load ended on real content rather than the
/// webview's own error page.
pub fn load_succeeded(final_url: &str) -> bool {
    let lower = final_url.to_ascii_lowercase();
    !(lower.starts_with("chrome-error:")
        || lower.starts_with("about:neterror")
        || lower.starts_with("about:certerror"))
}
