// Browser state machine - pure logic, no Tauri imports.
//
// Engine events come in tagged with the surface that produced them and update
// that tab's state. User actions come in from the chrome and menu and return
// the surface commands the shell must carry out. The chrome itself is a pure
// projection of this state (`ChromeSnapshot`).

use serde::Serialize;

use crate::modules::navigation::parse_address_input;
use crate::modules::tabs::{tab_label, CloseOutcome, TabStrip};
use crate::modules::zoom;
use crate::settings::Settings;

pub const APP_NAME: &str = "WebBrowser";
pub const DEFAULT_WINDOW_TITLE: &str = "Web Browser";
pub const STATUS_TIMEOUT_MS: u64 = 3000;

const MSG_LOAD_OK: &str = "Page loaded successfully";
const MSG_LOAD_FAILED: &str = "Failed to load page";

/// Signals a rendering surface reports about itself.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    UrlChanged(String),
    LoadStarted,
    LoadProgress(u8),
    LoadFinished { success: bool },
    TitleChanged(String),
    IconChanged(Option<String>),
}

/// Work for the shell to perform against the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Create { label: String, url: String, zoom: f64 },
    Destroy { label: String },
    Show { label: String },
    Hide { label: String },
    Load { label: String, url: String },
    Back { label: String },
    Forward { label: String },
    Reload { label: String },
    Stop { label: String },
    SetZoom { label: String, factor: f64 },
    CloseWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub id: u64,
    pub text: String,
}

/// What an engine event changed.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EventEffect {
    /// The chrome needs to be re-rendered.
    pub refresh: bool,
    /// A status message was posted and should expire after the timeout.
    pub status_posted: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: String,
    pub label: String,
    pub tooltip: String,
    pub favicon: Option<String>,
    pub is_loading: bool,
}

/// Everything the chrome frontend renders.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChromeSnapshot {
    pub window_title: String,
    pub address: String,
    pub tabs: Vec<TabView>,
    pub active_tab_id: Option<String>,
    pub progress: Option<u8>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_stop: bool,
    pub can_reload: bool,
    pub zoom_percent: u32,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct Browser {
    strip: TabStrip,
    settings: Settings,
    status: Option<StatusMessage>,
    status_seq: u64,
}

impl Browser {
    pub fn new(settings: &Settings) -> Self {
        Self {
            strip: TabStrip::new(),
            settings: settings.clone(),
            status: None,
            status_seq: 0,
        }
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    pub fn update_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    pub fn active_label(&self) -> Option<String> {
        self.strip.active().map(|t| t.webview_label.clone())
    }

    pub fn active_url(&self) -> Option<String> {
        self.strip
            .active()
            .map(|t| t.url.clone())
            .filter(|u| !u.is_empty())
    }

    // --- Tab lifecycle ---

    /// Opens a tab on `url`, or on the home page when none is given.
    pub fn open_tab(&mut self, url: Option<&str>) -> Vec<SurfaceCommand> {
        let mut commands = Vec::new();
        if let Some(label) = self.active_label() {
            commands.push(SurfaceCommand::Hide { label });
        }

        let target = match url {
            Some(u) => parse_address_input(u, &self.settings),
            None => self.homepage_url(),
        };
        let zoom = zoom::normalize(self.settings.default_zoom);
        let id = self.strip.open(zoom);
        if let Some(tab) = self.strip.get_mut(&id) {
            tab.url = target.clone();
            commands.push(SurfaceCommand::Create {
                label: tab.webview_label.clone(),
                url: target,
                zoom,
            });
        }
        commands
    }

    /// Forgets the tab behind a surface that failed to come up and shows the
    /// tab that was current before it.
    pub fn abandon_surface(&mut self, webview_label: &str) -> Vec<SurfaceCommand> {
        let Some(id) = self.strip.find_by_label(webview_label).map(|t| t.id.clone()) else {
            return Vec::new();
        };
        match self.strip.discard(&id) {
            Some(current) => self
                .strip
                .get(&current)
                .map(|tab| {
                    vec![SurfaceCommand::Show {
                        label: tab.webview_label.clone(),
                    }]
                })
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn close_tab(&mut self, id: &str) -> Vec<SurfaceCommand> {
        match self.strip.close(id) {
            CloseOutcome::Removed { tab, activated } => {
                let mut commands = vec![SurfaceCommand::Destroy {
                    label: tab.webview_label,
                }];
                if let Some(next) = activated.and_then(|id| self.strip.get(&id)) {
                    commands.push(SurfaceCommand::Show {
                        label: next.webview_label.clone(),
                    });
                }
                commands
            }
            CloseOutcome::LastTab => {
                log::info!("[Tabs] Last tab closed, closing window");
                vec![SurfaceCommand::CloseWindow]
            }
            CloseOutcome::NotFound => {
                log::warn!("[Tabs] Close requested for unknown tab {}", id);
                Vec::new()
            }
        }
    }

    pub fn close_active_tab(&mut self) -> Vec<SurfaceCommand> {
        match self.strip.active_id().map(str::to_string) {
            Some(id) => self.close_tab(&id),
            None => Vec::new(),
        }
    }

    pub fn activate_tab(&mut self, id: &str) -> Vec<SurfaceCommand> {
        let previous = self.active_label();
        if !self.strip.activate(id) {
            return Vec::new();
        }
        let mut commands = Vec::new();
        if let Some(label) = previous {
            commands.push(SurfaceCommand::Hide { label });
        }
        if let Some(label) = self.active_label() {
            commands.push(SurfaceCommand::Show { label });
        }
        commands
    }

    pub fn reorder_tabs(&mut self, new_order: &[String]) -> bool {
        self.strip.reorder(new_order)
    }

    // --- Navigation on the current tab ---

    pub fn navigate(&mut self, input: &str) -> Vec<SurfaceCommand> {
        let url = parse_address_input(input, &self.settings);
        log::info!("[Nav] {:?} -> {}", input, url);
        self.load(url)
    }

    pub fn go_home(&mut self) -> Vec<SurfaceCommand> {
        let home = self.homepage_url();
        self.load(home)
    }

    fn homepage_url(&self) -> String {
        parse_address_input(&self.settings.homepage, &self.settings)
    }

    fn load(&mut self, url: String) -> Vec<SurfaceCommand> {
        match self.active_label() {
            Some(label) => vec![SurfaceCommand::Load { label, url }],
            None => Vec::new(),
        }
    }

    pub fn go_back(&mut self) -> Vec<SurfaceCommand> {
        let Some(tab) = self.strip.active_mut() else {
            return Vec::new();
        };
        if !tab.history.begin_back() {
            return Vec::new();
        }
        vec![SurfaceCommand::Back {
            label: tab.webview_label.clone(),
        }]
    }

    pub fn go_forward(&mut self) -> Vec<SurfaceCommand> {
        let Some(tab) = self.strip.active_mut() else {
            return Vec::new();
        };
        if !tab.history.begin_forward() {
            return Vec::new();
        }
        vec![SurfaceCommand::Forward {
            label: tab.webview_label.clone(),
        }]
    }

    pub fn reload(&mut self) -> Vec<SurfaceCommand> {
        self.active_label()
            .map(|label| vec![SurfaceCommand::Reload { label }])
            .unwrap_or_default()
    }

    pub fn stop(&mut self) -> Vec<SurfaceCommand> {
        self.active_label()
            .map(|label| vec![SurfaceCommand::Stop { label }])
            .unwrap_or_default()
    }

    // --- Zoom on the current tab ---

    pub fn zoom_in(&mut self) -> Vec<SurfaceCommand> {
        self.set_zoom(zoom::zoom_in)
    }

    pub fn zoom_out(&mut self) -> Vec<SurfaceCommand> {
        self.set_zoom(zoom::zoom_out)
    }

    pub fn reset_zoom(&mut self) -> Vec<SurfaceCommand> {
        self.set_zoom(|_| zoom::DEFAULT_ZOOM)
    }

    fn set_zoom(&mut self, step: impl Fn(f64) -> f64) -> Vec<SurfaceCommand> {
        match self.strip.active_mut() {
            Some(tab) => {
                tab.zoom = step(tab.zoom);
                vec![SurfaceCommand::SetZoom {
                    label: tab.webview_label.clone(),
                    factor: tab.zoom,
                }]
            }
            None => Vec::new(),
        }
    }

    // --- Engine events ---

    pub fn handle_engine_event(&mut self, webview_label: &str, event: EngineEvent) -> EventEffect {
        let Some(id) = self.strip.find_by_label(webview_label).map(|t| t.id.clone()) else {
            log::debug!("[Engine] Dropping {:?} from stale surface {}", event, webview_label);
            return EventEffect::default();
        };
        let is_active = self.strip.is_active(&id);
        let Some(tab) = self.strip.get_mut(&id) else {
            return EventEffect::default();
        };

        let mut effect = EventEffect {
            refresh: true,
            status_posted: None,
        };
        match event {
            EngineEvent::UrlChanged(url) => {
                tab.url = url;
            }
            EngineEvent::LoadStarted => {
                tab.is_loading = true;
                tab.progress = 0;
            }
            EngineEvent::LoadProgress(progress) => {
                tab.progress = progress.min(100);
            }
            EngineEvent::LoadFinished { success } => {
                tab.is_loading = false;
                tab.progress = 0;
                let url = tab.url.clone();
                if !url.is_empty() {
                    tab.history.record(&url);
                }
                if is_active {
                    let text = if success { MSG_LOAD_OK } else { MSG_LOAD_FAILED };
                    effect.status_posted = Some(self.post_status(text));
                }
            }
            EngineEvent::TitleChanged(title) => {
                tab.title = title;
            }
            EngineEvent::IconChanged(icon) => {
                tab.favicon = icon;
            }
        }
        effect
    }

    // --- Status bar ---

    pub fn post_status(&mut self, text: &str) -> u64 {
        self.status_seq += 1;
        self.status = Some(StatusMessage {
            id: self.status_seq,
            text: text.to_string(),
        });
        self.status_seq
    }

    /// Clears the status message if it is still the one posted as `id`.
    pub fn expire_status(&mut self, id: u64) -> bool {
        if self.status.as_ref().map(|s| s.id) == Some(id) {
            self.status = None;
            true
        } else {
            false
        }
    }

    // --- Projection ---

    pub fn window_title(&self) -> String {
        match self.strip.active() {
            Some(tab) if !tab.title.is_empty() => format!("{} - {}", tab.title, APP_NAME),
            _ => DEFAULT_WINDOW_TITLE.to_string(),
        }
    }

    pub fn snapshot(&self) -> ChromeSnapshot {
        let active = self.strip.active();
        let loading = active.map(|t| t.is_loading).unwrap_or(false);

        ChromeSnapshot {
            window_title: self.window_title(),
            address: active.map(|t| t.url.clone()).unwrap_or_default(),
            tabs: self
                .strip
                .tabs()
                .iter()
                .map(|t| TabView {
                    id: t.id.clone(),
                    label: tab_label(&t.title, &t.url),
                    tooltip: if t.title.is_empty() { t.url.clone() } else { t.title.clone() },
                    favicon: t.favicon.clone(),
                    is_loading: t.is_loading,
                })
                .collect(),
            active_tab_id: self.strip.active_id().map(str::to_string),
            progress: active.filter(|t| t.is_loading).map(|t| t.progress),
            can_go_back: active.map(|t| t.history.can_go_back()).unwrap_or(false),
            can_go_forward: active.map(|t| t.history.can_go_forward()).unwrap_or(false),
            can_stop: loading,
            can_reload: active.is_some() && !loading,
            zoom_percent: zoom::percent(active.map(|t| t.zoom).unwrap_or(zoom::DEFAULT_ZOOM)),
            status: self.status.as_ref().map(|s| s.text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser() -> Browser {
        Browser::new(&Settings::default())
    }

    fn finish_load(b: &mut Browser, label: &str, url: &str) -> EventEffect {
        b.handle_engine_event(label, EngineEvent::UrlChanged(url.to_string()));
        b.handle_engine_event(label, EngineEvent::LoadStarted);
        b.handle_engine_event(label, EngineEvent::LoadFinished { success: true })
    }

    #[test]
    fn test_initial_state() {
        let b = browser();
        let snap = b.snapshot();
        assert_eq!(snap.window_title, DEFAULT_WINDOW_TITLE);
        assert!(snap.tabs.is_empty());
        assert!(!snap.can_reload);
        assert_eq!(snap.zoom_percent, 100);
    }

    #[test]
    fn test_open_tab_loads_homepage() {
        let mut b = browser();
        let cmds = b.open_tab(None);
        assert_eq!(
            cmds,
            vec![SurfaceCommand::Create {
                label: "surface-1".into(),
                url: "https://www.google.com/".into(),
                zoom: 1.0,
            }]
        );
        let snap = b.snapshot();
        assert_eq!(snap.tabs[0].label, "https://www.google.c...");
        assert_eq!(snap.address, "https://www.google.com/");
        assert_eq!(snap.active_tab_id.as_deref(), Some("tab-1"));
    }

    #[test]
    fn test_open_second_tab_hides_first() {
        let mut b = browser();
        b.open_tab(None);
        let cmds = b.open_tab(Some("example.com"));
        assert_eq!(cmds[0], SurfaceCommand::Hide { label: "surface-1".into() });
        assert!(matches!(
            &cmds[1],
            SurfaceCommand::Create { label, url, .. } if label == "surface-2" && url == "https://example.com/"
        ));
    }

    #[test]
    fn test_bare_homepage_is_resolved() {
        let settings = Settings {
            homepage: "example.com".into(),
            ..Settings::default()
        };
        let mut b = Browser::new(&settings);
        assert!(matches!(
            &b.open_tab(None)[0],
            SurfaceCommand::Create { url, .. } if url == "https://example.com/"
        ));
        assert_eq!(
            b.go_home(),
            vec![SurfaceCommand::Load {
                label: "surface-1".into(),
                url: "https://example.com/".into(),
            }]
        );
    }

    #[test]
    fn test_abandoned_surface_restores_previous_tab() {
        let mut b = browser();
        b.open_tab(None);
        b.open_tab(None);
        b.activate_tab("tab-1");
        b.open_tab(Some("example.com"));

        assert_eq!(
            b.abandon_surface("surface-3"),
            vec![SurfaceCommand::Show { label: "surface-1".into() }]
        );
        let snap = b.snapshot();
        assert_eq!(snap.tabs.len(), 2);
        assert_eq!(snap.active_tab_id.as_deref(), Some("tab-1"));
        assert!(b.abandon_surface("surface-3").is_empty());
    }

    #[test]
    fn test_abandoned_first_surface_leaves_no_tabs() {
        let mut b = browser();
        b.open_tab(None);
        assert!(b.abandon_surface("surface-1").is_empty());
        assert!(b.snapshot().tabs.is_empty());
        assert!(b.open_tab(None).iter().all(|c| matches!(c, SurfaceCommand::Create { .. })));
    }

    #[test]
    fn test_close_last_tab_closes_window() {
        let mut b = browser();
        b.open_tab(None);
        assert_eq!(b.close_tab("tab-1"), vec![SurfaceCommand::CloseWindow]);
    }

    #[test]
    fn test_close_current_tab_shows_neighbour() {
        let mut b = browser();
        b.open_tab(None);
        b.open_tab(None);
        assert_eq!(
            b.close_active_tab(),
            vec![
                SurfaceCommand::Destroy { label: "surface-2".into() },
                SurfaceCommand::Show { label: "surface-1".into() },
            ]
        );
    }

    #[test]
    fn test_activate_swaps_surfaces_and_chrome() {
        let mut b = browser();
        b.open_tab(None);
        b.handle_engine_event("surface-1", EngineEvent::TitleChanged("First".into()));
        b.open_tab(None);
        b.handle_engine_event("surface-2", EngineEvent::TitleChanged("Second".into()));
        assert_eq!(b.window_title(), "Second - WebBrowser");

        let cmds = b.activate_tab("tab-1");
        assert_eq!(
            cmds,
            vec![
                SurfaceCommand::Hide { label: "surface-2".into() },
                SurfaceCommand::Show { label: "surface-1".into() },
            ]
        );
        assert_eq!(b.window_title(), "First - WebBrowser");
        assert!(b.activate_tab("tab-1").is_empty());
    }

    #[test]
    fn test_load_cycle_drives_progress_and_actions() {
        let mut b = browser();
        b.open_tab(None);

        b.handle_engine_event("surface-1", EngineEvent::LoadStarted);
        let snap = b.snapshot();
        assert_eq!(snap.progress, Some(0));
        assert!(snap.can_stop);
        assert!(!snap.can_reload);

        b.handle_engine_event("surface-1", EngineEvent::LoadProgress(250));
        assert_eq!(b.snapshot().progress, Some(100));

        let effect = b.handle_engine_event("surface-1", EngineEvent::LoadFinished { success: true });
        assert!(effect.refresh);
        let snap = b.snapshot();
        assert_eq!(snap.progress, None);
        assert!(!snap.can_stop);
        assert!(snap.can_reload);
        assert_eq!(snap.status.as_deref(), Some("Page loaded successfully"));

        let id = effect.status_posted.unwrap();
        assert!(b.expire_status(id));
        assert_eq!(b.snapshot().status, None);
    }

    #[test]
    fn test_failed_load_message() {
        let mut b = browser();
        b.open_tab(None);
        b.handle_engine_event("surface-1", EngineEvent::LoadFinished { success: false });
        assert_eq!(b.snapshot().status.as_deref(), Some("Failed to load page"));
    }

    #[test]
    fn test_background_tab_updates_label_but_not_chrome() {
        let mut b = browser();
        b.open_tab(None);
        b.open_tab(None);

        b.handle_engine_event("surface-1", EngineEvent::LoadStarted);
        b.handle_engine_event(
            "surface-1",
            EngineEvent::TitleChanged("Background page with a long title".into()),
        );
        let effect = b.handle_engine_event("surface-1", EngineEvent::LoadFinished { success: true });

        assert_eq!(effect.status_posted, None);
        let snap = b.snapshot();
        assert_eq!(snap.window_title, DEFAULT_WINDOW_TITLE);
        assert_eq!(snap.progress, None);
        assert_eq!(snap.tabs[0].label, "Background page with...");
        assert_eq!(snap.tabs[0].tooltip, "Background page with a long title");
    }

    #[test]
    fn test_stale_surface_is_ignored() {
        let mut b = browser();
        b.open_tab(None);
        let effect = b.handle_engine_event("surface-99", EngineEvent::LoadStarted);
        assert_eq!(effect, EventEffect::default());
    }

    #[test]
    fn test_newer_status_survives_old_expiry() {
        let mut b = browser();
        let first = b.post_status("one");
        let second = b.post_status("two");
        assert!(!b.expire_status(first));
        assert_eq!(b.snapshot().status.as_deref(), Some("two"));
        assert!(b.expire_status(second));
    }

    #[test]
    fn test_back_forward_follow_session_history() {
        let mut b = browser();
        b.open_tab(None);
        assert!(b.go_back().is_empty());

        finish_load(&mut b, "surface-1", "https://a.example/");
        finish_load(&mut b, "surface-1", "https://b.example/");
        assert!(b.snapshot().can_go_back);

        assert_eq!(b.go_back(), vec![SurfaceCommand::Back { label: "surface-1".into() }]);
        finish_load(&mut b, "surface-1", "https://a.example/");
        let snap = b.snapshot();
        assert!(!snap.can_go_back);
        assert!(snap.can_go_forward);
        assert_eq!(snap.address, "https://a.example/");

        assert_eq!(b.go_forward(), vec![SurfaceCommand::Forward { label: "surface-1".into() }]);
    }

    #[test]
    fn test_navigate_and_home() {
        let mut b = browser();
        b.open_tab(None);
        assert_eq!(
            b.navigate("rust lang"),
            vec![SurfaceCommand::Load {
                label: "surface-1".into(),
                url: "https://www.google.com/search?q=rust%20lang".into(),
            }]
        );
        assert_eq!(
            b.go_home(),
            vec![SurfaceCommand::Load {
                label: "surface-1".into(),
                url: "https://www.google.com/".into(),
            }]
        );
        assert_eq!(b.reload(), vec![SurfaceCommand::Reload { label: "surface-1".into() }]);
        assert_eq!(b.stop(), vec![SurfaceCommand::Stop { label: "surface-1".into() }]);
    }

    #[test]
    fn test_actions_without_tabs_are_noops() {
        let mut b = browser();
        assert!(b.navigate("example.com").is_empty());
        assert!(b.zoom_in().is_empty());
        assert!(b.reload().is_empty());
        assert!(b.close_active_tab().is_empty());
    }

    #[test]
    fn test_zoom_is_per_tab() {
        let mut b = browser();
        b.open_tab(None);
        b.zoom_in();
        assert_eq!(
            b.zoom_in(),
            vec![SurfaceCommand::SetZoom { label: "surface-1".into(), factor: 1.2 }]
        );
        assert_eq!(b.snapshot().zoom_percent, 120);

        b.open_tab(None);
        assert_eq!(b.snapshot().zoom_percent, 100);
        b.zoom_out();
        assert_eq!(b.snapshot().zoom_percent, 90);

        b.activate_tab("tab-1");
        assert_eq!(b.snapshot().zoom_percent, 120);
        assert_eq!(
            b.reset_zoom(),
            vec![SurfaceCommand::SetZoom { label: "surface-1".into(), factor: 1.0 }]
        );
    }

    #[test]
    fn test_icon_and_snapshot_serialization() {
        let mut b = browser();
        b.open_tab(None);
        b.handle_engine_event(
            "surface-1",
            EngineEvent::IconChanged(Some("https://www.google.com/favicon.ico".into())),
        );
        let json = serde_json::to_value(b.snapshot()).unwrap();
        assert_eq!(json["tabs"][0]["favicon"], "https://www.google.com/favicon.ico");
        assert_eq!(json["activeTabId"], "tab-1");
        assert_eq!(json["canReload"], true);
    }
}
