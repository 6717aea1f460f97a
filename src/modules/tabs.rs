// Tab strip - pure logic, no Tauri imports.
// Owns the ordered tab list and which tab is current.

use crate::state::Tab;
use std::collections::HashMap;

const MAX_LABEL_CHARS: usize = 20;

#[derive(Debug)]
pub enum CloseOutcome {
    /// The tab was removed. `activated` is set when the current tab changed.
    Removed { tab: Tab, activated: Option<String> },
    /// The last tab was asked to close; the window should close instead.
    LastTab,
    NotFound,
}

#[derive(Debug, Default)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    active_id: Option<String>,
    // Current tab before the most recent `open`, for `discard`.
    opened_from: Option<String>,
    next_id: u64,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id.as_deref() == Some(id)
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_id.clone()?;
        self.get_mut(&id)
    }

    pub fn find_by_label(&self, webview_label: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.webview_label == webview_label)
    }

    /// Appends a new tab and makes it current. Returns its id.
    pub fn open(&mut self, zoom: f64) -> String {
        self.next_id += 1;
        let id = format!("tab-{}", self.next_id);
        let label = format!("surface-{}", self.next_id);
        self.tabs.push(Tab::new(id.clone(), label, zoom));
        self.opened_from = self.active_id.replace(id.clone());
        log::info!("[Tabs] Opened {} ({} open)", id, self.tabs.len());
        id
    }

    pub fn close(&mut self, id: &str) -> CloseOutcome {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return CloseOutcome::NotFound;
        };
        if self.tabs.len() == 1 {
            return CloseOutcome::LastTab;
        }

        let tab = self.tabs.remove(index);
        let mut activated = None;
        if self.is_active(id) {
            // Right neighbour slides into `index`; fall back to the left one.
            let next = self.tabs.get(index).or_else(|| self.tabs.last());
            let next_id = next.map(|t| t.id.clone());
            self.active_id = next_id.clone();
            activated = next_id;
        }
        log::info!("[Tabs] Closed {} ({} open)", id, self.tabs.len());
        CloseOutcome::Removed { tab, activated }
    }

    /// Drops a tab whose surface never came up, even if it is the only one.
    /// Returns the id that is current afterwards.
    pub fn discard(&mut self, id: &str) -> Option<String> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        self.tabs.remove(index);
        if self.is_active(id) {
            let fallback = self
                .opened_from
                .take()
                .filter(|prev| self.get(prev).is_some())
                .or_else(|| self.tabs.last().map(|t| t.id.clone()));
            self.active_id = fallback;
        }
        log::warn!("[Tabs] Discarded {} ({} open)", id, self.tabs.len());
        self.active_id.clone()
    }

    /// Makes `id` current. Returns false if it already was or is unknown.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.is_active(id) || self.get(id).is_none() {
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    /// Reorders tabs to follow `new_order`. Returns true if the order changed.
    ///
    /// Ids missing from `new_order` are appended in their previous order so
    /// a racing drag never loses a tab; unknown ids are ignored.
    pub fn reorder(&mut self, new_order: &[String]) -> bool {
        if self.tabs.is_empty() || new_order.is_empty() {
            return false;
        }

        let old_order: Vec<String> = self.tabs.iter().map(|t| t.id.clone()).collect();

        let mut tab_map: HashMap<String, Tab> =
            self.tabs.drain(..).map(|t| (t.id.clone(), t)).collect();

        let mut reordered = Vec::with_capacity(old_order.len());
        for id in new_order {
            if let Some(tab) = tab_map.remove(id) {
                reordered.push(tab);
            }
        }
        for id in &old_order {
            if let Some(tab) = tab_map.remove(id) {
                reordered.push(tab);
            }
        }

        let changed = reordered.iter().map(|t| &t.id).ne(old_order.iter());
        self.tabs = reordered;
        changed
    }
}

/// Text shown on a tab: the title, shortened to 20 characters plus "...".
pub fn tab_label(title: &str, url: &str) -> String {
    let source = if !title.is_empty() {
        title
    } else if !url.is_empty() {
        url
    } else {
        return "New Tab".to_string();
    };

    if source.chars().count() > MAX_LABEL_CHARS {
        let short: String = source.chars().take(MAX_LABEL_CHARS).collect();
        format!("{}...", short)
    } else {
        source.to_string()
    }
}
