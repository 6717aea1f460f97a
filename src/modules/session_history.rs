// Per-tab back/forward list, rebuilt from the URL changes a surface reports.
// The webview itself cannot be asked whether it can go back, so the shell
// mirrors the engine's history here.

#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<String>,
    index: usize,
    // Steps requested but not yet committed by the engine. Negative is back.
    pending: isize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    fn target(&self, offset: isize) -> Option<usize> {
        let target = self.index.checked_add_signed(offset)?;
        (target < self.entries.len()).then_some(target)
    }

    /// Marks one more back step as in flight. Returns false when the steps
    /// already pending leave nothing to go back to.
    pub fn begin_back(&mut self) -> bool {
        if self.target(self.pending - 1).is_none() {
            return false;
        }
        self.pending -= 1;
        true
    }

    pub fn begin_forward(&mut self) -> bool {
        if self.target(self.pending + 1).is_none() {
            return false;
        }
        self.pending += 1;
        true
    }

    /// Records a committed URL from the engine.
    pub fn record(&mut self, url: &str) {
        if self.pending != 0 {
            // The engine may commit each queued step or jump straight to the
            // last one, so accept any entry along the pending path.
            let dir = self.pending.signum();
            for step in 1..=self.pending.abs() {
                let Some(target) = self.target(dir * step) else { break };
                if self.entries[target] == url {
                    self.index = target;
                    self.pending -= dir * step;
                    return;
                }
            }
            log::debug!("[History] Pending {} steps landed on unexpected {}", self.pending, url);
            self.pending = 0;
        }

        if self.current() == Some(url) {
            return;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(url.to_string());
        self.index = self.entries.len() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(urls: &[&str]) -> SessionHistory {
        let mut h = SessionHistory::new();
        for u in urls {
            h.record(u);
        }
        h
    }

    #[test]
    fn test_empty_history() {
        let mut h = SessionHistory::new();
        assert!(h.entries.is_empty());
        assert!(!h.can_go_back());
        assert!(!h.can_go_forward());
        assert!(!h.begin_back());
        assert!(!h.begin_forward());
        assert_eq!(h.current(), None);
    }

    #[test]
    fn test_record_and_duplicate() {
        let h = history_of(&["https://a/", "https://a/", "https://b/"]);
        assert_eq!(h.entries.len(), 2);
        assert_eq!(h.current(), Some("https://b/"));
        assert!(h.can_go_back());
        assert!(!h.can_go_forward());
    }

    #[test]
    fn test_back_then_forward() {
        let mut h = history_of(&["https://a/", "https://b/", "https://c/"]);

        assert!(h.begin_back());
        h.record("https://b/");
        assert_eq!(h.current(), Some("https://b/"));
        assert!(h.can_go_forward());

        assert!(h.begin_forward());
        h.record("https://c/");
        assert_eq!(h.current(), Some("https://c/"));
        assert!(!h.can_go_forward());
        assert_eq!(h.entries.len(), 3);
    }

    #[test]
    fn test_double_back_before_commit() {
        let mut h = history_of(&["https://a/", "https://b/", "https://c/"]);
        assert!(h.begin_back());
        assert!(h.begin_back());
        // Two steps pending from index 2: a third would run off the start
        assert!(!h.begin_back());

        h.record("https://a/");
        assert_eq!(h.current(), Some("https://a/"));
        assert_eq!(h.entries.len(), 3);
        assert!(h.can_go_forward());
        assert!(!h.can_go_back());
    }

    #[test]
    fn test_double_back_committed_step_by_step() {
        let mut h = history_of(&["https://a/", "https://b/", "https://c/"]);
        assert!(h.begin_back());
        assert!(h.begin_back());

        h.record("https://b/");
        assert_eq!(h.current(), Some("https://b/"));
        h.record("https://a/");
        assert_eq!(h.current(), Some("https://a/"));
        assert_eq!(h.entries.len(), 3);

        // Nothing left pending: a new page truncates normally
        h.record("https://d/");
        assert_eq!(h.entries, vec!["https://a/", "https://d/"]);
    }

    #[test]
    fn test_new_navigation_drops_forward_entries() {
        let mut h = history_of(&["https://a/", "https://b/", "https://c/"]);
        assert!(h.begin_back());
        h.record("https://b/");
        assert!(h.begin_back());
        h.record("https://a/");

        h.record("https://d/");
        assert_eq!(h.entries.len(), 2);
        assert_eq!(h.current(), Some("https://d/"));
        assert!(!h.can_go_forward());
    }

    #[test]
    fn test_back_without_history_is_refused() {
        let mut h = history_of(&["https://a/"]);
        assert!(!h.begin_back());
        h.record("https://b/");
        assert_eq!(h.entries.len(), 2);
    }

    #[test]
    fn test_unexpected_destination_is_pushed() {
        let mut h = history_of(&["https://a/", "https://b/"]);
        assert!(h.begin_back());
        // A redirect or script navigation raced the back action
        h.record("https://z/");
        assert_eq!(h.current(), Some("https://z/"));
        assert_eq!(h.entries.len(), 3);
        assert!(!h.can_go_forward());
        assert_eq!(h.pending, 0);
    }
}
