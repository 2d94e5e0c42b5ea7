use std::collections::VecDeque;

use serde_json::Value;

use crate::extension::PopstateEvent;
use crate::host::Browser;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub href: String,
    pub title: String,
    pub state: Option<Value>,
}

/// In-memory session history. Traversals move the index at once and queue
/// the popstate for a later tick, as browsers do.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
    title: String,
    pending_pops: VecDeque<PopstateEvent>,
    back_calls: usize,
    reload_requested: bool,
}

impl SessionHistory {
    pub fn new(href: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            entries: vec![HistoryEntry {
                href: href.into(),
                title: title.clone(),
                state: None,
            }],
            index: 0,
            title,
            pending_pops: VecDeque::new(),
            back_calls: 0,
            reload_requested: false,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn href(&self) -> &str {
        &self.current().href
    }

    /// Number of `back()` calls made through the `Browser` surface.
    pub fn back_calls(&self) -> usize {
        self.back_calls
    }

    pub fn push_state(&mut self, state: Value, title: &str, href: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            href: href.to_string(),
            title: title.to_string(),
            state: Some(state),
        });
        self.index = self.entries.len() - 1;
    }

    pub fn replace_state(&mut self, state: Value, title: &str, href: &str) {
        self.entries[self.index] = HistoryEntry {
            href: href.to_string(),
            title: title.to_string(),
            state: Some(state),
        };
    }

    /// Moves by `delta` entries. Out-of-range moves are ignored.
    pub fn go(&mut self, delta: isize) -> bool {
        let Some(target) = self.index.checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= self.entries.len() {
            return false;
        }
        self.index = target;
        self.pending_pops.push_back(PopstateEvent {
            state: self.entries[target].state.clone(),
        });
        true
    }

    pub fn take_popstate(&mut self) -> Option<PopstateEvent> {
        self.pending_pops.pop_front()
    }

    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Unloads the document: queued events belong to the old page.
    pub fn unload(&mut self) {
        self.pending_pops.clear();
        self.reload_requested = false;
        self.title = self.current().title.clone();
    }
}

impl Browser for SessionHistory {
    fn state(&self) -> Option<Value> {
        self.current().state.clone()
    }

    fn back(&mut self) {
        self.back_calls += 1;
        self.go(-1);
    }

    fn reload(&mut self) {
        self.reload_requested = true;
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::SessionHistory;
    use crate::host::Browser;

    #[test]
    fn push_truncates_forward_entries() {
        let mut history = SessionHistory::new("/", "Home");
        history.push_state(json!({"cursor": 1}), "A", "/a");
        history.push_state(json!({"cursor": 2}), "B", "/b");
        assert!(history.go(-2));
        history.push_state(json!({"cursor": 1}), "C", "/c");

        let hrefs: Vec<_> = history.entries().iter().map(|e| e.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/", "/c"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn back_queues_popstate_with_target_state() {
        let mut history = SessionHistory::new("/", "Home");
        history.push_state(json!({"cursor": 1}), "A", "/a");

        history.back();
        assert_eq!(history.back_calls(), 1);
        assert_eq!(history.href(), "/");
        let event = history.take_popstate().expect("popstate queued");
        assert_eq!(event.state, None);

        history.back();
        assert_eq!(history.back_calls(), 2);
        assert!(history.take_popstate().is_none());
    }

    #[test]
    fn reload_is_reported_once() {
        let mut history = SessionHistory::new("/", "Home");
        history.reload();
        assert!(history.take_reload());
        assert!(!history.take_reload());
    }
}
