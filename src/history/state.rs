use serde::{Deserialize, Serialize};
use url::Url;

use crate::modal::ModalOptions;

/// Data attached to one session-history entry.
///
/// The presence of `modal` is the only signal that the entry represents an
/// open modal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationState {
    pub title: String,
    pub href: String,
    pub cursor: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<ModalStateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets: Option<SnippetCacheRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalStateInfo {
    /// Outer markup of the element that opened the modal.
    pub opener: String,
    pub options: ModalOptions,
    /// Set on the state the page was loaded into, when that state was modal.
    pub refreshed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetCacheRef {
    pub storage: SnippetStorage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetStorage {
    History,
    Session,
    Off,
}

impl NavigationState {
    pub fn new(href: impl Into<String>, title: impl Into<String>, cursor: u64) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            cursor,
            ..Self::default()
        }
    }

    pub fn is_modal(&self) -> bool {
        self.modal.is_some()
    }

    pub fn is_refreshed_modal(&self) -> bool {
        self.modal.as_ref().is_some_and(|modal| modal.refreshed)
    }

    /// The snippet cache restores this entry unless it was explicitly stored
    /// with the cache switched off.
    pub fn snippet_cache_enabled(&self) -> bool {
        self.snippets
            .as_ref()
            .is_none_or(|snippets| snippets.storage != SnippetStorage::Off)
    }

    /// Origin of `href`, serialized. Relative or unparsable hrefs have none.
    pub fn origin(&self) -> Option<String> {
        Url::parse(&self.href)
            .ok()
            .map(|url| url.origin().ascii_serialization())
    }

    /// Whether both states describe the same page: same origin, href, title
    /// and modal payload. Cursors are ignored because a reload resets them.
    pub fn same_page_as(&self, other: &NavigationState) -> bool {
        let same_modal = match (&self.modal, &other.modal) {
            (Some(left), Some(right)) => left.same_payload(right),
            (None, None) => true,
            _ => false,
        };
        same_modal
            && self.href == other.href
            && self.title == other.title
            && self.origin() == other.origin()
    }
}

impl ModalStateInfo {
    pub fn same_payload(&self, other: &ModalStateInfo) -> bool {
        self.opener == other.opener && self.options == other.options
    }
}

#[cfg(test)]
mod tests {
    use super::{ModalStateInfo, NavigationState, SnippetCacheRef, SnippetStorage};
    use crate::modal::{ModalOptions, ModalSize};

    fn modal_state(cursor: u64, refreshed: bool) -> NavigationState {
        NavigationState {
            modal: Some(ModalStateInfo {
                opener: "<a href=\"/detail\" data-naja-modal=\"\">Open</a>".to_string(),
                options: ModalOptions::default(),
                refreshed,
            }),
            ..NavigationState::new("https://shop.test/detail", "Detail", cursor)
        }
    }

    #[test]
    fn same_page_ignores_cursor_and_refreshed_flag() {
        let loaded = modal_state(0, true);
        let pushed = modal_state(4, false);
        assert!(loaded.same_page_as(&pushed));
    }

    #[test]
    fn same_page_compares_modal_payload() {
        let loaded = modal_state(0, true);
        let mut other = modal_state(0, false);
        if let Some(modal) = other.modal.as_mut() {
            modal.options.size = ModalSize::Large;
        }
        assert!(!loaded.same_page_as(&other));

        let plain = NavigationState::new("https://shop.test/detail", "Detail", 0);
        assert!(!loaded.same_page_as(&plain));
    }

    #[test]
    fn same_page_compares_origin() {
        let local = NavigationState::new("https://shop.test/a", "A", 1);
        let foreign = NavigationState::new("https://other.test/a", "A", 1);
        assert!(!local.same_page_as(&foreign));
        assert_eq!(local.origin().as_deref(), Some("https://shop.test"));
        assert_eq!(NavigationState::new("/a", "A", 0).origin(), None);
    }

    #[test]
    fn snippet_cache_is_enabled_unless_stored_off() {
        let mut state = NavigationState::new("/a", "A", 0);
        assert!(state.snippet_cache_enabled());

        state.snippets = Some(SnippetCacheRef {
            storage: SnippetStorage::Session,
            key: Some("k1".to_string()),
        });
        assert!(state.snippet_cache_enabled());

        state.snippets = Some(SnippetCacheRef {
            storage: SnippetStorage::Off,
            key: None,
        });
        assert!(!state.snippet_cache_enabled());
    }
}
