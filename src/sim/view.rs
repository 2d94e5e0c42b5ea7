use crate::config::AttributeConfig;
use crate::dom::Element;
use crate::host::{
    ModalSignal, ModalSignalHub, ModalSubscription, ModalView, SubscriptionId, Trigger,
};
use crate::modal::ModalOptions;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Show {
        opener: String,
        options: ModalOptions,
        trigger: Trigger,
    },
    Hide {
        trigger: Trigger,
    },
    SetOptions(ModalOptions),
    DispatchLoad {
        options: ModalOptions,
        trigger: Trigger,
    },
    ReleaseSnippet(String),
    DisableNestedHistory,
}

/// Modal view that records every call. Hiding completes instantly, so
/// `Hide` and `Hidden` are published together.
#[derive(Debug)]
pub struct RecordingModal {
    attributes: AttributeConfig,
    shown: bool,
    opener: Option<Element>,
    snippet_ids: Vec<String>,
    reserved_snippet_ids: Vec<String>,
    calls: Vec<ViewCall>,
    hub: ModalSignalHub,
}

impl RecordingModal {
    pub fn new(attributes: AttributeConfig) -> Self {
        Self {
            attributes,
            shown: false,
            opener: None,
            snippet_ids: Vec::new(),
            reserved_snippet_ids: Vec::new(),
            calls: Vec::new(),
            hub: ModalSignalHub::default(),
        }
    }

    pub fn set_snippets(&mut self, ids: &[&str], reserved: &[&str]) {
        self.snippet_ids = ids.iter().map(|id| id.to_string()).collect();
        self.reserved_snippet_ids = reserved.iter().map(|id| id.to_string()).collect();
    }

    /// Marks the modal as already open when the page is rendered, without
    /// publishing a show.
    pub fn render_open(&mut self, opener: Element) {
        self.shown = true;
        self.opener = Some(opener);
    }

    /// Close requested from inside the modal, e.g. its close button.
    pub fn close_from(&mut self, element: Option<Element>) {
        if let Some(element) = element {
            self.opener = Some(element);
        }
        self.hide(Trigger::User);
    }

    pub fn calls(&self) -> &[ViewCall] {
        &self.calls
    }

    pub fn count(&self, predicate: impl Fn(&ViewCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn snippet_ids_in_modal(&self) -> &[String] {
        &self.snippet_ids
    }
}

impl ModalView for RecordingModal {
    fn show(&mut self, opener: &Element, options: &ModalOptions, trigger: Trigger) {
        self.calls.push(ViewCall::Show {
            opener: opener.outer_html(),
            options: options.clone(),
            trigger,
        });
        if opener.is_empty() && self.opener.is_none() {
            return;
        }
        if !opener.is_empty() {
            self.opener = Some(opener.clone());
        }
        if !self.shown {
            self.shown = true;
            self.hub.emit(ModalSignal::Show);
        }
    }

    fn hide(&mut self, trigger: Trigger) {
        self.calls.push(ViewCall::Hide { trigger });
        if !self.shown {
            return;
        }
        self.shown = false;
        self.hub.emit(ModalSignal::Hide {
            opener: self.opener.take(),
        });
        self.hub.emit(ModalSignal::Hidden);
    }

    fn is_shown(&self) -> bool {
        self.shown
    }

    fn options_for(&self, opener: &Element) -> ModalOptions {
        ModalOptions::from_element(opener, &self.attributes)
    }

    fn set_options(&mut self, options: &ModalOptions) {
        self.calls.push(ViewCall::SetOptions(options.clone()));
    }

    fn dispatch_load(&mut self, options: &ModalOptions, trigger: Trigger) {
        self.calls.push(ViewCall::DispatchLoad {
            options: options.clone(),
            trigger,
        });
    }

    fn reserved_snippet_ids(&self) -> &[String] {
        &self.reserved_snippet_ids
    }

    fn snippet_ids(&self) -> Vec<String> {
        self.snippet_ids.clone()
    }

    fn release_snippet(&mut self, id: &str) {
        self.snippet_ids.retain(|existing| existing != id);
        self.calls.push(ViewCall::ReleaseSnippet(id.to_string()));
    }

    fn disable_nested_history(&mut self) {
        self.calls.push(ViewCall::DisableNestedHistory);
    }

    fn subscribe(&mut self) -> ModalSubscription {
        self.hub.subscribe()
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.hub.unsubscribe(id);
    }
}
