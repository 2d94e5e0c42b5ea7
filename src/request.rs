use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::dom::Element;
use crate::modal::ModalOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Read side of an abort controller. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    pub fn abort(&self) {
        self.signal.0.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.0.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.0.push((name, value.into()));
    }

    /// First value for `name`, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub id: RequestId,
    pub url: String,
    pub headers: Headers,
    abort: AbortController,
}

impl Request {
    pub fn new(id: RequestId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            headers: Headers::default(),
            abort: AbortController::new(),
        }
    }

    pub fn abort_controller(&self) -> &AbortController {
        &self.abort
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.signal().is_aborted()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    #[default]
    Push,
    Replace,
    Off,
}

impl HistoryMode {
    /// Parses `data-naja-history` values. Unknown values keep the default.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("off" | "false") => Self::Off,
            Some("replace") => Self::Replace,
            _ => Self::Push,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }
}

/// Per-request annotation shared by every extension during one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub modal: bool,
    pub prevent_redraw: bool,
    pub opener: Option<Element>,
    pub modal_options: Option<ModalOptions>,
    pub history: HistoryMode,
    pub force_redirect: bool,
}

impl RequestOptions {
    pub fn is_modal_request(&self) -> bool {
        self.modal && !self.prevent_redraw
    }
}

/// Response payload fields this crate reacts to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Payload {
    pub close_modal: bool,
    pub force_redirect: Option<String>,
}
