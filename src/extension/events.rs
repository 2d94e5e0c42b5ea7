use serde_json::Value;

use crate::dom::Element;
use crate::history::NavigationState;
use crate::request::{Payload, Request, RequestOptions};

/// A user interaction that may start a request. Extensions annotate
/// `options` before the request is built.
pub struct InteractionEvent<'a> {
    pub element: &'a Element,
    pub options: &'a mut RequestOptions,
}

/// The request is built but not sent. Headers may still change.
pub struct BeforeEvent<'a> {
    pub request: &'a mut Request,
    pub options: &'a RequestOptions,
}

pub struct StartEvent<'a> {
    pub request: &'a Request,
    pub options: &'a RequestOptions,
}

pub struct SuccessEvent<'a> {
    pub request: &'a Request,
    pub payload: &'a Payload,
    pub options: &'a RequestOptions,
}

/// Fired for every finished request, aborted ones included.
pub struct CompleteEvent<'a> {
    pub request: &'a Request,
    pub options: &'a RequestOptions,
}

/// History data for an entry is being assembled.
pub struct BuildStateEvent<'a> {
    pub state: &'a mut NavigationState,
    pub options: &'a RequestOptions,
    /// The pipeline's bootstrap replace of the entry the page loaded into.
    pub initial_replace: bool,
}

/// The pipeline is about to fetch content for a restored history entry
/// that the snippet cache cannot serve.
pub struct FetchEvent<'a> {
    pub state: &'a NavigationState,
    pub options: &'a mut RequestOptions,
    prevented: bool,
}

impl<'a> FetchEvent<'a> {
    pub fn new(state: &'a NavigationState, options: &'a mut RequestOptions) -> Self {
        Self {
            state,
            options,
            prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.prevented = true;
    }

    pub fn is_prevented(&self) -> bool {
        self.prevented
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopstateEvent {
    /// Raw record of the entry navigated to.
    pub state: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopstateOutcome {
    Continue,
    /// Later listeners, including the pipeline's own restoration, must not
    /// act on this event.
    Stopped,
}
