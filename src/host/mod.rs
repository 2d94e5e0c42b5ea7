//! Contracts of the collaborators the modal controller drives: the modal
//! view, the browser history surface and the task queue.

mod signals;

use serde_json::Value;

use crate::dom::Element;
use crate::modal::ModalOptions;
use crate::request::RequestId;

pub use signals::{ModalSignal, ModalSignalHub, ModalSubscription, SubscriptionId};

/// What caused a show, hide or load notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Request(RequestId),
    Popstate,
    User,
}

pub trait ModalView {
    fn show(&mut self, opener: &Element, options: &ModalOptions, trigger: Trigger);
    fn hide(&mut self, trigger: Trigger);
    fn is_shown(&self) -> bool;

    /// Options for an open triggered by `opener`.
    fn options_for(&self, opener: &Element) -> ModalOptions;
    fn set_options(&mut self, options: &ModalOptions);

    /// Content-loaded notification. Views without one keep the default.
    fn dispatch_load(&mut self, options: &ModalOptions, trigger: Trigger) {
        let _ = (options, trigger);
    }

    /// Snippet ids the modal needs to function; never released.
    fn reserved_snippet_ids(&self) -> &[String];
    /// Ids of the snippet elements currently inside the modal root.
    fn snippet_ids(&self) -> Vec<String>;
    /// Drops the id from a snippet inside the modal so later responses no
    /// longer target it.
    fn release_snippet(&mut self, id: &str);

    /// Turns history off for ajaxified elements inside the modal.
    fn disable_nested_history(&mut self) {}

    fn subscribe(&mut self) -> ModalSubscription;
    fn unsubscribe(&mut self, id: SubscriptionId);
}

pub trait Browser {
    /// Record attached to the current history entry.
    fn state(&self) -> Option<Value>;
    fn back(&mut self);
    fn reload(&mut self);
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    DispatchLoad,
}

/// Queue for work that must run on a later tick of the event loop.
pub trait Scheduler {
    fn defer(&mut self, task: DeferredTask);
}

pub struct HostContext<'a> {
    pub view: &'a mut dyn ModalView,
    pub browser: &'a mut dyn Browser,
    pub scheduler: &'a mut dyn Scheduler,
}
