use crate::config::{AttributeConfig, Config, HeaderConfig};
use crate::dom::Element;
use crate::extension::{
    BeforeEvent, BuildStateEvent, CompleteEvent, Extension, FetchEvent, InteractionEvent,
    PopstateEvent, PopstateOutcome, StartEvent, SuccessEvent,
};
use crate::history::{HistoryStateCodec, NavigationState};
use crate::host::{
    DeferredTask, HostContext, ModalSignal, ModalSubscription, ModalView, Trigger,
};
use crate::request::{Payload, Request, RequestOptions};

use super::options::ModalOptions;
use super::requests::RequestCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Walking back one entry per popstate until a non-modal entry is on top.
    ChasingBack,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    /// A history entry was built for the current open, so hiding must walk
    /// history back.
    pub history_tracking_enabled: bool,
    pub chasing_back: bool,
    /// The next successful modal request restores a popped entry whose
    /// snippets were not cached.
    pub restore_request_pending: bool,
    /// Cancel the pipeline's next content fetch for a restored entry.
    pub prevent_next_fetch: bool,
    pub current_options: ModalOptions,
    /// The entry the page was loaded into, captured once.
    pub initial_state: Option<NavigationState>,
}

/// Decides when the modal is visible and which history entries mark it open.
pub struct ModalController {
    attributes: AttributeConfig,
    headers: HeaderConfig,
    snippet_prefix: String,
    pub(super) state: ControllerState,
    requests: RequestCoordinator,
    subscription: Option<ModalSubscription>,
}

impl ModalController {
    pub fn new(config: &Config, host: &mut HostContext<'_>) -> Self {
        let mut initial_state = HistoryStateCodec::read(host.browser.state().as_ref());
        let mut current_options = ModalOptions::default();
        if let Some(modal) = initial_state
            .as_mut()
            .and_then(|state| state.modal.as_mut())
        {
            tracing::debug!("page loaded into a modal history entry");
            modal.refreshed = true;
            current_options = modal.options.clone();
        }

        Self {
            attributes: config.attributes.clone(),
            headers: config.headers.clone(),
            snippet_prefix: config.snippets.id_prefix.clone(),
            state: ControllerState {
                current_options,
                initial_state,
                ..ControllerState::default()
            },
            requests: RequestCoordinator::default(),
            subscription: Some(host.view.subscribe()),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.chasing_back {
            Phase::ChasingBack
        } else {
            Phase::Idle
        }
    }

    pub fn requests(&self) -> &RequestCoordinator {
        &self.requests
    }

    pub fn detach(&mut self, view: &mut dyn ModalView) {
        if let Some(subscription) = self.subscription.take() {
            view.unsubscribe(subscription.id());
        }
    }

    /// Marks the request modal when the element opts in or the modal is
    /// already open, and attaches opener and options.
    pub fn on_user_interaction(
        &mut self,
        element: &Element,
        options: &mut RequestOptions,
        host: &mut HostContext<'_>,
    ) {
        options.modal = host.view.is_shown() || element.has_attr_or_form(&self.attributes.modal);
        if !options.is_modal_request() {
            return;
        }

        let modal_options = host.view.options_for(element);
        self.state.current_options = modal_options.clone();
        options.modal_options = Some(modal_options);
        options.opener = Some(element.clone());
    }

    /// Flags the request for the server and opens the modal before the
    /// response arrives.
    pub fn on_before_request_dispatch(
        &mut self,
        request: &mut Request,
        options: &RequestOptions,
        host: &mut HostContext<'_>,
    ) {
        let is_modal = options.is_modal_request();
        let opened = host.view.is_shown() || is_modal;
        request
            .headers
            .append(self.headers.modal_opened.as_str(), if opened { "1" } else { "0" });

        if !is_modal {
            request
                .headers
                .append(self.headers.prevent_redraw.as_str(), "1");
            return;
        }

        if !host.view.is_shown() {
            // A fresh open starts untracked until one of its entries is built.
            self.state.history_tracking_enabled = false;
        }
        let opener = options.opener.clone().unwrap_or_else(Element::empty);
        let modal_options = options
            .modal_options
            .as_ref()
            .unwrap_or(&self.state.current_options);
        host.view
            .show(&opener, modal_options, Trigger::Request(request.id));
    }

    pub fn on_request_succeeded(
        &mut self,
        request: &Request,
        payload: &Payload,
        options: &RequestOptions,
        host: &mut HostContext<'_>,
    ) {
        let restores_popped_entry = std::mem::take(&mut self.state.restore_request_pending);
        if !options.is_modal_request() {
            return;
        }

        if !options.history.is_enabled() {
            host.view.disable_nested_history();
        }

        if payload.close_modal {
            tracing::debug!(request = request.id.0, "response closes the modal");
            host.view.hide(Trigger::Request(request.id));
            return;
        }

        if let Some(modal_options) = &options.modal_options {
            self.state.current_options = modal_options.clone();
        }
        let trigger = if restores_popped_entry {
            Trigger::Popstate
        } else {
            Trigger::Request(request.id)
        };
        host.view.set_options(&self.state.current_options);
        host.view.dispatch_load(&self.state.current_options, trigger);
    }

    /// Attaches the modal marker to an entry being built for a modal request
    /// and enables history tracking for the current open.
    pub fn on_history_state_built(
        &mut self,
        state: &mut NavigationState,
        options: &RequestOptions,
        initial_replace: bool,
        host: &mut HostContext<'_>,
    ) {
        if state.title.is_empty() {
            state.title = host.browser.title();
        }

        if initial_replace {
            let existing = self
                .state
                .initial_state
                .as_ref()
                .and_then(|initial| initial.modal.clone())
                .or_else(|| {
                    HistoryStateCodec::read(host.browser.state().as_ref())
                        .and_then(|current| current.modal)
                });
            if existing.is_some() {
                state.modal = existing;
            }
            return;
        }

        if !options.is_modal_request() || options.force_redirect {
            return;
        }

        let opener = options.opener.clone().unwrap_or_else(Element::empty);
        state.modal = Some(HistoryStateCodec::encode(
            &opener,
            &self.state.current_options,
        ));
        self.state.history_tracking_enabled = true;
    }

    pub fn on_modal_shown(&mut self, host: &mut HostContext<'_>) {
        host.view.set_options(&self.state.current_options);
    }

    /// Releases the modal's snippets and aborts its request unless the
    /// opener opted out.
    pub fn on_modal_about_to_hide(&mut self, opener: Option<&Element>, host: &mut HostContext<'_>) {
        let reserved = host.view.reserved_snippet_ids().to_vec();
        for id in host.view.snippet_ids() {
            if id.starts_with(&self.snippet_prefix) && !reserved.contains(&id) {
                host.view.release_snippet(&id);
            }
        }

        self.requests
            .on_modal_about_to_hide(opener, &self.attributes.abort);
    }

    /// Starts walking history back to the entry below the modal.
    pub fn on_modal_hidden(&mut self, host: &mut HostContext<'_>) {
        if !self.state.history_tracking_enabled {
            return;
        }

        tracing::debug!("modal hidden, walking history back");
        self.state.chasing_back = true;
        self.clean_data();
        host.browser.back();
    }

    pub fn on_fetch_restored(&mut self, event: &mut FetchEvent<'_>) {
        if let Some(modal) = &event.state.modal {
            event.options.modal = true;
            event.options.opener = Some(HistoryStateCodec::decode(modal));
            event.options.modal_options = Some(modal.options.clone());
        }

        if self.state.prevent_next_fetch {
            event.prevent_default();
            self.state.prevent_next_fetch = false;
        }
    }

    pub fn run_deferred(&mut self, task: DeferredTask, host: &mut HostContext<'_>) {
        match task {
            DeferredTask::DispatchLoad => {
                if host.view.is_shown() {
                    host.view
                        .dispatch_load(&self.state.current_options, Trigger::Popstate);
                }
            }
        }
    }

    /// Applies queued view signals. Returns whether any were pending.
    pub fn drain_signals(&mut self, host: &mut HostContext<'_>) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let signals = subscription.drain();
        let changed = !signals.is_empty();
        for signal in signals {
            match signal {
                ModalSignal::Show => self.on_modal_shown(host),
                ModalSignal::Hide { opener } => self.on_modal_about_to_hide(opener.as_ref(), host),
                ModalSignal::Hidden => self.on_modal_hidden(host),
            }
        }
        changed
    }

    pub(super) fn initial_is_modal(&self) -> bool {
        self.state
            .initial_state
            .as_ref()
            .is_some_and(NavigationState::is_modal)
    }

    fn clean_data(&mut self) {
        self.state.history_tracking_enabled = false;
        self.state.current_options = ModalOptions::default();
    }
}

impl Extension for ModalController {
    fn on_interaction(&mut self, event: &mut InteractionEvent<'_>, host: &mut HostContext<'_>) {
        self.on_user_interaction(event.element, event.options, host);
    }

    fn on_before(&mut self, event: &mut BeforeEvent<'_>, host: &mut HostContext<'_>) {
        self.on_before_request_dispatch(event.request, event.options, host);
    }

    fn on_start(&mut self, event: &StartEvent<'_>, _host: &mut HostContext<'_>) {
        self.requests
            .on_request_start(event.request, event.options.is_modal_request());
    }

    fn on_success(&mut self, event: &SuccessEvent<'_>, host: &mut HostContext<'_>) {
        self.on_request_succeeded(event.request, event.payload, event.options, host);
    }

    fn on_complete(&mut self, event: &CompleteEvent<'_>, _host: &mut HostContext<'_>) {
        self.requests.on_request_complete(event.request);
    }

    fn on_build_state(&mut self, event: &mut BuildStateEvent<'_>, host: &mut HostContext<'_>) {
        self.on_history_state_built(event.state, event.options, event.initial_replace, host);
    }

    fn on_fetch(&mut self, event: &mut FetchEvent<'_>, _host: &mut HostContext<'_>) {
        self.on_fetch_restored(event);
    }

    fn on_popstate(&mut self, event: &PopstateEvent, host: &mut HostContext<'_>) -> PopstateOutcome {
        self.reconcile_popstate(event, host)
    }

    fn on_deferred(&mut self, task: DeferredTask, host: &mut HostContext<'_>) {
        self.run_deferred(task, host);
    }

    fn on_background(&mut self, host: &mut HostContext<'_>) -> bool {
        self.drain_signals(host)
    }
}
