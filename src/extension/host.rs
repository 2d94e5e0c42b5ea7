use crate::config::Config;
use crate::host::{DeferredTask, HostContext};
use crate::modal::{ModalController, PreventRedrawExtension};

use super::events::{
    BeforeEvent, BuildStateEvent, CompleteEvent, FetchEvent, InteractionEvent, PopstateEvent,
    PopstateOutcome, StartEvent, SuccessEvent,
};
use super::traits::Extension;

/// Dispatches pipeline events to the extensions in a fixed order.
///
/// The prevent-redraw flag is set before the modal controller inspects the
/// interaction, and the controller sees popstate before anything else.
pub struct ExtensionHost {
    prevent_redraw: PreventRedrawExtension,
    modal: ModalController,
}

impl ExtensionHost {
    pub fn new(config: &Config, host: &mut HostContext<'_>) -> Self {
        Self {
            prevent_redraw: PreventRedrawExtension::new(config),
            modal: ModalController::new(config, host),
        }
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn handle_interaction(
        &mut self,
        event: &mut InteractionEvent<'_>,
        host: &mut HostContext<'_>,
    ) {
        self.prevent_redraw.on_interaction(event, host);
        self.modal.on_interaction(event, host);
    }

    pub fn handle_before(&mut self, event: &mut BeforeEvent<'_>, host: &mut HostContext<'_>) {
        self.modal.on_before(event, host);
        self.prevent_redraw.on_before(event, host);
    }

    pub fn handle_start(&mut self, event: &StartEvent<'_>, host: &mut HostContext<'_>) {
        self.modal.on_start(event, host);
    }

    pub fn handle_success(&mut self, event: &SuccessEvent<'_>, host: &mut HostContext<'_>) {
        self.modal.on_success(event, host);
    }

    pub fn handle_complete(&mut self, event: &CompleteEvent<'_>, host: &mut HostContext<'_>) {
        self.modal.on_complete(event, host);
    }

    pub fn handle_build_state(
        &mut self,
        event: &mut BuildStateEvent<'_>,
        host: &mut HostContext<'_>,
    ) {
        self.modal.on_build_state(event, host);
    }

    pub fn handle_fetch(&mut self, event: &mut FetchEvent<'_>, host: &mut HostContext<'_>) {
        self.modal.on_fetch(event, host);
    }

    pub fn handle_popstate(
        &mut self,
        event: &PopstateEvent,
        host: &mut HostContext<'_>,
    ) -> PopstateOutcome {
        self.modal.on_popstate(event, host)
    }

    pub fn handle_deferred(&mut self, task: DeferredTask, host: &mut HostContext<'_>) {
        self.modal.on_deferred(task, host);
    }

    pub fn drain_background(&mut self, host: &mut HostContext<'_>) -> bool {
        self.modal.on_background(host)
    }

    /// Stops receiving modal signals. The host is unusable afterwards.
    pub fn shutdown(&mut self, host: &mut HostContext<'_>) {
        self.modal.detach(host.view);
    }
}
