use crate::host::{DeferredTask, HostContext};

use super::events::{
    BeforeEvent, BuildStateEvent, CompleteEvent, FetchEvent, InteractionEvent, PopstateEvent,
    PopstateOutcome, StartEvent, SuccessEvent,
};

/// One participant in the request pipeline. Every hook defaults to a no-op.
pub trait Extension {
    fn on_interaction(&mut self, event: &mut InteractionEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_before(&mut self, event: &mut BeforeEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_start(&mut self, event: &StartEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_success(&mut self, event: &SuccessEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_complete(&mut self, event: &CompleteEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_build_state(&mut self, event: &mut BuildStateEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_fetch(&mut self, event: &mut FetchEvent<'_>, host: &mut HostContext<'_>) {
        let _ = (event, host);
    }

    fn on_popstate(&mut self, event: &PopstateEvent, host: &mut HostContext<'_>) -> PopstateOutcome {
        let _ = (event, host);
        PopstateOutcome::Continue
    }

    fn on_deferred(&mut self, task: DeferredTask, host: &mut HostContext<'_>) {
        let _ = (task, host);
    }

    /// Drains pending background work. Returns whether anything changed.
    fn on_background(&mut self, host: &mut HostContext<'_>) -> bool {
        let _ = host;
        false
    }
}
