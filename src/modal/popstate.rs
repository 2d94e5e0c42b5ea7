use crate::extension::{PopstateEvent, PopstateOutcome};
use crate::history::{HistoryStateCodec, NavigationState};
use crate::host::{DeferredTask, HostContext, Trigger};

use super::controller::ModalController;

impl ModalController {
    /// Reacts to back/forward navigation.
    ///
    /// While chasing, every event is consumed: another `back()` is issued
    /// while a modal entry is still on top, otherwise the chase ends. Outside
    /// a chase the modal is re-shown for modal entries and closed (or the
    /// page reloaded) for the rest.
    pub fn reconcile_popstate(
        &mut self,
        event: &PopstateEvent,
        host: &mut HostContext<'_>,
    ) -> PopstateOutcome {
        let target = HistoryStateCodec::read(event.state.as_ref())
            .or_else(|| self.state.initial_state.clone());
        let Some(target) = target else {
            tracing::debug!("popstate without a usable state");
            return PopstateOutcome::Continue;
        };

        self.state.prevent_next_fetch = false;

        let outcome = if self.state.chasing_back {
            if target.is_modal() && !self.is_initial_state(&target) {
                tracing::debug!(cursor = target.cursor, "modal entry still on top, going back");
                host.browser.back();
                return PopstateOutcome::Stopped;
            }

            self.state.chasing_back = false;
            if !target.title.is_empty() {
                host.browser.set_title(&target.title);
            }
            if self.is_initial_state(&target) {
                tracing::debug!("reached the entry the page was loaded into");
                return PopstateOutcome::Stopped;
            }
            tracing::debug!(cursor = target.cursor, "left the modal entries");
            PopstateOutcome::Stopped
        } else {
            PopstateOutcome::Continue
        };

        if target.is_modal() && !self.initial_is_modal() {
            self.reenter(&target, host);
        } else {
            self.leave(host);
        }
        outcome
    }

    fn is_initial_state(&self, target: &NavigationState) -> bool {
        self.state
            .initial_state
            .as_ref()
            .is_some_and(|initial| initial.is_refreshed_modal() && initial.same_page_as(target))
    }

    fn reenter(&mut self, target: &NavigationState, host: &mut HostContext<'_>) {
        let Some(modal) = &target.modal else {
            return;
        };
        tracing::debug!(cursor = target.cursor, "re-entering modal entry");

        self.state.history_tracking_enabled = true;
        self.state.current_options = modal.options.clone();

        let opener = HistoryStateCodec::decode(modal);
        host.view.show(&opener, &modal.options, Trigger::Popstate);

        if target.snippet_cache_enabled() {
            host.view.set_options(&modal.options);
            host.scheduler.defer(DeferredTask::DispatchLoad);
        } else {
            self.state.restore_request_pending = true;
        }
    }

    fn leave(&mut self, host: &mut HostContext<'_>) {
        self.state.history_tracking_enabled = false;

        if self.initial_is_modal() {
            tracing::debug!("page was loaded inside a modal, reloading");
            host.browser.reload();
            return;
        }

        if host.view.is_shown() {
            host.view.hide(Trigger::Popstate);
            self.state.prevent_next_fetch = true;
        }
    }
}
