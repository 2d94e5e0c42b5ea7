use crate::dom::Element;
use crate::request::{AbortController, Request, RequestId};

#[derive(Debug)]
struct TrackedRequest {
    id: RequestId,
    abort: AbortController,
}

/// Keeps at most one live modal request per controller.
#[derive(Debug, Default)]
pub struct RequestCoordinator {
    slot: Option<TrackedRequest>,
}

impl RequestCoordinator {
    pub fn in_flight(&self) -> Option<RequestId> {
        self.slot.as_ref().map(|tracked| tracked.id)
    }

    /// Tracks a starting modal request, aborting the one it supersedes.
    pub fn on_request_start(&mut self, request: &Request, is_modal: bool) {
        if !is_modal {
            return;
        }

        if let Some(previous) = self.slot.take()
            && previous.id != request.id
        {
            tracing::debug!(
                superseded = previous.id.0,
                by = request.id.0,
                "aborting superseded modal request"
            );
            previous.abort.abort();
        }

        self.slot = Some(TrackedRequest {
            id: request.id,
            abort: request.abort_controller().clone(),
        });
    }

    /// Clears the slot when the tracked request finishes, aborted or not.
    pub fn on_request_complete(&mut self, request: &Request) {
        if self.in_flight() == Some(request.id) {
            self.slot = None;
        }
    }

    /// Aborts the tracked request unless the opener (or its form) sets the
    /// abort attribute to `off`. Returns whether a request was aborted.
    pub fn on_modal_about_to_hide(&mut self, opener: Option<&Element>, abort_attr: &str) -> bool {
        let abortable = opener
            .and_then(|opener| opener.attr_or_form(abort_attr))
            .is_none_or(|value| value != "off");
        if !abortable {
            return false;
        }

        let Some(tracked) = self.slot.take() else {
            return false;
        };
        tracing::debug!(request = tracked.id.0, "aborting modal request on hide");
        tracked.abort.abort();
        true
    }
}
