use serde_json::json;

use super::{DETAIL, LIST, modal_opener, ok, open_modal, page, parse, respond, same_element, uncached_page};
use crate::config::Config;
use crate::extension::{PopstateEvent, PopstateOutcome};
use crate::history::{HistoryStateCodec, NavigationState};
use crate::host::{HostContext, ModalView, Trigger};
use crate::modal::{ModalController, ModalOptions, ModalSize, Phase};
use crate::sim::{PageEvent, RecordingModal, SessionHistory, TaskQueue, ViewCall};

fn reopen_calls(calls: &[ViewCall]) -> Vec<&ViewCall> {
    calls
        .iter()
        .filter(|call| {
            matches!(
                call,
                ViewCall::Show {
                    trigger: Trigger::Popstate,
                    ..
                }
            )
        })
        .collect()
}

#[test]
fn forward_reopens_with_the_stored_opener_and_options() {
    let mut page = page();
    let opener = modal_opener(DETAIL)
        .with_attr("data-naja-modal-size", "lg")
        .with_attr("data-naja-modal-title", "Detail");
    open_modal(&mut page, &opener, "Detail");
    page.close_modal(None);
    page.run_until_idle();
    assert_eq!(page.browser().index(), 0);

    assert!(page.forward());
    page.run_until_idle();

    assert!(page.view().is_shown());
    let expected = ModalOptions {
        size: ModalSize::Large,
        title: Some("Detail".to_string()),
        ..ModalOptions::default()
    };
    let reopened = reopen_calls(page.view().calls());
    let [ViewCall::Show {
        opener: shown,
        options,
        ..
    }] = reopened.as_slice()
    else {
        panic!("expected a single popstate show, got {reopened:?}");
    };
    assert!(same_element(&parse(shown), &opener));
    assert_eq!(*options, expected);
    assert!(
        page.events()
            .contains(&PageEvent::RestoredFromCache { href: DETAIL.to_string() })
    );
    assert_eq!(
        page.view().calls().last(),
        Some(&ViewCall::DispatchLoad {
            options: expected,
            trigger: Trigger::Popstate,
        })
    );
    assert!(page.controller().state().history_tracking_enabled);
}

#[test]
fn reopened_modal_walks_back_again_when_hidden() {
    let mut page = page();
    open_modal(&mut page, &modal_opener(DETAIL), "Detail");
    page.close_modal(None);
    page.run_until_idle();
    page.forward();
    page.run_until_idle();

    page.close_modal(None);
    page.run_until_idle();

    assert_eq!(page.browser().back_calls(), 2);
    assert_eq!(page.browser().index(), 0);
    assert_eq!(page.controller().phase(), Phase::Idle);
    assert!(!page.view().is_shown());
}

#[test]
fn uncached_entry_is_refetched_as_a_modal_request() {
    let mut page = uncached_page();
    let opener = modal_opener(DETAIL).with_attr("data-naja-modal-size", "sm");
    open_modal(&mut page, &opener, "Detail");
    page.close_modal(None);
    page.run_until_idle();

    assert!(page.forward());
    page.run_until_idle();

    assert!(page.controller().state().restore_request_pending);
    let id = page.latest_request().expect("restoring request in flight");
    assert_eq!(page.request_header(id, "Pd-Modal-Opened").as_deref(), Some("1"));
    assert_eq!(
        page.view()
            .count(|call| matches!(call, ViewCall::DispatchLoad { trigger: Trigger::Popstate, .. })),
        0
    );

    respond(&mut page, id, ok());

    let small = ModalOptions {
        size: ModalSize::Small,
        ..ModalOptions::default()
    };
    assert!(!page.controller().state().restore_request_pending);
    assert_eq!(
        page.view().calls().last(),
        Some(&ViewCall::DispatchLoad {
            options: small,
            trigger: Trigger::Popstate,
        })
    );
    assert_eq!(page.browser().entries().len(), 2);
}

#[test]
fn deferred_load_is_skipped_once_the_modal_is_gone() {
    let mut page = page();
    open_modal(&mut page, &modal_opener(DETAIL), "Detail");
    page.close_modal(None);
    page.run_until_idle();
    page.forward();
    assert!(page.tick());

    page.close_modal(None);
    page.run_until_idle();

    assert!(!page.view().is_shown());
    assert_eq!(
        page.view()
            .count(|call| matches!(call, ViewCall::DispatchLoad { trigger: Trigger::Popstate, .. })),
        0
    );
}

struct Harness {
    view: RecordingModal,
    browser: SessionHistory,
    tasks: TaskQueue,
}

impl Harness {
    fn new() -> Self {
        Self {
            view: RecordingModal::new(Config::default().attributes),
            browser: SessionHistory::new(LIST, "List"),
            tasks: TaskQueue::default(),
        }
    }

    fn controller(&mut self) -> ModalController {
        ModalController::new(&Config::default(), &mut self.host())
    }

    fn host(&mut self) -> HostContext<'_> {
        HostContext {
            view: &mut self.view,
            browser: &mut self.browser,
            scheduler: &mut self.tasks,
        }
    }
}

#[test]
fn popstate_without_state_is_left_to_the_pipeline() {
    let mut harness = Harness::new();
    let mut controller = harness.controller();

    let outcome = controller.reconcile_popstate(&PopstateEvent { state: None }, &mut harness.host());

    assert_eq!(outcome, PopstateOutcome::Continue);
    assert!(harness.view.calls().is_empty());
    assert!(harness.tasks.is_empty());
}

#[test]
fn foreign_state_is_ignored() {
    let mut harness = Harness::new();
    let mut controller = harness.controller();

    let event = PopstateEvent {
        state: Some(json!(["not", "a", "navigation", "state"])),
    };
    let outcome = controller.reconcile_popstate(&event, &mut harness.host());

    assert_eq!(outcome, PopstateOutcome::Continue);
    assert!(harness.view.calls().is_empty());
}

#[test]
fn unparsable_opener_leaves_the_modal_closed() {
    let mut harness = Harness::new();
    let mut controller = harness.controller();

    let mut state = NavigationState::new(DETAIL, "Detail", 1);
    state.modal = Some(HistoryStateCodec::encode(
        &crate::dom::Element::empty(),
        &ModalOptions::default(),
    ));
    let record = HistoryStateCodec::to_record(&state).expect("state serializes");

    let outcome = controller.reconcile_popstate(&PopstateEvent { state: Some(record) }, &mut harness.host());

    assert_eq!(outcome, PopstateOutcome::Continue);
    assert!(!harness.view.is_shown());
    assert!(matches!(
        harness.view.calls().first(),
        Some(ViewCall::Show { trigger: Trigger::Popstate, .. })
    ));
    assert!(controller.state().history_tracking_enabled);
}
