use super::{
    DETAIL, LIST, close, link, modal_opener, navigate, ok, open_modal, page, parse, respond,
    same_element, shows,
};
use crate::dom::Element;
use crate::host::{ModalView, Trigger};
use crate::modal::Phase;
use crate::request::{Payload, RequestId};
use crate::sim::{Response, ViewCall};

#[test]
fn modal_opens_before_the_response_arrives() {
    let mut page = page();
    let opener = modal_opener(DETAIL);

    let id = page.click(&opener);

    assert!(page.view().is_shown());
    assert_eq!(page.request_header(id, "Pd-Modal-Opened").as_deref(), Some("1"));
    assert_eq!(page.request_header(id, "Pd-Modal-Prevent-Redraw"), None);
    let ViewCall::Show {
        opener: shown,
        trigger,
        ..
    } = &page.view().calls()[0]
    else {
        panic!("first view call should be a show");
    };
    assert!(same_element(&parse(shown), &opener));
    assert_eq!(*trigger, Trigger::Request(id));
}

#[test]
fn plain_request_asks_server_not_to_redraw_the_modal() {
    let mut page = page();

    let id = page.click(&link("https://app.test/other"));

    assert!(!page.view().is_shown());
    assert_eq!(page.request_header(id, "Pd-Modal-Opened").as_deref(), Some("0"));
    assert_eq!(
        page.request_header(id, "Pd-Modal-Prevent-Redraw").as_deref(),
        Some("1")
    );
    assert_eq!(shows(&page), 0);
}

#[test]
fn opt_in_on_the_form_makes_a_submit_modal() {
    let mut page = page();
    let form = Element::new("form")
        .with_attr("action", DETAIL)
        .with_attr("data-naja-modal", "");
    let submit = Element::new("button").with_form(form);

    let id = page.click(&submit);

    assert!(page.view().is_shown());
    assert_eq!(page.in_flight(), vec![id]);
    assert_eq!(page.events().len(), 1);
}

#[test]
fn prevent_redraw_element_stays_out_of_the_modal() {
    let mut page = page();
    open_modal(&mut page, &modal_opener(DETAIL), "Detail");
    let shows_before = shows(&page);

    let refresh = link("https://app.test/flashes").with_attr("data-naja-modal-prevent-redraw", "");
    let id = page.click(&refresh);

    assert_eq!(page.request_header(id, "Pd-Modal-Opened").as_deref(), Some("1"));
    assert_eq!(
        page.request_header(id, "Pd-Modal-Prevent-Redraw").as_deref(),
        Some("1")
    );
    assert_eq!(shows(&page), shows_before);

    respond(&mut page, id, ok());
    assert!(!page.current_state().expect("state").is_modal());
}

#[test]
fn modal_entries_carry_opener_options_and_title() {
    let mut page = page();
    let opener = modal_opener(DETAIL).with_attr("data-naja-modal-size", "lg");
    open_modal(&mut page, &opener, "Detail");

    let state = page.current_state().expect("modal entry");
    assert_eq!(state.cursor, 1);
    assert_eq!(state.title, "Detail");
    let modal = state.modal.expect("entry is marked modal");
    assert!(!modal.refreshed);
    assert!(same_element(&parse(&modal.opener), &opener));
    assert_eq!(modal.options, page.view().options_for(&opener));

    let below = &page.browser().entries()[0];
    assert_eq!(below.href, LIST);
    assert!(page.controller().state().history_tracking_enabled);
}

#[test]
fn successful_response_pushes_options_and_dispatches_load() {
    let mut page = page();
    let opener = modal_opener(DETAIL).with_attr("data-naja-modal-title", "Detail");
    let id = open_modal(&mut page, &opener, "Detail");

    let options = page.view().options_for(&opener);
    let calls = page.view().calls();
    assert_eq!(calls[calls.len() - 2], ViewCall::SetOptions(options.clone()));
    assert_eq!(
        calls[calls.len() - 1],
        ViewCall::DispatchLoad {
            options,
            trigger: Trigger::Request(id),
        }
    );
}

#[test]
fn close_payload_hides_and_walks_back_once() {
    let mut page = page();
    let id = page.click(&modal_opener(DETAIL));
    assert!(page.view().is_shown());

    respond(&mut page, id, close());

    assert!(page.view().calls().contains(&ViewCall::Hide {
        trigger: Trigger::Request(id)
    }));
    assert_eq!(page.browser().back_calls(), 1);
    assert_eq!(page.browser().index(), 0);
    assert_eq!(page.controller().phase(), Phase::Idle);
    assert!(!page.view().is_shown());
    assert_eq!(shows(&page), 1);
}

#[test]
fn closing_returns_to_the_entry_below_the_modal_for_any_depth() {
    for depth in 0..4 {
        let mut page = page();
        navigate(&mut page, "https://app.test/list?page=2", "List 2");
        open_modal(&mut page, &modal_opener(DETAIL), "Detail");
        for step in 0..depth {
            navigate(&mut page, &format!("{DETAIL}?step={step}"), "Detail step");
        }
        assert_eq!(page.browser().index(), 2 + depth);

        page.close_modal(None);
        page.run_until_idle();

        assert_eq!(page.browser().index(), 1, "depth {depth}");
        assert_eq!(page.browser().back_calls(), depth + 1, "depth {depth}");
        assert_eq!(page.controller().phase(), Phase::Idle);
        assert!(!page.view().is_shown());
        assert!(!page.controller().state().history_tracking_enabled);
    }
}

#[test]
fn chase_restores_title_of_the_entry_below() {
    let mut page = page();
    open_modal(&mut page, &modal_opener(DETAIL), "Detail");

    page.close_modal(None);
    page.run_until_idle();

    assert_eq!(crate::host::Browser::title(page.browser()), "List");
}

#[test]
fn force_redirected_entry_is_not_marked_modal() {
    let mut page = page();
    let id = page.click(&modal_opener(DETAIL));

    let redirect = Response::new(Payload {
        force_redirect: Some("https://app.test/done".to_string()),
        ..Payload::default()
    });
    respond(&mut page, id, redirect);

    assert!(!page.current_state().expect("state").is_modal());
}

#[test]
fn modal_without_history_closes_without_walking_back() {
    let mut page = page();
    let opener = modal_opener(DETAIL).with_attr("data-naja-history", "off");
    open_modal(&mut page, &opener, "Detail");

    assert_eq!(page.browser().entries().len(), 1);
    assert!(page.view().calls().contains(&ViewCall::DisableNestedHistory));

    page.close_modal(None);
    page.run_until_idle();

    assert_eq!(page.browser().back_calls(), 0);
    assert!(!page.view().is_shown());
}

#[test]
fn plain_navigation_does_not_make_a_later_untracked_modal_walk_back() {
    let mut page = page();
    navigate(&mut page, "https://app.test/list?page=2", "List 2");
    assert!(!page.controller().state().history_tracking_enabled);

    let opener = modal_opener(DETAIL).with_attr("data-naja-history", "off");
    open_modal(&mut page, &opener, "Detail");
    page.close_modal(None);
    page.run_until_idle();

    assert_eq!(page.browser().back_calls(), 0);
    assert_eq!(page.browser().index(), 1);
    assert!(!page.view().is_shown());
}

#[test]
fn hiding_releases_snippets_that_are_not_reserved() {
    let mut page = page().with_snippets(
        &["snippet-content", "snippet-modal-title", "modal-root"],
        &["snippet-modal-title"],
    );
    open_modal(&mut page, &modal_opener(DETAIL), "Detail");

    page.close_modal(None);
    page.run_until_idle();

    assert_eq!(
        page.view().snippet_ids_in_modal(),
        ["snippet-modal-title".to_string(), "modal-root".to_string()]
    );
    assert_eq!(
        page.view()
            .count(|call| matches!(call, ViewCall::ReleaseSnippet(_))),
        1
    );
}

#[test]
fn request_ids_are_sequential() {
    let mut page = page();
    let first = page.click(&link("https://app.test/a"));
    let second = page.click(&link("https://app.test/b"));
    assert_eq!((first, second), (RequestId(1), RequestId(2)));
}
