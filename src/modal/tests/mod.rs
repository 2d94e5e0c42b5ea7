mod lifecycle;
mod reentry;

use crate::config::Config;
use crate::dom::Element;
use crate::history::HistoryStateCodec;
use crate::request::{Payload, RequestId};
use crate::sim::{Page, Response, SessionHistory, ViewCall};

const LIST: &str = "https://app.test/list";
const DETAIL: &str = "https://app.test/detail";

fn page() -> Page {
    Page::load(Config::default(), SessionHistory::new(LIST, "List"), true)
}

fn uncached_page() -> Page {
    Page::load(Config::default(), SessionHistory::new(LIST, "List"), false)
}

fn modal_opener(href: &str) -> Element {
    Element::new("a")
        .with_attr("href", href)
        .with_attr("data-naja-modal", "")
        .with_inner_html("Open")
}

fn link(href: &str) -> Element {
    Element::new("a").with_attr("href", href).with_inner_html("Go")
}

fn ok() -> Response {
    Response::new(Payload::default())
}

fn close() -> Response {
    Response::new(Payload {
        close_modal: true,
        ..Payload::default()
    })
}

fn respond(page: &mut Page, id: RequestId, response: Response) {
    page.respond(id, response).expect("request should be in flight");
    page.run_until_idle();
}

fn open_modal(page: &mut Page, opener: &Element, title: &str) -> RequestId {
    let id = page.click(opener);
    respond(page, id, ok().titled(title));
    id
}

fn navigate(page: &mut Page, href: &str, title: &str) -> RequestId {
    let id = page.click(&link(href));
    respond(page, id, ok().titled(title));
    id
}

fn shows(page: &Page) -> usize {
    page.view()
        .count(|call| matches!(call, ViewCall::Show { .. }))
}

fn same_element(left: &Element, right: &Element) -> bool {
    let mut left_attrs: Vec<_> = left.attributes().collect();
    let mut right_attrs: Vec<_> = right.attributes().collect();
    left_attrs.sort();
    right_attrs.sort();
    left.tag() == right.tag() && left.inner_html() == right.inner_html() && left_attrs == right_attrs
}

fn parse(markup: &str) -> Element {
    HistoryStateCodec::parse_markup(markup)
}
