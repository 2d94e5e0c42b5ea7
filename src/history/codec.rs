use scraper::{ElementRef, Html};
use serde::Deserialize;
use serde_json::Value;

use crate::dom::Element;
use crate::error::{AppError, AppResult};
use crate::modal::ModalOptions;

use super::state::{ModalStateInfo, NavigationState};

/// Converts between live pipeline values and the plain data stored in
/// session history.
pub struct HistoryStateCodec;

impl HistoryStateCodec {
    pub fn encode(opener: &Element, options: &ModalOptions) -> ModalStateInfo {
        ModalStateInfo {
            opener: opener.outer_html(),
            options: options.clone(),
            refreshed: false,
        }
    }

    /// Parses the stored opener markup into a detached element.
    ///
    /// Parsing is inert: scripts are never run. Empty or malformed markup
    /// yields `Element::empty()`.
    pub fn decode(info: &ModalStateInfo) -> Element {
        Self::parse_markup(&info.opener)
    }

    pub fn parse_markup(markup: &str) -> Element {
        let markup = markup.trim();
        if markup.is_empty() {
            return Element::empty();
        }

        let fragment = Html::parse_fragment(markup);
        let Some(first) = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
        else {
            tracing::debug!(markup, "opener markup has no element");
            return Element::empty();
        };

        let node = first.value();
        let mut element = Element::new(node.name()).with_inner_html(first.inner_html());
        for (name, value) in node.attrs() {
            element.set_attr(name, value);
        }
        element
    }

    pub fn to_record(state: &NavigationState) -> AppResult<Value> {
        serde_json::to_value(state)
            .map_err(|source| AppError::serialization("history record", source))
    }

    pub fn from_record(record: &Value) -> AppResult<NavigationState> {
        if !record.is_object() {
            return Err(AppError::invalid_argument("history record is not an object"));
        }
        NavigationState::deserialize(record)
            .map_err(|source| AppError::serialization("history record", source))
    }

    /// Reads an optional record, treating malformed data as absent.
    pub fn read(record: Option<&Value>) -> Option<NavigationState> {
        let record = record?;
        if record.is_null() {
            return None;
        }
        match Self::from_record(record) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(%err, "ignoring history record");
                None
            }
        }
    }
}
