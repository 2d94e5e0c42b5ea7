use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::history::HistoryStateCodec;
use crate::host::{Browser, ModalView};
use crate::request::{Payload, RequestId};

use super::browser::{HistoryEntry, SessionHistory};
use super::page::{Page, PageEvent, Response};
use super::view::ViewCall;

/// A scripted session replayed against a headless page.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_href")]
    pub href: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_snippet_cache")]
    pub snippet_cache: bool,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_href() -> String {
    "https://app.test/".to_string()
}

fn default_snippet_cache() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Click on the element given as markup.
    Click { element: String },
    /// Answer a request; the latest in-flight one when `request` is absent.
    Respond {
        request: Option<u64>,
        #[serde(default)]
        payload: Value,
        title: Option<String>,
    },
    Abort { request: Option<u64> },
    /// Close the modal from its own close control.
    Hide,
    Back,
    Forward,
    Reload,
    /// Run queued work until the page is idle.
    Settle,
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub entries: Vec<HistoryEntry>,
    pub index: usize,
    pub title: String,
    pub modal_shown: bool,
    pub back_calls: usize,
    pub reloads: usize,
    pub view_calls: Vec<ViewCall>,
    pub events: Vec<PageEvent>,
}

impl Scenario {
    pub fn from_toml(raw: &str) -> AppResult<Self> {
        toml::from_str(raw)
            .map_err(|source| AppError::invalid_argument(format!("invalid scenario: {source}")))
    }

    pub fn run(&self, config: &Config) -> AppResult<ReplayReport> {
        let browser = SessionHistory::new(self.href.clone(), self.title.clone());
        let mut page = Page::load(config.clone(), browser, self.snippet_cache);

        for (index, step) in self.steps.iter().enumerate() {
            let step_no = index + 1;
            match step {
                Step::Click { element } => {
                    let element = HistoryStateCodec::parse_markup(element);
                    if element.is_empty() {
                        return Err(AppError::scenario(step_no, "click target has no element"));
                    }
                    page.click(&element);
                }
                Step::Respond {
                    request,
                    payload,
                    title,
                } => {
                    let id = resolve_request(&page, *request, step_no)?;
                    let payload = if payload.is_null() {
                        Payload::default()
                    } else {
                        serde_json::from_value(payload.clone())
                            .map_err(|err| AppError::scenario(step_no, err.to_string()))?
                    };
                    let mut response = Response::new(payload);
                    if let Some(title) = title {
                        response = response.titled(title.clone());
                    }
                    page.respond(id, response)
                        .map_err(|err| AppError::scenario(step_no, err.to_string()))?;
                }
                Step::Abort { request } => {
                    let id = resolve_request(&page, *request, step_no)?;
                    page.abort(id)
                        .map_err(|err| AppError::scenario(step_no, err.to_string()))?;
                }
                Step::Hide => page.close_modal(None),
                Step::Back => {
                    page.back();
                }
                Step::Forward => {
                    page.forward();
                }
                Step::Reload => page.reload(),
                Step::Settle => {}
            }
            page.run_until_idle();
        }

        Ok(ReplayReport {
            entries: page.browser().entries().to_vec(),
            index: page.browser().index(),
            title: page.browser().title(),
            modal_shown: page.view().is_shown(),
            back_calls: page.browser().back_calls(),
            reloads: page.reloads(),
            view_calls: page.view().calls().to_vec(),
            events: page.events().to_vec(),
        })
    }
}

fn resolve_request(page: &Page, request: Option<u64>, step: usize) -> AppResult<RequestId> {
    match request {
        Some(id) => Ok(RequestId(id)),
        None => page
            .latest_request()
            .ok_or_else(|| AppError::scenario(step, "no request in flight")),
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "history:")?;
        for (i, entry) in self.entries.iter().enumerate() {
            let marker = if i == self.index { '>' } else { ' ' };
            let modal = HistoryStateCodec::read(entry.state.as_ref())
                .is_some_and(|state| state.is_modal());
            let tag = if modal { " [modal]" } else { "" };
            writeln!(f, "{marker} {i:2}  {}  {}{tag}", entry.href, entry.title)?;
        }
        writeln!(
            f,
            "title: {}  modal: {}  back(): {}  reloads: {}",
            self.title,
            if self.modal_shown { "shown" } else { "hidden" },
            self.back_calls,
            self.reloads
        )?;
        writeln!(f, "pipeline:")?;
        for event in &self.events {
            writeln!(f, "  {event:?}")?;
        }
        writeln!(f, "view:")?;
        for call in &self.view_calls {
            writeln!(f, "  {call:?}")?;
        }
        Ok(())
    }
}
