use crate::config::Config;
use crate::dom::Element;
use crate::error::{AppError, AppResult};
use crate::extension::{
    BeforeEvent, BuildStateEvent, CompleteEvent, ExtensionHost, FetchEvent, InteractionEvent,
    PopstateEvent, PopstateOutcome, StartEvent, SuccessEvent,
};
use crate::history::{HistoryStateCodec, NavigationState, SnippetCacheRef, SnippetStorage};
use crate::host::{Browser, HostContext};
use crate::modal::ModalController;
use crate::request::{HistoryMode, Payload, Request, RequestId, RequestOptions};

use super::browser::SessionHistory;
use super::scheduler::TaskQueue;
use super::view::RecordingModal;

const MAX_SIGNAL_ROUNDS: usize = 16;

/// Something the emulated pipeline did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Requested { id: RequestId, url: String },
    Completed { id: RequestId, aborted: bool },
    RestoredFromCache { href: String },
    FetchPrevented { href: String },
    PopstateStopped { href: String },
    Reloaded { href: String },
}

#[derive(Debug, Clone, Default)]
pub struct Response {
    pub payload: Payload,
    pub title: Option<String>,
}

impl Response {
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            title: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

struct InFlight {
    request: Request,
    options: RequestOptions,
}

/// A page driven by an emulated request pipeline: interaction, request
/// lifecycle, history persistence, popstate restoration and reloads.
pub struct Page {
    config: Config,
    browser: SessionHistory,
    view: RecordingModal,
    tasks: TaskQueue,
    extensions: ExtensionHost,
    snippet_cache: bool,
    next_request: u64,
    cursor: u64,
    in_flight: Vec<InFlight>,
    events: Vec<PageEvent>,
    reloads: usize,
}

macro_rules! with_host {
    ($page:ident, |$ext:ident, $host:ident| $body:expr) => {{
        let mut $host = HostContext {
            view: &mut $page.view,
            browser: &mut $page.browser,
            scheduler: &mut $page.tasks,
        };
        let $ext = &mut $page.extensions;
        $body
    }};
}

impl Page {
    pub fn load(config: Config, browser: SessionHistory, snippet_cache: bool) -> Self {
        let mut browser = browser;
        browser.unload();
        let mut view = RecordingModal::new(config.attributes.clone());
        let mut tasks = TaskQueue::default();

        if let Some(modal) =
            HistoryStateCodec::read(browser.state().as_ref()).and_then(|state| state.modal)
        {
            view.render_open(HistoryStateCodec::decode(&modal));
        }

        let extensions = {
            let mut host = HostContext {
                view: &mut view,
                browser: &mut browser,
                scheduler: &mut tasks,
            };
            ExtensionHost::new(&config, &mut host)
        };

        let mut page = Self {
            config,
            browser,
            view,
            tasks,
            extensions,
            snippet_cache,
            next_request: 0,
            cursor: 0,
            in_flight: Vec::new(),
            events: Vec::new(),
            reloads: 0,
        };
        page.replace_initial_state();
        page
    }

    pub fn browser(&self) -> &SessionHistory {
        &self.browser
    }

    pub fn view(&self) -> &RecordingModal {
        &self.view
    }

    pub fn controller(&self) -> &ModalController {
        self.extensions.modal()
    }

    pub fn events(&self) -> &[PageEvent] {
        &self.events
    }

    pub fn reloads(&self) -> usize {
        self.reloads
    }

    pub fn current_state(&self) -> Option<NavigationState> {
        HistoryStateCodec::read(self.browser.state().as_ref())
    }

    pub fn in_flight(&self) -> Vec<RequestId> {
        self.in_flight.iter().map(|f| f.request.id).collect()
    }

    pub fn is_aborted(&self, id: RequestId) -> Option<bool> {
        self.in_flight
            .iter()
            .find(|f| f.request.id == id)
            .map(|f| f.request.is_aborted())
    }

    pub fn with_snippets(mut self, ids: &[&str], reserved: &[&str]) -> Self {
        self.view.set_snippets(ids, reserved);
        self
    }

    /// Click or submit on `element`. Returns the started request.
    pub fn click(&mut self, element: &Element) -> RequestId {
        let mut options = RequestOptions {
            history: HistoryMode::from_attr(element.attr_or_form(&self.config.attributes.history)),
            ..RequestOptions::default()
        };
        with_host!(self, |ext, host| ext.handle_interaction(
            &mut InteractionEvent {
                element,
                options: &mut options,
            },
            &mut host
        ));
        self.pump();

        let url = element
            .attr("href")
            .or_else(|| element.form().and_then(|form| form.attr("action")))
            .map(str::to_string)
            .unwrap_or_else(|| self.browser.href().to_string());
        self.dispatch(url, options)
    }

    pub fn dispatch(&mut self, url: String, options: RequestOptions) -> RequestId {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        let mut request = Request::new(id, url.clone());

        with_host!(self, |ext, host| ext.handle_before(
            &mut BeforeEvent {
                request: &mut request,
                options: &options,
            },
            &mut host
        ));
        self.pump();
        with_host!(self, |ext, host| ext.handle_start(
            &StartEvent {
                request: &request,
                options: &options,
            },
            &mut host
        ));
        self.pump();

        self.events.push(PageEvent::Requested { id, url });
        self.in_flight.push(InFlight { request, options });
        id
    }

    /// Headers sent with an in-flight request.
    pub fn request_header(&self, id: RequestId, name: &str) -> Option<String> {
        self.in_flight
            .iter()
            .find(|f| f.request.id == id)
            .and_then(|f| f.request.headers.get(name).map(str::to_string))
    }

    pub fn latest_request(&self) -> Option<RequestId> {
        self.in_flight.last().map(|f| f.request.id)
    }

    pub fn respond(&mut self, id: RequestId, response: Response) -> AppResult<()> {
        let index = self
            .in_flight
            .iter()
            .position(|f| f.request.id == id)
            .ok_or_else(|| AppError::invalid_argument(format!("no request {} in flight", id.0)))?;
        let InFlight {
            request,
            mut options,
        } = self.in_flight.remove(index);

        if request.is_aborted() {
            self.complete(&request, &options);
            return Ok(());
        }

        if response.payload.force_redirect.is_some() {
            options.force_redirect = true;
        }
        if let Some(title) = &response.title {
            self.browser.set_title(title);
        }
        if options.history.is_enabled() {
            self.persist_history(&request.url, &options);
        }

        with_host!(self, |ext, host| ext.handle_success(
            &SuccessEvent {
                request: &request,
                payload: &response.payload,
                options: &options,
            },
            &mut host
        ));
        self.pump();
        self.complete(&request, &options);
        Ok(())
    }

    /// Aborts from outside, e.g. the user pressing stop.
    pub fn abort(&mut self, id: RequestId) -> AppResult<()> {
        let in_flight = self
            .in_flight
            .iter()
            .find(|f| f.request.id == id)
            .ok_or_else(|| AppError::invalid_argument(format!("no request {} in flight", id.0)))?;
        in_flight.request.abort_controller().abort();
        Ok(())
    }

    /// The user closes the modal from inside it.
    pub fn close_modal(&mut self, element: Option<Element>) {
        self.view.close_from(element);
        self.pump();
    }

    pub fn back(&mut self) -> bool {
        self.browser.go(-1)
    }

    pub fn forward(&mut self) -> bool {
        self.browser.go(1)
    }

    pub fn reload(&mut self) {
        self.browser.reload();
    }

    /// Runs one unit of queued work. Returns false when nothing was queued.
    pub fn tick(&mut self) -> bool {
        if self.browser.take_reload() {
            self.reload_in_place();
            return true;
        }
        if let Some(task) = self.tasks.pop() {
            with_host!(self, |ext, host| ext.handle_deferred(task, &mut host));
            self.pump();
            return true;
        }
        if let Some(event) = self.browser.take_popstate() {
            self.deliver_popstate(event);
            return true;
        }
        if let Some(index) = self.in_flight.iter().position(|f| f.request.is_aborted()) {
            let InFlight { request, options } = self.in_flight.remove(index);
            self.complete(&request, &options);
            return true;
        }
        false
    }

    pub fn run_until_idle(&mut self) -> usize {
        let mut ticks = 0;
        while ticks < self.config.replay.max_ticks && self.tick() {
            ticks += 1;
        }
        ticks
    }

    fn complete(&mut self, request: &Request, options: &RequestOptions) {
        with_host!(self, |ext, host| ext.handle_complete(
            &CompleteEvent { request, options },
            &mut host
        ));
        self.pump();
        self.events.push(PageEvent::Completed {
            id: request.id,
            aborted: request.is_aborted(),
        });
    }

    fn snippet_ref(&self) -> SnippetCacheRef {
        let storage = if self.snippet_cache {
            SnippetStorage::History
        } else {
            SnippetStorage::Off
        };
        SnippetCacheRef { storage, key: None }
    }

    fn replace_initial_state(&mut self) {
        self.cursor = 0;
        let mut state = NavigationState {
            snippets: Some(self.snippet_ref()),
            ..NavigationState::new(self.browser.href(), self.browser.title(), 0)
        };
        let options = RequestOptions::default();
        with_host!(self, |ext, host| ext.handle_build_state(
            &mut BuildStateEvent {
                state: &mut state,
                options: &options,
                initial_replace: true,
            },
            &mut host
        ));
        self.store_state(&state, true);
    }

    fn persist_history(&mut self, url: &str, options: &RequestOptions) {
        let replace = options.history == HistoryMode::Replace;
        if !replace {
            self.cursor += 1;
        }
        let mut state = NavigationState {
            snippets: Some(self.snippet_ref()),
            ..NavigationState::new(url, String::new(), self.cursor)
        };
        with_host!(self, |ext, host| ext.handle_build_state(
            &mut BuildStateEvent {
                state: &mut state,
                options,
                initial_replace: false,
            },
            &mut host
        ));
        self.store_state(&state, replace);
    }

    fn store_state(&mut self, state: &NavigationState, replace: bool) {
        let record = match HistoryStateCodec::to_record(state) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(%err, "dropping history entry");
                return;
            }
        };
        if replace {
            self.browser.replace_state(record, &state.title, &state.href);
        } else {
            self.browser.push_state(record, &state.title, &state.href);
        }
    }

    fn deliver_popstate(&mut self, event: PopstateEvent) {
        let outcome = with_host!(self, |ext, host| ext.handle_popstate(&event, &mut host));
        self.pump();
        if outcome == PopstateOutcome::Stopped {
            self.events.push(PageEvent::PopstateStopped {
                href: self.browser.href().to_string(),
            });
            return;
        }

        let Some(state) = HistoryStateCodec::read(event.state.as_ref()) else {
            return;
        };
        if !state.title.is_empty() {
            self.browser.set_title(&state.title);
        }
        if state.snippet_cache_enabled() {
            self.events.push(PageEvent::RestoredFromCache {
                href: state.href.clone(),
            });
            return;
        }

        let mut options = RequestOptions {
            history: HistoryMode::Off,
            ..RequestOptions::default()
        };
        let mut fetch = FetchEvent::new(&state, &mut options);
        with_host!(self, |ext, host| ext.handle_fetch(&mut fetch, &mut host));
        let prevented = fetch.is_prevented();
        self.pump();

        if prevented {
            self.events.push(PageEvent::FetchPrevented { href: state.href });
        } else {
            self.dispatch(state.href, options);
        }
    }

    fn reload_in_place(&mut self) {
        with_host!(self, |ext, host| ext.shutdown(&mut host));
        let browser = std::mem::replace(&mut self.browser, SessionHistory::new("", ""));
        let reloads = self.reloads + 1;
        let mut events = std::mem::take(&mut self.events);
        events.push(PageEvent::Reloaded {
            href: browser.href().to_string(),
        });

        let mut reloaded = Self::load(self.config.clone(), browser, self.snippet_cache);
        reloaded.events = events;
        reloaded.reloads = reloads;
        reloaded.next_request = self.next_request;
        *self = reloaded;
    }

    fn pump(&mut self) {
        for _ in 0..MAX_SIGNAL_ROUNDS {
            let changed = with_host!(self, |ext, host| ext.drain_background(&mut host));
            if !changed {
                break;
            }
        }
    }
}
