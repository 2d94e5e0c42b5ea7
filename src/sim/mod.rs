//! Headless host: an in-memory browser, a recording modal view and an
//! emulated request pipeline wired to the extensions.

mod browser;
mod page;
mod scenario;
mod scheduler;
mod view;

pub use browser::{HistoryEntry, SessionHistory};
pub use page::{Page, PageEvent, Response};
pub use scenario::{ReplayReport, Scenario, Step};
pub use scheduler::TaskQueue;
pub use view::{RecordingModal, ViewCall};
