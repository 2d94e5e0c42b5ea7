//! Keeps a modal dialog's open/close lifecycle consistent with the
//! browser's session history across AJAX requests, back/forward navigation
//! and reloads.

pub mod config;
pub mod dom;
pub mod error;
pub mod extension;
pub mod history;
pub mod host;
pub mod modal;
pub mod request;
pub mod sim;
