//! The modal extension family: lifecycle controller, popstate
//! reconciliation, request coordination and the prevent-redraw opt-out.

mod controller;
mod options;
mod popstate;
mod prevent_redraw;
mod requests;

#[cfg(test)]
mod tests;

pub use controller::{ControllerState, ModalController, Phase};
pub use options::{ModalOptions, ModalSize};
pub use prevent_redraw::PreventRedrawExtension;
pub use requests::RequestCoordinator;
