use crate::config::Config;
use crate::extension::{BeforeEvent, Extension, InteractionEvent};
use crate::host::HostContext;

/// Lets an element opt its request out of modal handling; the server is
/// told not to redraw the modal.
pub struct PreventRedrawExtension {
    attribute: String,
    header: String,
}

impl PreventRedrawExtension {
    pub fn new(config: &Config) -> Self {
        Self {
            attribute: config.attributes.prevent_redraw.clone(),
            header: config.headers.prevent_redraw.clone(),
        }
    }
}

impl Extension for PreventRedrawExtension {
    fn on_interaction(&mut self, event: &mut InteractionEvent<'_>, _host: &mut HostContext<'_>) {
        if event.element.has_attr(&self.attribute) {
            event.options.prevent_redraw = true;
        }
    }

    fn on_before(&mut self, event: &mut BeforeEvent<'_>, _host: &mut HostContext<'_>) {
        if event.options.prevent_redraw {
            event.request.headers.set(self.header.as_str(), "1");
        }
    }
}
