mod events;
mod host;
mod traits;

pub use events::{
    BeforeEvent, BuildStateEvent, CompleteEvent, FetchEvent, InteractionEvent, PopstateEvent,
    PopstateOutcome, StartEvent, SuccessEvent,
};
pub use host::ExtensionHost;
pub use traits::Extension;
