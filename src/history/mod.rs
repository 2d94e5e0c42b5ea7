//! History entries and the modal marker persisted inside them.

mod codec;
mod state;

pub use codec::HistoryStateCodec;
pub use state::{ModalStateInfo, NavigationState, SnippetCacheRef, SnippetStorage};
