//! Selection handling and popup panels, independent of any real renderer.

pub mod manager;
pub mod selection;
pub mod session;
pub mod view;

pub use manager::{Dispatch, PopupManager, PopupSurface};
pub use selection::{is_single_word, normalize_sentence, qualify};
pub use session::{LookupBackend, PopupSession};
pub use view::{PanelId, PanelView, SaveIndicator};
