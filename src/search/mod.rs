//! # Search
//!
//! Engine catalog, suggestion parsing, the engine dropdown and the search box
//! controller that ties them together.

pub mod engine;
pub mod engine_menu;
pub mod navigator;
pub mod search_box;
pub mod suggest;

pub use engine::{default_engine, engine_by_id, EngineId, SearchEngine, ENGINES};
pub use engine_menu::EngineMenu;
pub use navigator::{BrowserNavigator, Navigator, RecordingNavigator};
pub use search_box::{KeyOutcome, SearchBox, SuggestionRequest, FOCUS_SETTLE};
pub use suggest::{parse_suggestions, MAX_SUGGESTIONS};
