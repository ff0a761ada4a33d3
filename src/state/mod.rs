//! UI state machine (pure).
//!
//! All state transitions are pure functions testable without TUI. Store
//! access is requested through [`Effect`]s and answered with [`Outcome`]s.

pub mod app_state;
pub mod ask_form;
pub mod debounce;
pub mod detail;
pub mod effects;
pub mod list_controller;
pub mod pagination;
pub mod tag_index;
pub mod text_input;

// Re-export for convenience
pub use app_state::{
    AppState, FocusPane, Route, Screen, Settings, StatusKind, StatusMessage, TextKey,
};
pub use ask_form::{AskField, AskForm};
pub use debounce::SearchDebounce;
pub use detail::{DetailState, DetailStatus, EditState, EditTarget};
pub use effects::{Effect, Mutation, Outcome};
pub use list_controller::{
    Completion, FetchRequest, FetchStatus, ListController, RequestSeq, SeqCounter, ViewState,
};
pub use pagination::{LabelSegment, PageButton, Pagination};
pub use tag_index::{TagRefreshPolicy, TagUniverse};
pub use text_input::TextInput;
