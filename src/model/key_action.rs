//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
/// Text-entry modes (search box, editors, ask form) bypass this mapping for
/// printable characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Application
    /// Quit the application. Default: q / Ctrl+c
    Quit,
    /// Toggle the help overlay. Default: ?
    ToggleHelp,

    // List navigation
    /// Move the row cursor down. Default: j / ↓
    NextRow,
    /// Move the row cursor up. Default: k / ↑
    PrevRow,
    /// Open the selected question. Default: Enter
    Open,
    /// Go back to the previous screen. Default: Esc / Backspace
    Back,
    /// Next result page. Default: n / →
    NextPage,
    /// Previous result page. Default: p / ←
    PrevPage,
    /// Jump to the first result page. Default: g / Home
    FirstPage,
    /// Jump to the last result page. Default: G / End
    LastPage,

    // Filters
    /// Focus the search box. Default: /
    FocusSearch,
    /// Focus the tag bar. Default: t
    FocusTags,
    /// Clear search term and tag filter. Default: x
    ClearFilters,

    // Fetch control
    /// Retry a failed fetch. Default: r
    Retry,
    /// Re-run the current query. Default: R
    Refresh,

    // Forms and mutations
    /// Open the ask form. Default: a
    Ask,
    /// Edit the question title inline. Default: e
    EditTitle,
    /// Edit the question tags inline. Default: T
    EditTags,
    /// Edit the selected answer inline. Default: E
    EditAnswer,
    /// Write a new answer. Default: w
    WriteAnswer,
    /// Delete the selected answer (policy gated). Default: d
    DeleteAnswer,
}

impl KeyAction {
    /// Every action, in declaration order.
    pub const ALL: [KeyAction; 21] = [
        KeyAction::Quit,
        KeyAction::ToggleHelp,
        KeyAction::NextRow,
        KeyAction::PrevRow,
        KeyAction::Open,
        KeyAction::Back,
        KeyAction::NextPage,
        KeyAction::PrevPage,
        KeyAction::FirstPage,
        KeyAction::LastPage,
        KeyAction::FocusSearch,
        KeyAction::FocusTags,
        KeyAction::ClearFilters,
        KeyAction::Retry,
        KeyAction::Refresh,
        KeyAction::Ask,
        KeyAction::EditTitle,
        KeyAction::EditTags,
        KeyAction::EditAnswer,
        KeyAction::WriteAnswer,
        KeyAction::DeleteAnswer,
    ];

    /// Name used in the `[keybindings]` config table.
    pub fn name(self) -> &'static str {
        match self {
            KeyAction::Quit => "quit",
            KeyAction::ToggleHelp => "toggle_help",
            KeyAction::NextRow => "next_row",
            KeyAction::PrevRow => "prev_row",
            KeyAction::Open => "open",
            KeyAction::Back => "back",
            KeyAction::NextPage => "next_page",
            KeyAction::PrevPage => "prev_page",
            KeyAction::FirstPage => "first_page",
            KeyAction::LastPage => "last_page",
            KeyAction::FocusSearch => "focus_search",
            KeyAction::FocusTags => "focus_tags",
            KeyAction::ClearFilters => "clear_filters",
            KeyAction::Retry => "retry",
            KeyAction::Refresh => "refresh",
            KeyAction::Ask => "ask",
            KeyAction::EditTitle => "edit_title",
            KeyAction::EditTags => "edit_tags",
            KeyAction::EditAnswer => "edit_answer",
            KeyAction::WriteAnswer => "write_answer",
            KeyAction::DeleteAnswer => "delete_answer",
        }
    }

    /// Inverse of [`KeyAction::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}
