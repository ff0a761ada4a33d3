//! Application state and transitions.
//!
//! AppState is the root state type containing all UI state.
//! All state transitions are pure functions following Elm architecture:
//! input and fetch outcomes go in, [`Effect`]s come out for the shell to run.

use crate::model::{KeyAction, QuestionId, QuestionSummary};
use crate::query::PageSize;
use crate::state::ask_form::AskForm;
use crate::state::debounce::SearchDebounce;
use crate::state::detail::{DetailState, EditTarget};
use crate::state::effects::{Effect, Mutation, Outcome};
use crate::state::list_controller::{Completion, FetchRequest, ListController, SeqCounter};
use crate::state::tag_index::{TagRefreshPolicy, TagUniverse};
use crate::state::text_input::{self, TextInput};
use std::time::{Duration, Instant};
use tracing::{debug, info};

// ===== Route =====

/// Screen addressed by a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: question list.
    List,
    /// `/question/:id`: one question with its answers.
    Detail(QuestionId),
    /// `/ask`: new question form.
    Ask,
}

impl Route {
    /// Resolve a path. Unknown paths fall back to the list.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        if trimmed == "/ask" {
            return Route::Ask;
        }
        if let Some(id) = trimmed.strip_prefix("/question/") {
            if !id.contains('/') {
                if let Ok(id) = QuestionId::new(id) {
                    return Route::Detail(id);
                }
            }
        }
        Route::List
    }

    /// Canonical path.
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail(id) => format!("/question/{id}"),
            Route::Ask => "/ask".to_string(),
        }
    }
}

// ===== Settings =====

/// Runtime policy knobs, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rows per list page.
    pub page_size: PageSize,
    /// Quiet period before a typed search term is committed.
    pub search_debounce: Duration,
    /// When the tag universe is recomputed.
    pub tag_refresh: TagRefreshPolicy,
    /// Whether answers may be deleted.
    pub allow_answer_delete: bool,
    /// Author recorded for answers and pre-filled in the ask form.
    pub author_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: PageSize::DEFAULT,
            search_debounce: Duration::ZERO,
            tag_refresh: TagRefreshPolicy::default(),
            allow_answer_delete: false,
            author_name: String::new(),
        }
    }
}

// ===== Focus and input =====

/// Which part of the list screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    /// Question rows and pagination.
    #[default]
    List,
    /// Search box (text entry).
    Search,
    /// Tag bar.
    Tags,
}

/// Key input in text-entry modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    /// Printable character.
    Char(char),
    /// Ctrl+j: literal newline.
    Newline,
    /// Delete before the cursor.
    Backspace,
    /// Delete under the cursor.
    Delete,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Cursor to line start.
    Home,
    /// Cursor to line end.
    End,
    /// Enter: commit / save / submit.
    Submit,
    /// Esc: leave the input.
    Cancel,
    /// Tab.
    NextField,
    /// Shift+Tab.
    PrevField,
}

/// Severity of a status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Informational.
    Info,
    /// Failure the user should see.
    Error,
}

/// One-line message under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity.
    pub kind: StatusKind,
    /// Message text.
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// The screen being shown with its screen-local state.
#[derive(Debug, Clone)]
pub enum Screen {
    /// Paginated question list.
    List,
    /// One question with its answers.
    Detail(DetailState),
    /// New question form.
    Ask(AskForm),
}

// ===== AppState =====

/// Application state. Pure data, no side effects.
#[derive(Debug, Clone)]
pub struct AppState {
    settings: Settings,
    screen: Screen,
    list: ListController,
    /// Detail numbering carried across opened questions.
    detail_seq: SeqCounter,
    tags: TagUniverse,
    tag_seq: SeqCounter,
    /// Focused part of the list screen.
    pub focus: FocusPane,
    search_input: TextInput,
    debounce: SearchDebounce,
    /// Tag bar cursor: 0 is "all", `i + 1` is `tags[i]`.
    tag_cursor: usize,
    row_cursor: usize,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl AppState {
    /// State on the list screen with nothing loaded. Call
    /// [`AppState::navigate`] to mount the first screen.
    pub fn new(settings: Settings) -> Self {
        Self {
            list: ListController::new(settings.page_size),
            detail_seq: SeqCounter::default(),
            tag_seq: SeqCounter::default(),
            debounce: SearchDebounce::new(settings.search_debounce),
            settings,
            screen: Screen::List,
            tags: TagUniverse::default(),
            focus: FocusPane::List,
            search_input: TextInput::default(),
            tag_cursor: 0,
            row_cursor: 0,
            help_visible: false,
            status: None,
            should_quit: false,
        }
    }

    // ----- accessors -----

    /// Resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Route of the current screen.
    pub fn route(&self) -> Route {
        match &self.screen {
            Screen::List => Route::List,
            Screen::Detail(detail) => Route::Detail(detail.id().clone()),
            Screen::Ask(_) => Route::Ask,
        }
    }

    /// List controller for the current session.
    pub fn list(&self) -> &ListController {
        &self.list
    }

    /// Known tags.
    pub fn tags(&self) -> &TagUniverse {
        &self.tags
    }

    /// Search box contents (may be ahead of the committed term while
    /// debouncing).
    pub fn search_input(&self) -> &TextInput {
        &self.search_input
    }

    /// Highlighted index in the tag bar.
    pub fn tag_cursor(&self) -> usize {
        self.tag_cursor
    }

    /// Selected row on the list screen.
    pub fn row_cursor(&self) -> usize {
        self.row_cursor
    }

    /// Current status message, if any.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// True once quit was requested.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Row under the cursor on the list screen.
    pub fn selected_question(&self) -> Option<&QuestionSummary> {
        self.list.view().rows.get(self.row_cursor)
    }

    /// Whether printable keys go to a text input rather than key bindings.
    pub fn is_text_entry(&self) -> bool {
        match &self.screen {
            Screen::List => self.focus == FocusPane::Search,
            Screen::Detail(detail) => detail.is_editing(),
            Screen::Ask(_) => true,
        }
    }

    /// Whether a typed search term is waiting for [`AppState::tick`].
    pub fn has_pending_search(&self) -> bool {
        self.debounce.is_pending()
    }

    // ----- navigation -----

    /// Switch screens. Mounting the list starts a fresh list session and
    /// recomputes the tag universe.
    pub fn navigate(&mut self, route: Route) -> Vec<Effect> {
        info!(path = %route.path(), "Navigate");
        self.status = None;
        self.help_visible = false;
        if let Screen::Detail(detail) = &self.screen {
            self.detail_seq = detail.counter().clone();
        }
        match route {
            Route::List => {
                self.screen = Screen::List;
                let seq = self.list.counter().clone();
                self.list = ListController::with_counter(self.settings.page_size, seq);
                self.search_input = TextInput::default();
                self.debounce.cancel();
                self.focus = FocusPane::List;
                self.tag_cursor = 0;
                self.row_cursor = 0;
                vec![self.load_tags(), self.mount_list()]
            }
            Route::Detail(id) => {
                let (detail, effect) = DetailState::open_with(id, self.detail_seq.clone());
                self.screen = Screen::Detail(detail);
                vec![effect]
            }
            Route::Ask => {
                self.screen = Screen::Ask(AskForm::new(&self.settings.author_name));
                Vec::new()
            }
        }
    }

    fn load_tags(&mut self) -> Effect {
        Effect::LoadTags {
            seq: self.tag_seq.issue(),
        }
    }

    fn mount_list(&mut self) -> Effect {
        Effect::LoadPage(self.list.mount())
    }

    fn load(&mut self, request: FetchRequest) -> Effect {
        self.row_cursor = 0;
        Effect::LoadPage(request)
    }

    fn loads(&mut self, request: Option<FetchRequest>) -> Vec<Effect> {
        request.map(|r| self.load(r)).into_iter().collect()
    }

    // ----- key actions -----

    /// Handle a bound key action.
    pub fn handle_action(&mut self, action: KeyAction) -> Vec<Effect> {
        match action {
            KeyAction::Quit => {
                self.should_quit = true;
                return Vec::new();
            }
            KeyAction::ToggleHelp => {
                self.help_visible = !self.help_visible;
                return Vec::new();
            }
            _ => {}
        }
        if self.help_visible {
            if action == KeyAction::Back {
                self.help_visible = false;
            }
            return Vec::new();
        }
        match self.screen {
            Screen::List => match self.focus {
                FocusPane::Tags => self.handle_tag_bar_action(action),
                _ => self.handle_list_action(action),
            },
            Screen::Detail(_) => self.handle_detail_action(action),
            Screen::Ask(_) => match action {
                KeyAction::Back => self.navigate(Route::List),
                _ => Vec::new(),
            },
        }
    }

    fn handle_list_action(&mut self, action: KeyAction) -> Vec<Effect> {
        match action {
            KeyAction::NextRow => {
                let len = self.list.view().rows.len();
                if self.row_cursor + 1 < len {
                    self.row_cursor += 1;
                }
                Vec::new()
            }
            KeyAction::PrevRow => {
                self.row_cursor = self.row_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyAction::Open => match self.selected_question().map(|q| q.id.clone()) {
                Some(id) => self.navigate(Route::Detail(id)),
                None => Vec::new(),
            },
            KeyAction::NextPage => {
                let req = self.list.next_page();
                self.loads(req)
            }
            KeyAction::PrevPage => {
                let req = self.list.prev_page();
                self.loads(req)
            }
            KeyAction::FirstPage => {
                let req = self.list.first_page();
                self.loads(req)
            }
            KeyAction::LastPage => {
                let req = self.list.last_page();
                self.loads(req)
            }
            KeyAction::FocusSearch => {
                self.focus = FocusPane::Search;
                Vec::new()
            }
            KeyAction::FocusTags => {
                self.focus = FocusPane::Tags;
                self.tag_cursor = self.selected_tag_position();
                Vec::new()
            }
            KeyAction::ClearFilters => {
                self.search_input = TextInput::default();
                self.debounce.cancel();
                self.tag_cursor = 0;
                let req = self.list.clear_filters();
                self.loads(req)
            }
            KeyAction::Retry => {
                let req = self.list.retry();
                self.loads(req)
            }
            KeyAction::Refresh => {
                let req = self.list.refresh();
                vec![self.load(req)]
            }
            KeyAction::Ask => self.navigate(Route::Ask),
            _ => Vec::new(),
        }
    }

    fn selected_tag_position(&self) -> usize {
        self.list
            .view()
            .selected_tag
            .as_deref()
            .and_then(|tag| self.tags.tags().iter().position(|t| t == tag))
            .map_or(0, |i| i + 1)
    }

    fn handle_tag_bar_action(&mut self, action: KeyAction) -> Vec<Effect> {
        match action {
            KeyAction::NextPage | KeyAction::NextRow => {
                if self.tag_cursor < self.tags.len() {
                    self.tag_cursor += 1;
                }
                Vec::new()
            }
            KeyAction::PrevPage | KeyAction::PrevRow => {
                self.tag_cursor = self.tag_cursor.saturating_sub(1);
                Vec::new()
            }
            KeyAction::Open => {
                self.focus = FocusPane::List;
                let tag = self
                    .tag_cursor
                    .checked_sub(1)
                    .and_then(|i| self.tags.tags().get(i))
                    .cloned();
                let req = self.list.select_tag(tag);
                self.loads(req)
            }
            KeyAction::Back | KeyAction::FocusTags => {
                self.focus = FocusPane::List;
                Vec::new()
            }
            KeyAction::FocusSearch => {
                self.focus = FocusPane::Search;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_detail_action(&mut self, action: KeyAction) -> Vec<Effect> {
        let allow_delete = self.settings.allow_answer_delete;
        let Screen::Detail(detail) = &mut self.screen else {
            return Vec::new();
        };
        match action {
            KeyAction::Back => self.navigate(Route::List),
            KeyAction::Ask => self.navigate(Route::Ask),
            KeyAction::NextRow => {
                detail.next_answer();
                Vec::new()
            }
            KeyAction::PrevRow => {
                detail.prev_answer();
                Vec::new()
            }
            KeyAction::Retry | KeyAction::Refresh => vec![detail.reload()],
            KeyAction::EditTitle => {
                detail.begin_edit(EditTarget::Title);
                Vec::new()
            }
            KeyAction::EditTags => {
                detail.begin_edit(EditTarget::Tags);
                Vec::new()
            }
            KeyAction::EditAnswer => {
                detail.begin_edit_selected_answer();
                Vec::new()
            }
            KeyAction::WriteAnswer => {
                detail.begin_edit(EditTarget::NewAnswer);
                Vec::new()
            }
            KeyAction::DeleteAnswer => match detail.request_delete(allow_delete) {
                Ok(Some(mutation)) => {
                    self.status = Some(StatusMessage::info("Deleting answer..."));
                    vec![Effect::Mutate(mutation)]
                }
                Ok(None) => Vec::new(),
                Err(err) => {
                    self.status = Some(StatusMessage::error(err.to_string()));
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    // ----- text entry -----

    /// Handle a key in a text-entry mode. `now` drives the search debounce.
    pub fn handle_text(&mut self, key: TextKey, now: Instant) -> Vec<Effect> {
        match self.screen {
            Screen::List => self.handle_search_text(key, now),
            Screen::Detail(_) => self.handle_editor_text(key),
            Screen::Ask(_) => self.handle_ask_text(key),
        }
    }

    fn handle_search_text(&mut self, key: TextKey, now: Instant) -> Vec<Effect> {
        match key {
            TextKey::Submit | TextKey::Cancel => {
                self.focus = FocusPane::List;
                let term = self.debounce.flush();
                self.commit_search(term)
            }
            TextKey::NextField => {
                self.focus = FocusPane::Tags;
                let term = self.debounce.flush();
                self.commit_search(term)
            }
            TextKey::PrevField | TextKey::Newline => Vec::new(),
            edit => {
                let before = self.search_input.value().to_string();
                self.search_input = apply_text_key(std::mem::take(&mut self.search_input), edit);
                if self.search_input.value() == before {
                    return Vec::new();
                }
                let term = self
                    .debounce
                    .schedule(self.search_input.value().to_string(), now);
                self.commit_search(term)
            }
        }
    }

    fn commit_search(&mut self, term: Option<String>) -> Vec<Effect> {
        let req = term.and_then(|t| self.list.set_search_term(t));
        self.loads(req)
    }

    /// Commit a debounced search term whose quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let term = self.debounce.take_due(now);
        self.commit_search(term)
    }

    fn handle_editor_text(&mut self, key: TextKey) -> Vec<Effect> {
        let author = self.settings.author_name.clone();
        let Screen::Detail(detail) = &mut self.screen else {
            return Vec::new();
        };
        match key {
            TextKey::Submit => match detail.save(&author) {
                Ok(Some(mutation)) => {
                    self.status = Some(StatusMessage::info("Saving..."));
                    vec![Effect::Mutate(mutation)]
                }
                Ok(None) => Vec::new(),
                Err(err) => {
                    self.status = Some(StatusMessage::error(err.to_string()));
                    Vec::new()
                }
            },
            TextKey::Cancel => {
                detail.cancel_edit();
                self.status = None;
                Vec::new()
            }
            TextKey::NextField | TextKey::PrevField => Vec::new(),
            edit => {
                detail.update_input(|input| apply_text_key(input, edit));
                Vec::new()
            }
        }
    }

    fn handle_ask_text(&mut self, key: TextKey) -> Vec<Effect> {
        let Screen::Ask(form) = &mut self.screen else {
            return Vec::new();
        };
        match key {
            TextKey::Submit => match form.submit() {
                Ok(Some(mutation)) => {
                    self.status = Some(StatusMessage::info("Posting question..."));
                    vec![Effect::Mutate(mutation)]
                }
                Ok(None) => Vec::new(),
                Err(err) => {
                    self.status = Some(StatusMessage::error(err.to_string()));
                    Vec::new()
                }
            },
            TextKey::Cancel => self.navigate(Route::List),
            TextKey::NextField => {
                form.focus_next();
                Vec::new()
            }
            TextKey::PrevField => {
                form.focus_prev();
                Vec::new()
            }
            edit => {
                form.update_focused(|input| apply_text_key(input, edit));
                Vec::new()
            }
        }
    }

    // ----- outcomes -----

    /// Feed back the result of an executed effect.
    pub fn apply_outcome(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Page { seq, result } => {
                if self.list.complete(seq, result) == Completion::Applied {
                    let len = self.list.view().rows.len();
                    self.row_cursor = self.row_cursor.min(len.saturating_sub(1));
                }
                Vec::new()
            }
            Outcome::Tags { seq, result } => {
                if !self.tag_seq.is_latest(seq) {
                    debug!(seq = seq.get(), "Discarding stale tag response");
                    return Vec::new();
                }
                match result {
                    Ok(universe) => {
                        self.tags = universe;
                        self.tag_cursor = self.tag_cursor.min(self.tags.len());
                    }
                    Err(err) => self.status = Some(StatusMessage::error(err.to_string())),
                }
                Vec::new()
            }
            Outcome::Detail { seq, id, result } => {
                match &mut self.screen {
                    Screen::Detail(detail) if detail.id() == &id => {
                        detail.complete(seq, result);
                    }
                    _ => debug!(%id, "Discarding detail response for a closed question"),
                }
                Vec::new()
            }
            Outcome::Mutated { mutation, result } => self.mutation_finished(mutation, result),
        }
    }

    fn mutation_finished(
        &mut self,
        mutation: Mutation,
        result: Result<(), crate::model::StoreError>,
    ) -> Vec<Effect> {
        match &result {
            Ok(()) => debug!(done = mutation.done_message(), "Mutation applied"),
            Err(err) => debug!(error = %err, "Mutation failed"),
        }
        let mut effects = Vec::new();
        let mut back_to_list = false;
        let mut reload_tags = false;
        match (&mut self.screen, &mutation) {
            (Screen::Ask(form), Mutation::InsertQuestion(_)) => {
                if result.is_ok() {
                    back_to_list = true;
                } else {
                    form.submit_failed();
                }
            }
            (Screen::Detail(detail), _) => {
                effects.extend(detail.mutation_finished(&result));
                reload_tags =
                    result.is_ok() && self.settings.tag_refresh == TagRefreshPolicy::AfterMutation;
            }
            _ => {}
        }
        if reload_tags {
            effects.push(self.load_tags());
        }
        if back_to_list {
            effects = self.navigate(Route::List);
        }
        self.status = Some(match result {
            Ok(()) => StatusMessage::info(mutation.done_message()),
            Err(err) => StatusMessage::error(err.to_string()),
        });
        effects
    }
}

/// Map a text key onto the pure input transitions.
fn apply_text_key(input: TextInput, key: TextKey) -> TextInput {
    match key {
        TextKey::Char(ch) => text_input::handle_char_input(input, ch),
        TextKey::Newline => text_input::handle_char_input(input, '\n'),
        TextKey::Backspace => text_input::handle_backspace(input),
        TextKey::Delete => text_input::handle_delete(input),
        TextKey::Left => text_input::handle_cursor_left(input),
        TextKey::Right => text_input::handle_cursor_right(input),
        TextKey::Home => text_input::handle_home(input),
        TextKey::End => text_input::handle_end(input),
        TextKey::Submit | TextKey::Cancel | TextKey::NextField | TextKey::PrevField => input,
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "app_state_routing_test.rs"]
mod routing_tests;
