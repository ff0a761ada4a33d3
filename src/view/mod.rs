//! TUI rendering and event handling (impure shell).

mod ask_form;
mod detail;
mod editor;
mod help;
mod layout;
mod pagination_bar;
mod question_list;
mod search_input;
mod styles;
mod tag_bar;

pub use help::render_help_overlay;
pub use layout::render_layout;
pub use styles::{BoardStyles, ColorConfig};

use crate::config::KeyBindings;
use crate::fetch::FetchWorker;
use crate::state::{AppState, Effect, Outcome, Route, Settings, TextKey};
use crate::store::RecordStore;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Everything the TUI needs besides the store.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Runtime knobs for the state layer.
    pub settings: Settings,
    /// Resolved key map.
    pub key_bindings: KeyBindings,
    /// Color on/off.
    pub colors: ColorConfig,
    /// Text in the header bar.
    pub board_title: String,
    /// Screen to mount first.
    pub initial_route: Route,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    worker: FetchWorker,
    key_bindings: KeyBindings,
    styles: BoardStyles,
    board_title: String,
    /// Effects spawned whose outcome has not been applied yet.
    in_flight: usize,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Set up the terminal in raw mode with alternate screen and mount the
    /// initial route.
    pub fn new(store: Arc<dyn RecordStore>, options: LaunchOptions) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, store, options))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (q or Ctrl+C). Redraws on input, on
    /// arriving outcomes and when a debounced search commits; an idle board
    /// only wakes up on the poll interval.
    pub fn run(&mut self) -> Result<(), TuiError> {
        const POLL_INTERVAL: Duration = Duration::from_millis(50);

        self.draw()?;

        loop {
            let mut dirty = false;
            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(..) => dirty = true,
                    _ => {}
                }
            }

            dirty |= self.tick(Instant::now());
            dirty |= self.pump();

            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(
        terminal: Terminal<B>,
        store: Arc<dyn RecordStore>,
        options: LaunchOptions,
    ) -> Self {
        let mut app = Self {
            terminal,
            app_state: AppState::new(options.settings),
            worker: FetchWorker::new(store),
            key_bindings: options.key_bindings,
            styles: BoardStyles::with_color_config(options.colors),
            board_title: options.board_title,
            in_flight: 0,
        };
        let effects = app.app_state.navigate(options.initial_route);
        app.dispatch(effects);
        app
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        // Ctrl+C always quits, even while typing.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.app_state.help_visible && key.code == KeyCode::Esc {
            self.app_state.help_visible = false;
            return false;
        }

        let effects = if self.app_state.is_text_entry() {
            match text_key(key) {
                Some(text) => self.app_state.handle_text(text, Instant::now()),
                None => Vec::new(),
            }
        } else {
            match self.key_bindings.get(key) {
                Some(action) => {
                    debug!(action = action.name(), "Key action");
                    self.app_state.handle_action(action)
                }
                None => Vec::new(),
            }
        };
        self.dispatch(effects);
        self.app_state.should_quit()
    }

    /// Hand effects to the worker.
    fn dispatch(&mut self, effects: Vec<Effect>) {
        self.in_flight += effects.len();
        self.worker.spawn_all(effects);
    }

    fn apply(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let follow_up = self.app_state.apply_outcome(outcome);
        self.dispatch(follow_up);
    }

    /// Apply every outcome that has arrived. Returns whether any did.
    fn pump(&mut self) -> bool {
        let outcomes = self.worker.drain();
        let arrived = !outcomes.is_empty();
        for outcome in outcomes {
            self.apply(outcome);
        }
        arrived
    }

    /// Commit a due search term. Returns whether a fetch started.
    fn tick(&mut self, now: Instant) -> bool {
        if !self.app_state.has_pending_search() {
            return false;
        }
        let effects = self.app_state.tick(now);
        let started = !effects.is_empty();
        self.dispatch(effects);
        started
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let state = &self.app_state;
        let styles = &self.styles;
        let key_bindings = &self.key_bindings;
        let title = self.board_title.as_str();
        self.terminal.draw(|frame| {
            layout::render_layout(frame, state, styles, key_bindings, title);
        })?;
        Ok(())
    }
}

/// Translate a key press into a text-entry key.
fn text_key(key: KeyEvent) -> Option<TextKey> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    Some(match key.code {
        KeyCode::Enter => TextKey::Submit,
        KeyCode::Char('j') if ctrl => TextKey::Newline,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(ch) => TextKey::Char(ch),
        KeyCode::Esc => TextKey::Cancel,
        KeyCode::Tab => TextKey::NextField,
        KeyCode::BackTab => TextKey::PrevField,
        KeyCode::Backspace => TextKey::Backspace,
        KeyCode::Delete => TextKey::Delete,
        KeyCode::Left => TextKey::Left,
        KeyCode::Right => TextKey::Right,
        KeyCode::Home => TextKey::Home,
        KeyCode::End => TextKey::End,
        _ => return None,
    })
}

// ===== Test Helpers =====
//
// The following methods are ONLY for testing within the crate.

#[cfg(test)]
#[allow(dead_code)] // Not every helper is used by every test module
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build an app on an arbitrary backend and mount `options.initial_route`.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        store: Arc<dyn RecordStore>,
        options: LaunchOptions,
    ) -> Self {
        Self::with_terminal(terminal, store, options)
    }

    pub(crate) fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub(crate) fn tick_test(&mut self, now: Instant) -> bool {
        self.tick(now)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Block until every spawned effect (and its follow-ups) has been
    /// applied. Returns false if `timeout` passes first.
    pub(crate) fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Some(outcome) = self.worker.recv_timeout(remaining) {
                self.apply(outcome);
            }
        }
        true
    }
}

/// Initialize and run the TUI against `store`.
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails. Logging must be initialized by the caller.
pub fn run_with_store(store: Arc<dyn RecordStore>, options: LaunchOptions) -> Result<(), TuiError> {
    info!(route = %options.initial_route.path(), "Starting TUI");
    let mut app = TuiApp::new(store, options)?;

    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewQuestion;
    use crate::state::{FocusPane, Screen};
    use crate::store::MemoryStore;
    use ratatui::backend::TestBackend;

    const WAIT: Duration = Duration::from_secs(5);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn options(route: Route) -> LaunchOptions {
        LaunchOptions {
            settings: Settings::default(),
            key_bindings: KeyBindings::default(),
            colors: ColorConfig::new(false),
            board_title: "Test Board".to_string(),
            initial_route: route,
        }
    }

    fn create_test_app(titles: &[&str]) -> TuiApp<TestBackend> {
        let store = Arc::new(MemoryStore::new());
        for title in titles {
            store
                .insert_question(NewQuestion::new(title, "body", "author", vec![]).unwrap())
                .unwrap();
        }
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = TuiApp::new_for_test(terminal, store, options(Route::List));
        assert!(app.wait_idle(WAIT));
        app
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn mounting_list_loads_rows() {
        let app = create_test_app(&["first", "second"]);
        assert_eq!(app.app_state().list().view().total_count, 2);
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn handle_key_q_returns_true() {
        let mut app = create_test_app(&[]);
        assert!(app.handle_key_test(key(KeyCode::Char('q'))));
    }

    #[test]
    fn handle_key_ctrl_c_returns_true_even_while_typing() {
        let mut app = create_test_app(&[]);
        app.handle_key_test(key(KeyCode::Char('/')));
        assert!(app.app_state().is_text_entry());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key_test(ctrl_c));
    }

    #[test]
    fn q_is_typed_into_search_instead_of_quitting() {
        let mut app = create_test_app(&["query planner"]);
        app.handle_key_test(key(KeyCode::Char('/')));
        assert!(!app.handle_key_test(key(KeyCode::Char('q'))));
        assert_eq!(app.app_state().search_input().value(), "q");
        assert!(app.wait_idle(WAIT));
        assert_eq!(app.app_state().list().view().search_term, "q");
    }

    #[test]
    fn esc_closes_help_overlay() {
        let mut app = create_test_app(&[]);
        app.handle_key_test(key(KeyCode::Char('?')));
        assert!(app.app_state().help_visible);
        app.handle_key_test(key(KeyCode::Esc));
        assert!(!app.app_state().help_visible);
    }

    #[test]
    fn enter_opens_detail_and_loads_it() {
        let mut app = create_test_app(&["only one"]);
        app.handle_key_test(key(KeyCode::Enter));
        assert!(app.wait_idle(WAIT));
        let Screen::Detail(detail) = app.app_state().screen() else {
            panic!("Expected detail screen");
        };
        assert!(matches!(
            detail.status(),
            crate::state::DetailStatus::Loaded(_)
        ));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = create_test_app(&[]);
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert!(!app.handle_key_test(release));
    }

    #[test]
    fn text_key_maps_editing_keys() {
        assert_eq!(text_key(key(KeyCode::Enter)), Some(TextKey::Submit));
        assert_eq!(
            text_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(TextKey::Newline)
        );
        assert_eq!(
            text_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TextKey::Char('A'))
        );
        assert_eq!(text_key(key(KeyCode::BackTab)), Some(TextKey::PrevField));
        assert_eq!(
            text_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(text_key(key(KeyCode::F(1))), None);
    }

    #[test]
    fn draw_renders_board_title() {
        let mut app = create_test_app(&["rendered"]);
        app.render_test().unwrap();
        let text = crate::test_harness::buffer_to_string(app.terminal().backend().buffer());
        assert!(text.contains("Test Board"));
        assert!(text.contains("rendered"));
    }

    #[test]
    fn tick_without_pending_search_does_nothing() {
        let mut app = create_test_app(&[]);
        assert_eq!(app.app_state().focus, FocusPane::List);
        assert!(!app.tick_test(Instant::now()));
    }
}
