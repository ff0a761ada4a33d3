//! Acceptance Test Harness for TUI testing
//!
//! Provides fixture stores and a high-level API for acceptance testing user
//! stories by wrapping TuiApp<TestBackend> with convenient methods for
//! simulating user interactions.

use crate::config::KeyBindings;
use crate::model::{
    AnswerId, AnswerPatch, AnswerRow, NewAnswer, NewQuestion, QuestionId, QuestionPatch,
    QuestionRow, StoreError, Table,
};
use crate::query::{CountQuery, PageQuery};
use crate::state::{AppState, Route, Settings};
use crate::store::{MemoryStore, RecordStore};
use crate::view::{ColorConfig, LaunchOptions, TuiApp};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

/// Convert a ratatui buffer to a string representation for assertions.
///
/// Captures the visual output character by character, preserving layout.
/// Empty lines are removed to keep comparisons readable.
pub(crate) fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

// ===== Fixtures =====

/// Fixed base time so fixture ordering is deterministic.
pub(crate) fn fixture_time(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
        + ChronoDuration::minutes(minutes)
}

/// Insert `(title, tags)` questions, the first oldest. Returns the stored rows
/// in insertion order.
pub(crate) fn insert_fixtures(store: &dyn RecordStore, rows: &[(&str, &[&str])]) -> Vec<QuestionRow> {
    rows.iter()
        .enumerate()
        .map(|(i, (title, tags))| {
            let tags = tags.iter().map(|t| t.to_string()).collect();
            let record = NewQuestion::new(title, "본문", "tester", tags)
                .unwrap()
                .created_at(fixture_time(i as i64));
            store.insert_question(record).unwrap()
        })
        .collect()
}

/// Store with `n` untagged questions titled "Question 1".."Question n".
pub(crate) fn numbered_store(n: usize) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let titles: Vec<String> = (1..=n).map(|i| format!("Question {i}")).collect();
    let rows: Vec<(&str, &[&str])> = titles.iter().map(|t| (t.as_str(), &[][..])).collect();
    insert_fixtures(store.as_ref(), &rows);
    store
}

/// Add one answer to `question`. Answers added this way sort in call order.
pub(crate) fn answer(store: &dyn RecordStore, question: &QuestionId, content: &str) -> AnswerRow {
    static NEXT_MINUTE: AtomicI64 = AtomicI64::new(10_000);
    let at = fixture_time(NEXT_MINUTE.fetch_add(1, Ordering::SeqCst));
    let record = NewAnswer::new(question.clone(), "answerer", content)
        .unwrap()
        .created_at(at);
    store.insert_answers(vec![record]).unwrap().remove(0)
}

// ===== Store doubles =====

/// Store that rejects every call with a fixed message while failing is on.
///
/// Wraps a [`MemoryStore`] so tests can flip failures off and retry.
pub(crate) struct FailingStore {
    inner: MemoryStore,
    message: String,
    failing: AtomicBool,
}

impl FailingStore {
    /// Empty store that fails from the start.
    pub(crate) fn new(message: &str) -> Self {
        Self::wrapping(MemoryStore::new(), message)
    }

    /// Fail in front of `inner`.
    pub(crate) fn wrapping(inner: MemoryStore, message: &str) -> Self {
        Self {
            inner,
            message: message.to_string(),
            failing: AtomicBool::new(true),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::rejected(self.message.clone()))
        } else {
            Ok(())
        }
    }
}

impl RecordStore for FailingStore {
    fn select_questions(&self, query: &PageQuery) -> Result<Vec<QuestionRow>, StoreError> {
        self.check()?;
        self.inner.select_questions(query)
    }

    fn count_questions(&self, query: &CountQuery) -> Result<usize, StoreError> {
        self.check()?;
        self.inner.count_questions(query)
    }

    fn select_tag_sets(&self) -> Result<Vec<Option<Vec<String>>>, StoreError> {
        self.check()?;
        self.inner.select_tag_sets()
    }

    fn get_question(&self, id: &QuestionId) -> Result<Option<QuestionRow>, StoreError> {
        self.check()?;
        self.inner.get_question(id)
    }

    fn select_answers(&self, question: &QuestionId) -> Result<Vec<AnswerRow>, StoreError> {
        self.check()?;
        self.inner.select_answers(question)
    }

    fn insert_question(&self, record: NewQuestion) -> Result<QuestionRow, StoreError> {
        self.check()?;
        self.inner.insert_question(record)
    }

    fn insert_answers(&self, records: Vec<NewAnswer>) -> Result<Vec<AnswerRow>, StoreError> {
        self.check()?;
        self.inner.insert_answers(records)
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<QuestionRow, StoreError> {
        self.check()?;
        self.inner.update_question(id, patch)
    }

    fn update_answer(&self, id: &AnswerId, patch: AnswerPatch) -> Result<AnswerRow, StoreError> {
        self.check()?;
        self.inner.update_answer(id, patch)
    }

    fn delete_answer(&self, id: &AnswerId) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.delete_answer(id)
    }

    fn delete_all(&self, table: Table) -> Result<usize, StoreError> {
        self.check()?;
        self.inner.delete_all(table)
    }
}

/// Store that sleeps before answering list queries for one search term.
///
/// Used to force out-of-order completions.
pub(crate) struct DelayStore {
    inner: Arc<dyn RecordStore>,
    slow_term: String,
    delay: Duration,
}

impl DelayStore {
    pub(crate) fn new(inner: Arc<dyn RecordStore>, slow_term: &str, delay: Duration) -> Self {
        Self {
            inner,
            slow_term: slow_term.to_string(),
            delay,
        }
    }

    fn maybe_sleep(&self, term: Option<&str>) {
        if term == Some(self.slow_term.as_str()) {
            std::thread::sleep(self.delay);
        }
    }
}

impl RecordStore for DelayStore {
    fn select_questions(&self, query: &PageQuery) -> Result<Vec<QuestionRow>, StoreError> {
        self.maybe_sleep(query.filter.title_contains.as_deref());
        self.inner.select_questions(query)
    }

    fn count_questions(&self, query: &CountQuery) -> Result<usize, StoreError> {
        self.maybe_sleep(query.filter.title_contains.as_deref());
        self.inner.count_questions(query)
    }

    fn select_tag_sets(&self) -> Result<Vec<Option<Vec<String>>>, StoreError> {
        self.inner.select_tag_sets()
    }

    fn get_question(&self, id: &QuestionId) -> Result<Option<QuestionRow>, StoreError> {
        self.inner.get_question(id)
    }

    fn select_answers(&self, question: &QuestionId) -> Result<Vec<AnswerRow>, StoreError> {
        self.inner.select_answers(question)
    }

    fn insert_question(&self, record: NewQuestion) -> Result<QuestionRow, StoreError> {
        self.inner.insert_question(record)
    }

    fn insert_answers(&self, records: Vec<NewAnswer>) -> Result<Vec<AnswerRow>, StoreError> {
        self.inner.insert_answers(records)
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<QuestionRow, StoreError> {
        self.inner.update_question(id, patch)
    }

    fn update_answer(&self, id: &AnswerId, patch: AnswerPatch) -> Result<AnswerRow, StoreError> {
        self.inner.update_answer(id, patch)
    }

    fn delete_answer(&self, id: &AnswerId) -> Result<bool, StoreError> {
        self.inner.delete_answer(id)
    }

    fn delete_all(&self, table: Table) -> Result<usize, StoreError> {
        self.inner.delete_all(table)
    }
}

// ===== Acceptance harness =====

/// How long [`AcceptanceTestHarness::settle`] waits for background work.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Test harness for acceptance testing
///
/// Wraps TuiApp<TestBackend> to provide a clean API for simulating user
/// interactions in acceptance tests. Every key is followed by waiting for
/// the store round trips it started, so assertions see settled state.
pub(crate) struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    running: bool,
}

impl AcceptanceTestHarness {
    /// List screen over `store` with default settings on an 80x24 terminal.
    pub(crate) fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_settings(store, Settings::default(), Route::List, 80, 24)
    }

    /// Full control over settings, first route and terminal size.
    pub(crate) fn with_settings(
        store: Arc<dyn RecordStore>,
        settings: Settings,
        route: Route,
        width: u16,
        height: u16,
    ) -> Self {
        let options = LaunchOptions {
            settings,
            key_bindings: KeyBindings::default(),
            colors: ColorConfig::new(false),
            board_title: "Test Board".to_string(),
            initial_route: route,
        };
        Self::with_options(store, options, width, height)
    }

    /// List screen with a custom key map.
    pub(crate) fn with_key_bindings(store: Arc<dyn RecordStore>, key_bindings: KeyBindings) -> Self {
        let options = LaunchOptions {
            settings: Settings::default(),
            key_bindings,
            colors: ColorConfig::new(false),
            board_title: "Test Board".to_string(),
            initial_route: Route::List,
        };
        Self::with_options(store, options, 80, 24)
    }

    fn with_options(
        store: Arc<dyn RecordStore>,
        options: LaunchOptions,
        width: u16,
        height: u16,
    ) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut harness = Self {
            app: TuiApp::new_for_test(terminal, store, options),
            running: true,
        };
        harness.settle();
        harness
    }

    /// Wait for every in-flight effect to be applied.
    pub(crate) fn settle(&mut self) {
        assert!(
            self.app.wait_idle(SETTLE_TIMEOUT),
            "Background work did not finish in time"
        );
    }

    /// Send a single key and settle. Returns true if the app quit.
    pub(crate) fn send_key(&mut self, key: KeyCode) -> bool {
        self.send_key_with_mods(key, KeyModifiers::NONE)
    }

    /// Send key with modifiers (e.g., Ctrl+C) and settle.
    pub(crate) fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }
        let quit = self.app.handle_key_test(KeyEvent::new(key, mods));
        if quit {
            self.running = false;
        } else {
            self.settle();
        }
        quit
    }

    /// Send a sequence of keys, stopping if the app quits.
    pub(crate) fn send_keys(&mut self, keys: &[KeyCode]) {
        for key in keys {
            if self.send_key(*key) {
                break;
            }
        }
    }

    /// Type text one character at a time.
    pub(crate) fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            if self.send_key(KeyCode::Char(ch)) {
                break;
            }
        }
    }

    pub(crate) fn state(&self) -> &AppState {
        self.app.app_state()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    /// Render the current frame to a string.
    pub(crate) fn render_to_string(&mut self) -> String {
        self.app
            .render_test()
            .expect("Rendering should succeed in test harness");
        buffer_to_string(self.app.terminal().backend().buffer())
    }

    /// Titles of the rows currently shown.
    pub(crate) fn visible_titles(&self) -> Vec<String> {
        self.state()
            .list()
            .view()
            .rows
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }
}
