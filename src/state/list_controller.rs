//! List controller: view state and fetch state machine (pure).
//!
//! # State Machine
//!
//! ```text
//! Idle ──mount──▶ Loading ──ok──▶ Loaded
//!                    │  ▲
//!                  error│ retry / any filter or page change
//!                    ▼  │
//!                  Failed
//! ```
//!
//! Every transition that needs data returns a [`FetchRequest`] for the shell
//! to execute. Requests carry a monotonically increasing [`RequestSeq`]; a
//! completion is applied only if it answers the latest request issued, so a
//! slow response to a superseded query can never overwrite a newer one.
//!
//! Changing the search term or the tag always resets the page to 1.

use crate::model::{QuestionSummary, StoreError};
use crate::query::{ListQuery, Page, PageSize, build_list_query};
use crate::state::pagination::Pagination;
use crate::store::PageResult;
use tracing::debug;

// ===== RequestSeq =====

/// Sequence number of an issued request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out increasing [`RequestSeq`] values.
#[derive(Debug, Clone, Default)]
pub struct SeqCounter {
    last: u64,
}

impl SeqCounter {
    /// Issue the next sequence number.
    pub fn issue(&mut self) -> RequestSeq {
        self.last += 1;
        RequestSeq(self.last)
    }

    /// Whether `seq` is the most recently issued number.
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        seq.0 == self.last
    }
}

// ===== FetchStatus =====

/// Fetch lifecycle of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded; rows are current.
    Loaded,
    /// The latest request failed. No rows are shown.
    Failed {
        /// Store-provided message, verbatim.
        message: String,
    },
}

// ===== FetchRequest =====

/// A store round trip the shell must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence to hand back to [`ListController::complete`].
    pub seq: RequestSeq,
    /// Page and count queries.
    pub query: ListQuery,
}

/// Result of feeding a completion to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The completion answered the latest request and was applied.
    Applied,
    /// A newer request was issued since; the completion was discarded.
    Stale,
}

// ===== ViewState =====

/// What the list view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Title search term; empty matches all.
    pub search_term: String,
    /// Selected tag; `None` means all tags.
    pub selected_tag: Option<String>,
    /// 1-based current page.
    pub current_page: Page,
    /// Rows per page.
    pub page_size: PageSize,
    /// Rows of the current page, newest first. Never longer than `page_size`.
    pub rows: Vec<QuestionSummary>,
    /// Rows matching the filters across all pages.
    pub total_count: usize,
}

impl ViewState {
    fn new(page_size: PageSize) -> Self {
        Self {
            search_term: String::new(),
            selected_tag: None,
            current_page: Page::FIRST,
            page_size,
            rows: Vec::new(),
            total_count: 0,
        }
    }
}

// ===== ListController =====

/// Owns the list view state and decides when to fetch.
#[derive(Debug, Clone)]
pub struct ListController {
    view: ViewState,
    status: FetchStatus,
    seq: SeqCounter,
    /// Set once the first successful count arrives; bounds page navigation.
    known_count: Option<usize>,
}

impl ListController {
    /// Controller in `Idle` with default filters.
    pub fn new(page_size: PageSize) -> Self {
        Self::with_counter(page_size, SeqCounter::default())
    }

    /// Fresh controller that keeps numbering where `seq` left off, so
    /// responses to a previous session are stale from the start.
    pub fn with_counter(page_size: PageSize, seq: SeqCounter) -> Self {
        Self {
            view: ViewState::new(page_size),
            status: FetchStatus::Idle,
            seq,
            known_count: None,
        }
    }

    /// Sequence counter, for handing on to the next session.
    pub fn counter(&self) -> &SeqCounter {
        &self.seq
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current fetch status.
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Error message when in `Failed`.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Controls for the current result set.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.view.total_count,
            self.view.page_size,
            self.view.current_page,
        )
    }

    /// Initial load (and every re-mount of the list view).
    pub fn mount(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Update the search term. Resets to page 1. `None` if unchanged.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Option<FetchRequest> {
        let term = term.into();
        if term == self.view.search_term {
            return None;
        }
        self.view.search_term = term;
        self.view.current_page = Page::FIRST;
        Some(self.issue())
    }

    /// Select a tag (`None` = all). Resets to page 1. `None` if unchanged.
    pub fn select_tag(&mut self, tag: Option<String>) -> Option<FetchRequest> {
        if tag == self.view.selected_tag {
            return None;
        }
        self.view.selected_tag = tag;
        self.view.current_page = Page::FIRST;
        Some(self.issue())
    }

    /// Clear both filters. Resets to page 1. `None` if already clear.
    pub fn clear_filters(&mut self) -> Option<FetchRequest> {
        if self.view.search_term.is_empty() && self.view.selected_tag.is_none() {
            return None;
        }
        self.view.search_term.clear();
        self.view.selected_tag = None;
        self.view.current_page = Page::FIRST;
        Some(self.issue())
    }

    /// Navigate to `page`, keeping filters.
    ///
    /// Refused (returns `None`) for the current page and, once a count is
    /// known, for pages past the last one.
    pub fn go_to_page(&mut self, page: Page) -> Option<FetchRequest> {
        if page == self.view.current_page {
            return None;
        }
        if let Some(total) = self.known_count {
            let bounds = Pagination::new(total, self.view.page_size, page);
            if !bounds.contains(page) {
                return None;
            }
        }
        self.view.current_page = page;
        Some(self.issue())
    }

    /// Next page if "next" is enabled.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.pagination().next_enabled() {
            return None;
        }
        self.go_to_page(self.view.current_page.next())
    }

    /// Previous page if "previous" is enabled.
    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        let prev = self.view.current_page.prev()?;
        self.go_to_page(prev)
    }

    /// First page.
    pub fn first_page(&mut self) -> Option<FetchRequest> {
        self.go_to_page(Page::FIRST)
    }

    /// Last page of the current result set.
    pub fn last_page(&mut self) -> Option<FetchRequest> {
        let last = self.pagination().last_page()?;
        self.go_to_page(last)
    }

    /// Re-issue the same query after a failure. `None` unless `Failed`.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        match self.status {
            FetchStatus::Failed { .. } => Some(self.issue()),
            _ => None,
        }
    }

    /// Re-issue the same query from any state.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Feed the outcome of a request back.
    ///
    /// Stale completions (not the latest issued sequence) are discarded
    /// without touching state.
    pub fn complete(
        &mut self,
        seq: RequestSeq,
        result: Result<PageResult, StoreError>,
    ) -> Completion {
        if !self.seq.is_latest(seq) {
            debug!(seq = seq.get(), "Discarding stale list response");
            return Completion::Stale;
        }
        match result {
            Ok(page) => {
                self.view.rows = page
                    .rows
                    .into_iter()
                    .take(self.view.page_size.as_usize())
                    .map(QuestionSummary::from_row)
                    .collect();
                self.view.total_count = page.total_count;
                self.known_count = Some(page.total_count);
                self.status = FetchStatus::Loaded;
            }
            Err(err) => {
                self.view.rows.clear();
                self.view.total_count = 0;
                self.status = FetchStatus::Failed {
                    message: err.to_string(),
                };
            }
        }
        Completion::Applied
    }

    fn issue(&mut self) -> FetchRequest {
        let seq = self.seq.issue();
        self.status = FetchStatus::Loading;
        let query = build_list_query(
            &self.view.search_term,
            self.view.selected_tag.as_deref(),
            self.view.current_page,
            self.view.page_size,
        );
        debug!(
            seq = seq.get(),
            term = %self.view.search_term,
            tag = ?self.view.selected_tag,
            page = self.view.current_page.get(),
            "Issuing list request"
        );
        FetchRequest { seq, query }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "list_controller_tests.rs"]
mod tests;
