//! Record store client.
//!
//! The application does not own persistence; it talks to a tabular record
//! store through the [`RecordStore`] trait. Two implementations ship with the
//! crate:
//! - [`MemoryStore`]: in-process tables (tests, benchmarks, scratch sessions)
//! - [`JsonFileStore`]: the same tables persisted to a JSON document
//!
//! Reads follow the query descriptors built by [`crate::query`]. The list view
//! always executes a page query and its count query together through
//! [`fetch_page`].

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::{MemoryStore, Tables};

use crate::model::{
    AnswerId, AnswerPatch, AnswerRow, NewAnswer, NewQuestion, QuestionId, QuestionPatch,
    QuestionRow, StoreError, Table,
};
use crate::query::{CountQuery, ListQuery, PageQuery};
use tracing::debug;

/// Abstract record store with filtered, sorted, ranged reads and CRUD writes.
pub trait RecordStore: Send + Sync {
    /// Rows matching `query.filter`, sorted by `query.order`, sliced to
    /// `query.range`. A range past the end yields an empty vec.
    fn select_questions(&self, query: &PageQuery) -> Result<Vec<QuestionRow>, StoreError>;

    /// Number of rows matching `query.filter`.
    fn count_questions(&self, query: &CountQuery) -> Result<usize, StoreError>;

    /// The tag column of every question, unfiltered.
    fn select_tag_sets(&self) -> Result<Vec<Option<Vec<String>>>, StoreError>;

    /// One question by id.
    fn get_question(&self, id: &QuestionId) -> Result<Option<QuestionRow>, StoreError>;

    /// Answers of a question, oldest first.
    fn select_answers(&self, question: &QuestionId) -> Result<Vec<AnswerRow>, StoreError>;

    /// Insert a question and return the stored row.
    fn insert_question(&self, record: NewQuestion) -> Result<QuestionRow, StoreError>;

    /// Insert a batch of answers. All-or-nothing.
    fn insert_answers(&self, records: Vec<NewAnswer>) -> Result<Vec<AnswerRow>, StoreError>;

    /// Apply a partial update to a question.
    fn update_question(
        &self,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<QuestionRow, StoreError>;

    /// Replace an answer's body.
    fn update_answer(&self, id: &AnswerId, patch: AnswerPatch) -> Result<AnswerRow, StoreError>;

    /// Delete one answer. Returns whether it existed.
    fn delete_answer(&self, id: &AnswerId) -> Result<bool, StoreError>;

    /// Delete every row of a table. Returns the number of rows removed.
    fn delete_all(&self, table: Table) -> Result<usize, StoreError>;
}

/// One page of list results with the total matching count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Rows of the page, in query order.
    pub rows: Vec<QuestionRow>,
    /// Total rows matching the filters (all pages).
    pub total_count: usize,
}

/// Execute a page query and its count query as one logical unit.
///
/// If either sub-query fails the whole fetch fails; partial results are never
/// returned.
pub fn fetch_page(store: &dyn RecordStore, query: &ListQuery) -> Result<PageResult, StoreError> {
    let rows = store.select_questions(&query.rows)?;
    let total_count = store.count_questions(&query.count)?;
    debug!(
        rows = rows.len(),
        total_count,
        from = query.rows.range.from,
        "Fetched question page"
    );
    Ok(PageResult { rows, total_count })
}

/// A question with its answers, as shown on the detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDetail {
    /// The question row.
    pub question: QuestionRow,
    /// Its answers, oldest first.
    pub answers: Vec<AnswerRow>,
}

/// Load a question and its answers. Fails as a unit; a missing question is
/// reported as [`StoreError::NotFound`].
pub fn fetch_detail(
    store: &dyn RecordStore,
    id: &QuestionId,
) -> Result<QuestionDetail, StoreError> {
    let question = store.get_question(id)?.ok_or_else(|| StoreError::NotFound {
        table: Table::Questions,
        id: id.to_string(),
    })?;
    let answers = store.select_answers(id)?;
    Ok(QuestionDetail { question, answers })
}
