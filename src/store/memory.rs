//! In-process record store.
//!
//! Tables are plain vectors behind an `RwLock`. Every mutation runs against a
//! copy of the tables and is swapped in only after an optional commit hook
//! succeeds, so a failed write never leaves partial state behind.

use crate::model::{
    AnswerId, AnswerPatch, AnswerRow, NewAnswer, NewQuestion, QuestionId, QuestionPatch,
    QuestionRow, StoreError, Table, normalize_tags,
};
use crate::query::{CountQuery, PageQuery, SortDirection, SortField, SortKey};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::RwLock;
use uuid::Uuid;

// ===== Tables =====

/// Stored question columns. The answer count is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Row id.
    pub id: QuestionId,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Tag column; may be absent.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The complete data set: both collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    /// `questions` collection.
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
    /// `answers` collection.
    #[serde(default)]
    pub answers: Vec<AnswerRow>,
}

impl Tables {
    fn answer_count(&self, id: &QuestionId) -> usize {
        self.answers.iter().filter(|a| &a.question_id == id).count()
    }

    fn to_row(&self, record: &QuestionRecord) -> QuestionRow {
        QuestionRow {
            id: record.id.clone(),
            title: record.title.clone(),
            content: record.content.clone(),
            author: record.author.clone(),
            tags: record.tags.clone(),
            created_at: record.created_at,
            answer_count: Some(self.answer_count(&record.id)),
        }
    }

    fn matching<'a>(
        &'a self,
        filter: &'a crate::query::QuestionFilter,
    ) -> impl Iterator<Item = &'a QuestionRecord> + 'a {
        self.questions.iter().filter(move |q| {
            filter.matches(&q.title, q.tags.as_deref().unwrap_or_default())
        })
    }

    /// Filter, sort and slice.
    pub fn select_questions(&self, query: &PageQuery) -> Vec<QuestionRow> {
        let mut hits: Vec<&QuestionRecord> = self.matching(&query.filter).collect();
        hits.sort_by(|a, b| compare_records(a, b, &query.order));
        hits.into_iter()
            .skip(query.range.from)
            .take(query.range.len())
            .map(|q| self.to_row(q))
            .collect()
    }

    /// Count rows matching the filter.
    pub fn count_questions(&self, query: &CountQuery) -> usize {
        self.matching(&query.filter).count()
    }

    fn find_question_mut(&mut self, id: &QuestionId) -> Result<&mut QuestionRecord, StoreError> {
        self.questions
            .iter_mut()
            .find(|q| &q.id == id)
            .ok_or_else(|| StoreError::NotFound {
                table: Table::Questions,
                id: id.to_string(),
            })
    }

    /// Insert a question, stamping id and (if absent) creation time.
    pub fn insert_question(&mut self, record: NewQuestion) -> Result<QuestionRow, StoreError> {
        let stored = QuestionRecord {
            id: QuestionId::new(Uuid::new_v4().to_string())
                .map_err(|e| StoreError::rejected(e.to_string()))?,
            title: record.title,
            content: record.content,
            author: record.author,
            tags: Some(normalize_tags(record.tags)),
            created_at: record.created_at.unwrap_or_else(Utc::now),
        };
        let row = self.to_row(&stored);
        self.questions.push(stored);
        Ok(row)
    }

    /// Insert answers. Fails on the first dangling `question_id`.
    pub fn insert_answers(&mut self, records: Vec<NewAnswer>) -> Result<Vec<AnswerRow>, StoreError> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            if !self.questions.iter().any(|q| q.id == record.question_id) {
                return Err(StoreError::Constraint {
                    message: format!(
                        "answers.question_id {} does not reference an existing question",
                        record.question_id
                    ),
                });
            }
            let row = AnswerRow {
                id: AnswerId::new(Uuid::new_v4().to_string())
                    .map_err(|e| StoreError::rejected(e.to_string()))?,
                question_id: record.question_id,
                author: record.author,
                content: record.content,
                created_at: record.created_at.unwrap_or_else(Utc::now),
            };
            self.answers.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    /// Patch a question.
    pub fn update_question(
        &mut self,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<QuestionRow, StoreError> {
        let record = self.find_question_mut(id)?;
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(content) = patch.content {
            record.content = content;
        }
        if let Some(tags) = patch.tags {
            record.tags = Some(normalize_tags(tags));
        }
        let record = record.clone();
        Ok(self.to_row(&record))
    }

    /// Replace an answer body.
    pub fn update_answer(&mut self, id: &AnswerId, patch: AnswerPatch) -> Result<AnswerRow, StoreError> {
        let answer = self
            .answers
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| StoreError::NotFound {
                table: Table::Answers,
                id: id.to_string(),
            })?;
        answer.content = patch.content;
        Ok(answer.clone())
    }

    /// Remove one answer; `true` if it existed.
    pub fn delete_answer(&mut self, id: &AnswerId) -> bool {
        let before = self.answers.len();
        self.answers.retain(|a| &a.id != id);
        self.answers.len() != before
    }

    /// Empty a table. Questions can only go once no answer references them.
    pub fn delete_all(&mut self, table: Table) -> Result<usize, StoreError> {
        match table {
            Table::Answers => Ok(std::mem::take(&mut self.answers).len()),
            Table::Questions => {
                if !self.answers.is_empty() {
                    return Err(StoreError::Constraint {
                        message: "questions are still referenced by answers".to_string(),
                    });
                }
                Ok(std::mem::take(&mut self.questions).len())
            }
        }
    }
}

/// Compare two records by a list of sort keys, most significant first.
fn compare_records(a: &QuestionRecord, b: &QuestionRecord, order: &[SortKey]) -> Ordering {
    for key in order {
        let ord = match key.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Id => a.id.cmp(&b.id),
        };
        let ord = match key.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

// ===== MemoryStore =====

/// Thread-safe in-process record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `tables`.
    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Copy of the current tables.
    pub fn snapshot(&self) -> Result<Tables, StoreError> {
        self.read(|t| t.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::rejected("store lock poisoned"))?;
        Ok(f(&tables))
    }

    /// Apply `change` to a copy of the tables, run `commit` on the result,
    /// and swap the copy in only when both succeed.
    pub fn transact<T>(
        &self,
        change: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
        commit: impl FnOnce(&Tables) -> Result<(), StoreError>,
    ) -> Result<T, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::rejected("store lock poisoned"))?;
        let mut draft = tables.clone();
        let out = change(&mut draft)?;
        commit(&draft)?;
        *tables = draft;
        Ok(out)
    }

    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.transact(change, |_| Ok(()))
    }
}

impl RecordStore for MemoryStore {
    fn select_questions(&self, query: &PageQuery) -> Result<Vec<QuestionRow>, StoreError> {
        self.read(|t| t.select_questions(query))
    }

    fn count_questions(&self, query: &CountQuery) -> Result<usize, StoreError> {
        self.read(|t| t.count_questions(query))
    }

    fn select_tag_sets(&self) -> Result<Vec<Option<Vec<String>>>, StoreError> {
        self.read(|t| t.questions.iter().map(|q| q.tags.clone()).collect())
    }

    fn get_question(&self, id: &QuestionId) -> Result<Option<QuestionRow>, StoreError> {
        self.read(|t| t.questions.iter().find(|q| &q.id == id).map(|q| t.to_row(q)))
    }

    fn select_answers(&self, question: &QuestionId) -> Result<Vec<AnswerRow>, StoreError> {
        self.read(|t| {
            let mut answers: Vec<AnswerRow> = t
                .answers
                .iter()
                .filter(|a| &a.question_id == question)
                .cloned()
                .collect();
            answers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            answers
        })
    }

    fn insert_question(&self, record: NewQuestion) -> Result<QuestionRow, StoreError> {
        self.mutate(|t| t.insert_question(record))
    }

    fn insert_answers(&self, records: Vec<NewAnswer>) -> Result<Vec<AnswerRow>, StoreError> {
        self.mutate(|t| t.insert_answers(records))
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<QuestionRow, StoreError> {
        self.mutate(|t| t.update_question(id, patch))
    }

    fn update_answer(&self, id: &AnswerId, patch: AnswerPatch) -> Result<AnswerRow, StoreError> {
        self.mutate(|t| t.update_answer(id, patch))
    }

    fn delete_answer(&self, id: &AnswerId) -> Result<bool, StoreError> {
        self.mutate(|t| Ok(t.delete_answer(id)))
    }

    fn delete_all(&self, table: Table) -> Result<usize, StoreError> {
        self.mutate(|t| t.delete_all(table))
    }
}
