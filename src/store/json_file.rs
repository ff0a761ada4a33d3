//! Record store persisted to a JSON document.
//!
//! The document holds both collections:
//!
//! ```json
//! { "questions": [ ... ], "answers": [ ... ] }
//! ```
//!
//! Reads are served from memory. Each successful mutation rewrites the file
//! through a temporary sibling and a rename, so readers never observe a
//! half-written document.

use crate::model::{
    AnswerId, AnswerPatch, AnswerRow, NewAnswer, NewQuestion, QuestionId, QuestionPatch,
    QuestionRow, StoreError, Table,
};
use crate::query::{CountQuery, PageQuery};
use crate::store::{MemoryStore, RecordStore, Tables};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed record store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store (created on first write). A file that
    /// exists but does not decode is [`StoreError::Corrupt`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tables = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            serde_json::from_str::<Tables>(&contents).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            Tables::default()
        };
        info!(
            path = %path.display(),
            questions = tables.questions.len(),
            answers = tables.answers.len(),
            "Opened record store"
        );
        Ok(Self {
            path,
            inner: MemoryStore::from_tables(tables),
        })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        let fail = |reason: String| StoreError::Persist {
            path: self.path.clone(),
            reason,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
            }
        }
        let json = serde_json::to_string_pretty(tables).map_err(|e| fail(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| fail(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| fail(e.to_string()))?;
        debug!(path = %self.path.display(), "Persisted record store");
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn select_questions(&self, query: &PageQuery) -> Result<Vec<QuestionRow>, StoreError> {
        self.inner.select_questions(query)
    }

    fn count_questions(&self, query: &CountQuery) -> Result<usize, StoreError> {
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
        self.inner
            .transact(|t| t.insert_question(record), |t| self.persist(t))
    }

    fn insert_answers(&self, records: Vec<NewAnswer>) -> Result<Vec<AnswerRow>, StoreError> {
        self.inner
            .transact(|t| t.insert_answers(records), |t| self.persist(t))
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<QuestionRow, StoreError> {
        self.inner
            .transact(|t| t.update_question(id, patch), |t| self.persist(t))
    }

    fn update_answer(&self, id: &AnswerId, patch: AnswerPatch) -> Result<AnswerRow, StoreError> {
        self.inner
            .transact(|t| t.update_answer(id, patch), |t| self.persist(t))
    }

    fn delete_answer(&self, id: &AnswerId) -> Result<bool, StoreError> {
        self.inner
            .transact(|t| Ok(t.delete_answer(id)), |t| self.persist(t))
    }

    fn delete_all(&self, table: Table) -> Result<usize, StoreError> {
        self.inner
            .transact(|t| t.delete_all(table), |t| self.persist(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("qaboard_json_store_tests");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_opens_empty() {
        let path = temp_path("missing.json");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.select_tag_sets().unwrap().is_empty());
        assert!(!path.exists(), "Opening must not create the file");
    }

    #[test]
    fn insert_is_visible_after_reopen() {
        let path = temp_path("reopen.json");
        {
            let store = JsonFileStore::open(&path).unwrap();
            let q = NewQuestion::new("persisted", "body", "me", vec!["tag".to_string()]).unwrap();
            store.insert_question(q).unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            store.select_tag_sets().unwrap(),
            vec![Some(vec!["tag".to_string()])]
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_mutation_does_not_touch_file() {
        let path = temp_path("constraint.json");
        let store = JsonFileStore::open(&path).unwrap();
        let ghost = QuestionId::new("ghost").unwrap();
        let answer = NewAnswer::new(ghost, "a", "c").unwrap();
        assert!(store.insert_answers(vec![answer]).is_err());
        assert!(!path.exists());
    }
}
