//! Maintenance commands: reset the board to the seed set, add one question
//! with answers, insert a bare question.
//!
//! All three talk to the same [`RecordStore`] the TUI uses. Answers always
//! reference a question that was just inserted, so inserts go question
//! first, then its answers.

use crate::model::{
    NewAnswer, NewQuestion, QuestionRow, StoreError, Table, ValidationError,
};
use crate::store::RecordStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const SEED_DATA: &str = include_str!("seed_data.json");
const SAMPLE_QUESTION: &str = include_str!("sample_question.json");

/// Maintenance command failure.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// The store rejected a write that the command cannot skip.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The payload was rejected before reaching the store.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Question file could not be read.
    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        /// File given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Question file is not valid seed JSON.
    #[error("Invalid question file {path:?}: {reason}")]
    ParseFile {
        /// File given on the command line.
        path: PathBuf,
        /// serde_json message.
        reason: String,
    },

    /// Built-in seed data failed to parse, or a row failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One answer in seed JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAnswer {
    /// Blank posts as the anonymous author.
    #[serde(default)]
    pub author: String,
    /// Markdown body.
    pub content: String,
}

/// One question with its answers in seed JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedQuestion {
    /// Question title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Blank posts as the anonymous author.
    #[serde(default)]
    pub author: String,
    /// Raw tags, normalized on insert.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Answers inserted after the question.
    #[serde(default)]
    pub answers: Vec<SeedAnswer>,
}

/// The built-in seed set used by `reset`.
pub fn seed_questions() -> Result<Vec<SeedQuestion>, MaintenanceError> {
    Ok(serde_json::from_str(SEED_DATA)?)
}

/// The built-in question used by `add-question` without `--file`.
pub fn sample_question() -> Result<SeedQuestion, MaintenanceError> {
    Ok(serde_json::from_str(SAMPLE_QUESTION)?)
}

/// Read one seed question from a JSON file.
pub fn load_question_file(path: &Path) -> Result<SeedQuestion, MaintenanceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| MaintenanceError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| MaintenanceError::ParseFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Result of inserting one seed question.
#[derive(Debug, Clone, PartialEq)]
pub struct Inserted {
    /// The stored question.
    pub question: QuestionRow,
    /// Answers written; zero when the answer batch was rejected.
    pub answers: usize,
}

/// Insert a question, then its answers as one batch.
///
/// A rejected question is an error. A rejected answer batch is logged and
/// reported as zero answers, leaving the question in place.
fn insert_seed(
    store: &dyn RecordStore,
    seed: &SeedQuestion,
) -> Result<Inserted, MaintenanceError> {
    let record = NewQuestion::new(&seed.title, &seed.content, &seed.author, seed.tags.clone())?;
    let question = store.insert_question(record)?;

    let answers = seed
        .answers
        .iter()
        .map(|a| NewAnswer::new(question.id.clone(), &a.author, &a.content))
        .collect::<Result<Vec<_>, _>>();
    let written = match answers {
        Ok(batch) if batch.is_empty() => 0,
        Ok(batch) => match store.insert_answers(batch) {
            Ok(rows) => rows.len(),
            Err(err) => {
                warn!(title = %seed.title, error = %err, "Error inserting answers");
                0
            }
        },
        Err(err) => {
            warn!(title = %seed.title, error = %err, "Invalid seed answer");
            0
        }
    };
    Ok(Inserted {
        question,
        answers: written,
    })
}

/// Summary of a reset run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Answers removed before seeding.
    pub answers_deleted: usize,
    /// Questions removed before seeding.
    pub questions_deleted: usize,
    /// Seed questions written.
    pub questions_inserted: usize,
    /// Seed answers written.
    pub answers_inserted: usize,
    /// Titles of seed questions the store refused.
    pub skipped: Vec<String>,
}

/// Delete every answer, then every question, then insert `seeds`.
///
/// Either delete failing aborts the run. A seed question that fails to
/// insert is logged and skipped.
pub fn reset_with(
    store: &dyn RecordStore,
    seeds: &[SeedQuestion],
) -> Result<ResetReport, MaintenanceError> {
    let mut report = ResetReport {
        answers_deleted: store.delete_all(Table::Answers)?,
        ..ResetReport::default()
    };
    info!(count = report.answers_deleted, "All answers deleted");
    report.questions_deleted = store.delete_all(Table::Questions)?;
    info!(count = report.questions_deleted, "All questions deleted");

    for seed in seeds {
        match insert_seed(store, seed) {
            Ok(inserted) => {
                report.questions_inserted += 1;
                report.answers_inserted += inserted.answers;
            }
            Err(err) => {
                warn!(title = %seed.title, error = %err, "Error inserting question");
                report.skipped.push(seed.title.clone());
            }
        }
    }
    info!(?report, "Data reset completed");
    Ok(report)
}

/// Reset the board to the built-in seed set.
pub fn reset_data(store: &dyn RecordStore) -> Result<ResetReport, MaintenanceError> {
    reset_with(store, &seed_questions()?)
}

/// Insert one question with its answers, from `file` or the built-in sample.
pub fn add_question(
    store: &dyn RecordStore,
    file: Option<&Path>,
) -> Result<Inserted, MaintenanceError> {
    let seed = match file {
        Some(path) => load_question_file(path)?,
        None => sample_question()?,
    };
    info!(title = %seed.title, "Inserting new question");
    insert_seed(store, &seed)
}

/// Insert a single question without answers and return the stored row.
pub fn insert_question(
    store: &dyn RecordStore,
    title: &str,
    content: &str,
    author: &str,
    tags: Vec<String>,
) -> Result<QuestionRow, MaintenanceError> {
    let record = NewQuestion::new(title, content, author, tags)?;
    Ok(store.insert_question(record)?)
}
