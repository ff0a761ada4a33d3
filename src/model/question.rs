//! Question and answer records.
//!
//! Row types mirror what the record store hands back. Insert payloads and
//! patches are validated here, before they ever reach a store.

use crate::model::error::ValidationError;
use crate::model::identifiers::{AnswerId, QuestionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author recorded when the form leaves the author blank.
pub const ANONYMOUS_AUTHOR: &str = "익명";

/// Display format for creation timestamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ===== Rows =====

/// A question as returned by the record store.
///
/// `tags` and `answer_count` are optional because the store may omit them
/// (no tags column value, no embedded count). Use [`QuestionSummary::from_row`]
/// to get the normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRow {
    /// Row id.
    pub id: QuestionId,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Tag set; absent when the store has no value.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Embedded answer count, when the store provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_count: Option<usize>,
}

/// An answer as returned by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRow {
    /// Row id.
    pub id: AnswerId,
    /// Parent question.
    pub question_id: QuestionId,
    /// Author name.
    pub author: String,
    /// Markdown body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

// ===== Insert payloads =====

/// Payload for inserting a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    /// Title, non-empty.
    pub title: String,
    /// Markdown body, non-empty.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Tags, normalized.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Explicit creation time; the store stamps "now" when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewQuestion {
    /// Build a validated question payload.
    ///
    /// Title and content are trimmed and must be non-empty. A blank author
    /// becomes [`ANONYMOUS_AUTHOR`]. Tags are normalized with [`normalize_tags`].
    pub fn new(
        title: &str,
        content: &str,
        author: &str,
        tags: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let title = require_text("title", title)?;
        let content = require_text("content", content)?;
        Ok(Self {
            title,
            content,
            author: author_or_anonymous(author),
            tags: normalize_tags(tags),
            created_at: None,
        })
    }

    /// Pin the creation timestamp (seed data, tests).
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// Payload for inserting an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnswer {
    /// Parent question.
    pub question_id: QuestionId,
    /// Author name.
    pub author: String,
    /// Markdown body, non-empty.
    pub content: String,
    /// Explicit creation time; the store stamps "now" when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewAnswer {
    /// Build a validated answer payload.
    pub fn new(
        question_id: QuestionId,
        author: &str,
        content: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            question_id,
            author: author_or_anonymous(author),
            content: require_text("content", content)?,
            created_at: None,
        })
    }

    /// Pin the creation timestamp (seed data, tests).
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

// ===== Patches =====

/// Partial update of a question. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl QuestionPatch {
    /// Patch that replaces the title.
    pub fn title(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: Some(require_text("title", raw)?),
            ..Self::default()
        })
    }

    /// Patch that replaces the tag set with the comma-separated `raw` list.
    /// An empty list is allowed (clears the tags).
    pub fn tags(raw: &str) -> Self {
        Self {
            tags: Some(parse_tag_list(raw)),
            ..Self::default()
        }
    }

    /// Patch that replaces the body.
    pub fn content(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            content: Some(require_text("content", raw)?),
            ..Self::default()
        })
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Update of an answer body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPatch {
    /// New body.
    pub content: String,
}

impl AnswerPatch {
    /// Validated answer body replacement.
    pub fn content(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            content: require_text("content", raw)?,
        })
    }
}

// ===== Normalized list row =====

/// A list-view row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSummary {
    /// Row id.
    pub id: QuestionId,
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// `created_at` rendered with [`DATE_FORMAT`] (UTC).
    pub created: String,
    /// Tags; empty when the row had none.
    pub tags: Vec<String>,
    /// Answers; 0 when the row had no count.
    pub answer_count: usize,
}

impl QuestionSummary {
    /// Normalize a store row: missing tags become empty, a missing embedded
    /// answer count becomes 0.
    pub fn from_row(row: QuestionRow) -> Self {
        Self {
            created: format_date(&row.created_at),
            id: row.id,
            title: row.title,
            author: row.author,
            tags: row.tags.unwrap_or_default(),
            answer_count: row.answer_count.unwrap_or(0),
        }
    }
}

/// Render a timestamp for display.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

// ===== Tag helpers =====

/// Parse a comma-separated tag list as typed into a form.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(',').map(str::to_string).collect())
}

/// Trim tags, drop blanks, drop duplicates keeping the first occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn require_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn author_or_anonymous(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ANONYMOUS_AUTHOR.to_string()
    } else {
        trimmed.to_string()
    }
}
