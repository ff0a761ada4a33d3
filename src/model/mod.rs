//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod question;

// Re-export for convenience
pub use error::{AppError, StoreError, Table, ValidationError};
pub use identifiers::{AnswerId, InvalidId, QuestionId};
pub use key_action::KeyAction;
pub use question::{
    ANONYMOUS_AUTHOR, AnswerPatch, AnswerRow, NewAnswer, NewQuestion, QuestionPatch, QuestionRow,
    QuestionSummary, format_date, normalize_tags, parse_tag_list,
};
