//! Error types for qaboard.
//!
//! One `thiserror` enum per layer, composed into [`AppError`] with `From`
//! conversions so the binary can propagate everything with `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level failure returned to `main`
//!   - [`StoreError`] - the record store rejected a read or a write
//!   - [`ValidationError`] - a form or command payload was rejected before
//!     reaching the store
//!   - `ConfigError`, `LoggingError`, `MaintenanceError`, `TuiError` - defined
//!     next to the code that raises them
//!
//! Store errors are surfaced to the user verbatim: the `Display` text of a
//! [`StoreError`] is the message the store provided, nothing is wrapped around
//! it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record store failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Rejected input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Configuration failure.
    #[error("{0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging setup failure.
    #[error("{0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Maintenance command failure.
    #[error("{0}")]
    Maintenance(#[from] crate::maintenance::MaintenanceError),

    /// Terminal failure.
    #[error("{0}")]
    Tui(#[from] crate::view::TuiError),
}

/// Tables owned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// The `questions` collection.
    Questions,
    /// The `answers` collection.
    Answers,
}

impl Table {
    /// Collection name as the store knows it.
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Questions => "questions",
            Table::Answers => "answers",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record store rejected a query or a mutation.
///
/// Both query failures and mutation failures use this type. The controller
/// never retries on its own; the user re-triggers the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Generic rejection carrying the store-provided message.
    #[error("{message}")]
    Rejected {
        /// Message from the store.
        message: String,
    },

    /// A row addressed by id does not exist.
    #[error("{table} row {id} not found")]
    NotFound {
        /// Table that was addressed.
        table: Table,
        /// Id that was not found.
        id: String,
    },

    /// A relational constraint was violated (dangling parent, referenced row).
    #[error("constraint violation: {message}")]
    Constraint {
        /// What was violated.
        message: String,
    },

    /// The store could not write its backing file.
    #[error("failed to persist store to {path}: {reason}")]
    Persist {
        /// Backing file.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// The backing file exists but cannot be decoded.
    #[error("store file {path} is corrupt: {reason}")]
    Corrupt {
        /// Backing file.
        path: PathBuf,
        /// Decode failure.
        reason: String,
    },
}

impl StoreError {
    /// Shorthand for [`StoreError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Input rejected before it reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was empty after trimming.
    #[error("{field} must not be empty")]
    Blank {
        /// Field name.
        field: &'static str,
    },

    /// Page numbers start at 1.
    #[error("page must be at least 1")]
    PageOutOfRange,

    /// Page size must be positive.
    #[error("page size must be greater than 0")]
    ZeroPageSize,

    /// The requested action is disabled by policy.
    #[error("{action} is disabled")]
    Disabled {
        /// Human readable action name.
        action: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_store_message_verbatim() {
        let err = StoreError::rejected("permission denied for table questions");
        assert_eq!(err.to_string(), "permission denied for table questions");
    }

    #[test]
    fn app_error_from_store_error_keeps_message() {
        let err: AppError = StoreError::rejected("boom").into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn not_found_names_table_and_id() {
        let err = StoreError::NotFound {
            table: Table::Answers,
            id: "a1".to_string(),
        };
        assert_eq!(err.to_string(), "answers row a1 not found");
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::Blank { field: "title" }.to_string(),
            "title must not be empty"
        );
        assert_eq!(
            ValidationError::Disabled {
                action: "deleting answers"
            }
            .to_string(),
            "deleting answers is disabled"
        );
    }
}
