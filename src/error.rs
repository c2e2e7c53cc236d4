//! Error types for test-name extraction and directory walks.

use std::path::PathBuf;
use std::time::Duration;

/// Per-file extraction failures.
///
/// These never abort a walk: the driver turns them into an empty result
/// for the strategy (or file) that hit them.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Malformed or unsupported source.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Malformed predicate program attached to an embedded query pattern.
#[derive(Debug, thiserror::Error)]
pub enum PredicateError {
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),

    #[error("predicate `{name}` expects {expected}")]
    BadOperands { name: String, expected: &'static str },

    #[error("predicate `{name}` has an invalid pattern: {source}")]
    BadRegex {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// A query pattern that failed to compile.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),
}

/// Terminal failures of a directory walk.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("number of files exceeded limit ({limit})")]
    FileLimitExceeded { limit: usize },

    #[error("execution time exceeded limit ({limit:?})")]
    DeadlineExceeded { limit: Duration },

    #[error("walk failed: {0}")]
    Walk(#[from] ignore::Error),
}

impl WalkError {
    /// True for the two budget dimensions (file count, deadline).
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(
            self,
            WalkError::FileLimitExceeded { .. } | WalkError::DeadlineExceeded { .. }
        )
    }
}
