//! Error types for the merge crate.

use thiserror::Error;

/// Errors raised while merging a pair of parallel trees.
///
/// Both variants are precondition failures: the two documents were assumed
/// to have identical shape and do not. They are fatal for the file pair
/// being merged; the caller decides whether the batch continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// Paired nodes have differing element-child counts.
    #[error("child count mismatch at {path}: source has {source}, target has {target}")]
    ChildCountMismatch {
        path: String,
        source: usize,
        target: usize,
    },

    /// A policy required a child node that does not exist.
    #[error("missing {what} at {path}")]
    MissingChild { path: String, what: &'static str },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
