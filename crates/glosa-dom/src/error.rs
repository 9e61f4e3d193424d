//! Error types for the DOM crate.

use thiserror::Error;

/// Errors from parsing or serializing HTML trees.
///
/// The parser itself is lenient and never rejects content; the only failure
/// mode is the byte source.
#[derive(Debug, Error)]
pub enum DomError {
    /// I/O failure while reading input bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for DOM results.
pub type DomResult<T> = Result<T, DomError>;
