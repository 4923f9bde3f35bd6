//! Error types for token stream operations

use std::path::PathBuf;

use thiserror::Error;

/// Contract violations raised by [`crate::Tokens`] helpers.
///
/// These indicate a bug in the calling fixer rather than bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokensError {
    #[error("Invalid param start index {index} - not a proper block start.")]
    InvalidBlockStart { index: usize },

    #[error("Invalid param end index {index} - not a proper block end.")]
    InvalidBlockEnd { index: usize },

    #[error("Missing block end for block starting at index {index}.")]
    MissingBlockEnd { index: usize },

    #[error("Missing block start for block ending at index {index}.")]
    MissingBlockStart { index: usize },

    #[error("{0}")]
    InvalidPattern(String),

    #[error("Index {index} is out of bounds for {len} tokens.")]
    OutOfBounds { index: usize, len: usize },
}

/// Source text rejected by a [`crate::Linter`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LintingError {
    #[error("PHP Parse error: {message} on line {line}")]
    Syntax { message: String, line: usize },

    /// Failure reported by an external `php -l` process
    #[error("{0}")]
    Process(String),

    #[error("Failed to read \"{}\": {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl LintingError {
    /// Line of a syntax error, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            LintingError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}
