//! Error types for configuration, rule sets and fixers

use ferrofix_core::TokensError;
use thiserror::Error;

/// Failure raised by a fixer while rewriting a stream.
///
/// The runner records it against the file as an exception and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixerError {
    #[error(transparent)]
    Tokens(#[from] TokensError),

    #[error("{0}")]
    Failed(String),
}

/// Rule set resolution failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("Set \"{0}\" does not exist.")]
    UnknownSet(String),

    #[error("Nested rule set \"{0}\" configuration must be a boolean.")]
    NestedSetNotBoolean(String),

    #[error("Set \"{0}\" includes itself.")]
    RecursiveSet(String),

    #[error("Rule \"{0}\" is not in the set.")]
    MissingRule(String),
}

/// Configuration failures. All of these are fatal before any file is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{0}")]
    InvalidWhitespace(String),

    #[error("Rule \"{0}\" does not exist.")]
    UnknownFixer(String),

    #[error("[{name}] Invalid configuration: {message}")]
    InvalidFixerConfiguration { name: String, message: String },

    #[error("[{0}] Rule is risky and risky rules are not allowed.")]
    RiskyNotAllowed(String),

    #[error("Rule contains conflicting fixers:\n{}", format_conflicts(.0))]
    ConflictingFixers(Vec<(String, String)>),

    #[error("Priority constraints form a cycle between: {}", .0.join(", "))]
    PriorityCycle(Vec<String>),

    #[error("Fixer named \"{0}\" is already registered.")]
    DuplicateFixer(String),

    #[error("Fixer named \"{0}\" has invalid name.")]
    InvalidFixerName(String),

    #[error(transparent)]
    RuleSet(#[from] RuleSetError),
}

fn format_conflicts(conflicts: &[(String, String)]) -> String {
    conflicts
        .iter()
        .map(|(a, b)| format!("- \"{a}\" with \"{b}\""))
        .collect::<Vec<_>>()
        .join("\n")
}
