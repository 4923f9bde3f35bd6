//! ferrofix-core: Token stream engine for PHP style fixing
//!
//! This crate provides:
//! - `Token` / `TokenKind`: a lexical unit and its category
//! - `Tokens`: the mutable stream fixers rewrite, with block matching and
//!   sequence search
//! - `TokensCache`: tokenization memoized by code hash
//! - `Linter`: the syntax gate for input and fixer output
//! - `tokenize()`: lint, then tokenize

pub mod cache;
mod error;
pub mod lexer;
pub mod linter;
mod token;
mod tokens;
mod transformers;

pub use cache::TokensCache;
pub use error::{LintingError, TokensError};
pub use linter::{tokenize, Linter, LintingResult, ProcessLinter, TokenizerLinter};
pub use token::{CaseSensitivity, Token, TokenKind, TokenPattern, DEFAULT_WHITESPACE};
pub use tokens::{BlockEdge, BlockType, Direction, Tokens};
