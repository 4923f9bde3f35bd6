//! Syntax fixers
//!
//! Fixers for PHP syntax modernization and style.

mod array_syntax;

pub use array_syntax::ArraySyntaxFixer;
