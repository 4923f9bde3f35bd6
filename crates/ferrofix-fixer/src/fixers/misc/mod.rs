//! Miscellaneous fixers
//!
//! Fixers that don't fit into other categories.

mod cast_spaces;
mod list_syntax;

pub use cast_spaces::CastSpacesFixer;
pub use list_syntax::ListSyntaxFixer;
