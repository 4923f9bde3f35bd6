//! Cleanup fixers
//!
//! Fixers that remove code with no effect: empty statements, empty
//! comments and double negation used as a cast.

mod no_empty_comment;
mod no_empty_statement;
mod no_short_bool_cast;

pub use no_empty_comment::NoEmptyCommentFixer;
pub use no_empty_statement::NoEmptyStatementFixer;
pub use no_short_bool_cast::NoShortBoolCastFixer;
