//! Whitespace fixers for PHP code formatting
//!
//! These fixers handle the file encoding, opening tags, trailing whitespace,
//! blank lines and spacing around offsets.

mod blank_line_after_opening_tag;
mod encoding;
mod full_opening_tag;
mod no_spaces_around_offset;
mod no_whitespace_in_blank_line;
mod single_blank_line_at_eof;
mod trailing_whitespace;

pub use blank_line_after_opening_tag::BlankLineAfterOpeningTagFixer;
pub use encoding::EncodingFixer;
pub use full_opening_tag::FullOpeningTagFixer;
pub use no_spaces_around_offset::NoSpacesAroundOffsetFixer;
pub use no_whitespace_in_blank_line::NoWhitespaceInBlankLineFixer;
pub use single_blank_line_at_eof::SingleBlankLineAtEofFixer;
pub use trailing_whitespace::NoTrailingWhitespaceFixer;
