//! Ensure single blank line at end of file

use ferrofix_core::{TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// Ensures file ends with exactly one line ending
pub struct SingleBlankLineAtEofFixer;

impl Fixer for SingleBlankLineAtEofFixer {
    fn name(&self) -> &'static str {
        "single_blank_line_at_eof"
    }

    fn description(&self) -> &'static str {
        "A PHP file without end tag must always end with a single empty line feed."
    }

    fn priority(&self) -> i32 {
        -50 // Runs after everything that may touch the end of the file
    }

    fn is_candidate(&self, _tokens: &Tokens) -> bool {
        true
    }

    fn fix(&self, tokens: &mut Tokens, context: &FixContext<'_>) -> Result<(), FixerError> {
        let Some(last) = (0..tokens.len()).rev().find(|&i| !tokens.is_empty_at(i)) else {
            return Ok(());
        };
        if tokens[last].is_any_kind(&[TokenKind::InlineHtml, TokenKind::CloseTag, TokenKind::OpenTag]) {
            return Ok(());
        }

        tokens.ensure_whitespace_at_index(last, 1, context.line_ending());
        Ok(())
    }
}
