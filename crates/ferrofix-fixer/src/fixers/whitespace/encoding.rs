//! Ensure UTF-8 encoding without BOM

use ferrofix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

const BOM: &str = "\u{FEFF}";

/// Strips the UTF-8 byte order mark from the start of the file
pub struct EncodingFixer;

impl Fixer for EncodingFixer {
    fn name(&self) -> &'static str {
        "encoding"
    }

    fn description(&self) -> &'static str {
        "PHP code MUST use only UTF-8 without BOM (remove BOM)."
    }

    fn priority(&self) -> i32 {
        100 // Highest priority - should run first
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        // the BOM always lexes as inline HTML in front of the open tag
        tokens
            .get(0)
            .is_some_and(|t| t.is_given_kind(TokenKind::InlineHtml) && t.content().starts_with(BOM))
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        let rest = tokens[0].content()[BOM.len()..].to_string();
        if rest.is_empty() {
            tokens.clear_at(0);
        } else {
            tokens.set(0, Token::new(TokenKind::InlineHtml, rest));
        }
        Ok(())
    }
}
