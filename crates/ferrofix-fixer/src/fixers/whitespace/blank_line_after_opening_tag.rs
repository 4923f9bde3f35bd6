//! Blank line after opening tag fixer
//!
//! Ensures there's a blank line after the opening PHP tag.

use ferrofix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// Ensures there's a blank line after the opening PHP tag
pub struct BlankLineAfterOpeningTagFixer;

impl Fixer for BlankLineAfterOpeningTagFixer {
    fn name(&self) -> &'static str {
        "blank_line_after_opening_tag"
    }

    fn description(&self) -> &'static str {
        "Ensure there is no code on the same line as the PHP open tag and it is followed by a blank line."
    }

    fn priority(&self) -> i32 {
        1
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_monolithic_php() && !tokens.is_token_kind_found(TokenKind::OpenTagWithEcho)
    }

    fn fix(&self, tokens: &mut Tokens, context: &FixContext<'_>) -> Result<(), FixerError> {
        let line_ending = context.line_ending();
        if !tokens.get(0).is_some_and(|t| t.is_given_kind(TokenKind::OpenTag)) {
            return Ok(());
        }

        // single line files are left alone
        let multiline = tokens
            .iter()
            .any(|t| t.is_given_kind(TokenKind::Whitespace) && t.content().contains('\n'));
        if !multiline {
            return Ok(());
        }

        let open_tag = tokens[0].content();
        if !open_tag.contains('\n') {
            let open_tag = format!("{}{line_ending}", open_tag.trim_end());
            tokens.set(0, Token::new(TokenKind::OpenTag, open_tag));
        }

        match tokens.get(1) {
            Some(next) if next.content().contains('\n') => {}
            Some(next) if next.is_whitespace(None) => {
                let whitespace = format!("{line_ending}{}", next.content());
                tokens.set(1, Token::whitespace(whitespace));
            }
            _ => tokens.insert_at(1, Token::whitespace(line_ending)),
        }
        Ok(())
    }
}
