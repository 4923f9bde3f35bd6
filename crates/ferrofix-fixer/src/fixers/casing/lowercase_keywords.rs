//! Lowercase PHP keywords

use ferrofix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// Ensures PHP keywords are lowercase
pub struct LowercaseKeywordsFixer;

impl Fixer for LowercaseKeywordsFixer {
    fn name(&self) -> &'static str {
        "lowercase_keywords"
    }

    fn description(&self) -> &'static str {
        "PHP keywords MUST be in lower case."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.iter().any(Token::is_keyword)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in 0..tokens.len() {
            let token = &tokens[index];
            // `__HALT_COMPILER` is conventionally upper case
            if !token.is_keyword() || token.is_given_kind(TokenKind::HaltCompiler) {
                continue;
            }
            let lower = token.content().to_ascii_lowercase();
            if lower != token.content() {
                let token = token.with_content(lower);
                tokens.set(index, token);
            }
        }
        Ok(())
    }
}
