//! Lowercase type casts

use ferrofix_core::{Token, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// `(INT) $a` becomes `(int) $a`
pub struct LowercaseCastFixer;

impl Fixer for LowercaseCastFixer {
    fn name(&self) -> &'static str {
        "lowercase_cast"
    }

    fn description(&self) -> &'static str {
        "Cast should be written in lower case."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.iter().any(Token::is_cast)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in 0..tokens.len() {
            let token = &tokens[index];
            if token.is_cast() {
                let token = token.with_content(token.content().to_ascii_lowercase());
                tokens.set(index, token);
            }
        }
        Ok(())
    }
}
