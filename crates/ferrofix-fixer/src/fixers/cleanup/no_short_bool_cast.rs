//! Replace `!!` with a boolean cast

use ferrofix_core::{Token, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

const NOT: TokenPattern<'static> = TokenPattern::Content("!");

/// `!!$a` becomes `(bool)$a`
pub struct NoShortBoolCastFixer;

impl NoShortBoolCastFixer {
    /// Look back from the `!` at `index` for another `!`; returns where the scan stopped
    fn fix_short_cast(tokens: &mut Tokens, index: usize) -> usize {
        let mut i = index - 1;
        while i > 1 {
            let token = &tokens[i];
            if token.equals(&NOT, true) {
                Self::fix_to_bool_cast(tokens, i, index);
                break;
            }
            if !token.is_comment() && !token.is_whitespace(None) {
                break;
            }
            i -= 1;
        }
        i
    }

    fn fix_to_bool_cast(tokens: &mut Tokens, start: usize, end: usize) {
        for index in start..=end {
            let token = &tokens[index];
            // comments and the whitespace right after them survive
            let keep = token.is_comment() || (token.is_whitespace(None) && tokens[index - 1].is_comment());
            if !keep {
                tokens.clear_at(index);
            }
        }
        tokens.insert_at(end + 1, Token::new(TokenKind::BoolCast, "(bool)"));
    }
}

impl Fixer for NoShortBoolCastFixer {
    fn name(&self) -> &'static str {
        "no_short_bool_cast"
    }

    fn description(&self) -> &'static str {
        "Short cast `bool` using double exclamation mark should not be used."
    }

    fn priority(&self) -> i32 {
        1
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.iter().filter(|t| t.equals(&NOT, true)).nth(1).is_some()
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        let mut index = tokens.len().saturating_sub(1);
        while index > 1 {
            if tokens[index].equals(&NOT, true) {
                index = Self::fix_short_cast(tokens, index);
            }
            index -= 1;
        }
        Ok(())
    }
}
