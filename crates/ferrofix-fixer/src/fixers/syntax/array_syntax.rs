//! Array syntax fixer
//!
//! Converts between `array()` and `[]` literals. Destructuring targets and
//! index access are never touched since they carry their own token kinds.

use ferrofix_core::{BlockType, Token, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{resolve_configuration, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};

/// Converts `array()` to `[]` or back
pub struct ArraySyntaxFixer {
    short: bool,
}

impl Default for ArraySyntaxFixer {
    fn default() -> Self {
        Self { short: false }
    }
}

impl ArraySyntaxFixer {
    fn fix_to_short(tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        // `array $a` in a signature is a type, not a literal
        let Some(open) = tokens
            .get_next_meaningful_token(index)
            .filter(|&open| tokens[open].equals(&TokenPattern::Content("("), true))
        else {
            return Ok(());
        };

        let close = tokens.find_block_end(BlockType::Parenthesis, open)?;
        tokens.set(open, Token::new(TokenKind::ArraySquareBraceOpen, "["));
        tokens.set(close, Token::new(TokenKind::ArraySquareBraceClose, "]"));
        tokens.clear_token_and_merge_surrounding_whitespace(index);
        Ok(())
    }

    fn fix_to_long(tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        let close = tokens.find_block_end(BlockType::ArraySquareBrace, index)?;
        tokens.set(index, Token::simple("("));
        tokens.set(close, Token::simple(")"));
        tokens.insert_at(index, Token::new(TokenKind::Array, "array"));
        Ok(())
    }
}

impl Fixer for ArraySyntaxFixer {
    fn name(&self) -> &'static str {
        "array_syntax"
    }

    fn description(&self) -> &'static str {
        "PHP arrays should be declared using the configured syntax."
    }

    fn priority(&self) -> i32 {
        1
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        if self.short {
            tokens.is_token_kind_found(TokenKind::Array)
        } else {
            tokens.is_token_kind_found(TokenKind::ArraySquareBraceOpen)
        }
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        if self.short {
            for index in tokens.find_given_kind(TokenKind::Array, 0, None).into_iter().rev() {
                Self::fix_to_short(tokens, index)?;
            }
        } else {
            let opens = tokens.find_given_kind(TokenKind::ArraySquareBraceOpen, 0, None);
            for index in opens.into_iter().rev() {
                Self::fix_to_long(tokens, index)?;
            }
        }
        Ok(())
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "syntax",
            description: "Whether to use the `long` or `short` array syntax.",
            option_type: OptionType::Enum(vec!["long", "short"]),
            default: Some("long".into()),
        }]
    }

    fn configure(&mut self, config: &FixerConfiguration) -> Result<(), String> {
        let resolved = resolve_configuration(&self.options(), config)?;
        self.short = resolved.get("syntax").and_then(|v| v.as_str()) == Some("short");
        Ok(())
    }
}
