//! No spaces around array offset brackets

use ferrofix_core::{BlockType, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{resolve_configuration, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};

const INDEX_OPEN: TokenPattern<'static> = TokenPattern::Content("[");

/// Removes spaces inside and before offset brackets, `$a [ 1 ]` to `$a[1]`
pub struct NoSpacesAroundOffsetFixer {
    inside: bool,
    outside: bool,
}

impl Default for NoSpacesAroundOffsetFixer {
    fn default() -> Self {
        Self { inside: true, outside: true }
    }
}

impl NoSpacesAroundOffsetFixer {
    fn fix_offset(&self, tokens: &mut Tokens, index: usize, block: BlockType) -> Result<(), FixerError> {
        if self.inside {
            let end = tokens.find_block_end(block, index)?;
            // multiline offsets keep their layout
            tokens.remove_leading_whitespace(end, Some(" \t"));
            tokens.remove_trailing_whitespace(index, Some(" \t"));
        }

        if self.outside {
            let after_comment = tokens
                .get_prev_non_whitespace(index, None)
                .is_some_and(|prev| tokens[prev].is_comment());
            if !after_comment {
                tokens.remove_leading_whitespace(index, None);
            }
        }
        Ok(())
    }
}

impl Fixer for NoSpacesAroundOffsetFixer {
    fn name(&self) -> &'static str {
        "no_spaces_around_offset"
    }

    fn description(&self) -> &'static str {
        "There MUST NOT be spaces around offset braces."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::ArrayIndexCurlyBraceOpen)
            || tokens.iter().any(|t| t.equals(&INDEX_OPEN, true))
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in (0..tokens.len()).rev() {
            let token = &tokens[index];
            let block = if token.equals(&INDEX_OPEN, true) {
                BlockType::IndexSquareBrace
            } else if token.is_given_kind(TokenKind::ArrayIndexCurlyBraceOpen) {
                BlockType::ArrayIndexCurlyBrace
            } else {
                continue;
            };
            self.fix_offset(tokens, index, block)?;
        }
        Ok(())
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "positions",
            description: "Whether spacing should be fixed inside and/or outside the offset braces.",
            option_type: OptionType::Subset(vec!["inside", "outside"]),
            default: Some(vec!["inside", "outside"].into()),
        }]
    }

    fn configure(&mut self, config: &FixerConfiguration) -> Result<(), String> {
        let resolved = resolve_configuration(&self.options(), config)?;
        let positions = resolved.get("positions").and_then(|v| v.as_list()).unwrap_or_default();
        self.inside = positions.iter().any(|p| p == "inside");
        self.outside = positions.iter().any(|p| p == "outside");
        Ok(())
    }
}
