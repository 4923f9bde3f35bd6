//! Convert between `list()` and `[]` destructuring

use ferrofix_core::{BlockType, Token, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{resolve_configuration, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};

/// List (`array` destructuring) assignment should be declared using the configured syntax
pub struct ListSyntaxFixer {
    short: bool,
}

impl Default for ListSyntaxFixer {
    fn default() -> Self {
        Self { short: false }
    }
}

impl ListSyntaxFixer {
    fn fix_to_short(tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        let Some(open) = tokens.get_next_token_of_kind(index, &[TokenPattern::Content("(")], true) else {
            return Ok(());
        };
        let close = tokens.find_block_end(BlockType::Parenthesis, open)?;
        tokens.set(open, Token::new(TokenKind::DestructuringSquareBraceOpen, "["));
        tokens.set(close, Token::new(TokenKind::DestructuringSquareBraceClose, "]"));
        tokens.clear_token_and_merge_surrounding_whitespace(index);
        Ok(())
    }

    fn fix_to_long(tokens: &mut Tokens, index: usize) {
        const OF_INTEREST: &[TokenPattern<'static>] = &[
            TokenPattern::Kind(TokenKind::DestructuringSquareBraceClose),
            TokenPattern::Content("["),
        ];
        // offsets inside the target keep the short form
        let close = tokens
            .get_next_token_of_kind(index, OF_INTEREST, true)
            .filter(|&close| tokens[close].is_given_kind(TokenKind::DestructuringSquareBraceClose));
        let Some(close) = close else {
            return;
        };
        tokens.set(index, Token::simple("("));
        tokens.set(close, Token::simple(")"));
        tokens.insert_at(index, Token::new(TokenKind::List, "list"));
    }
}

impl Fixer for ListSyntaxFixer {
    fn name(&self) -> &'static str {
        "list_syntax"
    }

    fn description(&self) -> &'static str {
        "List (`array` destructuring) assignment should be declared using the configured syntax."
    }

    fn priority(&self) -> i32 {
        1
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        if self.short {
            tokens.is_token_kind_found(TokenKind::List)
        } else {
            tokens.is_token_kind_found(TokenKind::DestructuringSquareBraceOpen)
        }
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        // inner targets first, insertions only shift what was already handled
        if self.short {
            for index in tokens.find_given_kind(TokenKind::List, 0, None).into_iter().rev() {
                Self::fix_to_short(tokens, index)?;
            }
        } else {
            let opens = tokens.find_given_kind(TokenKind::DestructuringSquareBraceOpen, 0, None);
            for index in opens.into_iter().rev() {
                Self::fix_to_long(tokens, index);
            }
        }
        Ok(())
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "syntax",
            description: "Whether to use the `long` or `short` syntax for array destructuring.",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::test_support::{configured, do_test};
    use rstest::rstest;

    fn short() -> ListSyntaxFixer {
        configured(ListSyntaxFixer::default(), &[("syntax", "short".into())])
    }

    #[rstest]
    #[case("<?php [$x] = $a;", Some("<?php list($x) = $a;"))]
    #[case("<?php [$a, $b] = $c;", Some("<?php LIST($a, $b) = $c;"))]
    #[case("<?php [$a, [$b, $c]] = $d;", Some("<?php list($a, list($b, $c)) = $d;"))]
    #[case("<?php ['a' => $x, 'b' => $y] = $c;", Some("<?php list('a' => $x, 'b' => $y) = $c;"))]
    #[case("<?php foreach ($a as [$b, $c]) {}", Some("<?php foreach ($a as list($b, $c)) {}"))]
    #[case("<?php [$a[0], $b] = $c;", Some("<?php list($a[0], $b) = $c;"))]
    #[case("<?php [$a, $b] = $c;", None)]
    #[case("<?php $foo->list($a);", None)]
    fn test_fix_to_short(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&short(), expected, input);
    }

    #[rstest]
    #[case("<?php list($x) = $a;", Some("<?php [$x] = $a;"))]
    #[case("<?php list($a, list($b, $c)) = $d;", Some("<?php [$a, [$b, $c]] = $d;"))]
    #[case("<?php list('a' => $x) = $c;", Some("<?php ['a' => $x] = $c;"))]
    #[case("<?php foreach ($a as list($b, $c)) {}", Some("<?php foreach ($a as [$b, $c]) {}"))]
    #[case("<?php [$a[0], $b] = $c;", None)]
    #[case("<?php $a = [1, 2];", None)]
    #[case("<?php list($a, $b) = $c;", None)]
    fn test_fix_to_long(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&ListSyntaxFixer::default(), expected, input);
    }
}
