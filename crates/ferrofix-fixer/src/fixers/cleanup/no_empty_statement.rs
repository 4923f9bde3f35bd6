//! Remove useless semicolons

use ferrofix_core::{BlockType, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

const SEMICOLON: TokenPattern<'static> = TokenPattern::Content(";");
const CURLY_OPEN: TokenPattern<'static> = TokenPattern::Content("{");
const CURLY_CLOSE: TokenPattern<'static> = TokenPattern::Content("}");
const PAREN_CLOSE: TokenPattern<'static> = TokenPattern::Content(")");

/// Removes empty statements: `;;`, `{;` and `;` after most block ends
pub struct NoEmptyStatementFixer;

impl NoEmptyStatementFixer {
    /// `}` followed by `;`: the semicolon goes unless the block is an expression
    fn fix_after_curly_close(tokens: &mut Tokens, index: usize, curly_close: usize) -> Result<(), FixerError> {
        let curly_open = tokens.find_block_start(BlockType::CurlyBrace, curly_close)?;
        let Some(before_open) = tokens.get_prev_meaningful_token(curly_open) else {
            return Ok(());
        };

        let token = &tokens[before_open];
        let plain_block = token.is_any_kind(&[TokenKind::Else, TokenKind::Finally, TokenKind::Namespace, TokenKind::OpenTag])
            || token.equals_any(&[SEMICOLON, CURLY_OPEN, CURLY_CLOSE], true);
        if plain_block {
            tokens.clear_token_and_merge_surrounding_whitespace(index);
            return Ok(());
        }

        if token.is_given_kind(TokenKind::String) {
            if Self::is_named_declaration(tokens, before_open) {
                tokens.clear_token_and_merge_surrounding_whitespace(index);
            }
            return Ok(());
        }

        if !token.equals(&PAREN_CLOSE, true) {
            return Ok(());
        }
        let paren_open = tokens.find_block_start(BlockType::Parenthesis, before_open)?;
        let Some(before_paren) = tokens.get_prev_meaningful_token(paren_open) else {
            return Ok(());
        };

        let token = &tokens[before_paren];
        let control_structure = token.is_any_kind(&[
            TokenKind::If,
            TokenKind::ElseIf,
            TokenKind::For,
            TokenKind::Foreach,
            TokenKind::While,
            TokenKind::Switch,
            TokenKind::Catch,
            TokenKind::Declare,
        ]);
        let function_declaration = token.is_given_kind(TokenKind::String)
            && tokens
                .get_prev_meaningful_token(before_paren)
                .is_some_and(|prev| tokens[prev].is_given_kind(TokenKind::Function));
        if control_structure || function_declaration {
            tokens.clear_token_and_merge_surrounding_whitespace(index);
        }
        Ok(())
    }

    /// Namespace or named class-like declaration ending in the name at `name`
    fn is_named_declaration(tokens: &Tokens, name: usize) -> bool {
        let mut index = tokens.get_prev_meaningful_token(name);
        while let Some(i) = index {
            let token = &tokens[i];
            let in_header = token.equals(&TokenPattern::Content(","), true)
                || token.is_any_kind(&[TokenKind::String, TokenKind::NsSeparator, TokenKind::Extends, TokenKind::Implements]);
            if !in_header {
                break;
            }
            index = tokens.get_prev_meaningful_token(i);
        }

        let Some(index) = index else {
            return false;
        };
        let token = &tokens[index];
        if token.is_given_kind(TokenKind::Namespace) {
            return true;
        }
        let anonymous = tokens
            .get_prev_meaningful_token(index)
            .is_some_and(|prev| tokens[prev].is_given_kind(TokenKind::New));
        token.is_any_kind(&[TokenKind::Class, TokenKind::Interface, TokenKind::Trait]) && !anonymous
    }
}

impl Fixer for NoEmptyStatementFixer {
    fn name(&self) -> &'static str {
        "no_empty_statement"
    }

    fn description(&self) -> &'static str {
        "Remove useless (semicolon) statements."
    }

    fn priority(&self) -> i32 {
        26
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.iter().any(|t| t.equals(&SEMICOLON, true))
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        let mut index = 0;
        while index < tokens.len() {
            // `for ($i = 0; ; ++$i)` keeps its empty parts
            if tokens[index].is_given_kind(TokenKind::For) {
                if let Some(open) = tokens.get_next_meaningful_token(index) {
                    index = tokens.find_block_end(BlockType::Parenthesis, open)?;
                }
                index += 1;
                continue;
            }

            if tokens[index].equals(&SEMICOLON, true) {
                if let Some(prev) = tokens.get_prev_meaningful_token(index) {
                    let token = &tokens[prev];
                    if token.equals_any(&[CURLY_OPEN, SEMICOLON], true) || token.is_given_kind(TokenKind::OpenTag) {
                        tokens.clear_token_and_merge_surrounding_whitespace(index);
                    } else if token.equals(&CURLY_CLOSE, true) {
                        Self::fix_after_curly_close(tokens, index, prev)?;
                    }
                }
            }
            index += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::test_support::do_test;
    use rstest::rstest;

    #[rstest]
    #[case("<?php echo 1;\necho 2;", Some("<?php echo 1;;\necho 2;"))]
    #[case("<?php echo 1;\necho 2;", Some("<?php echo 1;;;\necho 2;"))]
    #[case("<?php\n", Some("<?php\n;"))]
    #[case("<?php {echo 1;}", Some("<?php {;echo 1;}"))]
    #[case("<?php { echo 1; }", Some("<?php { echo 1; };"))]
    #[case("<?php if ($a) {\n    echo 1;\n}", Some("<?php if ($a) {\n    echo 1;\n};"))]
    #[case("<?php if ($a) {} elseif ($b) {} else {}", Some("<?php if ($a) {} elseif ($b) {}; else {};"))]
    #[case("<?php while ($a) {}", Some("<?php while ($a) {};"))]
    #[case("<?php foreach ($a as $b) {}", Some("<?php foreach ($a as $b) {};"))]
    #[case("<?php switch ($a) {}", Some("<?php switch ($a) {};"))]
    #[case("<?php try {} catch (E $e) {} finally {}", Some("<?php try {} catch (E $e) {}; finally {};"))]
    #[case("<?php function foo() {}", Some("<?php function foo() {};"))]
    #[case("<?php class Foo {}\necho 1;", Some("<?php class Foo {};\necho 1;"))]
    #[case("<?php class Foo extends Bar implements Baz, \\Qux {}", Some("<?php class Foo extends Bar implements Baz, \\Qux {};"))]
    #[case("<?php interface Foo {}", Some("<?php interface Foo {};"))]
    #[case("<?php namespace Foo\\Bar {}", Some("<?php namespace Foo\\Bar {};"))]
    #[case("<?php for ($i = 0; ; ++$i) {}", None)]
    #[case("<?php for (;;) {}", None)]
    #[case("<?php $a = function () {};", None)]
    #[case("<?php $a = new class {};", None)]
    #[case("<?php $a = new class extends Foo {};", None)]
    #[case("<?php $x = match ($a) {\n    1 => 2,\n};", None)]
    #[case("<?php do {} while ($a);", None)]
    #[case("<?php echo ';;';", None)]
    fn test_fix(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&NoEmptyStatementFixer, expected, input);
    }
}
