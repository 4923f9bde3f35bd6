//! Remove whitespace from blank lines

use ferrofix_core::{Direction, Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// Removes whitespace on lines that are otherwise blank
pub struct NoWhitespaceInBlankLineFixer;

fn is_horizontal_whitespace(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == ' ' || c == '\t')
}

/// Split on `\n` and `\r\n`, dropping the breaks
fn split_lines(content: &str) -> Vec<&str> {
    let count = content.split('\n').count();
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i + 1 < count {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            }
        })
        .collect()
}

impl NoWhitespaceInBlankLineFixer {
    fn fix_whitespace(tokens: &mut Tokens, index: usize, line_ending: &str) {
        let prev = &tokens[index - 1];
        let after_open_tag = prev.is_given_kind(TokenKind::OpenTag);
        let open_tag_line_ended = after_open_tag && prev.content().ends_with('\n');
        let has_next = tokens.get_non_empty_sibling(index, Direction::Next).is_some();

        let lines = split_lines(tokens[index].content());
        // a single line break between code is never a blank line
        if lines.len() <= 2 && has_next && !after_open_tag {
            return;
        }

        let l_max = if has_next { lines.len() - 1 } else { lines.len() };
        let l_start = if open_tag_line_ended { 0 } else { 1 };
        let fixed = lines
            .iter()
            .enumerate()
            .map(|(l, line)| {
                if (l_start..l_max).contains(&l) && is_horizontal_whitespace(line) {
                    ""
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join(line_ending);

        if fixed.is_empty() {
            tokens.clear_at(index);
        } else {
            tokens.set(index, Token::whitespace(fixed));
        }
    }
}

impl Fixer for NoWhitespaceInBlankLineFixer {
    fn name(&self) -> &'static str {
        "no_whitespace_in_blank_line"
    }

    fn description(&self) -> &'static str {
        "Remove trailing whitespace at the end of blank lines."
    }

    fn priority(&self) -> i32 {
        -19
    }

    fn is_candidate(&self, _tokens: &Tokens) -> bool {
        true
    }

    fn fix(&self, tokens: &mut Tokens, context: &FixContext<'_>) -> Result<(), FixerError> {
        // the first token is never whitespace
        for index in 1..tokens.len() {
            if tokens[index].is_given_kind(TokenKind::Whitespace) {
                Self::fix_whitespace(tokens, index, context.line_ending());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WhitespaceConfig;
    use crate::fixers::test_support::{do_test, do_test_with};
    use rstest::rstest;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("\r\n  \n"), vec!["", "  ", ""]);
        assert_eq!(split_lines("  "), vec!["  "]);
    }

    #[rstest]
    #[case("<?php\n", Some("<?php\n  "))]
    #[case("<?php\n\n$a = 1;", Some("<?php\n  \n$a = 1;"))]
    #[case("<?php\n$a = 1;\n\n$b = 2;", Some("<?php\n$a = 1;\n    \n$b = 2;"))]
    #[case("<?php\n$a = 1;\n\n\n$b = 2;", Some("<?php\n$a = 1;\n \n\t\n$b = 2;"))]
    #[case("<?php\nif (1) {\n\n    echo 1;\n}", Some("<?php\nif (1) {\n  \n    echo 1;\n}"))]
    #[case("<?php\n$a = 1;\n\n", Some("<?php\n$a = 1;\n   \n   "))]
    #[case("<?php\n$a = 1;   \n", None)]
    #[case("<?php\n    $a = 1;", None)]
    #[case("<?php $a = 1;", None)]
    #[case("<?php\n$a = '\n    \n';", None)]
    fn test_fix(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&NoWhitespaceInBlankLineFixer, expected, input);
    }

    #[rstest]
    #[case("<?php\r\n\r\n$a = 1;", "<?php\r\n   \r\n$a = 1;")]
    #[case("<?php\r\n$a = 1;\r\n\r\n$b = 2;", "<?php\r\n$a = 1;\r\n\t\t\r\n$b = 2;")]
    fn test_messy_whitespaces(#[case] expected: &str, #[case] input: &str) {
        let context = FixContext::new(WhitespaceConfig::parse("\t", "\r\n").unwrap());
        do_test_with(&NoWhitespaceInBlankLineFixer, &context, expected, Some(input));
    }
}
