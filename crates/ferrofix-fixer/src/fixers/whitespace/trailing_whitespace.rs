//! Remove trailing whitespace from lines

use ferrofix_core::{Direction, Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// Removes trailing whitespace at the end of lines
pub struct NoTrailingWhitespaceFixer;

fn leading_line_break_len(content: &str) -> usize {
    if content.starts_with("\r\n") {
        2
    } else if content.starts_with(['\n', '\r']) {
        1
    } else {
        0
    }
}

impl NoTrailingWhitespaceFixer {
    /// `<?php ` followed by a line break: the break moves into the tag
    fn fix_open_tag(tokens: &mut Tokens, index: usize) {
        let Some(next) = tokens.get(index + 1).filter(|t| t.is_given_kind(TokenKind::Whitespace)) else {
            return;
        };
        let tag = tokens[index].content();
        let break_len = leading_line_break_len(next.content());
        if break_len == 0 || !tag.ends_with([' ', '\t']) {
            return;
        }

        let tag = format!("{}{}", &tag[..tag.len() - 1], &next.content()[..break_len]);
        let rest = next.content()[break_len..].to_string();
        tokens.set(index, Token::new(TokenKind::OpenTag, tag));
        if rest.is_empty() {
            tokens.clear_at(index + 1);
        } else {
            tokens.set(index + 1, Token::whitespace(rest));
        }
    }

    fn fix_whitespace(tokens: &mut Tokens, index: usize) {
        let content = tokens[index].content();
        let is_last = tokens.get_non_empty_sibling(index, Direction::Next).is_none();
        let first_break = content.find(['\n', '\r']);
        if first_break.is_none() && !is_last {
            return;
        }

        // right after `<?php\n` the first segment is indentation, not trailing
        let after_open_tag_line = index
            .checked_sub(1)
            .map(|prev| &tokens[prev])
            .is_some_and(|prev| prev.is_given_kind(TokenKind::OpenTag) && prev.content().ends_with(['\n', '\r']));
        if after_open_tag_line {
            return;
        }

        let (first, rest) = content.split_at(first_break.unwrap_or(content.len()));
        let fixed = format!("{}{rest}", first.trim_end_matches([' ', '\t']));
        if fixed.is_empty() {
            tokens.clear_at(index);
        } else {
            tokens.set(index, Token::whitespace(fixed));
        }
    }
}

impl Fixer for NoTrailingWhitespaceFixer {
    fn name(&self) -> &'static str {
        "no_trailing_whitespace"
    }

    fn description(&self) -> &'static str {
        "Remove trailing whitespace at the end of non-blank lines."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, _tokens: &Tokens) -> bool {
        true
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in (0..tokens.len()).rev() {
            let token = &tokens[index];
            if token.is_given_kind(TokenKind::OpenTag) {
                Self::fix_open_tag(tokens, index);
            } else if token.is_given_kind(TokenKind::Whitespace) {
                Self::fix_whitespace(tokens, index);
            }
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
    #[case("<?php\n$a = 1;", Some("<?php\n$a = 1;   "))]
    #[case("<?php\n$a = 1  ;", Some("<?php\n$a = 1  ;   "))]
    #[case("<?php\n$b = 1;", Some("<?php\n$b = 1;\t\t"))]
    #[case("<?php\n$b = 1;\n$c = 1;", Some("<?php\n$b = 1;   \n$c = 1;"))]
    #[case("<?php\n$b = 1;\n$c = 1;", Some("<?php\n$b = 1;\t\n$c = 1;"))]
    #[case("<?php\n$b = 1;\r\n$c = 1;", Some("<?php\n$b = 1; \r\n$c = 1;"))]
    #[case("<?php\n$a = 1;\n    $b = 1;", None)]
    #[case("<?php\n$a = 1;", Some("<?php \n$a = 1;"))]
    #[case("<?php\n$a = 1;", Some("<?php  \n$a = 1;"))]
    #[case("<?php\n\n$a = 1;", Some("<?php \n\n$a = 1;"))]
    #[case("<?php\n$a = 'foo   \nbar';", None)]
    #[case("<?php\n$a = <<<EOT\nfoo   \nEOT;\n", None)]
    #[case("<?php\n    \n$a = 1;", None)]
    #[case("<?php echo 1; ?>\n<p>  \n</p>", None)]
    fn test_fix(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&NoTrailingWhitespaceFixer, expected, input);
    }

    #[test]
    fn test_inside_class() {
        do_test(
            &NoTrailingWhitespaceFixer,
            "<?php\nclass Foo\n{\n    public $bar;\n\n    public function baz()\n    {\n    }\n}\n",
            Some("<?php\nclass Foo\n{ \n    public $bar;  \n\n    public function baz()\t\n    {\n    }\n}\n"),
        );
    }
}
