//! Remove empty comments

use std::sync::OnceLock;

use ferrofix_core::{TokenKind, Tokens};
use regex::Regex;

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentType {
    Hash,
    SlashAsterisk,
    DoubleSlash,
}

impl CommentType {
    fn of(content: &str) -> Self {
        if content.starts_with('#') {
            CommentType::Hash
        } else if content.as_bytes().get(1) == Some(&b'*') {
            CommentType::SlashAsterisk
        } else {
            CommentType::DoubleSlash
        }
    }
}

fn is_empty_comment(content: &str) -> bool {
    static HASH: OnceLock<Regex> = OnceLock::new();
    static SLASH_ASTERISK: OnceLock<Regex> = OnceLock::new();
    static DOUBLE_SLASH: OnceLock<Regex> = OnceLock::new();

    let regex = match CommentType::of(content) {
        CommentType::Hash => HASH.get_or_init(|| Regex::new(r"^#\s*$").unwrap()),
        CommentType::SlashAsterisk => SLASH_ASTERISK.get_or_init(|| Regex::new(r"^/\*[\s\*]*\*+/$").unwrap()),
        CommentType::DoubleSlash => DOUBLE_SLASH.get_or_init(|| Regex::new(r"^//\s*$").unwrap()),
    };
    regex.is_match(content)
}

/// Number of line breaks, `\r\n` counting once
fn line_break_count(content: &str) -> usize {
    content.matches('\n').count() + content.matches('\r').count() - content.matches("\r\n").count()
}

/// Run of same-type comments separated by single line breaks
struct CommentBlock {
    start: usize,
    end: usize,
    is_empty: bool,
}

/// Removes comments that have no content
pub struct NoEmptyCommentFixer;

impl NoEmptyCommentFixer {
    fn comment_block(tokens: &Tokens, start: usize) -> CommentBlock {
        let content = tokens[start].content();
        let comment_type = CommentType::of(content);
        let mut is_empty = is_empty_comment(content);
        if comment_type == CommentType::SlashAsterisk {
            return CommentBlock { start, end: start, is_empty };
        }

        let mut index = start + 1;
        while index < tokens.len() {
            let token = &tokens[index];
            if token.is_comment() {
                if CommentType::of(token.content()) != comment_type {
                    break;
                }
                is_empty = is_empty && is_empty_comment(token.content());
            } else if !token.is_whitespace(None) || line_break_count(token.content()) > 1 {
                break;
            }
            index += 1;
        }
        CommentBlock { start, end: index - 1, is_empty }
    }
}

impl Fixer for NoEmptyCommentFixer {
    fn name(&self) -> &'static str {
        "no_empty_comment"
    }

    fn description(&self) -> &'static str {
        "There should not be any empty comments."
    }

    fn priority(&self) -> i32 {
        2
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::Comment)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        let mut index = 1;
        while index < tokens.len() {
            if !tokens[index].is_given_kind(TokenKind::Comment) {
                index += 1;
                continue;
            }

            let block = Self::comment_block(tokens, index);
            if block.is_empty {
                for i in block.start..=block.end {
                    tokens.clear_token_and_merge_surrounding_whitespace(i);
                }
            }
            index = block.end + 1;
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
    #[case("<?php echo 0;\necho 1;", Some("<?php echo 0;//\necho 1;"))]
    #[case("<?php echo 0;\necho 1;", Some("<?php echo 0;#   \necho 1;"))]
    #[case("<?php\n$a = 1;\n\n$b = 2;", Some("<?php\n$a = 1;\n/* */\n$b = 2;"))]
    #[case("<?php\n$a = 1;\n\n$b = 2;", Some("<?php\n$a = 1;\n/**/\n$b = 2;"))]
    #[case("<?php\n$a = 1;\n\n$b = 2;", Some("<?php\n$a = 1;\n/*\n *\n */\n$b = 2;"))]
    #[case("<?php\n$a = 1;\n\n\n$b = 2;", Some("<?php\n$a = 1;\n//\n//\n$b = 2;"))]
    #[case("<?php\n// foo\n\n\n$a = 1;", Some("<?php\n// foo\n\n//\n$a = 1;"))]
    #[case("<?php\n# foo\n\n$a = 1;", Some("<?php\n# foo\n//\n$a = 1;"))]
    #[case("<?php\n//\n// foo\n//\n$a = 1;", None)]
    #[case("<?php\n$a = 1; // not empty\n", None)]
    #[case("<?php\n/* foo */\n$a = 1;", None)]
    #[case("<?php\n#[Attr]\nfunction foo() {}", None)]
    fn test_fix(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&NoEmptyCommentFixer, expected, input);
    }

    #[rstest]
    #[case("#", true)]
    #[case("# \t", true)]
    #[case("//", true)]
    #[case("/***/", true)]
    #[case("/* * */", true)]
    #[case("// x", false)]
    #[case("/* x */", false)]
    fn test_is_empty_comment(#[case] content: &str, #[case] expected: bool) {
        assert_eq!(is_empty_comment(content), expected);
    }

    #[test]
    fn test_line_break_count() {
        assert_eq!(line_break_count("\r\n\n\r"), 3);
        assert_eq!(line_break_count("  "), 0);
    }
}
