//! Full opening tag fixer
//!
//! PHP code must use the long `<?php` tag: short `<?` tags and case variants
//! such as `<?PHP` are rewritten. `<?=` is left alone.

use ferrofix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

/// Ensures PHP uses full opening tags
pub struct FullOpeningTagFixer;

impl FullOpeningTagFixer {
    fn fixed_tag(tokens: &Tokens, index: usize) -> Option<String> {
        let content = tokens[index].content();
        if let Some(tag) = content.get(..5).filter(|tag| tag.eq_ignore_ascii_case("<?php")) {
            return (tag != "<?php").then(|| format!("<?php{}", &content[5..]));
        }

        // `<?xml` and friends stay as they are
        let followed_by_whitespace = tokens
            .get(index + 1)
            .map_or(true, |next| next.is_given_kind(TokenKind::Whitespace));
        (content == "<?" && followed_by_whitespace).then(|| "<?php".to_string())
    }
}

impl Fixer for FullOpeningTagFixer {
    fn name(&self) -> &'static str {
        "full_opening_tag"
    }

    fn description(&self) -> &'static str {
        "PHP code must use the long `<?php` tags or short-echo `<?=` tags and not other tag variations."
    }

    fn priority(&self) -> i32 {
        98 // Must run before most other fixers
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::OpenTag)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in tokens.find_given_kind(TokenKind::OpenTag, 0, None) {
            if let Some(tag) = Self::fixed_tag(tokens, index) {
                tokens.set(index, Token::new(TokenKind::OpenTag, tag));
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
    #[case("<?php echo \"Hello!\";", None)]
    #[case("<?php echo \"Hello!\";", Some("<? echo \"Hello!\";"))]
    #[case("<?php\necho \"Hello!\";", Some("<?\necho \"Hello!\";"))]
    #[case("<?php echo 'Foo';", Some("<?PHP echo 'Foo';"))]
    #[case("<?php\n$a = 1;\n", Some("<?Php\n$a = 1;\n"))]
    #[case("<?php", Some("<?"))]
    #[case("<?php", Some("<?pHP"))]
    #[case("foo <?php  echo \"Bar\"; ?>", Some("foo <?  echo \"Bar\"; ?>"))]
    #[case("<?= 1 ?>", None)]
    #[case("<?php $a = '<? echo 1;';", None)]
    fn test_fix(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&FullOpeningTagFixer, expected, input);
    }

    #[test]
    fn test_several_tags() {
        do_test(
            &FullOpeningTagFixer,
            "<?php echo 1; ?>\n<p>x</p>\n<?php echo 2;",
            Some("<? echo 1; ?>\n<p>x</p>\n<?PHP echo 2;"),
        );
    }
}
