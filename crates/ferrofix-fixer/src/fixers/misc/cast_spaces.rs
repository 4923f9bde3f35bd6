//! Cast spaces fixer - control spacing after casts

use ferrofix_core::{Token, Tokens, DEFAULT_WHITESPACE};

use crate::error::FixerError;
use crate::fixers::{resolve_configuration, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};

/// Spacing between a cast and its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CastSpace {
    Single,
    None,
}

/// Removes spaces inside casts and controls the one after them
pub struct CastSpacesFixer {
    space: CastSpace,
}

impl Default for CastSpacesFixer {
    fn default() -> Self {
        Self { space: CastSpace::Single }
    }
}

impl Fixer for CastSpacesFixer {
    fn name(&self) -> &'static str {
        "cast_spaces"
    }

    fn description(&self) -> &'static str {
        "A single space or none should be between cast and variable."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.iter().any(Token::is_cast)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in (0..tokens.len()).rev() {
            let token = &tokens[index];
            if !token.is_cast() {
                continue;
            }

            let compact: String = token.content().chars().filter(|c| !DEFAULT_WHITESPACE.contains(*c)).collect();
            let token = token.with_content(compact);
            tokens.set(index, token);

            let next_is_whitespace = tokens.get(index + 1).map(|next| next.is_whitespace(None));
            match (self.space, next_is_whitespace) {
                (CastSpace::Single, Some(true)) => {
                    // a line break after the cast is kept
                    if tokens[index + 1].is_whitespace(Some(" \t")) {
                        tokens.set(index + 1, Token::whitespace(" "));
                    }
                }
                (CastSpace::Single, Some(false)) => tokens.insert_at(index + 1, Token::whitespace(" ")),
                (CastSpace::None, Some(true)) => tokens.clear_at(index + 1),
                _ => {}
            }
        }
        Ok(())
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "space",
            description: "Spacing to apply between cast and variable.",
            option_type: OptionType::Enum(vec!["none", "single"]),
            default: Some("single".into()),
        }]
    }

    fn configure(&mut self, config: &FixerConfiguration) -> Result<(), String> {
        let resolved = resolve_configuration(&self.options(), config)?;
        self.space = match resolved.get("space").and_then(|v| v.as_str()) {
            Some("none") => CastSpace::None,
            _ => CastSpace::Single,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::test_support::{configured, do_test};
    use rstest::rstest;

    #[rstest]
    #[case("<?php echo \"( int ) $foo\";", None)]
    #[case("<?php $bar = (int) $foo;", Some("<?php $bar = ( int)$foo;"))]
    #[case("<?php $bar = (int) $foo;", Some("<?php $bar = (\tint )$foo;"))]
    #[case("<?php $bar = (string) $foo;", Some("<?php $bar = ( string )  $foo;"))]
    #[case("<?php $bar = (array) $foo;", Some("<?php $bar = (array)\t$foo;"))]
    #[case("<?php $bar = (int)\n$foo;", Some("<?php $bar = ( int )\n$foo;"))]
    #[case("<?php $bar = (bool) (int) $foo;", Some("<?php $bar = (bool)(int)$foo;"))]
    #[case("<?php $bar = (int) $foo;", None)]
    fn test_fix_single(#[case] expected: &str, #[case] input: Option<&str>) {
        do_test(&CastSpacesFixer::default(), expected, input);
    }

    #[rstest]
    #[case("<?php $bar = (int)$foo;", Some("<?php $bar = ( int)$foo;"))]
    #[case("<?php $bar = (string)$foo;", Some("<?php $bar = ( string )  $foo;"))]
    #[case("<?php $bar = (object)$foo;", Some("<?php $bar = (object)\n$foo;"))]
    #[case("<?php $bar = (int)$foo;", None)]
    fn test_fix_none(#[case] expected: &str, #[case] input: Option<&str>) {
        let fixer = configured(CastSpacesFixer::default(), &[("space", "none".into())]);
        do_test(&fixer, expected, input);
    }
}
