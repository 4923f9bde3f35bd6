//! Normalize case of PHP constants (true, false, null)

use ferrofix_core::{Token, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{resolve_configuration, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};

/// Neighbours that turn `true`, `false` or `null` into a name
const FORBIDDEN_NEIGHBOURS: &[TokenKind] = &[
    TokenKind::As,
    TokenKind::Class,
    TokenKind::Const,
    TokenKind::Extends,
    TokenKind::Implements,
    TokenKind::InstanceOf,
    TokenKind::InsteadOf,
    TokenKind::Interface,
    TokenKind::New,
    TokenKind::NsSeparator,
    TokenKind::ObjectOperator,
    TokenKind::NullsafeObjectOperator,
    TokenKind::DoubleColon,
    TokenKind::Trait,
    TokenKind::Use,
    TokenKind::UseTrait,
    TokenKind::Function,
];

const BRACES: &[TokenPattern<'static>] = &[TokenPattern::Content("{"), TokenPattern::Content("}")];

/// Ensures true, false, null are lowercase (by default) or uppercase
pub struct ConstantCaseFixer {
    upper: bool,
}

impl Default for ConstantCaseFixer {
    fn default() -> Self {
        Self { upper: false }
    }
}

fn is_neighbour_accepted(token: Option<&Token>) -> bool {
    token.map_or(true, |token| {
        !token.equals_any(BRACES, true) && !token.is_any_kind(FORBIDDEN_NEIGHBOURS)
    })
}

impl Fixer for ConstantCaseFixer {
    fn name(&self) -> &'static str {
        "constant_case"
    }

    fn description(&self) -> &'static str {
        "The PHP constants `true`, `false`, and `null` MUST be written using the correct casing."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::String)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in 0..tokens.len() {
            if !tokens[index].is_native_constant() {
                continue;
            }

            let mut prev = tokens.get_prev_meaningful_token(index);
            // a leading `\` only marks the global namespace
            if let Some(separator) = prev.filter(|&i| tokens[i].is_given_kind(TokenKind::NsSeparator)) {
                let before = tokens.get_prev_meaningful_token(separator);
                if !before.is_some_and(|i| tokens[i].is_given_kind(TokenKind::String)) {
                    prev = before;
                }
            }
            let prev = prev.map(|i| &tokens[i]);
            let next = tokens.get_next_meaningful_token(index).map(|i| &tokens[i]);
            if !is_neighbour_accepted(prev) || !is_neighbour_accepted(next) {
                continue;
            }

            let content = tokens[index].content();
            let fixed = if self.upper {
                content.to_ascii_uppercase()
            } else {
                content.to_ascii_lowercase()
            };
            let token = tokens[index].with_content(fixed);
            tokens.set(index, token);
        }
        Ok(())
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "case",
            description: "Whether to use the `upper` or `lower` case syntax.",
            option_type: OptionType::Enum(vec!["lower", "upper"]),
            default: Some("lower".into()),
        }]
    }

    fn configure(&mut self, config: &FixerConfiguration) -> Result<(), String> {
        let resolved = resolve_configuration(&self.options(), config)?;
        self.upper = resolved.get("case").and_then(|v| v.as_str()) == Some("upper");
        Ok(())
    }
}
