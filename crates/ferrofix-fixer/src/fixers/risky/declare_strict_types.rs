//! Add declare(strict_types=1) to PHP files
//!
//! This is a risky fixer because enabling strict types can cause
//! TypeError exceptions in code that was previously working with
//! type coercion.

use ferrofix_core::{Token, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{FixContext, Fixer};

const STRICT_TYPES_DECLARATION: &[TokenPattern<'static>] = &[
    TokenPattern::Kind(TokenKind::Declare),
    TokenPattern::Content("("),
    TokenPattern::KindContent(TokenKind::String, "strict_types"),
    TokenPattern::Content("="),
    TokenPattern::Kind(TokenKind::LNumber),
    TokenPattern::Content(")"),
];

/// Adds declare(strict_types=1) after the opening PHP tag
pub struct DeclareStrictTypesFixer;

impl DeclareStrictTypesFixer {
    fn insert_declaration(tokens: &mut Tokens, line_ending: &str) {
        let declaration = [
            Token::new(TokenKind::Declare, "declare"),
            Token::simple("("),
            Token::new(TokenKind::String, "strict_types"),
            Token::simple("="),
            Token::new(TokenKind::LNumber, "1"),
            Token::simple(")"),
            Token::simple(";"),
        ];
        let after = 1 + declaration.len();
        tokens.insert_all_at(1, declaration);

        // the declaration shares the line with the open tag
        let tag = format!("{} ", tokens[0].content().trim_end());
        tokens.set(0, Token::new(TokenKind::OpenTag, tag));

        match tokens.get(after) {
            None => {}
            Some(next) if next.is_whitespace(None) => {
                let whitespace = format!("{line_ending}{}", next.content().trim_start_matches([' ', '\t']));
                tokens.set(after, Token::whitespace(whitespace));
            }
            Some(_) => tokens.insert_at(after, Token::whitespace(line_ending)),
        }
    }
}

impl Fixer for DeclareStrictTypesFixer {
    fn name(&self) -> &'static str {
        "declare_strict_types"
    }

    fn description(&self) -> &'static str {
        "Force strict types declaration in all files."
    }

    fn priority(&self) -> i32 {
        2
    }

    fn is_risky(&self) -> bool {
        true
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.get(0).is_some_and(|t| t.is_given_kind(TokenKind::OpenTag))
    }

    fn fix(&self, tokens: &mut Tokens, context: &FixContext<'_>) -> Result<(), FixerError> {
        let found = match tokens.get_next_meaningful_token(0) {
            Some(first) => tokens
                .find_sequence(STRICT_TYPES_DECLARATION, first, None, false)?
                .filter(|sequence| sequence.keys().next() == Some(&first)),
            None => None,
        };

        let Some(sequence) = found else {
            Self::insert_declaration(tokens, context.line_ending());
            return Ok(());
        };

        for (index, token) in sequence {
            if token.is_given_kind(TokenKind::String) {
                tokens.set(index, token.with_content(token.content().to_ascii_lowercase()));
            } else if token.is_given_kind(TokenKind::LNumber) {
                tokens.set(index, token.with_content("1"));
            }
        }
        Ok(())
    }
}
