//! Integration tests for tokenizing and rewriting whole sources

use ferrofix_core::{tokenize, BlockType, Token, TokenKind, TokenPattern, Tokens, TokensCache};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SAMPLE: &str = r#"<?php
declare(strict_types=1);

namespace App\Service;

use App\Model\{User, Group};

#[Service]
final class Greeter
{
    private array $names = ['a' => 1, 'b' => [2, 3]];

    public function greet(string $who): string
    {
        [$first, [$second]] = $this->names;
        $key = $this->{$who}[0] ?? (new Fallback())->name();
        echo <<<EOT
            Hello {$who}!
            EOT;
        return "Hi {$who}" . (string) $key; // done
    }
}
"#;

#[test]
fn test_sample_round_trips_and_lints() {
    let tokens = tokenize(SAMPLE).expect("sample is valid");
    assert_eq!(tokens.generate_code(), SAMPLE);
    assert!(!tokens.is_changed());
    assert!(tokens.is_monolithic_php());
}

#[test]
fn test_sample_custom_kinds() {
    let tokens = Tokens::from_code(SAMPLE);
    for kind in [
        TokenKind::GroupImportBraceOpen,
        TokenKind::ArraySquareBraceOpen,
        TokenKind::DestructuringSquareBraceOpen,
        TokenKind::DynamicPropBraceOpen,
        TokenKind::BraceClassInstantiationOpen,
        TokenKind::AttributeClose,
    ] {
        assert!(tokens.is_token_kind_found(kind), "{kind:?} not found");
    }
    assert_eq!(tokens.count_token_kind(TokenKind::DestructuringSquareBraceOpen), 2);
}

#[test]
fn test_every_block_in_sample_is_balanced() {
    let tokens = Tokens::from_code(SAMPLE);
    let mut seen = 0;
    for index in 0..tokens.len() {
        if let Some(edge) = Tokens::detect_block_type(&tokens[index]) {
            if edge.is_start {
                let end = tokens.find_block_end(edge.block, index).unwrap();
                assert_eq!(tokens.find_block_start(edge.block, end).unwrap(), index);
                seen += 1;
            }
        }
    }
    assert!(seen > 10);
}

#[test]
fn test_rewrite_method_body() {
    let mut tokens = Tokens::from_code(SAMPLE);
    let found = tokens
        .find_sequence(
            &[
                TokenPattern::Kind(TokenKind::Function),
                TokenPattern::KindContent(TokenKind::String, "GREET"),
                TokenPattern::Content("("),
            ],
            0,
            None,
            false,
        )
        .unwrap()
        .expect("method signature");
    let open_paren = *found.keys().last().unwrap();
    let close_paren = tokens.find_block_end(BlockType::Parenthesis, open_paren).unwrap();
    tokens.clear_range(open_paren + 1, close_paren - 1);
    tokens.clear_empty_tokens();

    assert!(tokens.is_changed());
    assert!(tokens.generate_code().contains("public function greet(): string"));
}

#[test]
fn test_cache_serves_rewritten_code() {
    let mut cache = TokensCache::new();
    let mut tokens = cache.tokenize("<?php echo 1;");
    tokens.set(3, Token::new(TokenKind::LNumber, "2"));
    cache.insert(&tokens);

    let again = cache.tokenize("<?php echo 2;");
    assert_eq!(again, tokens);
    assert_eq!(cache.len(), 2);
}

fn php_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("$a".to_string()),
        Just(" ".to_string()),
        Just("\n".to_string()),
        Just(";".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("->".to_string()),
        Just("echo".to_string()),
        Just("'str'".to_string()),
        Just("\"x{$a}\"".to_string()),
        Just("// c\n".to_string()),
        Just("/* c */".to_string()),
        Just("(int)".to_string()),
        Just("\\".to_string()),
        Just("?>".to_string()),
        Just("<?php ".to_string()),
        "[a-z0-9_]{1,6}",
    ]
}

proptest! {
    #[test]
    fn prop_tokenization_round_trips(parts in prop::collection::vec(php_fragment(), 0..40)) {
        let source = format!("<?php {}", parts.concat());
        let tokens = Tokens::from_code(&source);
        prop_assert_eq!(tokens.generate_code(), source);
        prop_assert!(!tokens.is_changed());
    }

    #[test]
    fn prop_arbitrary_text_round_trips(source in "\\PC{0,200}") {
        prop_assert_eq!(Tokens::from_code(&source).generate_code(), source);
    }
}
