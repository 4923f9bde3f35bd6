//! Post-lexing passes that assign custom token kinds
//!
//! The lexer only knows characters: `[` is always a bare `[`. These passes
//! look at the surrounding tokens and retag brackets, braces and keywords
//! whose role differs from the plain one, so block matching and fixers can
//! tell an array literal from an index access, or a trait `use` from an
//! import.

use crate::token::{TokenKind, TokenPattern};
use crate::tokens::{BlockType, Tokens};

/// Run every pass in order. Retagging does not mark the stream as changed.
pub(crate) fn transform(tokens: &mut Tokens) {
    if tokens.is_empty() {
        return;
    }
    transform_brace_class_instantiation(tokens);
    transform_curly_braces(tokens);
    transform_square_braces(tokens);
    transform_namespace_operator(tokens);
    transform_nullable_type(tokens);
    transform_use(tokens);
}

fn is_raw(tokens: &Tokens, index: usize, content: &str) -> bool {
    tokens[index].equals(&TokenPattern::Content(content), true)
}

fn prev_meaningful_is_raw(tokens: &Tokens, index: usize, content: &str) -> bool {
    tokens
        .get_prev_meaningful_token(index)
        .is_some_and(|prev| is_raw(tokens, prev, content))
}

/// `(new Foo())`
fn transform_brace_class_instantiation(tokens: &mut Tokens) {
    const NOT_AFTER: &[TokenKind] = &[
        TokenKind::ArrayIndexCurlyBraceClose,
        TokenKind::ArraySquareBraceClose,
        TokenKind::Array,
        TokenKind::Class,
        TokenKind::ElseIf,
        TokenKind::For,
        TokenKind::Foreach,
        TokenKind::If,
        TokenKind::Static,
        TokenKind::String,
        TokenKind::Switch,
        TokenKind::Variable,
        TokenKind::While,
        TokenKind::Catch,
        TokenKind::Match,
        TokenKind::Declare,
        TokenKind::Fn,
        TokenKind::Function,
        TokenKind::Use,
        TokenKind::Exit,
        TokenKind::Isset,
        TokenKind::Empty,
        TokenKind::Unset,
        TokenKind::List,
        TokenKind::Eval,
    ];

    for index in 0..tokens.len() {
        if !is_raw(tokens, index, "(") {
            continue;
        }
        let opens_new = tokens
            .get_next_meaningful_token(index)
            .is_some_and(|next| tokens[next].is_given_kind(TokenKind::New));
        if !opens_new {
            continue;
        }
        if let Some(prev) = tokens.get_prev_meaningful_token(index) {
            let token = &tokens[prev];
            if token.is_any_kind(NOT_AFTER) || is_raw(tokens, prev, "]") || is_raw(tokens, prev, ")") {
                continue;
            }
        }

        let Ok(end) = tokens.find_block_end(BlockType::Parenthesis, index) else {
            continue;
        };
        tokens.retag(index, TokenKind::BraceClassInstantiationOpen);
        tokens.retag(end, TokenKind::BraceClassInstantiationClose);
    }
}

/// `${$a}`, `$a->{$b}`, `$a{1}` and `use A\{B, C}`
fn transform_curly_braces(tokens: &mut Tokens) {
    for index in 0..tokens.len() {
        if !is_raw(tokens, index, "{") {
            continue;
        }
        let Some(prev) = tokens.get_prev_meaningful_token(index) else {
            continue;
        };

        let prev_token = &tokens[prev];
        let kinds = if is_raw(tokens, prev, "$") {
            (TokenKind::DynamicVarBraceOpen, TokenKind::DynamicVarBraceClose)
        } else if prev_token.is_any_kind(&[TokenKind::ObjectOperator, TokenKind::NullsafeObjectOperator]) {
            (TokenKind::DynamicPropBraceOpen, TokenKind::DynamicPropBraceClose)
        } else if prev_token.is_given_kind(TokenKind::NsSeparator) {
            (TokenKind::GroupImportBraceOpen, TokenKind::GroupImportBraceClose)
        } else if is_array_index_curly(tokens, prev) {
            (TokenKind::ArrayIndexCurlyBraceOpen, TokenKind::ArrayIndexCurlyBraceClose)
        } else {
            continue;
        };

        let Ok(end) = tokens.find_block_end(BlockType::CurlyBrace, index) else {
            continue;
        };
        tokens.retag(index, kinds.0);
        tokens.retag(end, kinds.1);
    }
}

fn is_array_index_curly(tokens: &Tokens, prev: usize) -> bool {
    let token = &tokens[prev];
    if token.is_any_kind(&[TokenKind::Variable, TokenKind::ArrayIndexCurlyBraceClose]) || is_raw(tokens, prev, "]") {
        return true;
    }
    token.is_given_kind(TokenKind::String)
        && tokens.get_prev_meaningful_token(prev).is_some_and(|before| {
            tokens[before].is_any_kind(&[TokenKind::ObjectOperator, TokenKind::NullsafeObjectOperator])
        })
}

/// `#[...]`, `$a[1]`, `[1, 2]` and `[$a, $b] = $c`
fn transform_square_braces(tokens: &mut Tokens) {
    // end indices of the destructuring blocks we are inside of
    let mut destructuring: Vec<usize> = Vec::new();

    for index in 0..tokens.len() {
        while destructuring.last().is_some_and(|&end| end < index) {
            destructuring.pop();
        }

        if tokens[index].is_given_kind(TokenKind::Attribute) {
            if let Some(end) = find_attribute_end(tokens, index) {
                tokens.retag(end, TokenKind::AttributeClose);
            }
            continue;
        }

        if !is_raw(tokens, index, "[") || is_index_square(tokens, index) {
            continue;
        }
        let Ok(end) = tokens.find_block_end(BlockType::IndexSquareBrace, index) else {
            continue;
        };

        if is_destructuring(tokens, index, end, !destructuring.is_empty()) {
            tokens.retag(index, TokenKind::DestructuringSquareBraceOpen);
            tokens.retag(end, TokenKind::DestructuringSquareBraceClose);
            destructuring.push(end);
        } else {
            tokens.retag(index, TokenKind::ArraySquareBraceOpen);
            tokens.retag(end, TokenKind::ArraySquareBraceClose);
        }
    }
}

/// The `]` closing an attribute group, counting raw brackets inside it
fn find_attribute_end(tokens: &Tokens, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for index in start + 1..tokens.len() {
        if is_raw(tokens, index, "[") {
            depth += 1;
        } else if is_raw(tokens, index, "]") {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

fn is_index_square(tokens: &Tokens, index: usize) -> bool {
    const INDEXABLE: &[TokenKind] = &[
        TokenKind::Variable,
        TokenKind::String,
        TokenKind::ArrayIndexCurlyBraceClose,
        TokenKind::DynamicPropBraceClose,
        TokenKind::DynamicVarBraceClose,
        TokenKind::ArraySquareBraceClose,
        TokenKind::ConstantEncapsedString,
        TokenKind::BraceClassInstantiationClose,
    ];

    let Some(prev) = tokens.get_prev_meaningful_token(index) else {
        return false;
    };
    tokens[prev].is_any_kind(INDEXABLE) || is_raw(tokens, prev, ")") || is_raw(tokens, prev, "]")
}

fn is_destructuring(tokens: &Tokens, start: usize, end: usize, in_destructuring: bool) -> bool {
    let assigned = tokens
        .get_next_meaningful_token(end)
        .is_some_and(|next| is_raw(tokens, next, "="));
    if assigned {
        return true;
    }

    let Some(prev) = tokens.get_prev_meaningful_token(start) else {
        return false;
    };
    if tokens[prev].is_given_kind(TokenKind::As) {
        return true;
    }

    in_destructuring
        && (tokens[prev].is_any_kind(&[TokenKind::DestructuringSquareBraceOpen, TokenKind::DoubleArrow])
            || prev_meaningful_is_raw(tokens, start, ","))
}

/// `namespace\Foo\bar()`
fn transform_namespace_operator(tokens: &mut Tokens) {
    for index in 0..tokens.len() {
        if !tokens[index].is_given_kind(TokenKind::Namespace) {
            continue;
        }
        let relative = tokens
            .get_next_meaningful_token(index)
            .is_some_and(|next| tokens[next].is_given_kind(TokenKind::NsSeparator));
        if relative {
            tokens.retag(index, TokenKind::NamespaceOperator);
        }
    }
}

/// `?int` in parameter, return, property and constant types
fn transform_nullable_type(tokens: &mut Tokens) {
    const TYPE_PREFIX: &[TokenKind] = &[
        TokenKind::Private,
        TokenKind::Protected,
        TokenKind::Public,
        TokenKind::Var,
        TokenKind::Static,
        TokenKind::Readonly,
        TokenKind::Const,
        TokenKind::AttributeClose,
    ];

    for index in 0..tokens.len() {
        if !is_raw(tokens, index, "?") {
            continue;
        }
        let Some(prev) = tokens.get_prev_meaningful_token(index) else {
            continue;
        };
        let in_type = tokens[prev].is_any_kind(TYPE_PREFIX)
            || is_raw(tokens, prev, "(")
            || is_raw(tokens, prev, ",")
            || (is_raw(tokens, prev, ":") && prev_meaningful_is_raw(tokens, prev, ")"));
        if in_type {
            tokens.retag(index, TokenKind::NullableType);
        }
    }
}

/// `function () use ($a)` and `use Foo;` inside a class-like body
fn transform_use(tokens: &mut Tokens) {
    let bodies: Vec<(usize, usize)> = (0..tokens.len())
        .filter(|&index| declares_class_like(tokens, index))
        .filter_map(|index| class_body(tokens, index))
        .collect();

    for index in 0..tokens.len() {
        if !tokens[index].is_given_kind(TokenKind::Use) {
            continue;
        }
        if prev_meaningful_is_raw(tokens, index, ")") {
            tokens.retag(index, TokenKind::UseLambda);
        } else if bodies.iter().any(|&(open, close)| open < index && index < close) {
            tokens.retag(index, TokenKind::UseTrait);
        }
    }
}

fn declares_class_like(tokens: &Tokens, index: usize) -> bool {
    let token = &tokens[index];
    if token.is_any_kind(&[TokenKind::Class, TokenKind::Trait]) {
        // `Foo::class`
        return !tokens
            .get_prev_meaningful_token(index)
            .is_some_and(|prev| tokens[prev].is_given_kind(TokenKind::DoubleColon));
    }
    token.is_given_kind(TokenKind::String)
        && token.content().eq_ignore_ascii_case("enum")
        && tokens
            .get_next_meaningful_token(index)
            .is_some_and(|next| tokens[next].is_given_kind(TokenKind::String))
}

/// Braces of the body following the class-like keyword at `index`,
/// skipping constructor arguments of anonymous classes
fn class_body(tokens: &Tokens, index: usize) -> Option<(usize, usize)> {
    let mut cursor = index + 1;
    while cursor < tokens.len() {
        if is_raw(tokens, cursor, "(") {
            cursor = tokens.find_block_end(BlockType::Parenthesis, cursor).ok()?;
        } else if is_raw(tokens, cursor, "{") {
            let close = tokens.find_block_end(BlockType::CurlyBrace, cursor).ok()?;
            return Some((cursor, close));
        } else if is_raw(tokens, cursor, ";") {
            return None;
        }
        cursor += 1;
    }
    None
}
