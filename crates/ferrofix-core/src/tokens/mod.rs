//! Mutable, index-addressable token stream
//!
//! [`Tokens`] is what every fixer works on. It keeps:
//! - the token list itself, where removed tokens become empty tombstones
//!   until [`Tokens::clear_empty_tokens`] compacts them away
//! - a "changed" flag set by every mutation that alters the code
//! - a per-kind token count, so candidate checks are O(1)

mod block;
mod sequence;

pub use block::{BlockEdge, BlockType};

use std::collections::HashMap;
use std::ops::Index;

use xxhash_rust::xxh3::xxh3_64;

use crate::lexer;
use crate::token::{Token, TokenKind, TokenPattern};
use crate::transformers;

/// Direction for sibling lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn step(self, index: usize) -> Option<usize> {
        match self {
            Direction::Prev => index.checked_sub(1),
            Direction::Next => index.checked_add(1),
        }
    }
}

/// Length of the line break at the start of `text`, if any
fn line_break_len(text: &str) -> usize {
    if text.starts_with("\r\n") {
        2
    } else if text.starts_with('\n') || text.starts_with('\r') {
        1
    } else {
        0
    }
}

/// Token stream for one source unit
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    tokens: Vec<Token>,
    changed: bool,
    kind_counts: HashMap<TokenKind, usize>,
}

impl Tokens {
    /// Tokenize PHP source, assigning custom token kinds.
    ///
    /// Tokenization never fails; use a [`crate::Linter`] (or
    /// [`crate::tokenize`]) to reject malformed input.
    pub fn from_code(code: &str) -> Self {
        Self::from_lexed(lexer::lex(code).tokens)
    }

    /// Stream over freshly lexed tokens, with custom kinds assigned
    pub(crate) fn from_lexed(tokens: Vec<Token>) -> Self {
        let mut tokens = Self::from_tokens(tokens);
        transformers::transform(&mut tokens);
        tokens
    }

    /// Build a stream from ready-made tokens, as is
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut kind_counts = HashMap::new();
        for kind in tokens.iter().filter_map(Token::kind) {
            *kind_counts.entry(kind).or_insert(0) += 1;
        }
        Self {
            tokens,
            changed: false,
            kind_counts,
        }
    }

    pub fn to_vec(&self) -> Vec<Token> {
        self.tokens.clone()
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn generate_code(&self) -> String {
        self.tokens.iter().map(Token::content).collect()
    }

    /// xxh3 hash of the generated code
    pub fn code_hash(&self) -> u64 {
        xxh3_64(self.generate_code().as_bytes())
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    fn count_in(&mut self, token: &Token) {
        if let Some(kind) = token.kind() {
            *self.kind_counts.entry(kind).or_insert(0) += 1;
        }
    }

    fn count_out(&mut self, token: &Token) {
        if let Some(kind) = token.kind() {
            if let Some(count) = self.kind_counts.get_mut(&kind) {
                *count -= 1;
                if *count == 0 {
                    self.kind_counts.remove(&kind);
                }
            }
        }
    }

    fn replace(&mut self, index: usize, token: Token) {
        let old = std::mem::replace(&mut self.tokens[index], token);
        self.count_out(&old);
        let new = self.tokens[index].clone();
        self.count_in(&new);
    }

    /// Change the kind of a token without flagging the stream as changed
    pub(crate) fn retag(&mut self, index: usize, kind: TokenKind) {
        let token = self.tokens[index].with_kind(kind);
        self.replace(index, token);
    }

    /// Overwrite the token at `index`; marks the stream changed if it differs.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, token: Token) {
        if self.tokens[index] != token {
            self.changed = true;
            self.replace(index, token);
        }
    }

    /// Insert one token before `index`
    pub fn insert_at(&mut self, index: usize, token: Token) {
        self.insert_all_at(index, [token]);
    }

    /// Insert tokens before `index`, renumbering everything after
    pub fn insert_all_at(&mut self, index: usize, tokens: impl IntoIterator<Item = Token>) {
        let items: Vec<Token> = tokens.into_iter().collect();
        if items.is_empty() {
            return;
        }
        for token in &items {
            self.count_in(token);
        }
        self.tokens.splice(index..index, items);
        self.changed = true;
    }

    /// Replace the token with the empty tombstone
    pub fn clear_at(&mut self, index: usize) {
        self.set(index, Token::empty());
    }

    /// Tombstone every token in `start..=end`
    pub fn clear_range(&mut self, start: usize, end: usize) {
        for index in start..=end {
            self.clear_at(index);
        }
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.tokens.get(index).is_some_and(Token::is_empty)
    }

    /// Drop tombstones; the generated code is unchanged
    pub fn clear_empty_tokens(&mut self) {
        self.tokens.retain(|token| !token.is_empty());
    }

    /// Clear the token and merge the whitespace around it.
    ///
    /// If the next non-empty token is whitespace it is appended to the
    /// previous whitespace token, or moved into the freed slot when the
    /// previous token is not whitespace.
    pub fn clear_token_and_merge_surrounding_whitespace(&mut self, index: usize) {
        let count = self.len();
        self.clear_at(index);
        if index + 1 == count {
            return;
        }

        let Some(next) = self.get_non_empty_sibling(index, Direction::Next) else {
            return;
        };
        if !self.tokens[next].is_whitespace(None) {
            return;
        }

        let next_content = self.tokens[next].content().to_string();
        match self.get_non_empty_sibling(index, Direction::Prev) {
            Some(prev) if self.tokens[prev].is_whitespace(None) => {
                let merged = format!("{}{}", self.tokens[prev].content(), next_content);
                self.set(prev, Token::whitespace(merged));
            }
            prev => {
                let slot = prev.map_or(0, |prev| prev + 1);
                if self.is_empty_at(slot) {
                    self.set(slot, Token::whitespace(next_content));
                }
            }
        }
        self.clear_at(next);
    }

    /// Make sure whitespace `whitespace` sits at `index + offset`.
    ///
    /// When the token at `index` is already whitespace it is replaced (or
    /// cleared if nothing is left to put there). Otherwise a whitespace token
    /// is inserted at `index + offset`. When the reference token is an open
    /// tag and `offset` is 1, the first line break moves into the tag.
    ///
    /// Returns true if a token was inserted.
    pub fn ensure_whitespace_at_index(&mut self, index: usize, offset: usize, whitespace: &str) -> bool {
        if self.tokens[index].is_whitespace(None) {
            let whitespace = match index.checked_sub(1) {
                Some(prev) => self.move_line_break_into_open_tag(prev, offset, whitespace),
                None => whitespace.to_string(),
            };
            if whitespace.is_empty() {
                self.clear_at(index);
            } else {
                self.set(index, Token::whitespace(whitespace));
            }
            return false;
        }

        let whitespace = self.move_line_break_into_open_tag(index, offset, whitespace);
        if whitespace.is_empty() {
            return false;
        }
        self.insert_at(index + offset, Token::whitespace(whitespace));
        true
    }

    fn move_line_break_into_open_tag(&mut self, index: usize, offset: usize, whitespace: &str) -> String {
        let token = &self.tokens[index];
        if offset != 1 || !token.is_given_kind(TokenKind::OpenTag) {
            return whitespace.to_string();
        }

        let head = match line_break_len(whitespace) {
            0 => whitespace.chars().next().map_or(0, char::len_utf8),
            len => len,
        };
        if head == 0 {
            return String::new();
        }

        let content = format!("{}{}", token.content().trim_end(), &whitespace[..head]);
        self.set(index, Token::new(TokenKind::OpenTag, content));
        whitespace[head..].to_string()
    }

    /// Remove the whitespace right before `index`
    pub fn remove_leading_whitespace(&mut self, index: usize, chars: Option<&str>) {
        self.remove_whitespace_safely(index, Direction::Prev, chars);
    }

    /// Remove the whitespace right after `index`
    pub fn remove_trailing_whitespace(&mut self, index: usize, chars: Option<&str>) {
        self.remove_whitespace_safely(index, Direction::Next, chars);
    }

    /// The line break that ends a single line comment is never removed.
    fn remove_whitespace_safely(&mut self, index: usize, direction: Direction, chars: Option<&str>) {
        let Some(ws_index) = self.get_non_empty_sibling(index, direction) else {
            return;
        };
        if !self.tokens[ws_index].is_whitespace(None) {
            return;
        }

        let content = self.tokens[ws_index].content().to_string();
        let mut kept = "";
        let mut to_check = content.as_str();

        let after_line_comment = ws_index
            .checked_sub(1)
            .map(|prev| &self.tokens[prev])
            .is_some_and(|prev| prev.is_comment() && !prev.content().starts_with("/*"));
        if after_line_comment {
            let break_len = line_break_len(&content);
            if break_len > 0 {
                kept = &content[..break_len];
                to_check = &content[break_len..];
                if to_check.is_empty() {
                    return;
                }
            }
        }

        if !Token::whitespace(to_check).is_whitespace(chars) {
            return;
        }

        if kept.is_empty() {
            self.clear_at(ws_index);
        } else {
            let kept = kept.to_string();
            self.set(ws_index, Token::whitespace(kept));
        }
    }

    /// Nearest non-empty token in `direction`
    pub fn get_non_empty_sibling(&self, index: usize, direction: Direction) -> Option<usize> {
        let mut index = index;
        loop {
            index = direction.step(index)?;
            let token = self.tokens.get(index)?;
            if !token.is_empty() {
                return Some(index);
            }
        }
    }

    /// Nearest token that is not whitespace, comment or empty
    pub fn get_meaningful_token_sibling(&self, index: usize, direction: Direction) -> Option<usize> {
        let mut index = index;
        loop {
            index = direction.step(index)?;
            if self.tokens.get(index)?.is_meaningful() {
                return Some(index);
            }
        }
    }

    pub fn get_next_meaningful_token(&self, index: usize) -> Option<usize> {
        self.get_meaningful_token_sibling(index, Direction::Next)
    }

    pub fn get_prev_meaningful_token(&self, index: usize) -> Option<usize> {
        self.get_meaningful_token_sibling(index, Direction::Prev)
    }

    /// Nearest token that is not whitespace made of `chars` (default set)
    pub fn get_non_whitespace_sibling(
        &self,
        index: usize,
        direction: Direction,
        chars: Option<&str>,
    ) -> Option<usize> {
        let mut index = index;
        loop {
            index = direction.step(index)?;
            if !self.tokens.get(index)?.is_whitespace(chars) {
                return Some(index);
            }
        }
    }

    pub fn get_next_non_whitespace(&self, index: usize, chars: Option<&str>) -> Option<usize> {
        self.get_non_whitespace_sibling(index, Direction::Next, chars)
    }

    pub fn get_prev_non_whitespace(&self, index: usize, chars: Option<&str>) -> Option<usize> {
        self.get_non_whitespace_sibling(index, Direction::Prev, chars)
    }

    /// Nearest token matching any of `patterns`
    pub fn get_token_of_kind_sibling(
        &self,
        index: usize,
        direction: Direction,
        patterns: &[TokenPattern<'_>],
        case_sensitive: bool,
    ) -> Option<usize> {
        let possible = patterns
            .iter()
            .any(|p| p.kind().map_or(true, |kind| self.is_token_kind_found(kind)));
        if !possible {
            return None;
        }

        let mut index = index;
        loop {
            index = direction.step(index)?;
            if self.tokens.get(index)?.equals_any(patterns, case_sensitive) {
                return Some(index);
            }
        }
    }

    pub fn get_next_token_of_kind(
        &self,
        index: usize,
        patterns: &[TokenPattern<'_>],
        case_sensitive: bool,
    ) -> Option<usize> {
        self.get_token_of_kind_sibling(index, Direction::Next, patterns, case_sensitive)
    }

    pub fn get_prev_token_of_kind(
        &self,
        index: usize,
        patterns: &[TokenPattern<'_>],
        case_sensitive: bool,
    ) -> Option<usize> {
        self.get_token_of_kind_sibling(index, Direction::Prev, patterns, case_sensitive)
    }

    pub fn is_token_kind_found(&self, kind: TokenKind) -> bool {
        self.kind_counts.contains_key(&kind)
    }

    pub fn is_all_token_kinds_found(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().all(|kind| self.is_token_kind_found(*kind))
    }

    pub fn is_any_token_kinds_found(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.is_token_kind_found(*kind))
    }

    pub fn count_token_kind(&self, kind: TokenKind) -> usize {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Indices of tokens of `kind` within `start..=end` (end defaults to the last token)
    pub fn find_given_kind(&self, kind: TokenKind, start: usize, end: Option<usize>) -> Vec<usize> {
        if !self.is_token_kind_found(kind) || self.tokens.is_empty() {
            return Vec::new();
        }
        let end = end.map_or(self.len() - 1, |end| end.min(self.len() - 1));
        (start..=end)
            .filter(|&index| self.tokens[index].is_given_kind(kind))
            .collect()
    }

    /// Indices per kind for several kinds at once
    pub fn find_given_kinds(
        &self,
        kinds: &[TokenKind],
        start: usize,
        end: Option<usize>,
    ) -> HashMap<TokenKind, Vec<usize>> {
        kinds
            .iter()
            .map(|&kind| (kind, self.find_given_kind(kind, start, end)))
            .collect()
    }

    /// True for a single PHP region: one open tag and no inline HTML
    pub fn is_monolithic_php(&self) -> bool {
        if self.tokens.is_empty() || self.is_token_kind_found(TokenKind::InlineHtml) {
            return false;
        }
        self.count_token_kind(TokenKind::OpenTag) + self.count_token_kind(TokenKind::OpenTagWithEcho) <= 1
    }
}

impl Index<usize> for Tokens {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl PartialEq for Tokens {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_code_has_no_tokens() {
        let tokens = Tokens::from_code("");
        assert!(tokens.is_empty());
        assert!(!tokens.is_changed());
    }

    #[test]
    fn test_fresh_stream_is_not_changed() {
        let mut tokens = Tokens::from_code("<?php echo 1;");
        assert!(!tokens.is_changed());
        tokens.insert_at(1, Token::whitespace(" "));
        assert!(tokens.is_changed());
        tokens.clear_changed();
        assert!(!tokens.is_changed());
    }

    #[test]
    fn test_insert_into_empty_stream() {
        let mut tokens = Tokens::from_tokens(Vec::new());
        tokens.insert_at(0, Token::new(TokenKind::OpenTag, "<?php "));
        assert_eq!(tokens.len(), 1);
        assert!(tokens.is_token_kind_found(TokenKind::OpenTag));
    }

    #[test]
    fn test_set_with_equal_token_does_not_flag_change() {
        let mut tokens = Tokens::from_code("<?php echo 1;");
        let same = tokens[1].clone();
        tokens.set(1, same);
        assert!(!tokens.is_changed());
        tokens.set(1, Token::new(TokenKind::Print, "print"));
        assert!(tokens.is_changed());
        assert!(!tokens.is_token_kind_found(TokenKind::Echo));
        assert!(tokens.is_token_kind_found(TokenKind::Print));
    }

    #[test]
    fn test_code_hash_follows_code() {
        let a = Tokens::from_code("<?php echo 1;");
        let b = Tokens::from_code("<?php echo 1;");
        let c = Tokens::from_code("<?php echo 2;");
        assert_eq!(a.code_hash(), b.code_hash());
        assert_ne!(a.code_hash(), c.code_hash());
    }

    #[test]
    fn test_clone_is_independent() {
        let tokens = Tokens::from_code("<?php echo 1;");
        let mut copy = tokens.clone();
        copy.clear_at(1);
        assert_eq!(tokens.generate_code(), "<?php echo 1;");
        assert_eq!(copy.generate_code(), "<?php  1;");
    }

    #[test]
    fn test_clear_range_and_compaction() {
        let mut tokens = Tokens::from_code("<?php $x = 1;");
        tokens.clear_range(1, 5);
        assert_eq!(tokens.len(), 7);
        for index in 1..=5 {
            assert!(tokens.is_empty_at(index));
        }
        tokens.clear_empty_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.generate_code(), "<?php ;");
    }

    #[rstest]
    #[case("<?php\n", true)]
    #[case("<?php\n?>", true)]
    #[case("", false)]
    #[case(" ", false)]
    #[case("#!/usr/bin/env php\n<?php\n", false)]
    #[case(" <?php\n", false)]
    #[case("<?php\n?> ", false)]
    #[case("<?php\n?><?php\n", false)]
    #[case("<?=' ';", true)]
    #[case("<?=' '?>", true)]
    #[case(" <?=' ';", false)]
    #[case("<?=' '?> ", false)]
    #[case("<?=' '?><?=' ';", false)]
    fn test_is_monolithic_php(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(Tokens::from_code(source).is_monolithic_php(), expected);
    }

    #[test]
    fn test_token_kind_index() {
        let tokens = Tokens::from_code("<?php class Foo { public $a; }");
        assert!(tokens.is_token_kind_found(TokenKind::Class));
        assert!(!tokens.is_token_kind_found(TokenKind::Function));
        assert!(tokens.is_all_token_kinds_found(&[TokenKind::Class, TokenKind::Public]));
        assert!(!tokens.is_all_token_kinds_found(&[TokenKind::Class, TokenKind::Function]));
        assert!(tokens.is_any_token_kinds_found(&[TokenKind::Function, TokenKind::Public]));
        assert!(!tokens.is_any_token_kinds_found(&[TokenKind::Function, TokenKind::Private]));
    }

    #[test]
    fn test_find_given_kind_with_bounds() {
        let tokens = Tokens::from_code("<?php $a; $b; $c;");
        assert_eq!(tokens.find_given_kind(TokenKind::Variable, 0, None), vec![1, 4, 7]);
        assert_eq!(tokens.find_given_kind(TokenKind::Variable, 2, Some(6)), vec![4]);
        assert!(tokens.find_given_kind(TokenKind::Class, 0, None).is_empty());

        let found = tokens.find_given_kinds(&[TokenKind::Variable, TokenKind::OpenTag], 0, None);
        assert_eq!(found[&TokenKind::OpenTag], vec![0]);
        assert_eq!(found[&TokenKind::Variable].len(), 3);
    }

    #[test]
    fn test_sibling_navigation() {
        let tokens = Tokens::from_code("<?php $a /* c */ = 1 ;");
        assert_eq!(tokens.get_next_meaningful_token(1), Some(5));
        assert_eq!(tokens.get_prev_meaningful_token(5), Some(1));
        assert_eq!(tokens.get_next_non_whitespace(1, None), Some(3));
        assert_eq!(tokens.get_prev_meaningful_token(0), None);
        assert_eq!(
            tokens.get_next_token_of_kind(0, &[TokenPattern::Content(";")], true),
            Some(9)
        );
        assert_eq!(
            tokens.get_prev_token_of_kind(9, &[TokenPattern::Kind(TokenKind::Variable)], true),
            Some(1)
        );
        assert_eq!(
            tokens.get_next_token_of_kind(0, &[TokenPattern::Kind(TokenKind::Class)], true),
            None
        );
    }

    #[rstest]
    #[case("<?php ; ; ;", &[3], "<?php ;  ;")]
    #[case("<?php ; ; ;", &[1], "<?php  ; ;")]
    #[case("<?php ; ; ;", &[1, 5], "<?php  ; ")]
    #[case("<?php ; ; ;", &[5, 1], "<?php  ; ")]
    #[case("<?php ; ; ;", &[1, 3], "<?php   ;")]
    #[case("<?php ; ; ;", &[3, 1], "<?php   ;")]
    #[case("<?php $a;/**/;", &[2], "<?php $a/**/;")]
    #[case("<?php if($a){}else{}", &[7, 8, 9], "<?php if($a){}")]
    #[case("<?php echo 0;//\necho 1;", &[5], "<?php echo 0;\necho 1;")]
    fn test_clear_token_and_merge_surrounding_whitespace(
        #[case] source: &str,
        #[case] indices: &[usize],
        #[case] expected: &str,
    ) {
        let mut tokens = Tokens::from_code(source);
        for &index in indices {
            tokens.clear_token_and_merge_surrounding_whitespace(index);
        }
        assert_eq!(tokens.generate_code(), expected);
    }

    #[rstest]
    #[case("<?php\n $a;", 1, 0, " ", "<?php\n $a;", false)]
    #[case("<?php $a;", 1, 0, "  ", "<?php   $a;", true)]
    #[case("<?php $a;", 0, 1, "\n", "<?php\n$a;", false)]
    #[case("<?php $a;", 0, 1, "\n\n", "<?php\n\n$a;", true)]
    #[case("<?php $a;", 0, 1, "\r\n\r\n", "<?php\r\n\r\n$a;", true)]
    #[case("<?php $a ;", 2, 0, "", "<?php $a;", false)]
    #[case("<?php $a ;", 2, 0, "\t", "<?php $a\t;", false)]
    fn test_ensure_whitespace_at_index(
        #[case] source: &str,
        #[case] index: usize,
        #[case] offset: usize,
        #[case] whitespace: &str,
        #[case] expected: &str,
        #[case] inserted: bool,
    ) {
        let mut tokens = Tokens::from_code(source);
        assert_eq!(tokens.ensure_whitespace_at_index(index, offset, whitespace), inserted);
        assert_eq!(tokens.generate_code(), expected);
    }

    #[rstest]
    #[case(7, None, "<?php echo 1;//\necho 2;", "<?php echo 1;//\necho 2;")]
    #[case(7, None, "<?php echo 1;//\n       echo 2;", "<?php echo 1;//\necho 2;")]
    #[case(7, None, "<?php echo 1;//\r\n       echo 2;", "<?php echo 1;//\r\necho 2;")]
    #[case(7, Some(" \t"), "<?php echo 1;//\n       //", "<?php echo 1;//\n//")]
    #[case(6, Some("\t "), "<?php echo 1;\t \t \t //", "<?php echo 1;//")]
    #[case(8, None, "<?php $a = 1;           //", "<?php $a = 1;//")]
    #[case(6, None, "<?php echo 1;  \n          \n \n     \necho 2;", "<?php echo 1;echo 2;")]
    #[case(8, None, "<?php echo 1;  // 1\n          \n \n     \necho 2;", "<?php echo 1;  // 1\necho 2;")]
    fn test_remove_leading_whitespace(
        #[case] index: usize,
        #[case] chars: Option<&str>,
        #[case] source: &str,
        #[case] expected: &str,
    ) {
        let mut tokens = Tokens::from_code(source);
        tokens.remove_leading_whitespace(index, chars);
        assert_eq!(tokens.generate_code(), expected);
    }

    #[rstest]
    #[case(5, None, "<?php echo 1;//\n       echo 2;", "<?php echo 1;//\necho 2;")]
    #[case(4, Some(" "), "<?php echo 1;  \necho 2;", "<?php echo 1;  \necho 2;")]
    #[case(4, None, "<?php echo 1;  \necho 2;", "<?php echo 1;echo 2;")]
    fn test_remove_trailing_whitespace(
        #[case] index: usize,
        #[case] chars: Option<&str>,
        #[case] source: &str,
        #[case] expected: &str,
    ) {
        let mut tokens = Tokens::from_code(source);
        tokens.remove_trailing_whitespace(index, chars);
        assert_eq!(tokens.generate_code(), expected);
    }
}
