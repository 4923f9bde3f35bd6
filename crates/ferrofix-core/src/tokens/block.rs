//! Matching of block delimiters
//!
//! Every block type has its own opening and closing token, so depth is
//! counted per type: `$a[$b[1]]` and `[$a, [1]]` resolve correctly because
//! index brackets and short array brackets carry different kinds.

use crate::error::TokensError;
use crate::token::{Token, TokenKind, TokenPattern};

use super::{Direction, Tokens};

/// Kind of a delimited block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// `(` `)`
    Parenthesis,
    /// `{` `}`
    CurlyBrace,
    /// `$a[1]`
    IndexSquareBrace,
    /// `[1, 2]`
    ArraySquareBrace,
    /// `$a->{$b}`
    DynamicPropBrace,
    /// `${$a}`
    DynamicVarBrace,
    /// `$a{1}`
    ArrayIndexCurlyBrace,
    /// `use A\{B, C};`
    GroupImportBrace,
    /// `[$a, $b] = $c;`
    DestructuringSquareBrace,
    /// `(new Foo())`
    BraceClassInstantiation,
    /// `#[Attr]`
    Attribute,
}

/// Result of classifying a single token as a block delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEdge {
    pub block: BlockType,
    pub is_start: bool,
}

impl BlockType {
    pub const ALL: [BlockType; 11] = [
        BlockType::Parenthesis,
        BlockType::CurlyBrace,
        BlockType::IndexSquareBrace,
        BlockType::ArraySquareBrace,
        BlockType::DynamicPropBrace,
        BlockType::DynamicVarBrace,
        BlockType::ArrayIndexCurlyBrace,
        BlockType::GroupImportBrace,
        BlockType::DestructuringSquareBrace,
        BlockType::BraceClassInstantiation,
        BlockType::Attribute,
    ];

    /// Opening and closing token patterns
    pub fn edges(self) -> (TokenPattern<'static>, TokenPattern<'static>) {
        use TokenPattern::{Content, Kind};
        match self {
            BlockType::Parenthesis => (Content("("), Content(")")),
            BlockType::CurlyBrace => (Content("{"), Content("}")),
            BlockType::IndexSquareBrace => (Content("["), Content("]")),
            BlockType::ArraySquareBrace => (
                Kind(TokenKind::ArraySquareBraceOpen),
                Kind(TokenKind::ArraySquareBraceClose),
            ),
            BlockType::DynamicPropBrace => (
                Kind(TokenKind::DynamicPropBraceOpen),
                Kind(TokenKind::DynamicPropBraceClose),
            ),
            BlockType::DynamicVarBrace => (
                Kind(TokenKind::DynamicVarBraceOpen),
                Kind(TokenKind::DynamicVarBraceClose),
            ),
            BlockType::ArrayIndexCurlyBrace => (
                Kind(TokenKind::ArrayIndexCurlyBraceOpen),
                Kind(TokenKind::ArrayIndexCurlyBraceClose),
            ),
            BlockType::GroupImportBrace => (
                Kind(TokenKind::GroupImportBraceOpen),
                Kind(TokenKind::GroupImportBraceClose),
            ),
            BlockType::DestructuringSquareBrace => (
                Kind(TokenKind::DestructuringSquareBraceOpen),
                Kind(TokenKind::DestructuringSquareBraceClose),
            ),
            BlockType::BraceClassInstantiation => (
                Kind(TokenKind::BraceClassInstantiationOpen),
                Kind(TokenKind::BraceClassInstantiationClose),
            ),
            BlockType::Attribute => (Kind(TokenKind::Attribute), Kind(TokenKind::AttributeClose)),
        }
    }

    /// Classify a token as a block delimiter, without looking at context
    pub fn detect(token: &Token) -> Option<BlockEdge> {
        Self::ALL.into_iter().find_map(|block| {
            let (start, end) = block.edges();
            if token.equals(&start, true) {
                Some(BlockEdge { block, is_start: true })
            } else if token.equals(&end, true) {
                Some(BlockEdge { block, is_start: false })
            } else {
                None
            }
        })
    }
}

impl Tokens {
    /// Classify a token as a block delimiter
    pub fn detect_block_type(token: &Token) -> Option<BlockEdge> {
        BlockType::detect(token)
    }

    /// Index of the token closing the block opened at `start`
    pub fn find_block_end(&self, block: BlockType, start: usize) -> Result<usize, TokensError> {
        self.find_opposite_block_edge(block, start, Direction::Next)
    }

    /// Index of the token opening the block closed at `end`
    pub fn find_block_start(&self, block: BlockType, end: usize) -> Result<usize, TokensError> {
        self.find_opposite_block_edge(block, end, Direction::Prev)
    }

    fn find_opposite_block_edge(
        &self,
        block: BlockType,
        from: usize,
        direction: Direction,
    ) -> Result<usize, TokensError> {
        let (mut open, mut close) = block.edges();
        if direction == Direction::Prev {
            std::mem::swap(&mut open, &mut close);
        }

        let is_open = self.get(from).is_some_and(|token| token.equals(&open, true));
        if !is_open {
            return Err(match direction {
                Direction::Next => TokensError::InvalidBlockStart { index: from },
                Direction::Prev => TokensError::InvalidBlockEnd { index: from },
            });
        }

        let mut depth = 0usize;
        let mut index = from;
        loop {
            let token = &self[index];
            if token.equals(&open, true) {
                depth += 1;
            } else if token.equals(&close, true) {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            }

            match direction.step(index).filter(|&next| next < self.len()) {
                Some(next) => index = next,
                None => {
                    return Err(match direction {
                        Direction::Next => TokensError::MissingBlockEnd { index: from },
                        Direction::Prev => TokensError::MissingBlockStart { index: from },
                    })
                }
            }
        }
    }
}
