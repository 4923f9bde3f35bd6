//! PHP lexer producing raw tokens
//!
//! The lexer is tolerant: it always produces a token list whose contents
//! concatenate back to the input, and records problems it could not lex
//! (unterminated strings, comments, heredocs) as [`LexError`]s on the side.
//! Custom token kinds (array braces, dynamic braces, ...) are not assigned
//! here; see [`crate::transformers`].

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Problems found while lexing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment { line: usize },

    #[error("unterminated string starting on line {line}")]
    UnterminatedString { line: usize },

    #[error("unterminated heredoc \"{label}\" starting on line {line}")]
    UnterminatedHeredoc { line: usize, label: String },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedComment { line }
            | LexError::UnterminatedString { line }
            | LexError::UnterminatedHeredoc { line, .. } => *line,
        }
    }
}

/// Output of a lexer run
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside of PHP code, looking for an open tag
    Initial,
    /// Inside PHP code
    InScripting,
}

/// Operators longer than one byte, longest first
const OPERATORS: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::SlEqual),
    (">>=", TokenKind::SrEqual),
    ("**=", TokenKind::PowEqual),
    ("...", TokenKind::Ellipsis),
    ("<=>", TokenKind::Spaceship),
    ("===", TokenKind::IsIdentical),
    ("!==", TokenKind::IsNotIdentical),
    ("??=", TokenKind::CoalesceEqual),
    ("?->", TokenKind::NullsafeObjectOperator),
    ("<<", TokenKind::Sl),
    (">>", TokenKind::Sr),
    ("**", TokenKind::Pow),
    ("->", TokenKind::ObjectOperator),
    ("=>", TokenKind::DoubleArrow),
    ("::", TokenKind::DoubleColon),
    ("++", TokenKind::Inc),
    ("--", TokenKind::Dec),
    ("==", TokenKind::IsEqual),
    ("!=", TokenKind::IsNotEqual),
    ("<>", TokenKind::IsNotEqual),
    ("<=", TokenKind::IsSmallerOrEqual),
    (">=", TokenKind::IsGreaterOrEqual),
    ("&&", TokenKind::BooleanAnd),
    ("||", TokenKind::BooleanOr),
    ("??", TokenKind::Coalesce),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::MulEqual),
    ("/=", TokenKind::DivEqual),
    (".=", TokenKind::ConcatEqual),
    ("%=", TokenKind::ModEqual),
    ("&=", TokenKind::AndEqual),
    ("|=", TokenKind::OrEqual),
    ("^=", TokenKind::XorEqual),
];

fn cast_kind(word: &str) -> Option<TokenKind> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "int" | "integer" => TokenKind::IntCast,
        "bool" | "boolean" => TokenKind::BoolCast,
        "float" | "double" | "real" => TokenKind::DoubleCast,
        "string" | "binary" => TokenKind::StringCast,
        "array" => TokenKind::ArrayCast,
        "object" => TokenKind::ObjectCast,
        "unset" => TokenKind::UnsetCast,
        _ => return None,
    };
    Some(kind)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Length of the line break at the start of `bytes`, if any
fn newline_len(bytes: &[u8]) -> usize {
    match bytes {
        [b'\r', b'\n', ..] => 2,
        [b'\n', ..] | [b'\r', ..] => 1,
        _ => 0,
    }
}

/// PHP lexer
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
    state: State,
    allow_short_tags: bool,
    /// Kind and content of the last token that was not trivia
    last_significant: Option<Token>,
    before_last_significant: Option<Token>,
    lexed: Lexed,
}

impl<'src> Lexer<'src> {
    /// Create a lexer; short open tags (`<?`) are recognized
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            state: State::Initial,
            allow_short_tags: true,
            last_significant: None,
            before_last_significant: None,
            lexed: Lexed::default(),
        }
    }

    pub fn with_short_tags(mut self, allow: bool) -> Self {
        self.allow_short_tags = allow;
        self
    }

    /// Lex the whole source
    pub fn tokenize(mut self) -> Lexed {
        while self.pos < self.source.len() {
            match self.state {
                State::Initial => self.scan_initial(),
                State::InScripting => self.scan_scripting(),
            }
        }
        self.lexed
    }

    fn bytes(&self) -> &'src [u8] {
        self.source.as_bytes()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes().get(pos).copied()
    }

    fn push(&mut self, kind: Option<TokenKind>, end: usize) {
        let content = &self.source[self.pos..end];
        let token = match kind {
            Some(kind) => Token::new(kind, content),
            None => Token::simple(content),
        };
        self.line += content.matches('\n').count();
        self.pos = end;
        if token.is_meaningful() {
            self.before_last_significant = self.last_significant.replace(token.clone());
        }
        self.lexed.tokens.push(token);
    }

    fn error(&mut self, error: LexError) {
        self.lexed.errors.push(error);
    }

    /// Find the next open tag at or after `from`: (start, length, kind)
    fn find_open_tag(&self, from: usize) -> Option<(usize, usize, TokenKind)> {
        let bytes = self.bytes();
        let mut search = from;
        while let Some(offset) = self.source[search..].find("<?") {
            let start = search + offset;
            let after = &bytes[start + 2..];
            if after.len() >= 3 && after[..3].eq_ignore_ascii_case(b"php") {
                let rest = &after[3..];
                match rest.first() {
                    None => return Some((start, 5, TokenKind::OpenTag)),
                    Some(b' ') | Some(b'\t') => return Some((start, 6, TokenKind::OpenTag)),
                    Some(b'\n') | Some(b'\r') => {
                        return Some((start, 5 + newline_len(rest), TokenKind::OpenTag))
                    }
                    _ => {}
                }
            }
            if after.first() == Some(&b'=') {
                return Some((start, 3, TokenKind::OpenTagWithEcho));
            }
            if self.allow_short_tags {
                return Some((start, 2, TokenKind::OpenTag));
            }
            search = start + 2;
        }
        None
    }

    fn scan_initial(&mut self) {
        match self.find_open_tag(self.pos) {
            Some((start, len, kind)) => {
                if start > self.pos {
                    self.push(Some(TokenKind::InlineHtml), start);
                }
                self.push(Some(kind), start + len);
                self.state = State::InScripting;
            }
            None => self.push(Some(TokenKind::InlineHtml), self.source.len()),
        }
    }

    fn scan_scripting(&mut self) {
        let bytes = self.bytes();
        let start = self.pos;
        let b = bytes[start];
        let next = self.byte_at(start + 1);

        match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                let mut end = start;
                while matches!(self.byte_at(end), Some(b' ' | b'\t' | b'\n' | b'\r')) {
                    end += 1;
                }
                self.push(Some(TokenKind::Whitespace), end);
            }
            b'?' if next == Some(b'>') => {
                let end = start + 2 + newline_len(&bytes[start + 2..]);
                self.push(Some(TokenKind::CloseTag), end);
                self.state = State::Initial;
            }
            b'#' if next == Some(b'[') => self.push(Some(TokenKind::Attribute), start + 2),
            b'#' => self.scan_line_comment(),
            b'/' if next == Some(b'/') => self.scan_line_comment(),
            b'/' if next == Some(b'*') => self.scan_block_comment(),
            b'$' if next.is_some_and(is_ident_start) => {
                let end = self.ident_end(start + 1);
                self.push(Some(TokenKind::Variable), end);
            }
            b'\'' => self.scan_single_quoted(),
            b'"' | b'`' => self.scan_interpolated(b),
            b'<' if self.source[start..].starts_with("<<<") => {
                if !self.scan_heredoc() {
                    self.scan_operator();
                }
            }
            b'(' => {
                if !self.scan_cast() {
                    self.scan_operator();
                }
            }
            b'0'..=b'9' => self.scan_number(),
            b'.' if next.is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            b'\\' => self.push(Some(TokenKind::NsSeparator), start + 1),
            _ if is_ident_start(b) => self.scan_word(),
            _ => self.scan_operator(),
        }
    }

    fn scan_line_comment(&mut self) {
        let rest = &self.bytes()[self.pos..];
        let end = (0..rest.len())
            .find(|&offset| matches!(&rest[offset..], [b'\n', ..] | [b'\r', ..] | [b'?', b'>', ..]))
            .unwrap_or(rest.len());
        self.push(Some(TokenKind::Comment), self.pos + end);
    }

    fn scan_block_comment(&mut self) {
        let start = self.pos;
        let rest = &self.source[start..];
        let is_doc = rest.starts_with("/**")
            && matches!(rest.as_bytes().get(3), Some(b' ' | b'\t' | b'\n' | b'\r'));
        let kind = if is_doc { TokenKind::DocComment } else { TokenKind::Comment };

        match rest[2..].find("*/") {
            Some(offset) => self.push(Some(kind), start + 2 + offset + 2),
            None => {
                self.error(LexError::UnterminatedComment { line: self.line });
                self.push(Some(kind), self.source.len());
            }
        }
    }

    fn scan_single_quoted(&mut self) {
        let bytes = self.bytes();
        let mut i = self.pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'\'' => {
                    self.push(Some(TokenKind::ConstantEncapsedString), i + 1);
                    return;
                }
                _ => i += 1,
            }
        }
        self.error(LexError::UnterminatedString { line: self.line });
        self.push(Some(TokenKind::EncapsedAndWhitespace), self.source.len());
    }

    /// Double quoted and backtick strings are kept as one token
    fn scan_interpolated(&mut self, quote: u8) {
        match self.interpolated_end(self.pos, quote) {
            Some(end) => self.push(Some(TokenKind::ConstantEncapsedString), end),
            None => {
                self.error(LexError::UnterminatedString { line: self.line });
                self.push(Some(TokenKind::EncapsedAndWhitespace), self.source.len());
            }
        }
    }

    /// End offset (exclusive) of a quoted string opening at `start`
    fn interpolated_end(&self, start: usize, quote: u8) -> Option<usize> {
        let bytes = self.bytes();
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b if b == quote => return Some(i + 1),
                b'{' if bytes.get(i + 1) == Some(&b'$') => i = self.braced_end(i)?,
                _ => i += 1,
            }
        }
        None
    }

    /// End offset of a `{$...}` interpolation, skipping nested strings
    fn braced_end(&self, start: usize) -> Option<usize> {
        let bytes = self.bytes();
        let mut depth = 0usize;
        let mut i = start;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                b'\'' => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != b'\'' {
                        i += if bytes[i] == b'\\' { 2 } else { 1 };
                    }
                    i += 1;
                }
                b'"' => i = self.interpolated_end(i, b'"')?,
                _ => i += 1,
            }
        }
        None
    }

    /// Returns false when `<<<` does not start a valid heredoc header
    fn scan_heredoc(&mut self) -> bool {
        let bytes = self.bytes();
        let start = self.pos;
        let mut i = start + 3;
        while matches!(self.byte_at(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let quote = match self.byte_at(i) {
            Some(q @ (b'\'' | b'"')) => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        if !self.byte_at(i).is_some_and(is_ident_start) {
            return false;
        }
        let label_start = i;
        let label_end = self.ident_end(i);
        let label = &self.source[label_start..label_end];
        i = label_end;
        if let Some(q) = quote {
            if self.byte_at(i) != Some(q) {
                return false;
            }
            i += 1;
        }
        let nl = newline_len(&bytes[i..]);
        if nl == 0 {
            return false;
        }
        let body_start = i + nl;
        let start_line = self.line;

        let mut line_start = body_start;
        let closing = loop {
            let mut p = line_start;
            while matches!(self.byte_at(p), Some(b' ' | b'\t')) {
                p += 1;
            }
            if self.source[p..].starts_with(label)
                && !self.byte_at(p + label.len()).is_some_and(is_ident_byte)
            {
                break Some((line_start, p + label.len()));
            }
            match self.source[line_start..].find(|c| c == '\n' || c == '\r') {
                Some(offset) => {
                    let at = line_start + offset;
                    line_start = at + newline_len(&bytes[at..]);
                }
                None => break None,
            }
        };

        self.push(Some(TokenKind::StartHeredoc), body_start);
        match closing {
            Some((body_end, end)) => {
                if body_end > body_start {
                    self.push(Some(TokenKind::EncapsedAndWhitespace), body_end);
                }
                self.push(Some(TokenKind::EndHeredoc), end);
            }
            None => {
                self.error(LexError::UnterminatedHeredoc {
                    line: start_line,
                    label: label.to_string(),
                });
                if self.pos < self.source.len() {
                    self.push(Some(TokenKind::EncapsedAndWhitespace), self.source.len());
                }
            }
        }
        true
    }

    /// Returns false when the parenthesis does not open a cast
    fn scan_cast(&mut self) -> bool {
        let mut i = self.pos + 1;
        while matches!(self.byte_at(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let word_start = i;
        while self.byte_at(i).is_some_and(|b| b.is_ascii_alphabetic()) {
            i += 1;
        }
        let word = &self.source[word_start..i];
        while matches!(self.byte_at(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        if self.byte_at(i) != Some(b')') {
            return false;
        }
        match cast_kind(word) {
            Some(kind) => {
                self.push(Some(kind), i + 1);
                true
            }
            None => false,
        }
    }

    fn scan_number(&mut self) {
        let bytes = self.bytes();
        let start = self.pos;
        let mut i = start;

        let prefix = bytes.get(start + 1).map(|b| b.to_ascii_lowercase());
        if bytes[start] == b'0' && matches!(prefix, Some(b'x' | b'b' | b'o')) {
            i += 2;
            while self.byte_at(i).is_some_and(|b| b.is_ascii_hexdigit() || b == b'_') {
                i += 1;
            }
            self.push(Some(TokenKind::LNumber), i);
            return;
        }

        let digits = |mut i: usize| {
            while self.byte_at(i).is_some_and(|b| b.is_ascii_digit() || b == b'_') {
                i += 1;
            }
            i
        };

        let mut is_float = false;
        i = digits(i);
        if self.byte_at(i) == Some(b'.') && self.byte_at(i + 1) != Some(b'.') {
            is_float = true;
            i = digits(i + 1);
        }
        if matches!(self.byte_at(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(self.byte_at(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if self.byte_at(j).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                i = digits(j);
            }
        }

        let kind = if is_float { TokenKind::DNumber } else { TokenKind::LNumber };
        self.push(Some(kind), i);
    }

    fn ident_end(&self, mut i: usize) -> usize {
        while self.byte_at(i).is_some_and(is_ident_byte) {
            i += 1;
        }
        i
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        let end = self.ident_end(start);
        let word = &self.source[start..end];
        let lower = word.to_ascii_lowercase();

        let after_member_access = self.last_significant.as_ref().is_some_and(|t| {
            t.is_any_kind(&[TokenKind::ObjectOperator, TokenKind::NullsafeObjectOperator])
                || (t.is_given_kind(TokenKind::DoubleColon) && lower != "class")
        });
        if after_member_access || self.declares_name() {
            self.push(Some(TokenKind::String), end);
            return;
        }

        if lower == "yield" {
            let mut i = end;
            while matches!(self.byte_at(i), Some(b' ' | b'\t' | b'\n' | b'\r')) {
                i += 1;
            }
            if i > end
                && self.bytes().get(i..i + 4).is_some_and(|w| w.eq_ignore_ascii_case(b"from"))
                && !self.byte_at(i + 4).is_some_and(is_ident_byte)
            {
                self.push(Some(TokenKind::YieldFrom), i + 4);
                return;
            }
        }

        let kind = TokenKind::keyword(&lower).unwrap_or(TokenKind::String);
        self.push(Some(kind), end);
    }

    /// Keywords are plain names after `function`, `function &` and `const`
    fn declares_name(&self) -> bool {
        let Some(last) = &self.last_significant else {
            return false;
        };
        if last.is_any_kind(&[TokenKind::Function, TokenKind::Const]) {
            return true;
        }
        last.kind().is_none()
            && last.content() == "&"
            && self
                .before_last_significant
                .as_ref()
                .is_some_and(|before| before.is_given_kind(TokenKind::Function))
    }

    fn scan_operator(&mut self) {
        let rest = &self.source[self.pos..];
        for (op, kind) in OPERATORS {
            if rest.starts_with(op) {
                self.push(Some(*kind), self.pos + op.len());
                return;
            }
        }
        let len = rest.chars().next().map_or(1, char::len_utf8);
        self.push(None, self.pos + len);
    }
}

/// Lex `source` with default settings
pub fn lex(source: &str) -> Lexed {
    Lexer::new(source).tokenize()
}
