//! Token value type and token kinds
//!
//! A [`Token`] is one lexical unit of PHP source: an optional [`TokenKind`]
//! plus the exact text it was lexed from. Single character tokens such as
//! `;` or `(` carry no kind, and the empty token (no kind, empty content) is
//! used as a tombstone when a fixer removes something without renumbering.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters considered whitespace when no explicit set is given
pub const DEFAULT_WHITESPACE: &str = " \t\n\r\0\x0B";

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    // Tags and raw content
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,

    // Trivia
    Whitespace,
    Comment,
    DocComment,

    // Names and literals
    Variable,
    String,
    NsSeparator,
    LNumber,
    DNumber,
    ConstantEncapsedString,
    StartHeredoc,
    EncapsedAndWhitespace,
    EndHeredoc,

    // Casts
    IntCast,
    DoubleCast,
    StringCast,
    ArrayCast,
    ObjectCast,
    BoolCast,
    UnsetCast,

    // Keywords
    Abstract,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    ElseIf,
    Empty,
    EndDeclare,
    EndFor,
    EndForeach,
    EndIf,
    EndSwitch,
    EndWhile,
    Eval,
    Exit,
    Extends,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Global,
    Goto,
    HaltCompiler,
    If,
    Implements,
    Include,
    IncludeOnce,
    InstanceOf,
    InsteadOf,
    Interface,
    Isset,
    List,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Match,
    Namespace,
    New,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Unset,
    Use,
    Var,
    While,
    Yield,
    YieldFrom,

    // Magic constants
    Line,
    File,
    Dir,
    ClassC,
    TraitC,
    MethodC,
    FuncC,
    NsC,

    // Multi-character operators
    ObjectOperator,
    NullsafeObjectOperator,
    DoubleColon,
    DoubleArrow,
    Inc,
    Dec,
    IsEqual,
    IsNotEqual,
    IsIdentical,
    IsNotIdentical,
    IsSmallerOrEqual,
    IsGreaterOrEqual,
    Spaceship,
    BooleanAnd,
    BooleanOr,
    Coalesce,
    CoalesceEqual,
    PlusEqual,
    MinusEqual,
    MulEqual,
    DivEqual,
    ConcatEqual,
    ModEqual,
    AndEqual,
    OrEqual,
    XorEqual,
    SlEqual,
    SrEqual,
    Sl,
    Sr,
    Pow,
    PowEqual,
    Ellipsis,
    Attribute,

    // Kinds assigned after lexing by the transformers
    ArraySquareBraceOpen,
    ArraySquareBraceClose,
    DestructuringSquareBraceOpen,
    DestructuringSquareBraceClose,
    DynamicPropBraceOpen,
    DynamicPropBraceClose,
    DynamicVarBraceOpen,
    DynamicVarBraceClose,
    ArrayIndexCurlyBraceOpen,
    ArrayIndexCurlyBraceClose,
    GroupImportBraceOpen,
    GroupImportBraceClose,
    BraceClassInstantiationOpen,
    BraceClassInstantiationClose,
    AttributeClose,
    NamespaceOperator,
    NullableType,
    UseLambda,
    UseTrait,
}

impl TokenKind {
    /// Name in the `T_*` / `CT::T_*` convention used in diagnostics
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            InlineHtml => "T_INLINE_HTML",
            OpenTag => "T_OPEN_TAG",
            OpenTagWithEcho => "T_OPEN_TAG_WITH_ECHO",
            CloseTag => "T_CLOSE_TAG",
            Whitespace => "T_WHITESPACE",
            Comment => "T_COMMENT",
            DocComment => "T_DOC_COMMENT",
            Variable => "T_VARIABLE",
            String => "T_STRING",
            NsSeparator => "T_NS_SEPARATOR",
            LNumber => "T_LNUMBER",
            DNumber => "T_DNUMBER",
            ConstantEncapsedString => "T_CONSTANT_ENCAPSED_STRING",
            StartHeredoc => "T_START_HEREDOC",
            EncapsedAndWhitespace => "T_ENCAPSED_AND_WHITESPACE",
            EndHeredoc => "T_END_HEREDOC",
            IntCast => "T_INT_CAST",
            DoubleCast => "T_DOUBLE_CAST",
            StringCast => "T_STRING_CAST",
            ArrayCast => "T_ARRAY_CAST",
            ObjectCast => "T_OBJECT_CAST",
            BoolCast => "T_BOOL_CAST",
            UnsetCast => "T_UNSET_CAST",
            Abstract => "T_ABSTRACT",
            Array => "T_ARRAY",
            As => "T_AS",
            Break => "T_BREAK",
            Callable => "T_CALLABLE",
            Case => "T_CASE",
            Catch => "T_CATCH",
            Class => "T_CLASS",
            Clone => "T_CLONE",
            Const => "T_CONST",
            Continue => "T_CONTINUE",
            Declare => "T_DECLARE",
            Default => "T_DEFAULT",
            Do => "T_DO",
            Echo => "T_ECHO",
            Else => "T_ELSE",
            ElseIf => "T_ELSEIF",
            Empty => "T_EMPTY",
            EndDeclare => "T_ENDDECLARE",
            EndFor => "T_ENDFOR",
            EndForeach => "T_ENDFOREACH",
            EndIf => "T_ENDIF",
            EndSwitch => "T_ENDSWITCH",
            EndWhile => "T_ENDWHILE",
            Eval => "T_EVAL",
            Exit => "T_EXIT",
            Extends => "T_EXTENDS",
            Final => "T_FINAL",
            Finally => "T_FINALLY",
            Fn => "T_FN",
            For => "T_FOR",
            Foreach => "T_FOREACH",
            Function => "T_FUNCTION",
            Global => "T_GLOBAL",
            Goto => "T_GOTO",
            HaltCompiler => "T_HALT_COMPILER",
            If => "T_IF",
            Implements => "T_IMPLEMENTS",
            Include => "T_INCLUDE",
            IncludeOnce => "T_INCLUDE_ONCE",
            InstanceOf => "T_INSTANCEOF",
            InsteadOf => "T_INSTEADOF",
            Interface => "T_INTERFACE",
            Isset => "T_ISSET",
            List => "T_LIST",
            LogicalAnd => "T_LOGICAL_AND",
            LogicalOr => "T_LOGICAL_OR",
            LogicalXor => "T_LOGICAL_XOR",
            Match => "T_MATCH",
            Namespace => "T_NAMESPACE",
            New => "T_NEW",
            Print => "T_PRINT",
            Private => "T_PRIVATE",
            Protected => "T_PROTECTED",
            Public => "T_PUBLIC",
            Readonly => "T_READONLY",
            Require => "T_REQUIRE",
            RequireOnce => "T_REQUIRE_ONCE",
            Return => "T_RETURN",
            Static => "T_STATIC",
            Switch => "T_SWITCH",
            Throw => "T_THROW",
            Trait => "T_TRAIT",
            Try => "T_TRY",
            Unset => "T_UNSET",
            Use => "T_USE",
            Var => "T_VAR",
            While => "T_WHILE",
            Yield => "T_YIELD",
            YieldFrom => "T_YIELD_FROM",
            Line => "T_LINE",
            File => "T_FILE",
            Dir => "T_DIR",
            ClassC => "T_CLASS_C",
            TraitC => "T_TRAIT_C",
            MethodC => "T_METHOD_C",
            FuncC => "T_FUNC_C",
            NsC => "T_NS_C",
            ObjectOperator => "T_OBJECT_OPERATOR",
            NullsafeObjectOperator => "T_NULLSAFE_OBJECT_OPERATOR",
            DoubleColon => "T_DOUBLE_COLON",
            DoubleArrow => "T_DOUBLE_ARROW",
            Inc => "T_INC",
            Dec => "T_DEC",
            IsEqual => "T_IS_EQUAL",
            IsNotEqual => "T_IS_NOT_EQUAL",
            IsIdentical => "T_IS_IDENTICAL",
            IsNotIdentical => "T_IS_NOT_IDENTICAL",
            IsSmallerOrEqual => "T_IS_SMALLER_OR_EQUAL",
            IsGreaterOrEqual => "T_IS_GREATER_OR_EQUAL",
            Spaceship => "T_SPACESHIP",
            BooleanAnd => "T_BOOLEAN_AND",
            BooleanOr => "T_BOOLEAN_OR",
            Coalesce => "T_COALESCE",
            CoalesceEqual => "T_COALESCE_EQUAL",
            PlusEqual => "T_PLUS_EQUAL",
            MinusEqual => "T_MINUS_EQUAL",
            MulEqual => "T_MUL_EQUAL",
            DivEqual => "T_DIV_EQUAL",
            ConcatEqual => "T_CONCAT_EQUAL",
            ModEqual => "T_MOD_EQUAL",
            AndEqual => "T_AND_EQUAL",
            OrEqual => "T_OR_EQUAL",
            XorEqual => "T_XOR_EQUAL",
            SlEqual => "T_SL_EQUAL",
            SrEqual => "T_SR_EQUAL",
            Sl => "T_SL",
            Sr => "T_SR",
            Pow => "T_POW",
            PowEqual => "T_POW_EQUAL",
            Ellipsis => "T_ELLIPSIS",
            Attribute => "T_ATTRIBUTE",
            ArraySquareBraceOpen => "CT::T_ARRAY_SQUARE_BRACE_OPEN",
            ArraySquareBraceClose => "CT::T_ARRAY_SQUARE_BRACE_CLOSE",
            DestructuringSquareBraceOpen => "CT::T_DESTRUCTURING_SQUARE_BRACE_OPEN",
            DestructuringSquareBraceClose => "CT::T_DESTRUCTURING_SQUARE_BRACE_CLOSE",
            DynamicPropBraceOpen => "CT::T_DYNAMIC_PROP_BRACE_OPEN",
            DynamicPropBraceClose => "CT::T_DYNAMIC_PROP_BRACE_CLOSE",
            DynamicVarBraceOpen => "CT::T_DYNAMIC_VAR_BRACE_OPEN",
            DynamicVarBraceClose => "CT::T_DYNAMIC_VAR_BRACE_CLOSE",
            ArrayIndexCurlyBraceOpen => "CT::T_ARRAY_INDEX_CURLY_BRACE_OPEN",
            ArrayIndexCurlyBraceClose => "CT::T_ARRAY_INDEX_CURLY_BRACE_CLOSE",
            GroupImportBraceOpen => "CT::T_GROUP_IMPORT_BRACE_OPEN",
            GroupImportBraceClose => "CT::T_GROUP_IMPORT_BRACE_CLOSE",
            BraceClassInstantiationOpen => "CT::T_BRACE_CLASS_INSTANTIATION_OPEN",
            BraceClassInstantiationClose => "CT::T_BRACE_CLASS_INSTANTIATION_CLOSE",
            AttributeClose => "CT::T_ATTRIBUTE_CLOSE",
            NamespaceOperator => "CT::T_NAMESPACE_OPERATOR",
            NullableType => "CT::T_NULLABLE_TYPE",
            UseLambda => "CT::T_USE_LAMBDA",
            UseTrait => "CT::T_USE_TRAIT",
        }
    }

    /// Look up the keyword kind for a lowercased identifier
    pub fn keyword(lowercase: &str) -> Option<Self> {
        use TokenKind::*;
        let kind = match lowercase {
            "abstract" => Abstract,
            "and" => LogicalAnd,
            "array" => Array,
            "as" => As,
            "break" => Break,
            "callable" => Callable,
            "case" => Case,
            "catch" => Catch,
            "class" => Class,
            "clone" => Clone,
            "const" => Const,
            "continue" => Continue,
            "declare" => Declare,
            "default" => Default,
            "die" | "exit" => Exit,
            "do" => Do,
            "echo" => Echo,
            "else" => Else,
            "elseif" => ElseIf,
            "empty" => Empty,
            "enddeclare" => EndDeclare,
            "endfor" => EndFor,
            "endforeach" => EndForeach,
            "endif" => EndIf,
            "endswitch" => EndSwitch,
            "endwhile" => EndWhile,
            "eval" => Eval,
            "extends" => Extends,
            "final" => Final,
            "finally" => Finally,
            "fn" => Fn,
            "for" => For,
            "foreach" => Foreach,
            "function" => Function,
            "global" => Global,
            "goto" => Goto,
            "__halt_compiler" => HaltCompiler,
            "if" => If,
            "implements" => Implements,
            "include" => Include,
            "include_once" => IncludeOnce,
            "instanceof" => InstanceOf,
            "insteadof" => InsteadOf,
            "interface" => Interface,
            "isset" => Isset,
            "list" => List,
            "match" => Match,
            "namespace" => Namespace,
            "new" => New,
            "or" => LogicalOr,
            "print" => Print,
            "private" => Private,
            "protected" => Protected,
            "public" => Public,
            "readonly" => Readonly,
            "require" => Require,
            "require_once" => RequireOnce,
            "return" => Return,
            "static" => Static,
            "switch" => Switch,
            "throw" => Throw,
            "trait" => Trait,
            "try" => Try,
            "unset" => Unset,
            "use" => Use,
            "var" => Var,
            "while" => While,
            "xor" => LogicalXor,
            "yield" => Yield,
            "__line__" => Line,
            "__file__" => File,
            "__dir__" => Dir,
            "__class__" => ClassC,
            "__trait__" => TraitC,
            "__method__" => MethodC,
            "__function__" => FuncC,
            "__namespace__" => NsC,
            _ => return None,
        };
        Some(kind)
    }

    /// Keyword kinds, including keywords retagged by the transformers.
    /// Magic constants are excluded.
    pub fn is_keyword(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Abstract | Array | As | Break | Callable | Case | Catch | Class | Clone | Const
                | Continue | Declare | Default | Do | Echo | Else | ElseIf | Empty | EndDeclare
                | EndFor | EndForeach | EndIf | EndSwitch | EndWhile | Eval | Exit | Extends
                | Final | Finally | Fn | For | Foreach | Function | Global | Goto | HaltCompiler
                | If | Implements | Include | IncludeOnce | InstanceOf | InsteadOf | Interface
                | Isset | List | LogicalAnd | LogicalOr | LogicalXor | Match | Namespace | New
                | Print | Private | Protected | Public | Readonly | Require | RequireOnce
                | Return | Static | Switch | Throw | Trait | Try | Unset | Use | Var | While
                | Yield | YieldFrom | NamespaceOperator | UseLambda | UseTrait
        )
    }

    pub fn is_cast(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntCast | DoubleCast | StringCast | ArrayCast | ObjectCast | BoolCast | UnsetCast
        )
    }

    pub fn is_magic_constant(&self) -> bool {
        use TokenKind::*;
        matches!(self, Line | File | Dir | ClassC | TraitC | MethodC | FuncC | NsC)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One lexical token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Token {
    kind: Option<TokenKind>,
    content: String,
}

impl Token {
    /// Create a token of the given kind
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            content: content.into(),
        }
    }

    /// Create a single character token, which has no kind
    pub fn simple(content: impl Into<String>) -> Self {
        Self {
            kind: None,
            content: content.into(),
        }
    }

    /// The empty tombstone token
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn whitespace(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Whitespace, content)
    }

    pub fn kind(&self) -> Option<TokenKind> {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Same kind with new content
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            content: content.into(),
        }
    }

    /// Same content with a new kind
    pub fn with_kind(&self, kind: TokenKind) -> Self {
        Self {
            kind: Some(kind),
            content: self.content.clone(),
        }
    }

    pub fn is_given_kind(&self, kind: TokenKind) -> bool {
        self.kind == Some(kind)
    }

    pub fn is_any_kind(&self, kinds: &[TokenKind]) -> bool {
        self.kind.is_some_and(|kind| kinds.contains(&kind))
    }

    /// Tombstone check: no kind and no content
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.content.is_empty()
    }

    /// True for whitespace tokens made only of `chars` (default set when `None`).
    ///
    /// The empty token counts as whitespace; other kinded tokens never do.
    pub fn is_whitespace(&self, chars: Option<&str>) -> bool {
        if self.kind.is_some() && self.kind != Some(TokenKind::Whitespace) {
            return false;
        }
        let chars = chars.unwrap_or(DEFAULT_WHITESPACE);
        self.content.chars().all(|c| chars.contains(c))
    }

    pub fn is_comment(&self) -> bool {
        self.is_any_kind(&[TokenKind::Comment, TokenKind::DocComment])
    }

    /// Neither whitespace, comment nor empty
    pub fn is_meaningful(&self) -> bool {
        !self.is_whitespace(None) && !self.is_comment()
    }

    pub fn is_cast(&self) -> bool {
        self.kind.is_some_and(|kind| kind.is_cast())
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_some_and(|kind| kind.is_keyword())
    }

    pub fn is_magic_constant(&self) -> bool {
        self.kind.is_some_and(|kind| kind.is_magic_constant())
    }

    /// `true`, `false` or `null` in any casing
    pub fn is_native_constant(&self) -> bool {
        self.is_given_kind(TokenKind::String)
            && matches!(
                self.content.to_ascii_lowercase().as_str(),
                "true" | "false" | "null"
            )
    }

    /// Short array brace, open or close
    pub fn is_array_brace(&self) -> bool {
        self.is_any_kind(&[
            TokenKind::ArraySquareBraceOpen,
            TokenKind::ArraySquareBraceClose,
        ])
    }

    /// Compare against a pattern
    pub fn equals(&self, pattern: &TokenPattern<'_>, case_sensitive: bool) -> bool {
        let same = |content: &str| {
            if case_sensitive {
                self.content == content
            } else {
                self.content.eq_ignore_ascii_case(content)
            }
        };

        match pattern {
            TokenPattern::Content(content) => self.kind.is_none() && same(content),
            TokenPattern::Kind(kind) => self.kind == Some(*kind),
            TokenPattern::KindContent(kind, content) => self.kind == Some(*kind) && same(content),
        }
    }

    pub fn equals_any(&self, patterns: &[TokenPattern<'_>], case_sensitive: bool) -> bool {
        patterns.iter().any(|p| self.equals(p, case_sensitive))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Matcher for one token: a bare literal, a kind with content, or a kind alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPattern<'a> {
    /// Single character token with exactly this content
    Content(&'a str),
    /// Any token of this kind
    Kind(TokenKind),
    /// Token of this kind with exactly this content
    KindContent(TokenKind, &'a str),
}

impl TokenPattern<'_> {
    /// Whether the pattern could only ever match trivia or the empty token
    pub fn is_meaningless(&self) -> bool {
        match self {
            TokenPattern::Content(content) => content.is_empty() || content.chars().all(|c| DEFAULT_WHITESPACE.contains(c)),
            TokenPattern::Kind(kind) | TokenPattern::KindContent(kind, _) => matches!(
                kind,
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
            ),
        }
    }

    pub fn kind(&self) -> Option<TokenKind> {
        match self {
            TokenPattern::Content(_) => None,
            TokenPattern::Kind(kind) | TokenPattern::KindContent(kind, _) => Some(*kind),
        }
    }
}

impl<'a> From<&'a str> for TokenPattern<'a> {
    fn from(content: &'a str) -> Self {
        TokenPattern::Content(content)
    }
}

impl From<TokenKind> for TokenPattern<'_> {
    fn from(kind: TokenKind) -> Self {
        TokenPattern::Kind(kind)
    }
}

impl<'a> From<(TokenKind, &'a str)> for TokenPattern<'a> {
    fn from((kind, content): (TokenKind, &'a str)) -> Self {
        TokenPattern::KindContent(kind, content)
    }
}

/// Case sensitivity for pattern matching, either global or per pattern slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseSensitivity {
    All(bool),
    /// Slots missing from the map are case sensitive
    PerSlot(HashMap<usize, bool>),
}

impl CaseSensitivity {
    pub fn for_slot(&self, slot: usize) -> bool {
        match self {
            CaseSensitivity::All(value) => *value,
            CaseSensitivity::PerSlot(map) => map.get(&slot).copied().unwrap_or(true),
        }
    }
}

impl Default for CaseSensitivity {
    fn default() -> Self {
        CaseSensitivity::All(true)
    }
}

impl From<bool> for CaseSensitivity {
    fn from(value: bool) -> Self {
        CaseSensitivity::All(value)
    }
}

impl From<HashMap<usize, bool>> for CaseSensitivity {
    fn from(map: HashMap<usize, bool>) -> Self {
        CaseSensitivity::PerSlot(map)
    }
}
