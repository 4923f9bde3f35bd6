//! Syntax gate for input and fixer output
//!
//! [`TokenizerLinter`] runs in process over the token stream and catches
//! what a token-level rewrite can realistically break: unterminated
//! literals, unbalanced blocks, dangling namespace separators and
//! statements that end up in expression position. [`ProcessLinter`] hands
//! the code to `php -l` for a full parse.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::error::LintingError;
use crate::lexer;
use crate::token::{Token, TokenKind};
use crate::tokens::{BlockType, Tokens};

/// Something that can tell whether PHP code is syntactically valid
pub trait Linter: Send + Sync {
    /// Whether results are computed lazily, on [`LintingResult::check`]
    fn is_async(&self) -> bool;

    fn lint_file(&self, path: &Path) -> LintingResult;

    fn lint_source(&self, source: &str) -> LintingResult;
}

/// Handle to a linting outcome, possibly still being computed
#[derive(Debug)]
pub struct LintingResult {
    state: ResultState,
}

#[derive(Debug)]
enum ResultState {
    Ready(Result<(), LintingError>),
    Pending(Child),
}

impl LintingResult {
    pub fn ready(result: Result<(), LintingError>) -> Self {
        Self {
            state: ResultState::Ready(result),
        }
    }

    fn pending(child: Child) -> Self {
        Self {
            state: ResultState::Pending(child),
        }
    }

    /// Wait for the outcome
    pub fn check(self) -> Result<(), LintingError> {
        match self.state {
            ResultState::Ready(result) => result,
            ResultState::Pending(child) => {
                let output = child
                    .wait_with_output()
                    .map_err(|e| LintingError::Process(format!("Failed to wait for linter: {e}")))?;
                if output.status.success() {
                    return Ok(());
                }
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(LintingError::Process(first_error_line(&stderr, &stdout, output.status.code())))
            }
        }
    }
}

fn first_error_line(stderr: &str, stdout: &str, code: Option<i32>) -> String {
    stderr
        .lines()
        .chain(stdout.lines())
        .map(str::trim)
        .find(|line| line.contains("error"))
        .map(str::to_string)
        .unwrap_or_else(|| match code {
            Some(code) => format!("Linter exited with code {code}."),
            None => "Linter was terminated by a signal.".to_string(),
        })
}

/// Statements that cannot appear in expression position
const STATEMENT_KEYWORDS: &[TokenKind] = &[
    TokenKind::Echo,
    TokenKind::If,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::Switch,
    TokenKind::Return,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Try,
    TokenKind::Do,
    TokenKind::Global,
    TokenKind::Declare,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::Goto,
    TokenKind::Unset,
];

/// In-process linter built on the lexer and block matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerLinter;

impl TokenizerLinter {
    pub fn new() -> Self {
        Self
    }

    fn lint(&self, source: &str) -> Result<(), LintingError> {
        let lexed = lexer::lex(source);
        if let Some(error) = lexed.errors.first() {
            return Err(LintingError::Syntax {
                message: format!("syntax error, {error}"),
                line: error.line(),
            });
        }
        check_structure(&Tokens::from_lexed(lexed.tokens))
    }
}

impl Linter for TokenizerLinter {
    fn is_async(&self) -> bool {
        false
    }

    fn lint_file(&self, path: &Path) -> LintingResult {
        match fs::read_to_string(path) {
            Ok(source) => self.lint_source(&source),
            Err(e) => LintingResult::ready(Err(LintingError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })),
        }
    }

    fn lint_source(&self, source: &str) -> LintingResult {
        let result = self.lint(source);
        if let Err(error) = &result {
            tracing::debug!(%error, "tokenizer lint failed");
        }
        LintingResult::ready(result)
    }
}

fn unexpected(token: &Token, line: usize) -> LintingError {
    let message = match token.kind() {
        Some(kind) => format!("syntax error, unexpected '{}' ({})", token.content(), kind.name()),
        None => format!("syntax error, unexpected '{}'", token.content()),
    };
    LintingError::Syntax { message, line }
}

fn may_start_statement(prev: Option<&Token>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    match prev.kind() {
        None => matches!(prev.content(), ";" | "{" | "}" | ":" | ")"),
        Some(kind) => matches!(
            kind,
            TokenKind::OpenTag | TokenKind::Else | TokenKind::Do | TokenKind::AttributeClose
        ),
    }
}

fn check_structure(tokens: &Tokens) -> Result<(), LintingError> {
    let mut line = 1;
    let mut open_blocks: Vec<BlockType> = Vec::new();
    let mut prev_meaningful: Option<&Token> = None;

    for (index, token) in tokens.iter().enumerate() {
        if let Some(edge) = BlockType::detect(token) {
            if edge.is_start {
                open_blocks.push(edge.block);
            } else if open_blocks.pop() != Some(edge.block) {
                return Err(unexpected(token, line));
            }
        }

        if token.is_given_kind(TokenKind::NsSeparator) {
            let continues_name = tokens.get(index + 1).is_some_and(|next| {
                next.is_any_kind(&[TokenKind::String, TokenKind::GroupImportBraceOpen]) || next.is_keyword()
            });
            if !continues_name {
                return Err(unexpected(token, line));
            }
        }

        if token.is_any_kind(STATEMENT_KEYWORDS) && !may_start_statement(prev_meaningful) {
            return Err(unexpected(token, line));
        }

        if token.is_meaningful() {
            prev_meaningful = Some(token);
        }
        line += token.content().matches('\n').count();
    }

    if !open_blocks.is_empty() {
        return Err(LintingError::Syntax {
            message: "syntax error, unexpected end of file".to_string(),
            line,
        });
    }
    Ok(())
}

/// Linter delegating to `php -l`
#[derive(Debug, Clone)]
pub struct ProcessLinter {
    executable: PathBuf,
}

impl Default for ProcessLinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLinter {
    pub fn new() -> Self {
        Self::with_executable("php")
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("-l")
            .args(["-d", "display_errors=stderr", "-d", "short_open_tag=on"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn spawn_failed(&self, e: &std::io::Error) -> LintingResult {
        LintingResult::ready(Err(LintingError::Process(format!(
            "Failed to run \"{}\": {e}",
            self.executable.display()
        ))))
    }
}

impl Linter for ProcessLinter {
    fn is_async(&self) -> bool {
        true
    }

    fn lint_file(&self, path: &Path) -> LintingResult {
        let mut command = self.command();
        command.arg(path).stdin(Stdio::null());
        match command.spawn() {
            Ok(child) => LintingResult::pending(child),
            Err(e) => self.spawn_failed(&e),
        }
    }

    fn lint_source(&self, source: &str) -> LintingResult {
        let mut command = self.command();
        command.stdin(Stdio::piped());
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return self.spawn_failed(&e),
        };

        // php reads all of stdin before it writes anything
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(source.as_bytes()) {
                return LintingResult::ready(Err(LintingError::Process(format!(
                    "Failed to pass source to linter: {e}"
                ))));
            }
        }
        LintingResult::pending(child)
    }
}

/// Lint `code` with the tokenizer linter, then build its token stream
pub fn tokenize(code: &str) -> Result<Tokens, LintingError> {
    TokenizerLinter.lint(code)?;
    Ok(Tokens::from_code(code))
}
