//! Replace aliased functions with their master function

use std::collections::HashMap;

use ferrofix_core::{Token, TokenKind, TokenPattern, Tokens};

use crate::error::FixerError;
use crate::fixers::{resolve_configuration, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};

const INTERNAL_SET: &[(&str, &str)] = &[
    ("chop", "rtrim"),
    ("close", "closedir"),
    ("doubleval", "floatval"),
    ("fputs", "fwrite"),
    ("get_required_files", "get_included_files"),
    ("ini_alter", "ini_set"),
    ("is_double", "is_float"),
    ("is_integer", "is_int"),
    ("is_long", "is_int"),
    ("is_real", "is_float"),
    ("is_writeable", "is_writable"),
    ("join", "implode"),
    ("key_exists", "array_key_exists"),
    ("magic_quotes_runtime", "set_magic_quotes_runtime"),
    ("pos", "current"),
    ("show_source", "highlight_file"),
    ("sizeof", "count"),
    ("strchr", "strstr"),
    ("user_error", "trigger_error"),
];

const IMAP_SET: &[(&str, &str)] = &[
    ("imap_create", "imap_createmailbox"),
    ("imap_fetchtext", "imap_body"),
    ("imap_header", "imap_headerinfo"),
    ("imap_listmailbox", "imap_list"),
    ("imap_listsubscribed", "imap_lsub"),
    ("imap_rename", "imap_renamemailbox"),
    ("imap_scan", "imap_listscan"),
    ("imap_scanmailbox", "imap_listscan"),
];

const MBREG_SET: &[(&str, &str)] = &[
    ("mbereg", "mb_ereg"),
    ("mbereg_match", "mb_ereg_match"),
    ("mbereg_replace", "mb_ereg_replace"),
    ("mbereg_search", "mb_ereg_search"),
    ("mbereg_search_getpos", "mb_ereg_search_getpos"),
    ("mbereg_search_getregs", "mb_ereg_search_getregs"),
    ("mbereg_search_init", "mb_ereg_search_init"),
    ("mbereg_search_pos", "mb_ereg_search_pos"),
    ("mbereg_search_regs", "mb_ereg_search_regs"),
    ("mbereg_search_setpos", "mb_ereg_search_setpos"),
    ("mberegi", "mb_eregi"),
    ("mberegi_replace", "mb_eregi_replace"),
    ("mbregex_encoding", "mb_regex_encoding"),
    ("mbsplit", "mb_split"),
];

const DEFAULT_SETS: &[&str] = &["@internal", "@IMAP"];

/// Tokens before a name that make it something other than a global call
const NOT_CALL_PREFIX: &[TokenKind] = &[
    TokenKind::ObjectOperator,
    TokenKind::NullsafeObjectOperator,
    TokenKind::DoubleColon,
    TokenKind::Function,
    TokenKind::New,
    TokenKind::Const,
];

/// Master functions should be used instead of aliases
pub struct NoAliasFunctionsFixer {
    aliases: HashMap<&'static str, &'static str>,
}

impl Default for NoAliasFunctionsFixer {
    fn default() -> Self {
        Self::with_sets(DEFAULT_SETS)
    }
}

impl NoAliasFunctionsFixer {
    fn with_sets<S: AsRef<str>>(sets: &[S]) -> Self {
        let mut aliases = HashMap::new();
        for set in sets {
            let tables: &[&[(&'static str, &'static str)]] = match set.as_ref() {
                "@internal" => &[INTERNAL_SET],
                "@IMAP" => &[IMAP_SET],
                "@mbreg" => &[MBREG_SET],
                "@all" => &[INTERNAL_SET, IMAP_SET, MBREG_SET],
                _ => &[],
            };
            aliases.extend(tables.iter().flat_map(|table| table.iter().copied()));
        }
        Self { aliases }
    }

    /// `foo(` that is neither a method, a declaration nor namespaced
    fn is_global_call(tokens: &Tokens, index: usize) -> bool {
        let opens_call = tokens
            .get_next_meaningful_token(index)
            .is_some_and(|next| tokens[next].equals(&TokenPattern::Content("("), true));
        if !opens_call {
            return false;
        }

        let Some(mut prev) = tokens.get_prev_meaningful_token(index) else {
            return true;
        };
        if tokens[prev].is_given_kind(TokenKind::NsSeparator) {
            match tokens.get_prev_meaningful_token(prev) {
                Some(before) if tokens[before].is_given_kind(TokenKind::String) => return false,
                Some(before) => prev = before,
                None => return true,
            }
        }

        let token = &tokens[prev];
        if token.is_any_kind(NOT_CALL_PREFIX) {
            return false;
        }
        // `function &sizeof()`
        !(token.equals(&TokenPattern::Content("&"), true)
            && tokens
                .get_prev_meaningful_token(prev)
                .is_some_and(|before| tokens[before].is_given_kind(TokenKind::Function)))
    }
}

impl Fixer for NoAliasFunctionsFixer {
    fn name(&self) -> &'static str {
        "no_alias_functions"
    }

    fn description(&self) -> &'static str {
        "Master functions shall be used instead of aliases."
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_risky(&self) -> bool {
        true
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::String)
    }

    fn fix(&self, tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
        for index in tokens.find_given_kind(TokenKind::String, 0, None) {
            let name = tokens[index].content().to_ascii_lowercase();
            let Some(&master) = self.aliases.get(name.as_str()) else {
                continue;
            };
            if Self::is_global_call(tokens, index) {
                tokens.set(index, Token::new(TokenKind::String, master));
            }
        }
        Ok(())
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "sets",
            description: "List of sets to fix.",
            option_type: OptionType::Subset(vec!["@internal", "@IMAP", "@mbreg", "@all"]),
            default: Some(DEFAULT_SETS.to_vec().into()),
        }]
    }

    fn configure(&mut self, config: &FixerConfiguration) -> Result<(), String> {
        let resolved = resolve_configuration(&self.options(), config)?;
        let sets = resolved.get("sets").and_then(|v| v.as_list()).unwrap_or_default();
        *self = Self::with_sets(sets);
        Ok(())
    }
}
