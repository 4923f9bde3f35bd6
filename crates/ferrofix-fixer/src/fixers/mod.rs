//! Fixer implementations for PHP-CS-Fixer compatibility
//!
//! Every fixer rewrites a [`Tokens`] stream in place. The factory decides
//! which fixers run and in what order; the runner repeats the ordered list
//! until the stream stops changing.

pub mod casing;
pub mod cleanup;
pub mod misc;
pub mod risky;
pub mod syntax;
pub mod whitespace;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use ferrofix_core::Tokens;
use serde::{Deserialize, Serialize};

use crate::config::WhitespaceConfig;
use crate::error::FixerError;

/// Everything a fixer may need besides the stream itself
#[derive(Debug, Clone, Copy, Default)]
pub struct FixContext<'a> {
    /// File being fixed, when there is one
    pub path: Option<&'a Path>,
    pub whitespace: WhitespaceConfig,
}

impl<'a> FixContext<'a> {
    pub fn new(whitespace: WhitespaceConfig) -> Self {
        Self { path: None, whitespace }
    }

    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }

    pub fn line_ending(&self) -> &'static str {
        self.whitespace.line_ending.as_str()
    }
}

/// Configuration value types for fixer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
    Number(i64),
    Array(Vec<String>),
    StringMap(BTreeMap<String, String>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(value: Vec<&str>) -> Self {
        ConfigValue::Array(value.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::String(s) => write!(f, "\"{s}\""),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Array(items) => {
                let items: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ConfigValue::StringMap(map) => {
                let entries: Vec<String> =
                    map.iter().map(|(k, v)| format!("\"{k}\" => \"{v}\"")).collect();
                write!(f, "[{}]", entries.join(", "))
            }
        }
    }
}

/// Option name to value, as given in a rule set
pub type FixerConfiguration = BTreeMap<String, ConfigValue>;

/// A formatting fixer that rewrites a token stream
pub trait Fixer: Send + Sync {
    /// Unique rule name, e.g. `lowercase_cast`
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Execution priority (higher = runs first)
    fn priority(&self) -> i32;

    /// Whether this fixer may change code behavior
    fn is_risky(&self) -> bool {
        false
    }

    /// Cheap check whether [`Fixer::fix`] can possibly change `tokens`
    fn is_candidate(&self, tokens: &Tokens) -> bool;

    /// Whether the fixer applies to the given file at all
    fn supports(&self, _path: Option<&Path>) -> bool {
        true
    }

    /// Rewrite the stream. Must be idempotent on its own output.
    fn fix(&self, tokens: &mut Tokens, context: &FixContext<'_>) -> Result<(), FixerError>;

    /// Get configurable options for this fixer
    fn options(&self) -> Vec<FixerOption> {
        vec![]
    }

    /// Apply rule set configuration. Errors carry a human readable reason.
    fn configure(&mut self, config: &FixerConfiguration) -> Result<(), String> {
        if config.is_empty() {
            Ok(())
        } else {
            Err("Is not configurable.".to_string())
        }
    }
}

/// A configurable option for a fixer
#[derive(Debug, Clone)]
pub struct FixerOption {
    pub name: &'static str,
    pub description: &'static str,
    pub option_type: OptionType,
    pub default: Option<ConfigValue>,
}

impl FixerOption {
    fn validate(&self, value: &ConfigValue) -> Result<(), String> {
        let valid = match (&self.option_type, value) {
            (OptionType::Bool, ConfigValue::Bool(_))
            | (OptionType::String, ConfigValue::String(_))
            | (OptionType::Number, ConfigValue::Number(_))
            | (OptionType::StringArray, ConfigValue::Array(_)) => true,
            (OptionType::Enum(allowed), ConfigValue::String(s)) => allowed.contains(&s.as_str()),
            (OptionType::Subset(allowed), ConfigValue::Array(items)) => {
                items.iter().all(|item| allowed.contains(&item.as_str()))
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(format!(
                "The option \"{}\" with value {value} is invalid.",
                self.name
            ))
        }
    }
}

/// Type of a fixer option
#[derive(Debug, Clone)]
pub enum OptionType {
    Bool,
    String,
    Number,
    StringArray,
    /// One string out of the listed values
    Enum(Vec<&'static str>),
    /// A list whose items all come from the listed values
    Subset(Vec<&'static str>),
}

/// Validate `config` against `options`, filling in defaults
pub fn resolve_configuration(
    options: &[FixerOption],
    config: &FixerConfiguration,
) -> Result<FixerConfiguration, String> {
    for name in config.keys() {
        if !options.iter().any(|option| option.name == name) {
            let defined: Vec<String> = options.iter().map(|o| format!("\"{}\"", o.name)).collect();
            return Err(format!(
                "The option \"{name}\" does not exist. Defined options are: {}.",
                defined.join(", ")
            ));
        }
    }

    let mut resolved = FixerConfiguration::new();
    for option in options {
        let value = match (config.get(option.name), &option.default) {
            (Some(value), _) => {
                option.validate(value)?;
                value.clone()
            }
            (None, Some(default)) => default.clone(),
            (None, None) => {
                return Err(format!("The required option \"{}\" is missing.", option.name));
            }
        };
        resolved.insert(option.name.to_string(), value);
    }
    Ok(resolved)
}

/// Every built-in fixer, in registration order
pub fn built_in() -> Vec<Box<dyn Fixer>> {
    vec![
        Box::new(whitespace::EncodingFixer),
        Box::new(whitespace::FullOpeningTagFixer),
        Box::new(whitespace::BlankLineAfterOpeningTagFixer),
        Box::new(whitespace::NoTrailingWhitespaceFixer),
        Box::new(whitespace::NoWhitespaceInBlankLineFixer),
        Box::new(whitespace::SingleBlankLineAtEofFixer),
        Box::new(whitespace::NoSpacesAroundOffsetFixer::default()),
        Box::new(casing::LowercaseKeywordsFixer),
        Box::new(casing::ConstantCaseFixer::default()),
        Box::new(casing::LowercaseCastFixer),
        Box::new(misc::CastSpacesFixer::default()),
        Box::new(misc::ListSyntaxFixer::default()),
        Box::new(syntax::ArraySyntaxFixer::default()),
        Box::new(cleanup::NoShortBoolCastFixer),
        Box::new(cleanup::NoEmptyStatementFixer),
        Box::new(cleanup::NoEmptyCommentFixer),
        Box::new(risky::DeclareStrictTypesFixer),
        Box::new(risky::NoAliasFunctionsFixer::default()),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use pretty_assertions::assert_eq;

    fn apply(fixer: &dyn Fixer, context: &FixContext<'_>, code: &str) -> Tokens {
        let mut tokens = Tokens::from_code(code);
        if fixer.supports(context.path) && fixer.is_candidate(&tokens) {
            fixer.fix(&mut tokens, context).unwrap();
        }
        tokens
    }

    /// Fix `input` into `expected`, then check `expected` is left alone
    pub(crate) fn do_test(fixer: &dyn Fixer, expected: &str, input: Option<&str>) {
        do_test_with(fixer, &FixContext::default(), expected, input);
    }

    pub(crate) fn do_test_with(
        fixer: &dyn Fixer,
        context: &FixContext<'_>,
        expected: &str,
        input: Option<&str>,
    ) {
        if let Some(input) = input {
            assert_ne!(expected, input, "input and expected code must differ");
            let tokens = apply(fixer, context, input);
            assert_eq!(tokens.generate_code(), expected);
            assert!(tokens.is_changed(), "stream must be flagged as changed");
        }

        let tokens = apply(fixer, context, expected);
        assert_eq!(tokens.generate_code(), expected);
        assert!(!tokens.is_changed(), "expected code must not be changed");
    }

    /// Configure a fixer from `(option, value)` pairs
    pub(crate) fn configured<F: Fixer>(mut fixer: F, config: &[(&str, ConfigValue)]) -> F {
        let config: FixerConfiguration = config
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        fixer.configure(&config).unwrap();
        fixer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn syntax_option() -> Vec<FixerOption> {
        vec![FixerOption {
            name: "syntax",
            description: "Whether to use the `long` or `short` syntax.",
            option_type: OptionType::Enum(vec!["long", "short"]),
            default: Some("long".into()),
        }]
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let resolved = resolve_configuration(&syntax_option(), &FixerConfiguration::new()).unwrap();
        assert_eq!(resolved.get("syntax"), Some(&ConfigValue::from("long")));
    }

    #[test]
    fn test_resolve_rejects_unknown_option() {
        let config = FixerConfiguration::from([("foo".to_string(), ConfigValue::Bool(true))]);
        assert_eq!(
            resolve_configuration(&syntax_option(), &config).unwrap_err(),
            "The option \"foo\" does not exist. Defined options are: \"syntax\"."
        );
    }

    #[test]
    fn test_resolve_rejects_invalid_value() {
        let config = FixerConfiguration::from([("syntax".to_string(), ConfigValue::from("medium"))]);
        assert_eq!(
            resolve_configuration(&syntax_option(), &config).unwrap_err(),
            "The option \"syntax\" with value \"medium\" is invalid."
        );
    }

    #[test]
    fn test_subset_option() {
        let options = vec![FixerOption {
            name: "positions",
            description: "Whether spacing should be fixed inside and/or outside the offset braces.",
            option_type: OptionType::Subset(vec!["inside", "outside"]),
            default: Some(vec!["inside", "outside"].into()),
        }];
        let ok = FixerConfiguration::from([("positions".to_string(), vec!["inside"].into())]);
        assert!(resolve_configuration(&options, &ok).is_ok());

        let bad = FixerConfiguration::from([("positions".to_string(), vec!["inside", "around"].into())]);
        assert_eq!(
            resolve_configuration(&options, &bad).unwrap_err(),
            "The option \"positions\" with value [\"inside\", \"around\"] is invalid."
        );
    }

    #[test]
    fn test_built_in_names_are_unique() {
        let fixers = built_in();
        let mut names: Vec<&str> = fixers.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), fixers.len());
    }

    #[test]
    fn test_config_value_deserializes_untagged() {
        let value: ConfigValue = serde_json_like("short");
        assert_eq!(value, ConfigValue::from("short"));
    }

    fn serde_json_like(s: &str) -> ConfigValue {
        // serde's value deserializer stands in for a config file loader
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;
        let deserializer: StrDeserializer<'_, Error> = s.into_deserializer();
        ConfigValue::deserialize(deserializer).unwrap()
    }
}
