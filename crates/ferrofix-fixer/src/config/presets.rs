//! Built-in rule sets (PSR-12, Symfony, etc.)
//!
//! Maps set names to their constituent rules. A set may include other sets
//! by name; those expand in place, in order.

use crate::fixers::{ConfigValue, FixerConfiguration};
use crate::ruleset::{RuleValue, SetDefinitions};

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Psr1,
    Psr2,
    Psr12,
    Symfony,
    SymfonyRisky,
    Php71Migration,
    Php71MigrationRisky,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Psr1,
        Preset::Psr2,
        Preset::Psr12,
        Preset::Symfony,
        Preset::SymfonyRisky,
        Preset::Php71Migration,
        Preset::Php71MigrationRisky,
    ];

    /// Look a preset up by its set name, e.g. `@PSR12`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Psr1 => "@PSR1",
            Preset::Psr2 => "@PSR2",
            Preset::Psr12 => "@PSR12",
            Preset::Symfony => "@Symfony",
            Preset::SymfonyRisky => "@Symfony:risky",
            Preset::Php71Migration => "@PHP71Migration",
            Preset::Php71MigrationRisky => "@PHP71Migration:risky",
        }
    }

    /// Sets made only of risky rules
    pub fn is_risky(&self) -> bool {
        self.name().ends_with(":risky")
    }

    /// The set's entries, nested sets included
    pub fn rules(&self) -> Vec<(String, RuleValue)> {
        let (enabled, configured): (&[&str], Vec<(&str, FixerConfiguration)>) = match self {
            Preset::Psr1 => (PSR1_RULES, vec![]),
            Preset::Psr2 => (PSR2_RULES, vec![]),
            Preset::Psr12 => (PSR12_RULES, vec![]),
            Preset::Symfony => (SYMFONY_RULES, vec![("array_syntax", syntax("short"))]),
            Preset::SymfonyRisky => (SYMFONY_RISKY_RULES, vec![]),
            Preset::Php71Migration => (PHP71_MIGRATION_RULES, vec![("list_syntax", syntax("short"))]),
            Preset::Php71MigrationRisky => (PHP71_MIGRATION_RISKY_RULES, vec![]),
        };

        enabled
            .iter()
            .map(|name| (name.to_string(), RuleValue::Enabled(true)))
            .chain(
                configured
                    .into_iter()
                    .map(|(name, config)| (name.to_string(), RuleValue::Configured(config))),
            )
            .collect()
    }
}

fn syntax(value: &str) -> FixerConfiguration {
    FixerConfiguration::from([("syntax".to_string(), ConfigValue::from(value))])
}

/// Definitions of every built-in set, keyed by set name
pub fn builtin_sets() -> SetDefinitions {
    Preset::ALL
        .into_iter()
        .map(|preset| (preset.name().to_string(), preset.rules()))
        .collect()
}

/// PSR-1 preset rules
pub const PSR1_RULES: &[&str] = &["encoding", "full_opening_tag"];

/// PSR-2 preset rules
pub const PSR2_RULES: &[&str] = &[
    "@PSR1",
    "constant_case",
    "lowercase_keywords",
    "no_trailing_whitespace",
    "single_blank_line_at_eof",
];

/// PSR-12 preset rules
pub const PSR12_RULES: &[&str] = &[
    "@PSR2",
    "blank_line_after_opening_tag",
    "lowercase_cast",
    "no_whitespace_in_blank_line",
];

/// Symfony preset rules, besides the configured `array_syntax`
pub const SYMFONY_RULES: &[&str] = &[
    "@PSR12",
    "cast_spaces",
    "no_empty_comment",
    "no_empty_statement",
    "no_short_bool_cast",
    "no_spaces_around_offset",
];

pub const SYMFONY_RISKY_RULES: &[&str] = &["no_alias_functions"];

/// PHP 7.1 migration rules, besides the configured `list_syntax`
pub const PHP71_MIGRATION_RULES: &[&str] = &[];

pub const PHP71_MIGRATION_RISKY_RULES: &[&str] = &["declare_strict_types"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(Preset::from_name("@PSR12"), Some(Preset::Psr12));
        assert_eq!(Preset::from_name("@Symfony:risky"), Some(Preset::SymfonyRisky));
        assert_eq!(Preset::from_name("@psr12"), None);
        assert_eq!(Preset::from_name("PSR12"), None);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
            assert!(preset.name().starts_with('@'));
        }
    }

    #[test]
    fn test_psr12_nests_psr2() {
        let rules = Preset::Psr12.rules();
        assert_eq!(rules[0], ("@PSR2".to_string(), RuleValue::Enabled(true)));
        assert!(rules.iter().any(|(name, _)| name == "lowercase_cast"));
    }

    #[test]
    fn test_symfony_configures_short_arrays() {
        let rules = Preset::Symfony.rules();
        let (_, value) = rules.iter().find(|(name, _)| name == "array_syntax").unwrap();
        assert_eq!(value, &RuleValue::Configured(syntax("short")));
    }

    #[test]
    fn test_builtin_sets_cover_every_preset() {
        let sets = builtin_sets();
        assert_eq!(sets.len(), Preset::ALL.len());
        assert!(sets.contains_key("@PHP71Migration:risky"));
    }
}
