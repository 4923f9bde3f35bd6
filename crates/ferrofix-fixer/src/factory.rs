//! Fixer factory and priority scheduler
//!
//! The factory collects all available fixers, narrows them to a resolved
//! rule set and orders them for the runner. Ordering is a topological sort
//! over the priority constraint graph; among fixers that are ready to run,
//! higher priority goes first and registration order breaks ties.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigurationError;
use crate::fixers::{self, Fixer, FixerConfiguration};
use crate::ruleset::RuleSet;

/// `(before, after)`: when both are enabled, `before` runs first
const BUILT_IN_CONSTRAINTS: &[(&str, &str)] = &[
    ("declare_strict_types", "blank_line_after_opening_tag"),
    ("no_empty_comment", "no_trailing_whitespace"),
    ("no_empty_comment", "no_whitespace_in_blank_line"),
    ("no_empty_statement", "no_trailing_whitespace"),
    ("no_empty_statement", "no_whitespace_in_blank_line"),
    ("no_short_bool_cast", "cast_spaces"),
];

/// Information about a registered fixer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub priority: i32,
    pub is_risky: bool,
}

/// Registry of fixers plus the scheduling rules between them
pub struct FixerFactory {
    fixers: Vec<Box<dyn Fixer>>,
    /// Configuration each fixer was last configured with
    configurations: Vec<FixerConfiguration>,
    by_name: HashMap<&'static str, usize>,
    constraints: Vec<(String, String)>,
    conflicts: Vec<(String, String)>,
    /// Indices selected by the last rule set; every fixer when unset
    enabled: Option<Vec<usize>>,
}

impl Default for FixerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FixerFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self {
            fixers: Vec::new(),
            configurations: Vec::new(),
            by_name: HashMap::new(),
            constraints: Vec::new(),
            conflicts: Vec::new(),
            enabled: None,
        }
    }

    /// Create a factory with every built-in fixer registered
    pub fn with_built_in() -> Result<Self, ConfigurationError> {
        let mut factory = Self::new();
        factory.register_built_in()?;
        Ok(factory)
    }

    /// Register the built-in fixers and their priority constraints
    pub fn register_built_in(&mut self) -> Result<(), ConfigurationError> {
        for fixer in fixers::built_in() {
            self.register_fixer(fixer, false)?;
        }
        for (before, after) in BUILT_IN_CONSTRAINTS {
            self.add_priority_constraint(before, after);
        }
        tracing::debug!(fixers = self.fixers.len(), "built-in fixers registered");
        Ok(())
    }

    /// Register a fixer.
    ///
    /// Built-in names are `snake_case`; custom names carry a vendor prefix,
    /// e.g. `Vendor/some_rule`.
    pub fn register_fixer(&mut self, fixer: Box<dyn Fixer>, is_custom: bool) -> Result<(), ConfigurationError> {
        let name = fixer.name();
        if self.by_name.contains_key(name) {
            return Err(ConfigurationError::DuplicateFixer(name.to_string()));
        }
        if !is_valid_name(name, is_custom) {
            return Err(ConfigurationError::InvalidFixerName(name.to_string()));
        }

        self.by_name.insert(name, self.fixers.len());
        self.fixers.push(fixer);
        self.configurations.push(FixerConfiguration::new());
        Ok(())
    }

    /// Require `before` to run ahead of `after` whenever both are enabled
    pub fn add_priority_constraint(&mut self, before: &str, after: &str) {
        self.constraints.push((before.to_string(), after.to_string()));
    }

    /// Declare two fixers as mutually exclusive in one rule set
    pub fn add_conflict(&mut self, a: &str, b: &str) {
        self.conflicts.push((a.to_string(), b.to_string()));
    }

    /// Enable exactly the fixers of `rules`, configuring each one.
    ///
    /// On any error the factory keeps its previous selection, order and
    /// fixer configurations.
    pub fn use_rule_set(&mut self, rules: &RuleSet, risky_allowed: bool) -> Result<(), ConfigurationError> {
        let mut selected = Vec::with_capacity(rules.len());
        for name in rules.rules().keys() {
            let index = *self
                .by_name
                .get(name.as_str())
                .ok_or_else(|| ConfigurationError::UnknownFixer(name.clone()))?;
            selected.push(index);
        }

        if !risky_allowed {
            if let Some(&index) = selected.iter().find(|&&i| self.fixers[i].is_risky()) {
                return Err(ConfigurationError::RiskyNotAllowed(
                    self.fixers[index].name().to_string(),
                ));
            }
        }

        let conflicts: Vec<(String, String)> = self
            .conflicts
            .iter()
            .filter(|(a, b)| rules.has_rule(a) && rules.has_rule(b))
            .cloned()
            .collect();
        if !conflicts.is_empty() {
            return Err(ConfigurationError::ConflictingFixers(conflicts));
        }

        self.schedule_for(&selected)?;

        let mut configs = Vec::with_capacity(selected.len());
        for &index in &selected {
            let config = rules.get_rule_configuration(self.fixers[index].name())?;
            configs.push(config.cloned().unwrap_or_default());
        }

        for (position, (&index, config)) in selected.iter().zip(&configs).enumerate() {
            if let Err(message) = self.fixers[index].configure(config) {
                self.restore_configurations(&selected[..=position]);
                return Err(ConfigurationError::InvalidFixerConfiguration {
                    name: self.fixers[index].name().to_string(),
                    message,
                });
            }
        }

        for (&index, config) in selected.iter().zip(configs) {
            self.configurations[index] = config;
        }
        selected.sort_unstable();
        self.enabled = Some(selected);

        for (before, after) in self.priority_violations() {
            tracing::warn!(before, after, "priority contradicts declared constraint");
        }
        Ok(())
    }

    /// Enabled fixers in execution order
    pub fn get_fixers(&self) -> Result<Vec<&dyn Fixer>, ConfigurationError> {
        Ok(self
            .schedule_for(&self.enabled_indices())?
            .into_iter()
            .map(|index| self.fixers[index].as_ref())
            .collect())
    }

    /// Enabled constraint edges whose numeric priorities point the other way
    pub fn priority_violations(&self) -> Vec<(&'static str, &'static str)> {
        self.enabled_edges(&self.enabled_indices())
            .into_iter()
            .map(|(before, after)| (&self.fixers[before], &self.fixers[after]))
            .filter(|(before, after)| before.priority() < after.priority())
            .map(|(before, after)| (before.name(), after.name()))
            .collect()
    }

    /// Get a fixer by name
    pub fn fixer(&self, name: &str) -> Option<&dyn Fixer> {
        self.by_name.get(name).map(|&index| self.fixers[index].as_ref())
    }

    pub fn has_fixer(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Get information about all fixers, in registration order
    pub fn list(&self) -> Vec<FixerInfo> {
        self.fixers
            .iter()
            .map(|f| FixerInfo {
                name: f.name(),
                description: f.description(),
                priority: f.priority(),
                is_risky: f.is_risky(),
            })
            .collect()
    }

    /// Number of registered fixers
    pub fn len(&self) -> usize {
        self.fixers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixers.is_empty()
    }

    fn enabled_indices(&self) -> Vec<usize> {
        match &self.enabled {
            Some(enabled) => enabled.clone(),
            None => (0..self.fixers.len()).collect(),
        }
    }

    /// Put back the configuration the fixers at `indices` had before
    fn restore_configurations(&mut self, indices: &[usize]) {
        for &index in indices {
            let fixer = &mut self.fixers[index];
            if let Err(message) = fixer.configure(&self.configurations[index]) {
                tracing::error!(fixer = fixer.name(), %message, "previous configuration no longer applies");
            }
        }
    }

    fn enabled_edges(&self, enabled: &[usize]) -> Vec<(usize, usize)> {
        self.constraints
            .iter()
            .filter_map(|(before, after)| {
                let before = *self.by_name.get(before.as_str())?;
                let after = *self.by_name.get(after.as_str())?;
                (enabled.contains(&before) && enabled.contains(&after)).then_some((before, after))
            })
            .collect()
    }

    fn schedule_for(&self, enabled: &[usize]) -> Result<Vec<usize>, ConfigurationError> {
        let mut in_degree: HashMap<usize, usize> = enabled.iter().map(|&index| (index, 0)).collect();
        let mut successors: HashMap<usize, Vec<usize>> = HashMap::new();
        for (before, after) in self.enabled_edges(enabled) {
            successors.entry(before).or_default().push(after);
            *in_degree.entry(after).or_default() += 1;
        }

        let key = |index: usize| (Reverse(self.fixers[index].priority()), index);
        let mut ready: BTreeSet<(Reverse<i32>, usize)> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&index, _)| key(index))
            .collect();

        let mut order = Vec::with_capacity(enabled.len());
        while let Some((_, index)) = ready.pop_first() {
            order.push(index);
            for &next in successors.get(&index).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(key(next));
                    }
                }
            }
        }

        if order.len() < enabled.len() {
            let mut stuck: Vec<String> = in_degree
                .iter()
                .filter(|(_, &degree)| degree > 0)
                .map(|(&index, _)| self.fixers[index].name().to_string())
                .collect();
            stuck.sort();
            return Err(ConfigurationError::PriorityCycle(stuck));
        }
        Ok(order)
    }
}

fn is_valid_name(name: &str, is_custom: bool) -> bool {
    static BUILT_IN_NAME: OnceLock<Regex> = OnceLock::new();
    static CUSTOM_NAME: OnceLock<Regex> = OnceLock::new();

    let regex = if is_custom {
        CUSTOM_NAME.get_or_init(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*/[a-z][a-z0-9_]*$").unwrap())
    } else {
        BUILT_IN_NAME.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap())
    };
    regex.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, WhitespaceConfig};
    use crate::error::FixerError;
    use crate::fixers::{ConfigValue, FixContext, FixerConfiguration};
    use crate::ruleset::RuleValue;
    use ferrofix_core::Tokens;
    use pretty_assertions::assert_eq;

    struct Dummy {
        name: &'static str,
        priority: i32,
        risky: bool,
    }

    impl Dummy {
        fn boxed(name: &'static str, priority: i32) -> Box<dyn Fixer> {
            Box::new(Self { name, priority, risky: false })
        }
    }

    impl Fixer for Dummy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "Dummy fixer."
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn is_risky(&self) -> bool {
            self.risky
        }

        fn is_candidate(&self, _tokens: &Tokens) -> bool {
            false
        }

        fn fix(&self, _tokens: &mut Tokens, _context: &FixContext<'_>) -> Result<(), FixerError> {
            Ok(())
        }
    }

    fn rules(names: &[&str]) -> RuleSet {
        RuleSet::new(names.iter().map(|name| (*name, RuleValue::Enabled(true)))).unwrap()
    }

    fn names(factory: &FixerFactory) -> Vec<&'static str> {
        factory.get_fixers().unwrap().iter().map(|f| f.name()).collect()
    }

    fn everything() -> FixerFactory {
        let mut factory = FixerFactory::with_built_in().unwrap();
        let all: Vec<&str> = Preset::ALL.iter().map(Preset::name).collect();
        factory.use_rule_set(&rules(&all), true).unwrap();
        factory
    }

    #[test]
    fn test_built_in_order() {
        let factory = everything();
        let order = names(&factory);
        assert_eq!(order.len(), factory.len());
        assert_eq!(order[0], "encoding");
        assert_eq!(order[1], "full_opening_tag");
        assert_eq!(order.last(), Some(&"single_blank_line_at_eof"));
    }

    #[test]
    fn test_order_is_deterministic() {
        assert_eq!(names(&everything()), names(&everything()));
    }

    #[test]
    fn test_built_in_constraints_hold() {
        let factory = everything();
        let order = names(&factory);
        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        for (before, after) in BUILT_IN_CONSTRAINTS {
            assert!(position(before) < position(after), "{before} must run before {after}");
        }
        assert!(factory.priority_violations().is_empty());
    }

    #[test]
    fn test_order_without_rule_set_uses_every_fixer() {
        let factory = FixerFactory::with_built_in().unwrap();
        assert_eq!(names(&factory).len(), fixers::built_in().len());
    }

    #[test]
    fn test_unknown_fixer() {
        let mut factory = FixerFactory::with_built_in().unwrap();
        let error = factory.use_rule_set(&rules(&["foo"]), false).unwrap_err();
        assert_eq!(error, ConfigurationError::UnknownFixer("foo".to_string()));
        assert_eq!(error.to_string(), "Rule \"foo\" does not exist.");
    }

    #[test]
    fn test_duplicate_fixer() {
        let mut factory = FixerFactory::with_built_in().unwrap();
        let error = factory.register_fixer(Dummy::boxed("encoding", 0), false).unwrap_err();
        assert_eq!(error.to_string(), "Fixer named \"encoding\" is already registered.");
    }

    #[test]
    fn test_fixer_names() {
        let mut factory = FixerFactory::new();
        assert!(factory.register_fixer(Dummy::boxed("Foo", 0), false).is_err());
        assert!(factory.register_fixer(Dummy::boxed("vendor/foo", 0), true).is_err());
        assert!(factory.register_fixer(Dummy::boxed("foo_bar", 0), true).is_err());
        assert!(factory.register_fixer(Dummy::boxed("Vendor/foo_bar", 0), true).is_ok());
        assert!(factory.register_fixer(Dummy::boxed("foo_bar2", 0), false).is_ok());
        assert_eq!(factory.len(), 2);
    }

    #[test]
    fn test_risky_not_allowed() {
        let mut factory = FixerFactory::with_built_in().unwrap();
        let risky = RuleSet::new([("@Symfony:risky", RuleValue::Enabled(true))]).unwrap();
        assert_eq!(
            factory.use_rule_set(&risky, false).unwrap_err(),
            ConfigurationError::RiskyNotAllowed("no_alias_functions".to_string())
        );
        assert!(factory.use_rule_set(&risky, true).is_ok());
    }

    #[test]
    fn test_risky_sets_contain_only_risky_fixers() {
        let factory = FixerFactory::with_built_in().unwrap();
        for preset in Preset::ALL {
            let set = RuleSet::new([(preset.name(), RuleValue::Enabled(true))]).unwrap();
            assert!(!set.is_empty(), "{} is empty", preset.name());
            for name in set.rules().keys() {
                let fixer = factory.fixer(name).unwrap();
                assert_eq!(fixer.is_risky(), preset.is_risky(), "{name} in {}", preset.name());
            }
        }
    }

    #[test]
    fn test_conflicting_fixers() {
        let mut factory = FixerFactory::with_built_in().unwrap();
        factory
            .register_fixer(Dummy::boxed("no_blank_lines_before_namespace", 0), false)
            .unwrap();
        factory
            .register_fixer(Dummy::boxed("single_blank_line_before_namespace", 0), false)
            .unwrap();
        factory.add_conflict("no_blank_lines_before_namespace", "single_blank_line_before_namespace");

        let error = factory
            .use_rule_set(
                &rules(&["no_blank_lines_before_namespace", "single_blank_line_before_namespace"]),
                false,
            )
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Rule contains conflicting fixers:\n- \"no_blank_lines_before_namespace\" with \"single_blank_line_before_namespace\""
        );
        assert!(factory
            .use_rule_set(&rules(&["no_blank_lines_before_namespace"]), false)
            .is_ok());
    }

    #[test]
    fn test_priority_cycle() {
        let mut factory = FixerFactory::new();
        factory.register_fixer(Dummy::boxed("a", 1), false).unwrap();
        factory.register_fixer(Dummy::boxed("b", 2), false).unwrap();
        factory.register_fixer(Dummy::boxed("c", 3), false).unwrap();
        factory.add_priority_constraint("a", "b");
        factory.add_priority_constraint("b", "a");

        let error = factory.use_rule_set(&rules(&["a", "b", "c"]), false).unwrap_err();
        assert_eq!(
            error,
            ConfigurationError::PriorityCycle(vec!["a".to_string(), "b".to_string()])
        );
        // the cycle is harmless when only one side is enabled
        assert!(factory.use_rule_set(&rules(&["a", "c"]), false).is_ok());
        assert_eq!(names(&factory), vec!["c", "a"]);

        assert!(factory.use_rule_set(&rules(&["a", "b", "c"]), false).is_err());
        assert_eq!(names(&factory), vec!["c", "a"]);
    }

    #[test]
    fn test_failed_rule_set_keeps_previous_configuration() {
        let syntax = |value: &str| {
            RuleValue::Configured(FixerConfiguration::from([("syntax".to_string(), ConfigValue::from(value))]))
        };
        let mut factory = FixerFactory::with_built_in().unwrap();
        let first = RuleSet::new([("array_syntax", syntax("short")), ("lowercase_cast", RuleValue::Enabled(true))]).unwrap();
        factory.use_rule_set(&first, false).unwrap();
        let before = names(&factory);

        // array_syntax is configured before list_syntax fails
        let second = RuleSet::new([("array_syntax", syntax("long")), ("list_syntax", syntax("medium"))]).unwrap();
        let error = factory.use_rule_set(&second, false).unwrap_err();
        assert!(matches!(
            error,
            ConfigurationError::InvalidFixerConfiguration { ref name, .. } if name == "list_syntax"
        ));

        assert_eq!(names(&factory), before);
        let mut tokens = Tokens::from_code("<?php $a = array(1);");
        let context = FixContext::new(WhitespaceConfig::default());
        factory.fixer("array_syntax").unwrap().fix(&mut tokens, &context).unwrap();
        assert_eq!(tokens.generate_code(), "<?php $a = [1];");
    }

    #[test]
    fn test_constraint_beats_priority() {
        let mut factory = FixerFactory::new();
        factory.register_fixer(Dummy::boxed("low", -5), false).unwrap();
        factory.register_fixer(Dummy::boxed("high", 10), false).unwrap();
        factory.register_fixer(Dummy::boxed("middle", 0), false).unwrap();
        factory.add_priority_constraint("low", "high");

        assert_eq!(names(&factory), vec!["middle", "low", "high"]);
        assert_eq!(factory.priority_violations(), vec![("low", "high")]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut factory = FixerFactory::new();
        for name in ["z", "y", "x"] {
            factory.register_fixer(Dummy::boxed(name, 0), false).unwrap();
        }
        assert_eq!(names(&factory), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_invalid_configuration() {
        let mut factory = FixerFactory::with_built_in().unwrap();
        let config = FixerConfiguration::from([("syntax".to_string(), ConfigValue::from("medium"))]);
        let set = RuleSet::new([("array_syntax", RuleValue::Configured(config))]).unwrap();
        assert_eq!(
            factory.use_rule_set(&set, false).unwrap_err(),
            ConfigurationError::InvalidFixerConfiguration {
                name: "array_syntax".to_string(),
                message: "The option \"syntax\" with value \"medium\" is invalid.".to_string(),
            }
        );
    }

    #[test]
    fn test_not_configurable() {
        let mut factory = FixerFactory::with_built_in().unwrap();
        let config = FixerConfiguration::from([("foo".to_string(), ConfigValue::Bool(true))]);
        let set = RuleSet::new([("lowercase_cast", RuleValue::Configured(config))]).unwrap();
        assert_eq!(
            factory.use_rule_set(&set, false).unwrap_err().to_string(),
            "[lowercase_cast] Invalid configuration: Is not configurable."
        );
    }

    #[test]
    fn test_list() {
        let factory = FixerFactory::with_built_in().unwrap();
        let list = factory.list();
        assert_eq!(list.len(), factory.len());
        let encoding = list.iter().find(|info| info.name == "encoding").unwrap();
        assert_eq!(encoding.priority, 100);
        assert!(list.iter().all(|info| !info.description.is_empty()));
        assert!(factory.has_fixer("lowercase_cast"));
        assert!(!factory.has_fixer("foo"));
    }
}
