//! Rule set resolution
//!
//! A rule set maps fixer names to `true`, `false` or a configuration, and
//! may reference named sets (`@PSR12`) that expand recursively. Resolution
//! walks the entries in order so later entries override earlier ones, then
//! drops everything that ended up disabled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{builtin_sets, Preset};
use crate::error::RuleSetError;
use crate::fixers::FixerConfiguration;

/// Value of one rule set entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Enabled(bool),
    Configured(FixerConfiguration),
}

impl RuleValue {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RuleValue::Enabled(false))
    }

    pub fn configuration(&self) -> Option<&FixerConfiguration> {
        match self {
            RuleValue::Configured(config) => Some(config),
            RuleValue::Enabled(_) => None,
        }
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Enabled(value)
    }
}

impl From<FixerConfiguration> for RuleValue {
    fn from(value: FixerConfiguration) -> Self {
        RuleValue::Configured(value)
    }
}

/// Set name to its ordered entries
pub type SetDefinitions = BTreeMap<String, Vec<(String, RuleValue)>>;

/// A resolved rule set: only enabled rules, sets fully expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<String, RuleValue>,
}

impl RuleSet {
    /// Resolve `rules` against the built-in sets
    pub fn new<I, S>(rules: I) -> Result<Self, RuleSetError>
    where
        I: IntoIterator<Item = (S, RuleValue)>,
        S: Into<String>,
    {
        Self::with_definitions(&builtin_sets(), rules)
    }

    /// Resolve `rules` against custom set definitions
    pub fn with_definitions<I, S>(definitions: &SetDefinitions, rules: I) -> Result<Self, RuleSetError>
    where
        I: IntoIterator<Item = (S, RuleValue)>,
        S: Into<String>,
    {
        let mut resolved = BTreeMap::new();

        for (name, value) in rules {
            let name = name.into();
            if !name.starts_with('@') {
                resolved.insert(name, value);
                continue;
            }

            let RuleValue::Enabled(enabled) = value else {
                return Err(RuleSetError::NestedSetNotBoolean(name));
            };
            let mut stack = Vec::new();
            resolve_subset(definitions, &name, enabled, &mut stack, &mut resolved)?;
        }

        resolved.retain(|_, value| value.is_enabled());
        tracing::debug!(rules = resolved.len(), "rule set resolved");
        Ok(Self { rules: resolved })
    }

    /// Names of the built-in sets
    pub fn set_definition_names() -> Vec<&'static str> {
        Preset::ALL.iter().map(Preset::name).collect()
    }

    pub fn rules(&self) -> &BTreeMap<String, RuleValue> {
        &self.rules
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    /// Configuration of an enabled rule; `None` when enabled with defaults
    pub fn get_rule_configuration(&self, rule: &str) -> Result<Option<&FixerConfiguration>, RuleSetError> {
        self.rules
            .get(rule)
            .map(RuleValue::configuration)
            .ok_or_else(|| RuleSetError::MissingRule(rule.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn resolve_subset(
    definitions: &SetDefinitions,
    name: &str,
    enabled: bool,
    stack: &mut Vec<String>,
    resolved: &mut BTreeMap<String, RuleValue>,
) -> Result<(), RuleSetError> {
    let definition = definitions
        .get(name)
        .ok_or_else(|| RuleSetError::UnknownSet(name.to_string()))?;
    if stack.iter().any(|open| open == name) {
        return Err(RuleSetError::RecursiveSet(name.to_string()));
    }
    stack.push(name.to_string());

    for (rule, value) in definition {
        if rule.starts_with('@') {
            resolve_subset(definitions, rule, enabled && value.is_enabled(), stack, resolved)?;
        } else if enabled {
            resolved.insert(rule.clone(), value.clone());
        } else {
            resolved.insert(rule.clone(), RuleValue::Enabled(false));
        }
    }

    stack.pop();
    Ok(())
}
