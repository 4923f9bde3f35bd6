//! ferrofix-fixer: PHP-CS-Fixer style fixers on top of `ferrofix-core`
//!
//! This crate turns a rule set into an ordered list of fixers and runs it
//! over source files until the code stops changing.
//!
//! # Features
//!
//! - Built-in fixers for whitespace, casing, casts, array and list syntax,
//!   empty code cleanup and a few risky rewrites
//! - Rule sets with nested `@` presets (`@PSR12`, `@Symfony`, ...)
//! - Scheduling from the priority constraint graph
//! - Batch runner with lint checks and convergence detection
//!
//! # Example
//!
//! ```
//! use ferrofix_fixer::{FixerFactory, RuleSet, Runner, RunnerConfig, SourceFile};
//!
//! let rules = RuleSet::new([("@PSR12", true.into())]).unwrap();
//! let mut factory = FixerFactory::with_built_in().unwrap();
//! factory.use_rule_set(&rules, false).unwrap();
//!
//! let runner = Runner::new(factory.get_fixers().unwrap(), RunnerConfig::default());
//! let report = runner.fix_file(&SourceFile::new("a.php", "<?PHP\n$a = TRUE;  "));
//! assert_eq!(report.code, "<?php\n\n$a = true;\n");
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod fixers;
pub mod logging;
pub mod ruleset;
pub mod runner;

pub use config::{IndentStyle, LineEnding, Preset, WhitespaceConfig};
pub use error::{ConfigurationError, FixerError, RuleSetError};
pub use factory::{FixerFactory, FixerInfo};
pub use fixers::{ConfigValue, FixContext, Fixer, FixerConfiguration, FixerOption, OptionType};
pub use logging::init_logger;
pub use ruleset::{RuleSet, RuleValue};
pub use runner::{
    ErrorKind, ErrorsManager, FileReport, FixStatus, RunReport, Runner, RunnerConfig, SourceFile,
};
